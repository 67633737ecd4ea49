use serde_json::{json, Value};
use std::io::{self, BufRead, Write};

use crate::auth::cookies::AUTH_COOKIE;
use crate::cli::config::{cookie_jar_path, load_cli_config, resolve_server_url};
use crate::cli::OutputFormat;
use crate::client::{ApiClient, ClientError, HttpAuthClient};
use crate::database::models::PublicUser;
use crate::session::{AuthContext, CookieJar, SessionState};

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(obj)) = (data, response.as_object_mut()) {
                obj.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str, error_code: Option<&str>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Erreur: {}", message);
        }
    }
    Ok(())
}

/// Prints field errors under their field names, then the message.
pub fn output_client_error(output_format: &OutputFormat, err: &ClientError) -> anyhow::Result<()> {
    if let ClientError::Api { field_errors, .. } = err {
        if matches!(output_format, OutputFormat::Text) {
            for (field, message) in field_errors {
                eprintln!("  {}: {}", field, message);
            }
        }
    }
    output_error(output_format, &err.to_string(), None)
}

pub fn describe_user(user: &PublicUser) -> String {
    format!("{} {} <{}> · {}", user.prenom, user.nom, user.email, user.role)
}

/// Reads one trimmed line after printing `label`.
pub fn prompt(label: &str) -> anyhow::Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Authentication context over the configured server and the on-disk jar.
pub fn open_session() -> anyhow::Result<AuthContext<HttpAuthClient>> {
    let server_url = resolve_server_url(&load_cli_config()?);
    let jar = CookieJar::load(cookie_jar_path()?)?;
    let api = ApiClient::new(&server_url)?;
    Ok(AuthContext::new(HttpAuthClient::new(api), jar))
}

/// Resolves the session and returns the user with an API client carrying
/// the session credentials. Fails when nobody is logged in.
pub async fn authenticated() -> anyhow::Result<(PublicUser, ApiClient)> {
    let mut ctx = open_session()?;
    match ctx.init().await {
        SessionState::Authenticated(user) => {
            let user = user.clone();
            let api = ctx
                .client()
                .api()
                .clone()
                .with_token(ctx.jar().get(AUTH_COOKIE).map(str::to_string))
                .with_cookie_header(ctx.jar().cookie_header());
            Ok((user, api))
        }
        _ => anyhow::bail!("Non connecté. Utilisez `pfe auth login <email>`"),
    }
}
