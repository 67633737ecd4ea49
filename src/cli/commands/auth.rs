use chrono::Utc;
use clap::Subcommand;
use serde_json::{json, Map, Value};

use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::client::ClientError;
use crate::config::config;
use crate::database::models::Filiere;
use crate::form::schemas::{student_registration, CLIENT_ONLY_FIELDS};
use crate::form::{FieldType, FieldValue, MultiStepForm, SelectOption};
use crate::session::SessionState;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Log in and store the session cookies")]
    Login {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Log out and clear the session cookies")]
    Logout,

    #[command(about = "Show the logged-in user")]
    Whoami,

    #[command(about = "Register as a student (interactive)")]
    Register,
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { email, password } => {
            let password = match password {
                Some(password) => password,
                None => prompt("Mot de passe")?,
            };

            let mut ctx = open_session()?;
            match ctx.login(&email, &password).await {
                Ok(user) => output_success(
                    &output_format,
                    &format!("Connecté: {}", describe_user(user)),
                    Some(json!({ "user": user, "home": user.role.home_path() })),
                ),
                Err(e) => {
                    output_error(&output_format, &e.to_string(), None)?;
                    anyhow::bail!("Échec de la connexion")
                }
            }
        }
        AuthCommands::Logout => {
            let mut ctx = open_session()?;
            ctx.logout().await;
            output_success(&output_format, "Déconnecté", None)
        }
        AuthCommands::Whoami => {
            let mut ctx = open_session()?;
            match ctx.init().await {
                SessionState::Authenticated(user) => {
                    output_success(&output_format, &describe_user(user), Some(json!({ "user": user })))
                }
                _ => output_error(&output_format, "Non connecté", Some("ANONYMOUS")),
            }
        }
        AuthCommands::Register => register(output_format).await,
    }
}

/// Walks the registration form step by step, re-prompting fields that fail
/// validation, then submits everything except the client-only fields.
async fn register(output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = open_session()?;
    let api = ctx.client().api().clone();

    let filieres: Vec<Filiere> = api.get_data("/filiere").await?;
    if filieres.is_empty() {
        anyhow::bail!("Aucune filière disponible");
    }
    let options = filieres.iter().map(|f| SelectOption::new(f.id.to_string(), f.nom.clone())).collect();

    let schema = student_registration(options, Utc::now().date_naive(), config().security.min_password_length);
    let mut form = MultiStepForm::new(schema);

    loop {
        let step = form.schema().steps[form.current_step()].clone();
        println!("\n[{}/{}] {}", form.current_step() + 1, form.step_count(), step.title);

        for field in &step.fields {
            let already_ok = form.values().contains_key(&field.name) && form.error(&field.name).is_none();
            if already_ok {
                continue;
            }
            if let Some(error) = form.error(&field.name) {
                println!("  ! {}", error);
            }
            if field.field_type == FieldType::Select {
                for option in &field.options {
                    println!("  {}) {}", option.value, option.label);
                }
            }

            let answer = prompt(&field.label)?;
            let value = match field.field_type {
                FieldType::Checkbox => FieldValue::Bool(matches!(answer.to_lowercase().as_str(), "o" | "oui" | "y" | "yes")),
                _ => FieldValue::Text(answer),
            };
            form.set_field(&field.name, value);
        }

        let on_last_step = form.is_last_step();
        if form.next() && on_last_step {
            break;
        }
    }

    let payload = form.submit(|values| {
        values
            .iter()
            .filter(|(name, _)| !CLIENT_ONLY_FIELDS.contains(&name.as_str()))
            .map(|(name, value)| (name.clone(), json!(value)))
            .collect::<Map<String, Value>>()
    })?;

    match api.post("/registerStudent", &Value::Object(payload)).await?.into_data::<Value>() {
        Ok(user) => output_success(
            &output_format,
            "Inscription enregistrée. Votre compte doit être activé par le chef de département.",
            Some(json!({ "user": user })),
        ),
        Err(e @ ClientError::Api { .. }) => {
            output_client_error(&output_format, &e)?;
            anyhow::bail!("Inscription refusée")
        }
        Err(e) => Err(e.into()),
    }
}
