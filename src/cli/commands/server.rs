use clap::Subcommand;
use serde_json::{json, Value};

use crate::cli::config::*;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::client::ApiClient;

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Point the CLI at a portal server")]
    Use {
        #[arg(help = "Server URL, e.g. http://localhost:3000")]
        url: String,
    },

    #[command(about = "Show the server the CLI talks to")]
    Current,

    #[command(about = "Show server information from the API root endpoint")]
    Info,

    #[command(about = "Check server health from the /health endpoint")]
    Health,
}

pub async fn handle(cmd: ServerCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ServerCommands::Use { url } => {
            let api = ApiClient::new(&url)?;
            let mut config = load_cli_config()?;
            config.set_server(api.base_url().to_string());
            save_cli_config(&config)?;
            output_success(&output_format, &format!("Serveur: {}", api.base_url()), Some(json!({ "server_url": api.base_url().as_str() })))
        }
        ServerCommands::Current => {
            let url = resolve_server_url(&load_cli_config()?);
            output_success(&output_format, &format!("Serveur: {}", url), Some(json!({ "server_url": url })))
        }
        ServerCommands::Info => {
            let api = ApiClient::new(&resolve_server_url(&load_cli_config()?))?;
            let info: Value = api.get_data("/").await?;
            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&info)?),
                OutputFormat::Text => {
                    for (key, value) in info.as_object().into_iter().flatten() {
                        println!("{}: {}", key, crate::table::stringify(value));
                    }
                }
            }
            Ok(())
        }
        ServerCommands::Health => {
            let api = ApiClient::new(&resolve_server_url(&load_cli_config()?))?;
            let reply = api.get("/health").await?;
            let healthy = reply.status.is_success();
            let body = reply.body;
            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&body)?),
                OutputFormat::Text => {
                    let status = body.pointer("/data/status").or_else(|| body.get("error")).map(crate::table::stringify);
                    println!("{} {}", if healthy { "✓" } else { "✗" }, status.unwrap_or_default());
                }
            }
            if !healthy {
                anyhow::bail!("Serveur indisponible");
            }
            Ok(())
        }
    }
}
