pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "pfe")]
#[command(about = "PFE CLI - command-line client for the PFE portal API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Server selection and health")]
    Server {
        #[command(subcommand)]
        cmd: commands::server::ServerCommands,
    },

    #[command(about = "Login, logout, registration and session status")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "List users, students, PFEs, applications and catalog entries")]
    List(commands::list::ListArgs),

    #[command(about = "Apply to, accept or withdraw PFE applications")]
    Demande {
        #[command(subcommand)]
        cmd: commands::demande::DemandeCommands,
    },

    #[command(about = "Student account management")]
    Student {
        #[command(subcommand)]
        cmd: commands::student::StudentCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Server { cmd } => commands::server::handle(cmd, output_format).await,
        Commands::Auth { cmd } => commands::auth::handle(cmd, output_format).await,
        Commands::List(args) => commands::list::handle(args, output_format).await,
        Commands::Demande { cmd } => commands::demande::handle(cmd, output_format).await,
        Commands::Student { cmd } => commands::student::handle(cmd, output_format).await,
    }
}
