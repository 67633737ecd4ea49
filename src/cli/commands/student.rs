use clap::Subcommand;
use serde_json::json;

use super::demande::report;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::types::DbId;

#[derive(Subcommand)]
pub enum StudentCommands {
    #[command(about = "Activate a registered student (department head)")]
    Activate {
        #[arg(help = "Student id")]
        student_id: DbId,
    },

    #[command(about = "Delete a student account (department head)")]
    Delete {
        #[arg(help = "Student id")]
        student_id: DbId,
    },
}

pub async fn handle(cmd: StudentCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let (_, api) = authenticated().await?;

    match cmd {
        StudentCommands::Activate { student_id } => {
            let reply = api.put(&format!("/validateStudent/{}", student_id), &json!({})).await?;
            report(reply, &format!("Étudiant {} activé", student_id), output_format)
        }
        StudentCommands::Delete { student_id } => {
            let reply = api.delete(&format!("/student/{}", student_id)).await?;
            report(reply, &format!("Étudiant {} supprimé", student_id), output_format)
        }
    }
}
