use clap::Subcommand;
use serde_json::{json, Value};

use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::client::{ApiReply, ClientError};
use crate::types::DbId;

#[derive(Subcommand)]
pub enum DemandeCommands {
    #[command(about = "Apply to a PFE (student)")]
    Apply {
        #[arg(help = "PFE id")]
        pfe_id: DbId,
    },

    #[command(about = "Accept an application (professor)")]
    Accept {
        #[arg(help = "Demande id")]
        demande_id: DbId,
    },

    #[command(about = "Withdraw or refuse an application")]
    Delete {
        #[arg(help = "Demande id")]
        demande_id: DbId,
    },
}

pub async fn handle(cmd: DemandeCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let (_, api) = authenticated().await?;

    let (reply, message) = match cmd {
        DemandeCommands::Apply { pfe_id } => {
            (api.post("/addDemande", &json!({ "idPfe": pfe_id })).await?, format!("Candidature envoyée pour le PFE {}", pfe_id))
        }
        DemandeCommands::Accept { demande_id } => (
            api.put("/affectPfe", &json!({ "idDemande": demande_id })).await?,
            format!("Demande {} acceptée", demande_id),
        ),
        DemandeCommands::Delete { demande_id } => {
            (api.delete(&format!("/deleteDemande/{}", demande_id)).await?, format!("Demande {} supprimée", demande_id))
        }
    };

    report(reply, &message, output_format)
}

/// Prints the outcome of a write; server refusals become a failed command.
pub fn report(reply: ApiReply, message: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    match reply.into_data::<Value>() {
        Ok(data) => output_success(&output_format, message, Some(json!({ "data": data }))),
        Err(e @ ClientError::Api { .. }) => {
            output_client_error(&output_format, &e)?;
            anyhow::bail!("Opération refusée")
        }
        Err(e) => Err(e.into()),
    }
}
