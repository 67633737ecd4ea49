use clap::{Args, ValueEnum};
use serde_json::Value;

use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::client::{FetchError, Fetcher};
use crate::database::models::PublicUser;
use crate::table::{columns, render::render_text, Column, DataTable, SortDirection};
use crate::types::{DbId, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Resource {
    Users,
    Filieres,
    Students,
    Profs,
    Domaines,
    Prerequis,
    Pfes,
    Demandes,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(value_enum, help = "What to list")]
    pub resource: Resource,

    #[arg(long, help = "Filière id (defaults to your own)")]
    pub filiere: Option<DbId>,

    #[arg(long, short, help = "Case-insensitive search over the displayed columns")]
    pub search: Option<String>,

    #[arg(long, help = "Column key to sort by")]
    pub sort: Option<String>,

    #[arg(long, help = "Sort descending")]
    pub desc: bool,

    #[arg(long, default_value_t = 1, help = "Page number")]
    pub page: usize,

    #[arg(
        long,
        default_value_t = DEFAULT_PER_PAGE,
        value_parser = clap::value_parser!(u16).range(1..),
        help = "Rows per page"
    )]
    pub per_page: u16,
}

pub const DEFAULT_PER_PAGE: u16 = 10;

/// Endpoint and column set of `resource` for `user`.
fn source(resource: Resource, user: &PublicUser, filiere: Option<DbId>) -> anyhow::Result<(String, Vec<Column>)> {
    let scoped = || {
        filiere
            .or(user.filiere_id)
            .ok_or_else(|| anyhow::anyhow!("Précisez la filière avec --filiere"))
    };

    Ok(match resource {
        Resource::Users => ("/users".to_string(), columns::users()),
        Resource::Filieres => ("/filiere".to_string(), columns::catalog()),
        Resource::Students => (format!("/stdListe/{}", scoped()?), columns::students()),
        Resource::Profs => (format!("/prof/{}", scoped()?), columns::professors()),
        Resource::Domaines => (format!("/domaine/{}", scoped()?), columns::catalog()),
        Resource::Prerequis => (format!("/prerequis/{}", scoped()?), columns::catalog()),
        Resource::Pfes => match user.role {
            Role::Professor => (format!("/myPfe/{}", user.id), columns::pfes()),
            _ => (format!("/pfeListe/{}", scoped()?), columns::pfes()),
        },
        Resource::Demandes => match user.role {
            Role::Professor => (format!("/demandes/prof/{}", user.id), columns::demandes()),
            Role::Student => (format!("/myDemandes/{}", user.id), columns::demandes()),
            _ => anyhow::bail!("Les demandes sont consultées par les professeurs et les étudiants"),
        },
    })
}

pub async fn handle(args: ListArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let (user, api) = authenticated().await?;
    let (path, columns) = source(args.resource, &user, args.filiere)?;

    // Ctrl-C aborts the request instead of leaving it dangling.
    let mut fetcher = Fetcher::new();
    let pending = fetcher.run(async move {
        api.get_data::<Vec<Value>>(&path).await.map_err(FetchError::from)
    });
    let rows = tokio::select! {
        rows = pending => rows?,
        _ = tokio::signal::ctrl_c() => {
            fetcher.abort();
            return Err(FetchError::Aborted.into());
        }
    };

    let mut table = DataTable::new(columns, usize::from(args.per_page));
    if let Some(term) = &args.search {
        table.set_search(term.as_str());
    }
    if let Some(key) = &args.sort {
        let direction = if args.desc { SortDirection::Desc } else { SortDirection::Asc };
        table.set_sort(key, direction);
    }
    table.set_page(args.page);

    let view = table.view(&rows);
    match output_format {
        OutputFormat::Json => {
            let page: Vec<&Value> = view.rows.clone();
            println!("{}", serde_json::to_string_pretty(&page)?);
        }
        OutputFormat::Text => print!("{}", render_text(&table, &view)),
    }
    Ok(())
}
