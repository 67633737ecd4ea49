use anyhow::Context;
use tracing_subscriber::EnvFilter;

use pfe_portal::auth::hash_password;
use pfe_portal::config;
use pfe_portal::database::{
    repository::{NewUser, UserRepository},
    DatabaseManager,
};
use pfe_portal::routes::app;
use pfe_portal::state::AppState;
use pfe_portal::types::Role;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECURITY_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")))
        .init();

    let config = config::config().clone();
    tracing::info!("Starting PFE Portal API in {:?} mode", config.environment);

    if pfe_portal::is_development!() {
        tracing::warn!("Running with the development profile (insecure cookies)");
    }
    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("SECURITY_JWT_SECRET must be set outside development");
    }

    // Lazy pool: the server starts (and /health reports degraded) while the database is down.
    let pool = DatabaseManager::connect_lazy(&config.database).context("database configuration")?;

    if config.database.run_migrations {
        if let Err(e) = DatabaseManager::migrate(&pool).await {
            tracing::warn!("Skipping migrations: {}", e);
        }
    }

    if let Err(e) = bootstrap_admin(&UserRepository::new(pool.clone())).await {
        tracing::warn!("Admin bootstrap skipped: {:#}", e);
    }

    let port = config.api.port;
    let state = AppState::new(pool, config);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener =
        tokio::net::TcpListener::bind(&bind_addr).await.with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("PFE Portal API listening on http://{}", bind_addr);
    axum::serve(listener, app(state)).await.context("server")?;
    Ok(())
}

/// Creates the first admin from `PFE_BOOTSTRAP_ADMIN_EMAIL` and
/// `PFE_BOOTSTRAP_ADMIN_PASSWORD` when no admin exists yet.
async fn bootstrap_admin(users: &UserRepository) -> anyhow::Result<()> {
    let (Ok(email), Ok(password)) =
        (std::env::var("PFE_BOOTSTRAP_ADMIN_EMAIL"), std::env::var("PFE_BOOTSTRAP_ADMIN_PASSWORD"))
    else {
        return Ok(());
    };

    if users.count_by_role(Role::Admin).await? > 0 {
        return Ok(());
    }

    let admin = users
        .create(NewUser {
            nom: "Admin".to_string(),
            prenom: "Portail".to_string(),
            email,
            password_hash: hash_password(&password)?,
            role: Role::Admin,
            filiere_id: None,
            valid: true,
            cne: None,
            telephone: None,
            date_naissance: None,
        })
        .await?;
    tracing::info!(user_id = admin.id, "Bootstrap admin created");
    Ok(())
}
