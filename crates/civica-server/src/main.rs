//! Civica Server: maintenance entry point.
//!
//! ```bash
//! civica-server migrate
//! CIVICA_DB_URL=db:8000 civica-server backfill-default-org --slug default
//! ```

mod config;

use civica_db::{DbConfig, DbManager};
use civica_service::DefaultOrganizationBackfill;
use clap::Parser;
use config::{Cli, Command};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum ServerError {
    #[error("database connection failed: {0}")]
    Connect(#[from] surrealdb::Error),

    #[error(transparent)]
    Db(#[from] civica_db::DbError),

    #[error(transparent)]
    Civica(#[from] civica_core::CivicaError),

    #[error("failed to encode report: {0}")]
    Report(#[from] serde_json::Error),
}

fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("civica=info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .json()
        .init();
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let cli = Cli::parse();
    init_logging();

    let db_config = DbConfig::from(cli.db);
    let db = DbManager::connect(&db_config).await?;

    match cli.command {
        Command::Migrate => {
            let applied = db.migrate().await?;
            info!(applied, "Migrations complete");
        }
        Command::BackfillDefaultOrg {
            slug,
            name,
            email,
            batch_size,
        } => {
            db.migrate().await?;
            let backfill = DefaultOrganizationBackfill::new(
                db.organizations(),
                db.users(),
                config::backfill_config(slug, name, email, batch_size),
            );
            let report = backfill.run().await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
