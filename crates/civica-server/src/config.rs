//! Command-line and environment configuration.

use civica_db::DbConfig;
use civica_service::BackfillConfig;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "civica-server", version, about = "Civica maintenance commands")]
pub struct Cli {
    #[command(flatten)]
    pub db: DbArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// SurrealDB connection settings.
#[derive(Debug, Args)]
pub struct DbArgs {
    /// WebSocket address of the SurrealDB server.
    #[arg(long, env = "CIVICA_DB_URL", default_value = "127.0.0.1:8000")]
    pub db_url: String,

    #[arg(long, env = "CIVICA_DB_NAMESPACE", default_value = "civica")]
    pub db_namespace: String,

    #[arg(long, env = "CIVICA_DB_DATABASE", default_value = "main")]
    pub db_database: String,

    #[arg(long, env = "CIVICA_DB_USERNAME", default_value = "root")]
    pub db_username: String,

    #[arg(
        long,
        env = "CIVICA_DB_PASSWORD",
        default_value = "root",
        hide_env_values = true
    )]
    pub db_password: String,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Apply pending schema migrations.
    Migrate,

    /// Assign every user without an organization to the default one,
    /// creating it if needed. Prints the report as JSON.
    BackfillDefaultOrg {
        /// Slug of the default organization.
        #[arg(long, default_value = "default")]
        slug: String,

        /// Name used if the organization has to be created.
        #[arg(long, default_value = "Default Organization")]
        name: String,

        /// Contact email used if the organization has to be created.
        #[arg(long, default_value = "admin@localhost")]
        email: String,

        /// Unassigned users fetched per page.
        #[arg(long, default_value_t = 100)]
        batch_size: u64,
    },
}

impl From<DbArgs> for DbConfig {
    fn from(args: DbArgs) -> Self {
        Self {
            url: args.db_url,
            namespace: args.db_namespace,
            database: args.db_database,
            username: args.db_username,
            password: args.db_password,
        }
    }
}

/// Backfill settings from the subcommand flags. Anything not exposed on
/// the command line keeps its default.
pub fn backfill_config(
    slug: String,
    name: String,
    email: String,
    batch_size: u64,
) -> BackfillConfig {
    BackfillConfig {
        slug,
        name,
        email,
        batch_size,
        ..Default::default()
    }
}
