use anyhow::{Context, Result};
use clap::Parser;
use domain_db::db;
use dotenvy::dotenv;
use lazy_static::lazy_static;

mod api;
mod configuration;

use crate::api::ApiConfig;
use crate::configuration::{ApiSettings, DatabaseSettings};

#[actix_web::main]
async fn main() -> Result<()> {
    let opts = Opts::parse();

    dotenv().ok();

    // Repository
    let repository = {
        let db_settings = DatabaseSettings::try_from_env()?;

        db::PostgresRepository::new(&db_settings.connection_string(), "./migrations")
            .context("Cannot connect to database")?
    };

    // Setup logger
    {
        #[cfg(debug_assertions)]
        let default_env_filter = "debug";
        #[cfg(not(debug_assertions))]
        let default_env_filter = "info";

        api::init_logger(default_env_filter).context("Failed to setup logger")?;
    }

    // Check for migrations
    if repository.any_pending_migrations()? {
        if opts.migrate {
            repository.run_pending_migrations()?;
            log::info!("Migration successfully")
        } else {
            log::error!("Migration needed");
            std::process::exit(1)
        }
    }

    let ApiSettings { address, port } = ApiSettings::try_from_env()?;

    log::info!("Start listening on {}:{}...", address, port);

    let api_config = ApiConfig {
        address,
        port,
        repository,
    };

    api::run(api_config)?.await?;

    Ok(())
}

#[derive(Parser)]
#[command(author, version, about)]
#[command(disable_help_subcommand = true)]
struct Opts {
    /// Migrate database
    #[arg(short = 'm', long = "migrate")]
    migrate: bool,
}

fn version() -> &'static str {
    #[cfg(debug_assertions)]
    lazy_static! {
        static ref VERSION: String = format!("{}+dev", env!("CARGO_PKG_VERSION"));
    }

    #[cfg(not(debug_assertions))]
    lazy_static! {
        static ref VERSION: String = env!("CARGO_PKG_VERSION").to_string();
    }
    &VERSION
}
