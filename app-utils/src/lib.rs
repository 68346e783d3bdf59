use anyhow::{Context, Result};
use dotenvy::dotenv;
use project_api::{ApiConfig, ProjectApi, Transport};
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt, registry};

/// Loads `.env` (if any) and builds a client from the `PROJECT_API_*` variables.
pub fn init_from_env() -> Result<InitFromEnv> {
    if let Err(err) = dotenv() {
        debug!(%err, "no .env loaded");
    }

    let config = ApiConfig::from_env().context("could not read project API configuration")?;
    debug!(?config, "loaded configuration");

    let api = project_api::client(&config).context("could not build project API client")?;

    Ok(InitFromEnv { config, api })
}

pub struct InitFromEnv {
    pub config: ApiConfig,
    pub api: ProjectApi<Box<dyn Transport>>,
}

pub fn init_tracing() {
    registry()
        .with(fmt::layer().event_format(format().pretty()))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();
}
