use std::{path::PathBuf, process::ExitCode};

use ::tracing::{error, info_span, Instrument};
use clap::Parser;
use config::{ConfigOverrides, ServerConfig};
use service::Service;

mod addresser;
mod config;
mod error;
mod gateway;
mod http_objects;
mod routes;
mod secret;
mod service;
mod tracing;
use crate::tracing::setup_tracing;

#[cfg(test)]
mod testing;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[arg(short, long, value_name = "config file", help = "Path to config file")]
    config: Option<PathBuf>,

    #[arg(long, help = "Bucket secrets are stored in, e.g. users-shared-secrets")]
    bucket: Option<String>,

    #[arg(long, help = "Minutes an issued link stays valid")]
    expiry_time_mins: Option<u64>,

    #[arg(long, help = "Port to listen on")]
    port: Option<u16>,
}

fn load_config(cli: Cli) -> anyhow::Result<ServerConfig> {
    let mut config = ServerConfig::load(cli.config.as_deref())?;
    config.apply_overrides(ConfigOverrides {
        bucket: cli.bucket,
        link_ttl_mins: cli.expiry_time_mins,
        port: cli.port,
    })?;
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match load_config(cli) {
        Ok(config) => config,
        Err(err) => {
            // no usable config, so log with the defaults
            setup_tracing(&ServerConfig::default());
            error!("invalid configuration: {:#}", err);
            return ExitCode::FAILURE;
        }
    };
    setup_tracing(&config);

    let root_span = info_span!("whisper", env = config.env);
    let result = async {
        let service = Service::new(config).await?;
        service.start().await
    }
    .instrument(root_span)
    .await;

    if let Err(err) = result {
        error!("Error running service: {:?}", err);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
