use std::{fmt::Debug, net::SocketAddr, path::Path, time::Duration};

use anyhow::{anyhow, Context, Result};
use blob_store::{uri, validate_expiry, BlobStorageConfig};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::http_objects::ErrorStatus;

const LOCAL_ENV: &str = "local";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub env: String,
    pub listen_addr: String,
    /// Shown to users in the usage examples.
    pub public_url: String,
    pub link_ttl_mins: u64,
    pub max_secret_bytes: usize,
    pub error_status: ErrorStatus,
    pub blob_storage: BlobStorageConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            env: LOCAL_ENV.to_string(),
            listen_addr: "0.0.0.0:9090".to_string(),
            public_url: "https://<secrets-server-url>".to_string(),
            link_ttl_mins: 30,
            max_secret_bytes: 1024 * 1024,
            error_status: ErrorStatus::default(),
            blob_storage: BlobStorageConfig::default(),
        }
    }
}

/// Values given on the command line. They win over every other source.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bucket: Option<String>,
    pub link_ttl_mins: Option<u64>,
    pub port: Option<u16>,
}

impl ServerConfig {
    fn figment(yaml: Option<&str>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(ServerConfig::default()));
        if let Some(yaml) = yaml {
            figment = figment.merge(Yaml::string(yaml));
        }
        figment.merge(Env::prefixed("WHISPER_").split("__"))
    }

    /// Defaults, then the YAML file at `path`, then `WHISPER_*` variables.
    pub fn load(path: Option<&Path>) -> Result<ServerConfig> {
        let yaml = match path {
            Some(path) => Some(
                std::fs::read_to_string(path)
                    .with_context(|| format!("reading config file {}", path.display()))?,
            ),
            None => None,
        };
        let config: ServerConfig = Self::figment(yaml.as_deref())
            .extract()
            .context("parsing server config")?;
        Ok(config)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) -> Result<()> {
        if let Some(bucket) = overrides.bucket {
            self.blob_storage.path = if uri::scheme(&bucket).is_some() {
                bucket
            } else {
                format!("s3://{}", bucket)
            };
        }
        if let Some(mins) = overrides.link_ttl_mins {
            self.link_ttl_mins = mins;
        }
        if let Some(port) = overrides.port {
            let mut addr = self.socket_addr()?;
            addr.set_port(port);
            self.listen_addr = addr.to_string();
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;
        validate_expiry(self.link_ttl())
            .map_err(|reason| anyhow!("invalid link_ttl_mins {}: {}", self.link_ttl_mins, reason))?;
        if self.max_secret_bytes == 0 {
            return Err(anyhow!("max_secret_bytes must be greater than zero"));
        }
        let path = &self.blob_storage.path;
        if !uri::is_s3_uri(path) && !uri::is_file_uri(path) {
            return Err(anyhow!(
                "unsupported blob storage path {}, expected s3:// or file://",
                path
            ));
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.listen_addr
            .parse()
            .map_err(|_| anyhow!("invalid listen address: {}", self.listen_addr))
    }

    pub fn link_ttl(&self) -> Duration {
        Duration::from_secs(self.link_ttl_mins.saturating_mul(60))
    }

    pub fn structured_logging(&self) -> bool {
        self.env != LOCAL_ENV
    }
}
