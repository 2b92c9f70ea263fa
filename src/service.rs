use std::sync::Arc;

use anyhow::{Context, Result};
use axum_server::Handle;
use blob_store::{open_blob_store, BlobStore};
use tokio::signal;
use tracing::info;

use crate::{
    addresser::Fnv64Addresser,
    config::ServerConfig,
    gateway::SecretStoreGateway,
    http_objects::ResponseSettings,
    routes::{create_routes, RouteState},
};

#[derive(Clone)]
pub struct Service {
    pub config: ServerConfig,
    pub gateway: Arc<SecretStoreGateway>,
    pub responses: Arc<ResponseSettings>,
}

impl Service {
    pub async fn new(config: ServerConfig) -> Result<Self> {
        let blob_store = open_blob_store(&config.blob_storage)
            .await
            .context("error initializing blob store")?;
        info!(location = blob_store.location(), "blob store ready");
        Ok(Self::with_blob_store(config, blob_store))
    }

    /// Build around an already opened backend.
    pub fn with_blob_store(config: ServerConfig, blob_store: Arc<dyn BlobStore>) -> Self {
        let gateway = Arc::new(SecretStoreGateway::new(
            blob_store,
            Arc::new(Fnv64Addresser),
            config.link_ttl(),
        ));
        let responses = Arc::new(ResponseSettings::new(
            &config.public_url,
            config.error_status,
        ));
        Self {
            config,
            gateway,
            responses,
        }
    }

    pub fn route_state(&self) -> RouteState {
        RouteState {
            gateway: self.gateway.clone(),
            responses: self.responses.clone(),
            max_secret_bytes: self.config.max_secret_bytes,
        }
    }

    pub async fn start(&self) -> Result<()> {
        let handle = Handle::new();
        let handle_sh = handle.clone();
        tokio::spawn(async move {
            shutdown_signal(handle_sh).await;
            info!("graceful shutdown signal received, shutting down server gracefully");
        });

        let addr = self.config.socket_addr()?;
        info!("server api listening on {}", addr);
        let routes = create_routes(self.route_state());
        axum_server::bind(addr)
            .handle(handle)
            .serve(routes.into_make_service())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal(handle: Handle) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
        },
        _ = terminate => {
        },
    }
    handle.shutdown();
}
