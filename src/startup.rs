use std::sync::Arc;

use anyhow::Context;
use axum::{Router, serve::Serve};
use tokio::net::TcpListener;

use crate::{
    config::{Config, Storage},
    routes::init_router,
    state::AppState,
};

pub struct Application {
    port: u16,
    host: String,
    server: Serve<TcpListener, Router, Router>,
}

impl Application {
    pub async fn build(config: Config) -> Result<Self, anyhow::Error> {
        let address = config.application.get_address();

        let listener = TcpListener::bind(&address)
            .await
            .with_context(|| format!("Unable opening {}", address))?;

        let local_address = listener.local_addr()?;
        let port = local_address.port();
        let host = local_address.ip().to_string();

        let router = match config.application.storage {
            Storage::Postgres => init_router(Arc::new(AppState::postgres(config).await?)),
            Storage::Memory => init_router(Arc::new(AppState::memory(config).await?)),
        };

        Ok(Application {
            port,
            host,
            server: axum::serve(listener, router),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn host(&self) -> String {
        self.host.clone()
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}
