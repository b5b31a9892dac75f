//! JSON-RPC access to exit proofs.
//!
//! Serves `bridge_generateExitProof` out of an [`ExitProofService`].

mod api;
mod client;
mod config;
mod error;
mod logic;


use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
pub use api::{BridgeApiClient, BridgeApiServer};
use bridge_exit_proof::ExitProofService;
use bridge_interfaces::ConfigConsumer;
pub use client::rpc_client;
pub use config::RpcConfig;
pub use error::{EVENT_NOT_CHECKPOINTED_CODE, EVENT_NOT_FOUND_CODE};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use tokio::sync::Mutex;

pub struct Rpc {
    config: RpcConfig,
    module: RpcModule<()>,
    /// Present while the server is running.
    handle: Mutex<Option<(SocketAddr, ServerHandle)>>,
}

impl Rpc {
    pub fn new(config: RpcConfig, proofs: Arc<ExitProofService>) -> anyhow::Result<Self> {
        let mut module = RpcModule::new(());
        module.merge(logic::BridgeApi::new(proofs).into_rpc())?;

        Ok(Self {
            config,
            module,
            handle: Mutex::new(None),
        })
    }

    /// Bind and start serving. Returns the bound address, which differs from the configured one
    /// when the configured port is 0. Starting a running server is a no-op.
    pub async fn start(&self) -> anyhow::Result<SocketAddr> {
        let mut guard = self.handle.lock().await;
        if let Some((addr, _)) = guard.as_ref() {
            return Ok(*addr);
        }

        let server = Server::builder()
            .build(self.config.addr())
            .await
            .with_context(|| format!("Failed to bind rpc server to {}", self.config.addr()))?;
        let addr = server.local_addr()?;
        let handle = server.start(self.module.clone());
        tracing::info!(%addr, "rpc server started");

        *guard = Some((addr, handle));
        Ok(addr)
    }

    pub async fn shutdown(&self) {
        let Some((addr, handle)) = self.handle.lock().await.take() else {
            return;
        };
        if handle.stop().is_ok() {
            handle.stopped().await;
        }
        tracing::info!(%addr, "rpc server stopped");
    }

    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.handle.lock().await.as_ref().map(|(addr, _)| *addr)
    }
}

impl ConfigConsumer for Rpc {
    const KEY: &'static str = "rpc";

    type Config = RpcConfig;
}
