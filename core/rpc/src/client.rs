use anyhow::Context;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};

/// Build a client for the bridge JSON-RPC server at `address`, e.g. `http://127.0.0.1:4069`.
///
/// The returned client implements [`crate::BridgeApiClient`].
pub fn rpc_client(address: &str) -> anyhow::Result<HttpClient> {
    HttpClientBuilder::default()
        .build(address)
        .context(format!("Trying to build rpc client for {address}"))
}
