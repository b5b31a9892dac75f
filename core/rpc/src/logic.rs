use std::sync::Arc;

use bridge_exit_proof::ExitProofService;
use bridge_types::ExitProofResponse;
use bridge_utils::hex::{format_exit_id, parse_exit_id};
use jsonrpsee::core::RpcResult;

use crate::api::BridgeApiServer;
use crate::error::{invalid_exit_id, proof_error};

pub struct BridgeApi {
    proofs: Arc<ExitProofService>,
}

impl BridgeApi {
    pub(crate) fn new(proofs: Arc<ExitProofService>) -> Self {
        Self { proofs }
    }
}

#[async_trait::async_trait]
impl BridgeApiServer for BridgeApi {
    async fn generate_exit_proof(&self, exit_id: String) -> RpcResult<ExitProofResponse> {
        let id = parse_exit_id(&exit_id).map_err(invalid_exit_id)?;
        self.proofs.get_proof(id).map_err(|e| {
            tracing::debug!(exit_id = id, "no exit proof: {e}");
            proof_error(format_exit_id(id), e)
        })
    }
}
