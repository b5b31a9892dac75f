use bridge_types::ExitProofResponse;
use jsonrpsee::core::RpcResult;
use jsonrpsee::proc_macros::rpc;

#[rpc(client, server, namespace = "bridge")]
pub trait BridgeApi {
    /// Returns the inclusion proof of an exit event. The id is hex encoded.
    #[method(name = "generateExitProof")]
    async fn generate_exit_proof(&self, exit_id: String) -> RpcResult<ExitProofResponse>;
}
