use bridge_exit_proof::ExitProofError;
use bridge_utils::hex::ParseExitIdError;
use jsonrpsee::types::error::{ErrorCode, ErrorObjectOwned};
use serde::Serialize;

/// The exit event was emitted but no checkpoint contains it yet. Retry later.
pub const EVENT_NOT_CHECKPOINTED_CODE: i32 = -32001;
/// No exit event with this id exists.
pub const EVENT_NOT_FOUND_CODE: i32 = -32002;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorData {
    exit_id: String,
    retriable: bool,
}

pub(crate) fn invalid_exit_id(err: ParseExitIdError) -> ErrorObjectOwned {
    ErrorObjectOwned::owned(
        ErrorCode::InvalidParams.code(),
        err.to_string(),
        None::<()>,
    )
}

pub(crate) fn proof_error(exit_id: String, err: ExitProofError) -> ErrorObjectOwned {
    let code = match err {
        ExitProofError::EventNotInAnyCheckpoint(_) => EVENT_NOT_CHECKPOINTED_CODE,
        ExitProofError::EventNotFound(_) => EVENT_NOT_FOUND_CODE,
        _ => ErrorCode::InternalError.code(),
    };
    let data = ErrorData {
        exit_id,
        retriable: err.is_retriable(),
    };
    ErrorObjectOwned::owned(code, err.to_string(), Some(data))
}
