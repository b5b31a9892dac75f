//! The canonical byte encoding of cross-chain events.
//!
//! Events are encoded as the ABI encoding of `tuple(uint256 id, address sender, address receiver,
//! bytes data)`, which is what the root chain contracts hash and decode. Decoding is strict: any
//! input that is not exactly the canonical encoding of some event is rejected.

use ethers::abi::{self, ParamType, Token};
use ethers::types::{Address, Bytes, U256};
use thiserror::Error;

use crate::{ExitEvent, StateSyncEvent};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Malformed event: {0}")]
    MalformedEvent(String),
}

/// Deterministic binary encoding of an event. `decode(encode(e)) == e` for every event.
pub trait EventCodec: Sized {
    /// Version of the wire layout. Bumped whenever the field layout changes.
    const VERSION: u8;

    fn encode(&self) -> Vec<u8>;

    fn decode(bytes: &[u8]) -> Result<Self, CodecError>;
}

/// The ABI layout shared by every event kind.
fn event_param_type() -> ParamType {
    ParamType::Tuple(vec![
        ParamType::Uint(256),
        ParamType::Address,
        ParamType::Address,
        ParamType::Bytes,
    ])
}

fn encode_fields(id: u64, sender: Address, receiver: Address, data: &Bytes) -> Vec<u8> {
    abi::encode(&[Token::Tuple(vec![
        Token::Uint(U256::from(id)),
        Token::Address(sender),
        Token::Address(receiver),
        Token::Bytes(data.to_vec()),
    ])])
}

fn decode_fields(bytes: &[u8]) -> Result<(u64, Address, Address, Bytes), CodecError> {
    let mut tokens = abi::decode(&[event_param_type()], bytes)
        .map_err(|e| CodecError::MalformedEvent(e.to_string()))?;

    let fields = match tokens.pop() {
        Some(Token::Tuple(fields)) if tokens.is_empty() => fields,
        _ => return Err(CodecError::MalformedEvent("expected a single tuple".into())),
    };

    let (id, sender, receiver, data) = match fields.as_slice() {
        [
            Token::Uint(id),
            Token::Address(sender),
            Token::Address(receiver),
            Token::Bytes(data),
        ] => (*id, *sender, *receiver, data.clone()),
        _ => return Err(CodecError::MalformedEvent("unexpected tuple shape".into())),
    };

    if id > U256::from(u64::MAX) {
        return Err(CodecError::MalformedEvent(format!(
            "event id {id} does not fit in 64 bits"
        )));
    }
    let id = id.as_u64();
    let data = Bytes::from(data);

    // The ABI decoder tolerates trailing bytes and unusual offsets. Only the canonical
    // encoding is accepted, so that one event has exactly one byte representation.
    if encode_fields(id, sender, receiver, &data) != bytes {
        return Err(CodecError::MalformedEvent(
            "input is not canonically encoded".into(),
        ));
    }

    Ok((id, sender, receiver, data))
}

impl EventCodec for ExitEvent {
    const VERSION: u8 = 1;

    fn encode(&self) -> Vec<u8> {
        encode_fields(self.id, self.sender, self.receiver, &self.data)
    }

    fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let (id, sender, receiver, data) = decode_fields(bytes)?;
        Ok(Self {
            id,
            sender,
            receiver,
            data,
        })
    }
}

impl EventCodec for StateSyncEvent {
    const VERSION: u8 = 1;

    fn encode(&self) -> Vec<u8> {
        encode_fields(self.id, self.sender, self.receiver, &self.data)
    }

    fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let (id, sender, receiver, data) = decode_fields(bytes)?;
        Ok(Self {
            id,
            sender,
            receiver,
            data,
        })
    }
}
