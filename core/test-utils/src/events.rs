use std::ops::Range;

use bridge_types::{
    build_exit_tree,
    Address,
    AggregatedSignature,
    Bytes,
    Checkpoint,
    CheckpointCommitment,
    CheckpointedBatch,
    ExitEvent,
    H256,
};
use rand::Rng;

/// A deterministic exit event whose fields are derived from its id.
pub fn exit_event(id: u64) -> ExitEvent {
    ExitEvent {
        id,
        sender: Address::from_low_u64_be(0x5e00 + id),
        receiver: Address::from_low_u64_be(0x7e00 + id),
        data: Bytes::from(format!("exit-{id}").into_bytes()),
    }
}

pub fn exit_events(ids: Range<u64>) -> Vec<ExitEvent> {
    ids.map(exit_event).collect()
}

/// Exit events with the given ids and random addresses and payloads.
pub fn random_exit_events<R: Rng>(rng: &mut R, ids: Range<u64>) -> Vec<ExitEvent> {
    ids.map(|id| {
        let len = rng.gen_range(0..128);
        ExitEvent {
            id,
            sender: Address::from(rng.gen::<[u8; 20]>()),
            receiver: Address::from(rng.gen::<[u8; 20]>()),
            data: Bytes::from((0..len).map(|_| rng.gen()).collect::<Vec<u8>>()),
        }
    })
    .collect()
}

/// A batch over `[start_block, end_block]` whose commitment is unsigned. Good enough for
/// components that trust the batch they are handed.
pub fn unsigned_batch(
    start_block: u64,
    end_block: u64,
    events: Vec<ExitEvent>,
) -> CheckpointedBatch {
    CheckpointedBatch {
        checkpoint: Checkpoint {
            commitment: CheckpointCommitment {
                epoch: 1,
                start_block,
                end_block,
                event_root: H256(build_exit_tree(&events).root()),
                validator_set_hash: H256::zero(),
            },
            aggregated_signature: AggregatedSignature {
                signature: Default::default(),
                signers: Default::default(),
            },
        },
        events,
    }
}
