use async_trait::async_trait;
use bridge_interfaces::CheckpointSink;
use bridge_types::{Checkpoint, ValidatorSet};
use parking_lot::Mutex;

/// A checkpoint sink that keeps every submitted checkpoint.
#[derive(Default)]
pub struct RecordingSink {
    submitted: Mutex<Vec<Checkpoint>>,
}

impl RecordingSink {
    pub fn submitted(&self) -> Vec<Checkpoint> {
        self.submitted.lock().clone()
    }
}

#[async_trait]
impl CheckpointSink for RecordingSink {
    async fn submit_checkpoint(
        &self,
        checkpoint: &Checkpoint,
        _validators: &ValidatorSet,
    ) -> anyhow::Result<()> {
        self.submitted.lock().push(checkpoint.clone());
        Ok(())
    }
}
