use std::time::Duration;

use async_trait::async_trait;
use bridge_crypto::{ConsensusSecretKey, SecretKey};
use bridge_interfaces::{CheckpointVote, CheckpointVoteSource};
use bridge_types::{CheckpointCommitment, ValidatorSet};
use tokio::sync::mpsc;

use crate::keys::TestValidator;

/// A vote source where the given validators sign every commitment they are asked to.
///
/// Votes are sent from a spawned task, optionally spaced by a delay. With `hold_open` the
/// channel stays open after the last vote, like a network where the other validators never
/// answer.
pub struct SigningVoteSource {
    signers: Vec<TestValidator>,
    delay: Option<Duration>,
    hold_open: bool,
    forged: usize,
}

impl SigningVoteSource {
    pub fn new(signers: Vec<TestValidator>) -> Self {
        Self {
            signers,
            delay: None,
            hold_open: false,
            forged: 0,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn hold_open(mut self) -> Self {
        self.hold_open = true;
        self
    }

    /// Send this many votes claiming to come from the first signer but made with an unrelated
    /// key, before the real votes.
    pub fn with_forged_votes(mut self, count: usize) -> Self {
        self.forged = count;
        self
    }
}

#[async_trait]
impl CheckpointVoteSource for SigningVoteSource {
    async fn request_votes(
        &self,
        commitment: &CheckpointCommitment,
        _validators: &ValidatorSet,
    ) -> anyhow::Result<mpsc::Receiver<CheckpointVote>> {
        let (tx, rx) = mpsc::channel(self.signers.len() + self.forged + 1);

        let mut votes = Vec::new();
        if let Some(first) = self.signers.first() {
            let forger = ConsensusSecretKey::from_seed([0xee; 32]);
            for _ in 0..self.forged {
                votes.push(CheckpointVote {
                    validator: first.address,
                    signature: forger.sign(&commitment.digest()),
                });
            }
        }
        votes.extend(self.signers.iter().map(|s| s.vote(commitment)));

        let delay = self.delay;
        let hold_open = self.hold_open;
        tokio::spawn(async move {
            for vote in votes {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                if tx.send(vote).await.is_err() {
                    return;
                }
            }
            if hold_open {
                tx.closed().await;
            }
        });

        Ok(rx)
    }
}
