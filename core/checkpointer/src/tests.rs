use std::sync::Arc;
use std::time::Duration;

use bit_set::BitSet;
use bridge_interfaces::{ConfigProviderInterface, CheckpointSink};
use bridge_test_utils::child_chain::InMemoryChildChain;
use bridge_test_utils::events::exit_events;
use bridge_test_utils::keys::{sign_commitment, test_validators, to_validators, TestValidator};
use bridge_test_utils::logging::try_init_tracing;
use bridge_test_utils::sink::RecordingSink;
use bridge_test_utils::votes::SigningVoteSource;
use bridge_types::{
    build_exit_tree,
    BlockRange,
    Checkpoint,
    CheckpointCommitment,
    Epoch,
    QuorumThreshold,
    ValidatorSet,
    H256,
    U256,
};
use bridge_utils::config::TomlConfigProvider;
use bridge_validator_tracker::ValidatorSetTracker;
use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;

use crate::{
    CheckpointBuilder,
    CheckpointDatabaseQuery,
    CheckpointError,
    CheckpointService,
    CheckpointVerifier,
    CheckpointerConfig,
    InMemoryCheckpointDatabase,
};

struct TestSetup {
    tracker: Arc<ValidatorSetTracker>,
    validators: Vec<TestValidator>,
    set: Arc<ValidatorSet>,
    verifier: CheckpointVerifier<InMemoryCheckpointDatabase>,
}

fn setup(epoch: Epoch, powers: &[u64]) -> TestSetup {
    try_init_tracing();
    let tracker = Arc::new(ValidatorSetTracker::new());
    let validators = test_validators(powers);
    let set = tracker
        .record_epoch(epoch, to_validators(&validators))
        .unwrap();
    let verifier = CheckpointVerifier::new(
        tracker.clone(),
        InMemoryCheckpointDatabase::new(),
        QuorumThreshold::default(),
    );
    TestSetup {
        tracker,
        validators,
        set,
        verifier,
    }
}

fn commitment(set: &ValidatorSet, start: u64, end: u64) -> CheckpointCommitment {
    let events = exit_events(start..end + 1);
    CheckpointCommitment {
        epoch: set.epoch(),
        start_block: start,
        end_block: end,
        event_root: H256(build_exit_tree(&events).root()),
        validator_set_hash: set.hash(),
    }
}

fn signed(
    set: &ValidatorSet,
    commitment: CheckpointCommitment,
    signers: &[&TestValidator],
) -> Checkpoint {
    Checkpoint {
        aggregated_signature: sign_commitment(&commitment, set, signers),
        commitment,
    }
}

fn builder(
    tracker: &Arc<ValidatorSetTracker>,
    votes: SigningVoteSource,
    timeout: Duration,
) -> CheckpointBuilder {
    CheckpointBuilder::new(
        tracker.clone(),
        Arc::new(votes),
        QuorumThreshold::default(),
        timeout,
    )
}

#[test]
fn test_full_signature_admits_and_single_signer_is_insufficient() {
    // Epoch 5 = {A: 60, B: 40}, quorum 67 of 100.
    let TestSetup {
        validators,
        set,
        verifier,
        ..
    } = setup(5, &[60, 40]);
    let (a, b) = (&validators[0], &validators[1]);

    let checkpoint = signed(&set, commitment(&set, 1, 10), &[a, b]);
    verifier.admit(checkpoint, &set).unwrap();

    let checkpoint = signed(&set, commitment(&set, 11, 20), &[a]);
    assert_eq!(
        verifier.admit(checkpoint, &set).unwrap_err(),
        CheckpointError::InsufficientSignature {
            range: BlockRange::new(11, 20),
            signed: U256::from(60),
            required: U256::from(67),
        }
    );
    assert_eq!(verifier.query().len(), 1);
}

#[test]
fn test_exact_threshold_is_accepted() {
    let TestSetup {
        validators,
        set,
        verifier,
        ..
    } = setup(1, &[60, 7, 33]);
    let (a, b, c) = (&validators[0], &validators[1], &validators[2]);

    let below = signed(&set, commitment(&set, 1, 5), &[b, c]);
    assert!(matches!(
        verifier.admit(below, &set),
        Err(CheckpointError::InsufficientSignature { .. })
    ));

    let exact = signed(&set, commitment(&set, 1, 5), &[a, b]);
    verifier.admit(exact, &set).unwrap();
}

#[test]
fn test_overlap_rejected_regardless_of_signature() {
    let TestSetup {
        validators,
        set,
        verifier,
        ..
    } = setup(1, &[50, 50]);
    let all: Vec<_> = validators.iter().collect();

    verifier
        .admit(signed(&set, commitment(&set, 10, 20), &all), &set)
        .unwrap();

    let valid = signed(&set, commitment(&set, 15, 25), &all);
    assert_eq!(
        verifier.admit(valid, &set).unwrap_err(),
        CheckpointError::RangeOverlap {
            range: BlockRange::new(15, 25),
            existing: BlockRange::new(10, 20),
        }
    );

    let mut unsigned = signed(&set, commitment(&set, 20, 30), &[]);
    unsigned.aggregated_signature.signers = BitSet::new();
    assert!(matches!(
        verifier.admit(unsigned, &set),
        Err(CheckpointError::RangeOverlap { .. })
    ));

    verifier
        .admit(signed(&set, commitment(&set, 21, 30), &all), &set)
        .unwrap();
    assert_eq!(
        verifier.latest_checkpoint().unwrap().block_range(),
        BlockRange::new(21, 30)
    );
    assert_eq!(verifier.checkpoint_covering(15).unwrap().checkpoint_block(), 20);
}

#[test]
fn test_unknown_validator_set() {
    let TestSetup {
        validators, verifier, ..
    } = setup(1, &[10]);
    let unrecorded = ValidatorSet::new(2, to_validators(&validators));
    let checkpoint = signed(
        &unrecorded,
        commitment(&unrecorded, 1, 1),
        &[&validators[0]],
    );
    let err = verifier.admit(checkpoint, &unrecorded).unwrap_err();
    assert_eq!(err, CheckpointError::UnknownValidatorSet(2));
    assert!(err.is_retriable());
}

#[test]
fn test_substituted_validator_set_is_rejected() {
    let TestSetup {
        validators,
        set,
        verifier,
        ..
    } = setup(1, &[10, 10]);
    // Same epoch, but the claimed set gives all the power to the first validator.
    let mut forged = to_validators(&validators);
    forged[0].voting_power = U256::from(1000);
    let forged = ValidatorSet::new(1, forged);

    let checkpoint = signed(&forged, commitment(&forged, 1, 1), &[&validators[0]]);
    assert_eq!(
        verifier.admit(checkpoint, &forged).unwrap_err(),
        CheckpointError::ValidatorSetMismatch(1)
    );

    // The recorded set, but a commitment bound to another set hash.
    let mut checkpoint_commitment = commitment(&set, 1, 1);
    checkpoint_commitment.validator_set_hash = forged.hash();
    let checkpoint = signed(&set, checkpoint_commitment, &[&validators[0], &validators[1]]);
    assert_eq!(
        verifier.admit(checkpoint, &set).unwrap_err(),
        CheckpointError::ValidatorSetMismatch(1)
    );
}

#[test]
fn test_invalid_signature() {
    let TestSetup {
        validators,
        set,
        verifier,
        ..
    } = setup(1, &[50, 50]);
    let (a, b) = (&validators[0], &validators[1]);

    // Both claimed in the bitmap, but only A signed.
    let mut checkpoint = signed(&set, commitment(&set, 1, 10), &[a]);
    checkpoint.aggregated_signature.signers.insert(1);
    assert!(matches!(
        verifier.admit(checkpoint, &set),
        Err(CheckpointError::InvalidSignature { .. })
    ));

    // Signed over a different commitment.
    let other = signed(&set, commitment(&set, 1, 11), &[a, b]);
    let mut checkpoint = signed(&set, commitment(&set, 1, 10), &[a, b]);
    checkpoint.aggregated_signature.signature = other.aggregated_signature.signature;
    assert!(matches!(
        verifier.admit(checkpoint, &set),
        Err(CheckpointError::InvalidSignature { .. })
    ));

    // Bitmap pointing outside the set.
    let mut checkpoint = signed(&set, commitment(&set, 1, 10), &[a, b]);
    checkpoint.aggregated_signature.signers.insert(7);
    assert!(matches!(
        verifier.admit(checkpoint, &set),
        Err(CheckpointError::InvalidSignature { .. })
    ));

    assert!(verifier.query().is_empty());
}

#[test]
fn test_invalid_block_range() {
    let TestSetup {
        validators,
        set,
        verifier,
        ..
    } = setup(1, &[10]);
    let mut checkpoint_commitment = commitment(&set, 1, 1);
    checkpoint_commitment.start_block = 9;
    checkpoint_commitment.end_block = 3;
    let checkpoint = signed(&set, checkpoint_commitment, &[&validators[0]]);
    assert_eq!(
        verifier.admit(checkpoint, &set).unwrap_err(),
        CheckpointError::InvalidBlockRange(BlockRange::new(9, 3))
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_overlapping_admissions() {
    let TestSetup {
        validators,
        set,
        verifier,
        ..
    } = setup(1, &[50, 50]);
    let verifier = Arc::new(verifier);
    let all: Vec<_> = validators.iter().collect();

    // Every range intersects every other one at block 50.
    let checkpoints: Vec<_> = (0..16u64)
        .map(|i| signed(&set, commitment(&set, 50 - i, 50 + i), &all))
        .collect();

    let handles = checkpoints
        .into_iter()
        .map(|checkpoint| {
            let verifier = verifier.clone();
            let set = set.clone();
            tokio::spawn(async move { verifier.admit(checkpoint, &set) })
        })
        .collect::<Vec<_>>();

    let mut admitted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => admitted += 1,
            Err(e) => assert!(matches!(e, CheckpointError::RangeOverlap { .. })),
        }
    }
    assert_eq!(admitted, 1);
    assert_eq!(verifier.query().len(), 1);
}

#[tokio::test]
async fn test_builder_reaches_quorum() {
    let TestSetup {
        tracker,
        validators,
        set,
        verifier,
    } = setup(5, &[60, 40]);
    let builder = builder(
        &tracker,
        SigningVoteSource::new(validators.clone()),
        Duration::from_secs(5),
    );

    let events = exit_events(10..13);
    let checkpoint = builder
        .build(5, BlockRange::new(1, 10), &events)
        .await
        .unwrap();
    assert_eq!(checkpoint.event_root(), H256(build_exit_tree(&events).root()));
    assert_eq!(checkpoint.commitment.validator_set_hash, set.hash());

    verifier.admit(checkpoint, &set).unwrap();
}

#[tokio::test]
async fn test_builder_stops_collecting_at_quorum() {
    let TestSetup {
        tracker,
        validators,
        set,
        verifier,
    } = setup(1, &[70, 20, 10]);
    // The channel stays open after the last vote; only reaching quorum ends collection.
    let builder = builder(
        &tracker,
        SigningVoteSource::new(validators.clone()).hold_open(),
        Duration::from_secs(30),
    );

    let checkpoint = builder.build(1, BlockRange::new(1, 1), &[]).await.unwrap();
    assert_eq!(checkpoint.event_root(), H256::zero());
    assert_eq!(
        checkpoint.aggregated_signature.signers.iter().collect::<Vec<_>>(),
        vec![0]
    );
    verifier.admit(checkpoint, &set).unwrap();
}

#[tokio::test]
async fn test_builder_times_out_without_quorum() {
    let TestSetup {
        tracker, validators, ..
    } = setup(5, &[60, 40]);
    let builder = builder(
        &tracker,
        SigningVoteSource::new(vec![validators[0].clone()]).hold_open(),
        Duration::from_millis(200),
    );

    let err = builder
        .build(5, BlockRange::new(1, 10), &exit_events(1..4))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        CheckpointError::QuorumNotReached {
            range: BlockRange::new(1, 10),
            collected: U256::from(60),
            required: U256::from(67),
        }
    );
    assert!(err.is_retriable());
}

#[tokio::test]
async fn test_builder_ignores_forged_and_foreign_votes() {
    let TestSetup {
        tracker,
        validators,
        set,
        verifier,
    } = setup(1, &[50, 50]);
    let mut signers = validators.clone();
    signers.push(TestValidator::new(0x99, 1000));
    let builder = builder(
        &tracker,
        SigningVoteSource::new(signers).with_forged_votes(3),
        Duration::from_secs(5),
    );

    let checkpoint = builder.build(1, BlockRange::new(1, 4), &[]).await.unwrap();
    assert_eq!(checkpoint.aggregated_signature.signers.len(), 2);
    verifier.admit(checkpoint, &set).unwrap();
}

#[tokio::test]
async fn test_builder_rejects_non_sequential_events() {
    let TestSetup {
        tracker, validators, ..
    } = setup(1, &[10]);
    let builder = builder(
        &tracker,
        SigningVoteSource::new(validators),
        Duration::from_secs(1),
    );

    let mut events = exit_events(1..5);
    events.remove(2);
    assert_eq!(
        builder
            .build(1, BlockRange::new(1, 5), &events)
            .await
            .unwrap_err(),
        CheckpointError::NonSequentialExitEvents {
            range: BlockRange::new(1, 5),
            expected: 3,
            found: 4,
        }
    );
}

#[tokio::test]
async fn test_builder_unknown_epoch() {
    let TestSetup {
        tracker, validators, ..
    } = setup(1, &[10]);
    let builder = builder(
        &tracker,
        SigningVoteSource::new(validators),
        Duration::from_secs(1),
    );
    assert_eq!(
        builder.build(2, BlockRange::new(1, 5), &[]).await.unwrap_err(),
        CheckpointError::UnknownValidatorSet(2)
    );
}

fn service_config() -> CheckpointerConfig {
    CheckpointerConfig {
        interval: Duration::from_millis(20),
        collection_timeout: Duration::from_millis(200),
        max_blocks_per_checkpoint: 10,
        quorum: QuorumThreshold::default(),
    }
}

#[tokio::test]
async fn test_service_checkpoints_consecutive_ranges() {
    let TestSetup {
        tracker,
        validators,
        set,
        verifier,
    } = setup(1, &[50, 50]);
    let verifier = Arc::new(verifier);

    let chain = Arc::new(InMemoryChildChain::new(1));
    // One exit event every fifth block, ids 1 to 4.
    for block in 1..=20 {
        let events = if block % 5 == 0 {
            exit_events(block / 5..block / 5 + 1)
        } else {
            vec![]
        };
        chain.push_block(block, events);
    }

    let config = service_config();
    let mut service = CheckpointService::new(
        config.clone(),
        chain.clone(),
        builder(&tracker, SigningVoteSource::new(validators), config.collection_timeout),
        verifier.clone(),
        tracker.clone(),
    );
    let mut batches = service.subscribe();

    assert_eq!(service.tick().await.unwrap(), Some(BlockRange::new(1, 10)));
    assert_eq!(service.tick().await.unwrap(), Some(BlockRange::new(11, 20)));
    assert_eq!(service.tick().await.unwrap(), None);
    assert_eq!(service.next_block(), 21);

    let first = batches.recv().await.unwrap();
    assert_eq!(first.checkpoint.block_range(), BlockRange::new(1, 10));
    assert_eq!(first.events.len(), 2);

    let query = verifier.query();
    assert_eq!(query.len(), 2);
    assert_eq!(query.get_covering(15).unwrap().epoch(), set.epoch());
}

#[tokio::test]
async fn test_service_rejects_gap_across_batches() {
    let TestSetup {
        tracker,
        validators,
        ..
    } = setup(1, &[10]);
    let chain = Arc::new(InMemoryChildChain::new(1));
    chain.push_block(1, exit_events(1..3));
    chain.push_block(2, exit_events(4..5));

    let config = CheckpointerConfig {
        max_blocks_per_checkpoint: 1,
        ..service_config()
    };
    let sink = Arc::new(RecordingSink::default());
    let mut service = CheckpointService::new(
        config.clone(),
        chain,
        builder(&tracker, SigningVoteSource::new(validators), config.collection_timeout),
        sink.clone(),
        tracker,
    )
    .resume_from(1, 1);

    assert_eq!(service.tick().await.unwrap(), Some(BlockRange::new(1, 1)));
    let err = service.tick().await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CheckpointError>(),
        Some(CheckpointError::NonSequentialExitEvents {
            expected: 3,
            found: 4,
            ..
        })
    ));
    assert_eq!(service.next_block(), 2);
    assert_eq!(sink.submitted().len(), 1);
}

#[tokio::test]
async fn test_service_retries_range_when_quorum_not_reached() {
    let TestSetup {
        tracker,
        validators,
        ..
    } = setup(1, &[60, 40]);
    let chain = Arc::new(InMemoryChildChain::new(1));
    chain.push_block(1, exit_events(0..2));

    let config = service_config();
    let sink = Arc::new(RecordingSink::default());
    let mut service = CheckpointService::new(
        config.clone(),
        chain,
        builder(
            &tracker,
            SigningVoteSource::new(vec![validators[1].clone()]).hold_open(),
            config.collection_timeout,
        ),
        sink.clone(),
        tracker,
    );

    let emitted = service.watch_emitted();
    assert_eq!(*emitted.borrow(), None);

    assert_eq!(service.tick().await.unwrap(), None);
    assert_eq!(service.next_block(), 1);
    assert!(sink.submitted().is_empty());
    // The events were read even though the range has no checkpoint.
    assert_eq!(*emitted.borrow(), Some(1));
}

#[tokio::test]
async fn test_service_runs_until_cancelled() {
    let TestSetup {
        tracker,
        validators,
        verifier,
        ..
    } = setup(1, &[50, 50]);
    let verifier = Arc::new(verifier);
    let chain = Arc::new(InMemoryChildChain::new(1));
    for block in 1..=30 {
        chain.push_block(block, vec![]);
    }

    let config = service_config();
    let service = CheckpointService::new(
        config.clone(),
        chain,
        builder(&tracker, SigningVoteSource::new(validators), config.collection_timeout),
        verifier.clone() as Arc<dyn CheckpointSink>,
        tracker,
    );
    let mut batches = service.subscribe();

    let shutdown = CancellationToken::new();
    let handle = service.spawn(shutdown.clone());

    for _ in 0..3 {
        tokio::time::timeout(Duration::from_secs(5), batches.recv())
            .await
            .unwrap()
            .unwrap();
    }
    shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(verifier.query().len(), 3);
    assert_eq!(verifier.latest_checkpoint().unwrap().checkpoint_block(), 30);
}

#[test]
fn test_config_from_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[checkpointer]
interval = "1m"
collection_timeout = "15s"
max_blocks_per_checkpoint = 250

[checkpointer.quorum]
numerator = 3
denominator = 4
"#,
    )
    .unwrap();

    let provider = TomlConfigProvider::load(&path).unwrap();
    let config = provider.get::<CheckpointService>().unwrap();
    assert_eq!(
        config,
        CheckpointerConfig {
            interval: Duration::from_secs(60),
            collection_timeout: Duration::from_secs(15),
            max_blocks_per_checkpoint: 250,
            quorum: QuorumThreshold {
                numerator: 3,
                denominator: 4,
            },
        }
    );

    let defaults = TomlConfigProvider::new().get::<CheckpointService>().unwrap();
    assert_eq!(defaults, CheckpointerConfig::default());
}
