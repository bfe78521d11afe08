//! Sandbox Coordinator Tests
//!
//! Id generation under collisions and entropy failure, store failures,
//! and the full upload-then-commit flow.
//!
use kitchen_sandbox::{SandboxConfig, SandboxCoordinator, SandboxError, SandboxState, SandboxId};
use kitchen_store::{Checksum, MemoryContentStore, MemoryStore};
use kitchen_test_utils::{
    checksum, checksums, memory_coordinator, CollidingStore, FailingContentStore, FailingEntropy,
    FailingStore, FixedEntropy,
};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

fn colliding_coordinator(
    collisions: u32,
) -> (Arc<CollidingStore>, SandboxCoordinator<CollidingStore, MemoryContentStore>) {
    let kv = Arc::new(CollidingStore::new(collisions));
    let coord = SandboxCoordinator::new(Arc::clone(&kv), Arc::new(MemoryContentStore::new()));
    (kv, coord)
}

#[tokio::test]
async fn test_five_collisions_exhaust_retries() {
    let (kv, coord) = colliding_coordinator(5);

    let err = coord.create_sandbox(checksums(&["aa"])).await.unwrap_err();
    assert!(matches!(err, SandboxError::ExhaustedRetries { attempts: 5 }));
    assert_eq!(kv.get_calls(), 5);
}

#[tokio::test]
async fn test_single_collision_succeeds_on_second_attempt() {
    let (kv, coord) = colliding_coordinator(1);

    let sb = coord.create_sandbox(checksums(&["aa"])).await.unwrap();
    assert_eq!(kv.get_calls(), 2);
    assert_eq!(sb.id().to_string().len(), 32);
}

#[tokio::test]
async fn test_four_collisions_still_succeed() {
    let (kv, coord) = colliding_coordinator(4);

    assert!(coord.create_sandbox(checksums(&["aa"])).await.is_ok());
    assert_eq!(kv.get_calls(), 5);
}

#[tokio::test]
async fn test_attempt_ceiling_is_configurable() {
    let (kv, coord) = colliding_coordinator(5);
    let coord = coord.with_config(SandboxConfig::new().with_max_id_attempts(6));

    assert!(coord.create_sandbox(checksums(&["aa"])).await.is_ok());
    assert_eq!(kv.get_calls(), 6);
}

#[tokio::test]
async fn test_oversized_seed_rejected_before_drawing() {
    let entropy = Arc::new(FailingEntropy::default());
    let coord = memory_coordinator(&[])
        .with_entropy(entropy.clone())
        .with_config(SandboxConfig::new().with_entropy_bytes(usize::MAX));

    let err = coord.create_sandbox(checksums(&["aa"])).await.unwrap_err();
    assert!(matches!(err, SandboxError::Config(_)));
    assert_eq!(entropy.calls(), 0);
}

#[tokio::test]
async fn test_entropy_failure_is_not_retried() {
    let entropy = Arc::new(FailingEntropy::default());
    let coord = memory_coordinator(&[]).with_entropy(entropy.clone());

    let err = coord.create_sandbox(checksums(&["aa"])).await.unwrap_err();
    assert!(matches!(err, SandboxError::Entropy(_)));
    assert!(err.is_internal());
    assert_eq!(entropy.calls(), 1);
}

#[tokio::test]
async fn test_real_collision_with_stored_sandbox() {
    let coord = memory_coordinator(&[]).with_entropy(Arc::new(FixedEntropy(0x42)));

    let first = coord.create_sandbox(checksums(&["aa"])).await.unwrap();
    coord.save(&first).await.unwrap();

    // Same entropy, same id: every attempt now hits the saved sandbox.
    let err = coord.create_sandbox(checksums(&["bb"])).await.unwrap_err();
    assert!(matches!(err, SandboxError::ExhaustedRetries { .. }));
}

#[tokio::test]
async fn test_store_failure_surfaces() {
    let coord = SandboxCoordinator::new(Arc::new(FailingStore), Arc::new(MemoryContentStore::new()));

    let err = coord.create_sandbox(checksums(&["aa"])).await.unwrap_err();
    assert!(matches!(err, SandboxError::Store(_)));

    let err = coord.list().await.unwrap_err();
    assert!(matches!(err, SandboxError::Store(_)));

    let err = coord.delete(&SandboxId::new([0u8; 16])).await.unwrap_err();
    assert!(matches!(err, SandboxError::Store(_)));
}

#[tokio::test]
async fn test_content_store_failure_surfaces() {
    let kv = Arc::new(MemoryStore::new());
    let coord = SandboxCoordinator::new(kv, Arc::new(FailingContentStore));
    let sb = coord.create_sandbox(checksums(&["aa"])).await.unwrap();

    assert!(matches!(
        coord.needs_upload(&sb).await.unwrap_err(),
        SandboxError::Store(_)
    ));
    assert!(matches!(
        coord.is_complete(&sb).await.unwrap_err(),
        SandboxError::Store(_)
    ));
}

#[tokio::test]
async fn test_delete_nonexistent_then_get() {
    let coord = memory_coordinator(&[]);
    let id = SandboxId::new([5u8; 16]);

    assert!(coord.delete(&id).await.is_ok());
    assert!(coord.get(&id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_ids_are_unique_and_well_formed() {
    let coord = memory_coordinator(&[]);
    let mut seen = HashSet::new();

    for _ in 0..500 {
        let sb = coord.create_sandbox(checksums(&["aa"])).await.unwrap();
        let id = sb.id().to_string();
        assert_eq!(id.len(), 32);
        assert!(id.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));
        assert!(seen.insert(id));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creators() {
    let coord = Arc::new(memory_coordinator(&[]));
    let mut handles = Vec::new();

    for i in 0..64 {
        let coord = Arc::clone(&coord);
        handles.push(tokio::spawn(async move {
            let sb = coord
                .create_sandbox(vec![checksum(&format!("c{i}"))])
                .await
                .unwrap();
            coord.save(&sb).await.unwrap();
            sb.id()
        }));
    }

    let mut ids = HashSet::new();
    for handle in handles {
        ids.insert(handle.await.unwrap());
    }
    assert_eq!(ids.len(), 64);
    assert_eq!(coord.list().await.unwrap().len(), 64);
}

#[tokio::test]
async fn test_needs_upload_polling_tracks_uploads() {
    let coord = memory_coordinator(&["aa"]);
    let sb = coord.create_sandbox(checksums(&["aa", "bb"])).await.unwrap();

    let first = coord.needs_upload(&sb).await.unwrap();
    assert!(!first[&checksum("aa")].needs_upload);
    assert!(first[&checksum("aa")].upload_target.is_none());
    assert!(first[&checksum("bb")].needs_upload);
    assert_eq!(
        first[&checksum("bb")].upload_target.as_deref(),
        Some("/file_store/bb")
    );

    // Polling is side-effect free.
    assert_eq!(coord.needs_upload(&sb).await.unwrap(), first);

    coord.content_store().insert(checksum("bb"));
    let second = coord.needs_upload(&sb).await.unwrap();
    assert!(second.values().all(|s| !s.needs_upload));
}

#[tokio::test]
async fn test_end_to_end_upload_and_commit() {
    let coord = memory_coordinator(&["c1", "c3"]);

    let sb = coord
        .create_sandbox(checksums(&["c1", "c2", "c3"]))
        .await
        .unwrap();
    coord.save(&sb).await.unwrap();

    let needing: Vec<Checksum> = coord
        .needs_upload(&sb)
        .await
        .unwrap()
        .into_iter()
        .filter(|(_, status)| status.needs_upload)
        .map(|(sum, _)| sum)
        .collect();
    assert_eq!(needing, checksums(&["c2"]));

    match coord.is_complete(&sb).await.unwrap_err() {
        SandboxError::Incomplete { checksum, .. } => assert_eq!(checksum.as_str(), "c2"),
        other => panic!("unexpected error: {other}"),
    }

    // Out-of-band upload, then the commit step.
    coord.content_store().insert(checksum("c2"));
    let mut loaded = coord.get(&sb.id()).await.unwrap();
    coord.is_complete(&loaded).await.unwrap();
    assert!(loaded.mark_completed());
    coord.save(&loaded).await.unwrap();

    let committed = coord.get(&sb.id()).await.unwrap();
    assert!(committed.is_completed());
    assert_eq!(committed.state(), SandboxState::Committed);
    assert_eq!(committed.creation_time(), sb.creation_time());
    assert_eq!(committed.checksums(), sb.checksums());
}

proptest! {
    #[test]
    fn prop_saved_sandbox_checksums_equal_input_set(
        input in proptest::collection::vec("[0-9a-f]{1,32}", 0..24)
    ) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let expected: BTreeSet<Checksum> = input.iter().map(|s| checksum(s)).collect();
        let loaded = rt.block_on(async {
            let coord = memory_coordinator(&[]);
            let sb = coord
                .create_sandbox(input.iter().map(|s| checksum(s)))
                .await
                .unwrap();
            coord.save(&sb).await.unwrap();
            coord.get(&sb.id()).await.unwrap()
        });

        let actual: BTreeSet<Checksum> = loaded.checksums().iter().cloned().collect();
        prop_assert_eq!(actual, expected);
        prop_assert_eq!(loaded.checksums().len(), input.iter().collect::<BTreeSet<_>>().len());
    }
}
