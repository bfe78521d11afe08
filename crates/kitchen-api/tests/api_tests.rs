//! Request Boundary Tests
//!
//! Sandbox lifecycle through `SandboxService` against in-memory and
//! filesystem content stores, error classification, and document ingestion.

use kitchen_api::{ingest_document, respond, respond_ok, status, KitchenConfig, SandboxService};
use kitchen_sandbox::{SandboxConfig, SandboxCoordinator};
use kitchen_store::{FsContentStore, MemoryContentStore, MemoryStore};
use kitchen_test_utils::{checksum, memory_coordinator, FailingContentStore, FailingStore};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

const C1: &str = "385ea5490c86570c7de71070bce9384a";
const C2: &str = "f6f73175e979bd90af6184ec277f760c";

fn request(sums: &[&str]) -> Vec<u8> {
    let checksums: serde_json::Map<_, _> = sums
        .iter()
        .map(|s| ((*s).to_string(), serde_json::Value::Null))
        .collect();
    serde_json::to_vec(&json!({ "checksums": checksums })).unwrap()
}

#[tokio::test]
async fn test_upload_then_commit_on_filesystem() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(C1), b"cookbook file").unwrap();

    let coordinator = SandboxCoordinator::new(
        Arc::new(MemoryStore::new()),
        Arc::new(FsContentStore::new(dir.path())),
    );
    let svc = SandboxService::new(coordinator);

    let created = svc.create(&request(&[C1, C2])).await.unwrap();
    assert!(!created.checksums[&checksum(C1)].needs_upload);
    assert!(created.checksums[&checksum(C2)].needs_upload);

    // Commit before the second upload lands names the missing file.
    let err = svc
        .commit(&created.sandbox_id, br#"{"is_completed": true}"#)
        .await
        .unwrap_err();
    assert_eq!(err.status(), status::BAD_REQUEST);
    assert!(err.to_string().contains(C2));

    std::fs::write(dir.path().join(C2), b"recipe").unwrap();
    let status_after = svc.status(&created.sandbox_id).await.unwrap();
    assert!(status_after.values().all(|s| !s.needs_upload));

    let view = svc
        .commit(&created.sandbox_id, br#"{"is_completed": true}"#)
        .await
        .unwrap();
    assert!(view.is_completed);
    assert_eq!(view.guid, created.sandbox_id);
    assert_eq!(view.checksums, vec![checksum(C1), checksum(C2)]);
}

#[tokio::test]
async fn test_created_response_wire_shape() {
    let svc = SandboxService::new(memory_coordinator(&[C1]))
        .with_base_url("https://chef.example.com/");
    let resp = respond(status::CREATED, svc.create(&request(&[C1, C2])).await);

    assert_eq!(resp.status, 201);
    let id = resp.body["sandbox_id"].as_str().unwrap().to_string();
    assert_eq!(
        resp.body,
        json!({
            "uri": format!("https://chef.example.com/sandboxes/{id}"),
            "checksums": {
                C1: {"needs_upload": false},
                C2: {"needs_upload": true, "url": format!("https://chef.example.com/file_store/{C2}")}
            },
            "sandbox_id": id
        })
    );
}

#[tokio::test]
async fn test_configured_upload_prefix() {
    let config = KitchenConfig::from_toml("[sandbox]\nupload_path_prefix = \"/uploads/\"\n").unwrap();
    let coordinator = memory_coordinator(&[]).with_config(config.sandbox);
    let svc = SandboxService::new(coordinator);

    let created = svc.create(&request(&[C1])).await.unwrap();
    assert_eq!(
        created.checksums[&checksum(C1)].url.as_deref(),
        Some(format!("/uploads/{C1}").as_str())
    );
}

#[tokio::test]
async fn test_empty_checksum_set_commits_immediately() {
    let svc = SandboxService::new(memory_coordinator(&[]));
    let created = svc.create(&request(&[])).await.unwrap();
    assert!(created.checksums.is_empty());

    let view = svc
        .commit(&created.sandbox_id, br#"{"is_completed": true}"#)
        .await
        .unwrap();
    assert!(view.is_completed);
}

#[tokio::test]
async fn test_store_failure_is_internal_error() {
    let coordinator =
        SandboxCoordinator::new(Arc::new(FailingStore), Arc::new(MemoryContentStore::new()));
    let svc = SandboxService::new(coordinator);

    let resp = respond(status::CREATED, svc.create(&request(&[C1])).await);
    assert_eq!(resp.status, status::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.body["error"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_content_store_failure_is_internal_error() {
    let coordinator =
        SandboxCoordinator::new(Arc::new(MemoryStore::new()), Arc::new(FailingContentStore));
    let svc = SandboxService::new(coordinator);

    let err = svc.create(&request(&[C1])).await.unwrap_err();
    assert_eq!(err.status(), status::INTERNAL_SERVER_ERROR);

    // The client never learned the id, so nothing may be stored.
    assert!(svc.list().await.unwrap().is_empty());
    assert!(svc.coordinator().list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_config_surfaces_on_create() {
    let coordinator = SandboxCoordinator::new(
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryContentStore::new()),
    )
    .with_config(SandboxConfig::new().with_max_id_attempts(0));
    let svc = SandboxService::new(coordinator);

    let err = svc.create(&request(&[C1])).await.unwrap_err();
    assert_eq!(err.status(), status::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_delete_then_show_is_not_found() {
    let svc = SandboxService::new(memory_coordinator(&[]));
    let created = svc.create(&request(&[C1])).await.unwrap();

    svc.delete(&created.sandbox_id).await.unwrap();
    let resp = respond_ok(svc.show(&created.sandbox_id).await);
    assert_eq!(resp.status, status::NOT_FOUND);
    assert!(svc.list().await.unwrap().is_empty());
}

#[test]
fn test_ingest_document_normalizes_present_fields_only() {
    let doc = ingest_document(
        br#"{
            "name": "production",
            "run_list": ["recipe[base]"],
            "default_attributes": null,
            "env_run_lists": {"prod": ["role[web]"]}
        }"#,
    )
    .unwrap();

    assert_eq!(doc.name(), Some("production"));
    assert_eq!(doc.get("default_attributes"), Some(&json!({})));
    assert!(!doc.contains_key("override_attributes"));
    assert_eq!(doc.run_list(), Some(vec!["recipe[base]".to_string()]));
}

#[test]
fn test_ingest_document_errors_are_bad_request() {
    let bodies: [&[u8]; 4] = [
        b"[1, 2]",
        b"{\"run_list\": [1]}",
        b"{\"env_run_lists\": {\"prod\": \"role[web]\"}}",
        b"{not json",
    ];
    for body in bodies {
        let resp = respond_ok(ingest_document(body));
        assert_eq!(resp.status, status::BAD_REQUEST, "{}", String::from_utf8_lossy(body));
        assert_eq!(resp.body["error"].as_array().unwrap().len(), 1);
    }
}
