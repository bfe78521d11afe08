//! Request and response bodies
//!
//! Wire shapes clients already speak:
//! - sandbox creation: `{"checksums": {"<md5>": null, ...}}`
//! - sandbox commit: `{"is_completed": true}`

use chrono::{DateTime, Utc};
use kitchen_sandbox::{Sandbox, UploadStatus};
use kitchen_store::Checksum;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Sandbox creation body
///
/// The checksum set arrives as the keys of an object whose values are
/// always `null`; values are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SandboxRequest {
    pub checksums: BTreeMap<Checksum, Value>,
}

impl SandboxRequest {
    /// The declared checksum set
    pub fn checksum_set(&self) -> impl Iterator<Item = Checksum> + '_ {
        self.checksums.keys().cloned()
    }
}

/// Sandbox commit body
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CommitRequest {
    pub is_completed: bool,
}

/// Per-checksum upload need as clients see it
///
/// `url` is present only when `needs_upload` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecksumStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub needs_upload: bool,
}

impl ChecksumStatus {
    /// Render an [`UploadStatus`], prefixing the target with `base_url`
    #[must_use]
    pub fn from_upload_status(status: UploadStatus, base_url: Option<&str>) -> Self {
        let url = status.upload_target.map(|target| match base_url {
            Some(base) => format!("{}{target}", base.trim_end_matches('/')),
            None => target,
        });
        Self {
            url,
            needs_upload: status.needs_upload,
        }
    }
}

/// Sandbox creation response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SandboxCreated {
    pub uri: String,
    pub checksums: BTreeMap<Checksum, ChecksumStatus>,
    pub sandbox_id: String,
}

/// Sandbox representation returned by commit and lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SandboxView {
    pub guid: String,
    pub name: String,
    pub checksums: Vec<Checksum>,
    pub create_time: DateTime<Utc>,
    pub is_completed: bool,
}

impl From<&Sandbox> for SandboxView {
    fn from(sandbox: &Sandbox) -> Self {
        let id = sandbox.id().to_string();
        Self {
            guid: id.clone(),
            name: id,
            checksums: sandbox.checksums().to_vec(),
            create_time: sandbox.creation_time(),
            is_completed: sandbox.is_completed(),
        }
    }
}
