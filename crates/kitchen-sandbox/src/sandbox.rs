//! The sandbox entity
//!
//! A sandbox records a client's declared intent to upload a set of
//! content-addressed files. It names checksums; it never holds file bytes.

use crate::id::SandboxId;
use chrono::{DateTime, Utc};
use kitchen_store::Checksum;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a sandbox
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SandboxState {
    /// Uploads may still be in progress
    Pending,
    /// Committed by the client; terminal
    Committed,
}

/// One client upload session
///
/// # Invariants
/// - `id` and `creation_time` never change after construction
/// - `checksums` is fixed at construction
/// - `completed` only moves from `false` to `true`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sandbox {
    id: SandboxId,
    creation_time: DateTime<Utc>,
    completed: bool,
    checksums: Vec<Checksum>,
}

impl Sandbox {
    pub(crate) fn new(id: SandboxId, checksums: Vec<Checksum>) -> Self {
        Self {
            id,
            creation_time: Utc::now(),
            completed: false,
            checksums,
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> SandboxId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn creation_time(&self) -> DateTime<Utc> {
        self.creation_time
    }

    #[inline]
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Declared checksums, in stored order
    #[inline]
    #[must_use]
    pub fn checksums(&self) -> &[Checksum] {
        &self.checksums
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> SandboxState {
        if self.completed {
            SandboxState::Committed
        } else {
            SandboxState::Pending
        }
    }

    /// Move to [`SandboxState::Committed`]
    ///
    /// Only the commit step calls this, after a successful completeness
    /// check. Returns `false` if the sandbox was already committed.
    pub fn mark_completed(&mut self) -> bool {
        let transitioned = !self.completed;
        self.completed = true;
        transitioned
    }

    /// Resource segment used in object URLs
    #[inline]
    #[must_use]
    pub fn url_type() -> &'static str {
        "sandboxes"
    }

    /// Object path, e.g. `/sandboxes/<id>`
    #[must_use]
    pub fn object_path(&self) -> String {
        format!("/{}/{}", Self::url_type(), self.id)
    }
}
