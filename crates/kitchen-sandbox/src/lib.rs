//! Kitchen Sandbox
//!
//! Content-addressed upload sandboxes. A client declares the checksums of
//! the files it intends to upload; the coordinator tells it which ones the
//! content store already has, and gates commit on every checksum being
//! present.
//!
//! # Core Concepts
//!
//! - [`Sandbox`]: one upload session (`Pending` until committed)
//! - [`SandboxId`]: 32-char lowercase hex id derived from fresh entropy
//! - [`SandboxCoordinator`]: create/save/get/delete/list plus
//!   [`needs_upload`](SandboxCoordinator::needs_upload) and
//!   [`is_complete`](SandboxCoordinator::is_complete)
//!
//! # Example
//!
//! ```rust,ignore
//! use kitchen_sandbox::SandboxCoordinator;
//! use kitchen_store::{MemoryContentStore, MemoryStore};
//! use std::sync::Arc;
//!
//! let coord = SandboxCoordinator::new(Arc::new(MemoryStore::new()), Arc::new(MemoryContentStore::new()));
//! let sandbox = coord.create_sandbox(checksums).await?;
//! coord.save(&sandbox).await?;
//! let todo = coord.needs_upload(&sandbox).await?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod config;
mod coordinator;
mod entropy;
mod error;
mod id;
mod sandbox;

pub use config::{SandboxConfig, MAX_ENTROPY_BYTES, MIN_ENTROPY_BYTES};
pub use coordinator::{SandboxCoordinator, UploadStatus, SANDBOX_COLLECTION};
pub use entropy::{EntropyError, EntropySource, OsEntropy};
pub use error::SandboxError;
pub use id::{SandboxId, SandboxIdError};
pub use sandbox::{Sandbox, SandboxState};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
