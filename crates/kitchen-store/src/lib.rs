//! Kitchen Store
//!
//! Persistence interfaces consumed by the sandbox coordinator.
//!
//! # Core Concepts
//!
//! - [`KeyValueStore`]: process-wide persistence keyed by `(collection, key)`
//! - [`ContentStore`]: existence lookup for uploaded file contents
//! - [`Checksum`]: the key a file is addressed by in the content store
//!
//! Both stores are injected as explicit handles. Concurrency safety belongs
//! to the backend; callers never lock.
//!
//! # Example
//!
//! ```rust,ignore
//! use kitchen_store::{Checksum, ContentStore, MemoryContentStore};
//!
//! let files = MemoryContentStore::new();
//! let sum: Checksum = "385ea5490c86570c7de71070bce9384a".parse()?;
//! files.insert(sum.clone());
//! assert!(files.exists(&sum).await?);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod checksum;
mod content;
mod error;
mod kv;

pub use checksum::Checksum;
pub use content::{ContentStore, FsContentStore, MemoryContentStore};
pub use error::StoreError;
pub use kv::{KeyValueStore, MemoryStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
