//! Kitchen API
//!
//! Request-boundary glue between wire bodies and the document normalizer and
//! sandbox coordinator. HTTP routing is left to the embedding server: every
//! operation here takes bytes and yields a typed result or an
//! [`ApiResponse`] carrying a status code and JSON body.
//!
//! # Example
//!
//! ```rust,ignore
//! use kitchen_api::{respond, status, SandboxService};
//!
//! let svc = SandboxService::new(coordinator).with_base_url("https://chef.example.com");
//! let resp = respond(status::CREATED, svc.create(body).await);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod envelope;
pub mod error;
pub mod service;
pub mod types;

pub use config::{ConfigError, KitchenConfig};
pub use envelope::{status, ApiResponse, ErrorEnvelope};
pub use error::ApiError;
pub use service::{ingest_document, respond, respond_ok, SandboxService};
pub use types::{ChecksumStatus, CommitRequest, SandboxCreated, SandboxRequest, SandboxView};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
