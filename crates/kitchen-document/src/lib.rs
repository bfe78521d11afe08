//! Kitchen Document
//!
//! Turns inbound JSON resource bodies (environments, nodes, roles) into
//! canonical [`ConfigDocument`]s before any domain constructor sees them.
//!
//! # Core Concepts
//!
//! - [`normalize`]: pure shape enforcement over a decoded JSON object
//! - [`parse_document`]: decode bytes, then normalize
//! - [`SchemaError`]: typed failure naming the offending field
//!
//! # Example
//!
//! ```rust,ignore
//! use kitchen_document::parse_document;
//!
//! let doc = parse_document(br#"{"name": "prod", "default_attributes": null}"#)?;
//! assert_eq!(doc.name(), Some("prod"));
//! assert!(doc.get("default_attributes").unwrap().is_object());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod document;
mod error;
mod normalize;

pub use document::ConfigDocument;
pub use error::{DocumentError, SchemaError};
pub use normalize::{normalize, parse_document, ATTRIBUTE_FIELDS, ENV_RUN_LISTS, RUN_LIST};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
