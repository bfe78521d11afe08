//! Sandbox endpoints
//!
//! [`SandboxService`] turns raw request bodies into coordinator calls and
//! coordinator results into wire shapes. It is also the commit actor: the
//! only place a sandbox moves from `Pending` to `Committed`.

use crate::envelope::{status, ApiResponse};
use crate::error::ApiError;
use crate::types::{ChecksumStatus, CommitRequest, SandboxCreated, SandboxRequest, SandboxView};
use kitchen_document::{parse_document, ConfigDocument};
use kitchen_sandbox::{Sandbox, SandboxCoordinator, SandboxError, SandboxId};
use kitchen_store::{Checksum, ContentStore, KeyValueStore};
use serde::Serialize;
use std::collections::BTreeMap;

/// Sandbox request handling over a coordinator
#[derive(Debug)]
pub struct SandboxService<K, C> {
    coordinator: SandboxCoordinator<K, C>,
    base_url: Option<String>,
}

impl<K, C> SandboxService<K, C>
where
    K: KeyValueStore,
    C: ContentStore,
{
    #[must_use]
    pub fn new(coordinator: SandboxCoordinator<K, C>) -> Self {
        Self {
            coordinator,
            base_url: None,
        }
    }

    /// Prefix for URLs handed to clients, e.g. `https://chef.example.com`
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn coordinator(&self) -> &SandboxCoordinator<K, C> {
        &self.coordinator
    }

    fn url(&self, path: &str) -> String {
        match &self.base_url {
            Some(base) => format!("{}{path}", base.trim_end_matches('/')),
            None => path.to_string(),
        }
    }

    async fn load(&self, id: &str) -> Result<Sandbox, ApiError> {
        let id: SandboxId = id.parse().map_err(|_| SandboxError::NotFound {
            id: id.to_string(),
        })?;
        Ok(self.coordinator.get(&id).await?)
    }

    async fn upload_statuses(
        &self,
        sandbox: &Sandbox,
    ) -> Result<BTreeMap<Checksum, ChecksumStatus>, ApiError> {
        let base_url = self.base_url.as_deref();
        Ok(self
            .coordinator
            .needs_upload(sandbox)
            .await?
            .into_iter()
            .map(|(sum, st)| (sum, ChecksumStatus::from_upload_status(st, base_url)))
            .collect())
    }

    /// Create and save a sandbox from a `{"checksums": {...}}` body
    ///
    /// # Errors
    /// - `ApiError::BadRequest` for a malformed body
    /// - `ApiError::Sandbox` for id generation or store failures
    pub async fn create(&self, body: &[u8]) -> Result<SandboxCreated, ApiError> {
        let request: SandboxRequest = serde_json::from_slice(body)
            .map_err(|e| ApiError::bad_request(format!("sandbox request malformed: {e}")))?;

        let sandbox = self
            .coordinator
            .create_sandbox(request.checksum_set())
            .await?;
        // Save last: a failed create must leave nothing behind.
        let checksums = self.upload_statuses(&sandbox).await?;
        self.coordinator.save(&sandbox).await?;
        tracing::info!(
            "Sandbox {} created for {} checksums",
            sandbox.id(),
            sandbox.checksums().len()
        );

        Ok(SandboxCreated {
            uri: self.url(&sandbox.object_path()),
            checksums,
            sandbox_id: sandbox.id().to_string(),
        })
    }

    /// Current upload needs of a stored sandbox
    ///
    /// # Errors
    /// `ApiError::Sandbox` with `NotFound` for unknown or malformed ids
    pub async fn status(&self, id: &str) -> Result<BTreeMap<Checksum, ChecksumStatus>, ApiError> {
        let sandbox = self.load(id).await?;
        self.upload_statuses(&sandbox).await
    }

    /// Commit a sandbox once every declared file is uploaded
    ///
    /// Re-committing a committed sandbox returns it unchanged.
    ///
    /// # Errors
    /// - `ApiError::BadRequest` unless the body is `{"is_completed": true}`
    /// - `SandboxError::Incomplete` naming the first missing checksum
    /// - `SandboxError::NotFound` for unknown ids
    pub async fn commit(&self, id: &str, body: &[u8]) -> Result<SandboxView, ApiError> {
        let request: CommitRequest = serde_json::from_slice(body)
            .map_err(|e| ApiError::bad_request(format!("commit request malformed: {e}")))?;
        if !request.is_completed {
            return Err(ApiError::bad_request(
                "is_completed must be true to commit a sandbox",
            ));
        }

        let mut sandbox = self.load(id).await?;
        self.coordinator.is_complete(&sandbox).await?;
        if sandbox.mark_completed() {
            self.coordinator.save(&sandbox).await?;
            tracing::info!("Sandbox {} committed", sandbox.id());
        }
        Ok(SandboxView::from(&sandbox))
    }

    /// Stored sandbox
    ///
    /// # Errors
    /// `ApiError::Sandbox` with `NotFound` for unknown or malformed ids
    pub async fn show(&self, id: &str) -> Result<SandboxView, ApiError> {
        let sandbox = self.load(id).await?;
        Ok(SandboxView::from(&sandbox))
    }

    /// Every stored sandbox id mapped to its URL
    ///
    /// # Errors
    /// `ApiError::Sandbox` on store failure
    pub async fn list(&self) -> Result<BTreeMap<String, String>, ApiError> {
        Ok(self
            .coordinator
            .list()
            .await?
            .into_iter()
            .map(|id| {
                let path = format!("/{}/{id}", Sandbox::url_type());
                (id.to_string(), self.url(&path))
            })
            .collect())
    }

    /// Remove a sandbox; unknown ids succeed
    ///
    /// # Errors
    /// `ApiError::Sandbox` on store failure
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        // A malformed id can never have been stored.
        if let Ok(id) = id.parse::<SandboxId>() {
            self.coordinator.delete(&id).await?;
        }
        Ok(())
    }
}

/// Decode and normalize any resource body before a domain constructor sees it
///
/// # Errors
/// `ApiError::Document` for malformed JSON or shape violations
pub fn ingest_document(body: &[u8]) -> Result<ConfigDocument, ApiError> {
    Ok(parse_document(body)?)
}

/// Serialize a result into a response, logging failures once
#[must_use]
pub fn respond<T: Serialize>(success_status: u16, result: Result<T, ApiError>) -> ApiResponse {
    match result.and_then(|value| {
        serde_json::to_value(value)
            .map_err(|e| ApiError::Sandbox(SandboxError::Store(e.into())))
    }) {
        Ok(body) => ApiResponse::new(success_status, body),
        Err(e) => e.into_response(),
    }
}

/// Response for a successful read
#[must_use]
pub fn respond_ok<T: Serialize>(result: Result<T, ApiError>) -> ApiResponse {
    respond(status::OK, result)
}
