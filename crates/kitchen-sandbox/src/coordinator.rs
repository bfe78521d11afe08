//! Sandbox coordinator
//!
//! Owns the sandbox lifecycle over an injected [`KeyValueStore`] and answers
//! upload-need and completeness queries against a [`ContentStore`]. Holds no
//! state between calls and performs no locking; the stores own concurrency.

use crate::config::SandboxConfig;
use crate::entropy::{EntropySource, OsEntropy};
use crate::error::SandboxError;
use crate::id::SandboxId;
use crate::sandbox::Sandbox;
use kitchen_store::{Checksum, ContentStore, KeyValueStore, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Key-value collection sandboxes persist under
pub const SANDBOX_COLLECTION: &str = "sandbox";

/// Upload need for one checksum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadStatus {
    /// Content store does not hold this checksum yet
    pub needs_upload: bool,
    /// Where to send the file; only set when `needs_upload`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_target: Option<String>,
}

impl UploadStatus {
    #[inline]
    #[must_use]
    pub fn present() -> Self {
        Self {
            needs_upload: false,
            upload_target: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn missing(upload_target: String) -> Self {
        Self {
            needs_upload: true,
            upload_target: Some(upload_target),
        }
    }
}

/// Creates, persists and inspects sandboxes
#[derive(Debug)]
pub struct SandboxCoordinator<K, C> {
    kv: Arc<K>,
    content: Arc<C>,
    entropy: Arc<dyn EntropySource>,
    config: SandboxConfig,
}

impl<K, C> SandboxCoordinator<K, C>
where
    K: KeyValueStore,
    C: ContentStore,
{
    /// Create coordinator with OS entropy and default configuration
    #[must_use]
    pub fn new(kv: Arc<K>, content: Arc<C>) -> Self {
        Self {
            kv,
            content,
            entropy: Arc::new(OsEntropy),
            config: SandboxConfig::default(),
        }
    }

    /// Replace the default configuration
    #[inline]
    #[must_use]
    pub fn with_config(mut self, config: SandboxConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the random source (tests, HSM-backed sources)
    #[inline]
    #[must_use]
    pub fn with_entropy(mut self, entropy: Arc<dyn EntropySource>) -> Self {
        self.entropy = entropy;
        self
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn kv_store(&self) -> &Arc<K> {
        &self.kv
    }

    #[inline]
    #[must_use]
    pub fn content_store(&self) -> &Arc<C> {
        &self.content
    }

    /// Create a new, unsaved sandbox for a checksum set
    ///
    /// Duplicate checksums collapse. The result must be passed to
    /// [`save`](Self::save) to become durable.
    ///
    /// # Errors
    /// - `SandboxError::Entropy` if the random source fails (not retried)
    /// - `SandboxError::ExhaustedRetries` if every id attempt collides
    /// - `SandboxError::Store` on backend failure
    /// - `SandboxError::Config` if the configuration is out of bounds
    pub async fn create_sandbox<I>(&self, checksums: I) -> Result<Sandbox, SandboxError>
    where
        I: IntoIterator<Item = Checksum>,
    {
        let checksums: BTreeSet<Checksum> = checksums.into_iter().collect();
        let id = self.generate_id().await?;
        let sandbox = Sandbox::new(id, checksums.into_iter().collect());
        tracing::debug!(
            "Created sandbox {} with {} checksums",
            id,
            sandbox.checksums().len()
        );
        Ok(sandbox)
    }

    async fn generate_id(&self) -> Result<SandboxId, SandboxError> {
        self.config.validate()?;

        let mut seed = vec![0u8; self.config.entropy_bytes];
        for attempt in 1..=self.config.max_id_attempts {
            self.entropy.fill(&mut seed)?;
            let candidate = SandboxId::from_entropy(&seed);
            let key = candidate.to_string();
            if self.kv.get(SANDBOX_COLLECTION, &key).await?.is_none() {
                return Ok(candidate);
            }
            tracing::warn!(
                "Sandbox id collision: {} already exists (attempt {}/{})",
                key,
                attempt,
                self.config.max_id_attempts
            );
        }

        tracing::error!(
            "Every attempt to generate a unique sandbox id failed ({} attempts)",
            self.config.max_id_attempts
        );
        Err(SandboxError::ExhaustedRetries {
            attempts: self.config.max_id_attempts,
        })
    }

    /// Upsert a sandbox
    ///
    /// # Errors
    /// Returns `SandboxError::Store` on encoding or backend failure
    pub async fn save(&self, sandbox: &Sandbox) -> Result<(), SandboxError> {
        let value = serde_json::to_value(sandbox).map_err(StoreError::from)?;
        self.kv
            .set(SANDBOX_COLLECTION, &sandbox.id().to_string(), value)
            .await?;
        tracing::debug!("Saved sandbox {}", sandbox.id());
        Ok(())
    }

    /// Load a sandbox
    ///
    /// # Errors
    /// - `SandboxError::NotFound` if no sandbox has this id
    /// - `SandboxError::Corrupt` if the stored value does not decode
    /// - `SandboxError::Store` on backend failure
    pub async fn get(&self, id: &SandboxId) -> Result<Sandbox, SandboxError> {
        let key = id.to_string();
        let value = self
            .kv
            .get(SANDBOX_COLLECTION, &key)
            .await?
            .ok_or_else(|| SandboxError::NotFound { id: key.clone() })?;
        serde_json::from_value(value).map_err(|source| SandboxError::Corrupt { id: key, source })
    }

    /// Remove a sandbox; absent ids succeed
    ///
    /// # Errors
    /// Returns `SandboxError::Store` on backend failure
    pub async fn delete(&self, id: &SandboxId) -> Result<(), SandboxError> {
        self.kv.delete(SANDBOX_COLLECTION, &id.to_string()).await?;
        tracing::debug!("Deleted sandbox {}", id);
        Ok(())
    }

    /// Snapshot of every stored sandbox id, unordered
    ///
    /// # Errors
    /// Returns `SandboxError::Store` on backend failure
    pub async fn list(&self) -> Result<Vec<SandboxId>, SandboxError> {
        let keys = self.kv.list(SANDBOX_COLLECTION).await?;
        Ok(keys
            .into_iter()
            .filter_map(|key| match key.parse() {
                Ok(id) => Some(id),
                Err(e) => {
                    tracing::warn!("Skipping malformed sandbox key {}: {}", key, e);
                    None
                }
            })
            .collect())
    }

    /// Which checksums still need uploading
    ///
    /// Reflects the content store at call time; safe to poll.
    ///
    /// # Errors
    /// Returns `SandboxError::Store` on backend failure
    pub async fn needs_upload(
        &self,
        sandbox: &Sandbox,
    ) -> Result<BTreeMap<Checksum, UploadStatus>, SandboxError> {
        let mut statuses = BTreeMap::new();
        for checksum in sandbox.checksums() {
            let status = if self.content.exists(checksum).await? {
                UploadStatus::present()
            } else {
                UploadStatus::missing(self.config.upload_target(checksum.as_str()))
            };
            statuses.insert(checksum.clone(), status);
        }
        Ok(statuses)
    }

    /// Succeed only if every declared checksum is in the content store
    ///
    /// Stops at the first missing checksum, in stored order.
    ///
    /// # Errors
    /// - `SandboxError::Incomplete` naming the first missing checksum
    /// - `SandboxError::Store` on backend failure
    pub async fn is_complete(&self, sandbox: &Sandbox) -> Result<(), SandboxError> {
        for checksum in sandbox.checksums() {
            if !self.content.exists(checksum).await? {
                return Err(SandboxError::Incomplete {
                    sandbox_id: sandbox.id(),
                    checksum: checksum.clone(),
                });
            }
        }
        Ok(())
    }

    /// Every declared checksum missing from the content store, in stored order
    ///
    /// # Errors
    /// Returns `SandboxError::Store` on backend failure
    pub async fn missing_checksums(&self, sandbox: &Sandbox) -> Result<Vec<Checksum>, SandboxError> {
        let mut missing = Vec::new();
        for checksum in sandbox.checksums() {
            if !self.content.exists(checksum).await? {
                missing.push(checksum.clone());
            }
        }
        Ok(missing)
    }

    /// Like [`is_complete`](Self::is_complete) but reports every missing
    /// checksum
    ///
    /// # Errors
    /// - `SandboxError::IncompleteMany` listing all missing checksums
    /// - `SandboxError::Store` on backend failure
    pub async fn ensure_all_present(&self, sandbox: &Sandbox) -> Result<(), SandboxError> {
        let missing = self.missing_checksums(sandbox).await?;
        if missing.is_empty() {
            Ok(())
        } else {
            Err(SandboxError::IncompleteMany {
                sandbox_id: sandbox.id(),
                checksums: missing,
            })
        }
    }
}
