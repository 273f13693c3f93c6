//! Versioned JSON snapshots of content repositories.
//!
//! A snapshot carries one domain's entries in repository order. Importing a
//! snapshot goes back through [`Repository::from_entries`], so the id index
//! and duplicate handling match the built-in repositories.

use crate::catalog::Domain;
use crate::content::education::EducationalContent;
use crate::content::labs::{LabPanel, LabTest};
use crate::content::oncology::OncologyCondition;
use crate::content::regions::RegionContent;
use crate::entry::Entry;
use crate::repository::Repository;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tokio::fs;

/// Errors from snapshot operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("Domain mismatch: expected {expected}, found {found}")]
    DomainMismatch { expected: Domain, found: Domain },
}

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Schemas that can be stored in a snapshot.
pub trait DomainEntry: Entry + Serialize + DeserializeOwned {
    const DOMAIN: Domain;
}

impl DomainEntry for OncologyCondition {
    const DOMAIN: Domain = Domain::Oncology;
}

impl DomainEntry for LabTest {
    const DOMAIN: Domain = Domain::LabTests;
}

impl DomainEntry for LabPanel {
    const DOMAIN: Domain = Domain::LabPanels;
}

impl DomainEntry for EducationalContent {
    const DOMAIN: Domain = Domain::Education;
}

impl DomainEntry for RegionContent {
    const DOMAIN: Domain = Domain::Regions;
}

/// One domain's entries, ready to write or just read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentSnapshot<E> {
    /// Snapshot format version for compatibility checking.
    pub version: u32,

    pub domain: Domain,

    /// When the snapshot was exported, in Unix seconds.
    pub exported_at: String,

    /// Entries in repository order.
    pub entries: Vec<E>,
}

/// Header of a snapshot file, read without decoding its entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotInfo {
    pub version: u32,
    pub domain: Domain,
    pub exported_at: String,
    pub entry_count: usize,
}

impl<E: DomainEntry> ContentSnapshot<E> {
    pub fn new(entries: Vec<E>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            domain: E::DOMAIN,
            exported_at: unix_timestamp(),
            entries,
        }
    }

    /// Copy a repository's entries.
    pub fn from_repository(repo: &Repository<E>) -> Self
    where
        E: Clone,
    {
        Self::new(repo.iter().cloned().collect())
    }

    /// Build a repository from the snapshot's entries.
    pub fn into_repository(self) -> Repository<E> {
        Repository::from_entries(self.entries)
    }

    /// Save to a JSON file.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        tracing::info!(path = %path.display(), domain = %self.domain, entries = self.entries.len(), "saved content snapshot");
        Ok(())
    }

    /// Load from a JSON file, checking version and domain.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;

        // Check the header before decoding entries so a mismatch is reported
        // as such rather than as a schema error.
        let header: Header = serde_json::from_str(&content)?;
        header.check(E::DOMAIN)?;

        let snapshot: Self = serde_json::from_str(&content)?;
        tracing::info!(path = %path.display(), domain = %snapshot.domain, entries = snapshot.entries.len(), "loaded content snapshot");
        Ok(snapshot)
    }
}

#[derive(Deserialize)]
struct Header {
    version: u32,
    domain: Domain,
    #[serde(default)]
    exported_at: String,
    #[serde(default)]
    entries: Vec<IgnoredAny>,
}

impl Header {
    fn check(&self, expected: Domain) -> Result<(), PersistError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: SNAPSHOT_VERSION,
                found: self.version,
            });
        }
        if self.domain != expected {
            return Err(PersistError::DomainMismatch {
                expected,
                found: self.domain,
            });
        }
        Ok(())
    }
}

/// Read a snapshot's header without loading its entries.
pub async fn peek_domain(path: impl AsRef<Path>) -> Result<SnapshotInfo, PersistError> {
    let content = fs::read_to_string(path).await?;
    let header: Header = serde_json::from_str(&content)?;

    if header.version != SNAPSHOT_VERSION {
        return Err(PersistError::VersionMismatch {
            expected: SNAPSHOT_VERSION,
            found: header.version,
        });
    }

    Ok(SnapshotInfo {
        version: header.version,
        domain: header.domain,
        exported_at: header.exported_at,
        entry_count: header.entries.len(),
    })
}

/// Current time as Unix seconds.
fn unix_timestamp() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();

    now.as_secs().to_string()
}
