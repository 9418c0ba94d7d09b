//! Lockfile persistence: parsing, serialization, and ordering enforcement.
//!
//! The lockfile pins each identifier to the canonical string it encoded to
//! when the lockfile was written, so downstream links built on those strings
//! can be checked for format drift.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dri::Dri;
use crate::error::Error;
use crate::index::DriIndex;

/// A single pinned identifier in the lockfile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LockEntry {
    /// Canonical string recorded at lock time.
    pub key: String,
    /// The identifier itself.
    pub dri: Dri,
}

/// The lockfile as a whole. Entries are strictly sorted by key.
/// Constructed only via `Lockfile::from_index()` or `Lockfile::parse()`, both
/// of which enforce sorting and uniqueness.
#[derive(Debug, Serialize, Deserialize)]
pub struct Lockfile {
    /// The ordered list of pinned identifiers.
    pub entries: Vec<LockEntry>,
}

impl Lockfile {
    /// Create a lockfile from an index, which already guarantees one identifier per key.
    pub fn from_index(index: &DriIndex) -> Self {
        let mut entries: Vec<LockEntry> = index
            .iter()
            .map(|(key, dri)| {
                return LockEntry {
                    key: key.to_string(),
                    dri: dri.clone(),
                };
            })
            .collect();
        entries.sort_by(|a, b| return a.key.cmp(&b.key));
        return Self { entries };
    }

    /// Parse a lockfile from TOML content.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlDe` if the content is not valid TOML,
    /// or `Error::LockfileCorrupt` if entries are not strictly sorted.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let lockfile: Self = toml::from_str(content)?;
        enforce_lockfile_entry_ordering(&lockfile.entries)?;
        return Ok(lockfile);
    }

    /// Read and parse a lockfile from disk.
    ///
    /// # Errors
    ///
    /// Returns `Error::LockfileNotFound` if the file doesn't exist,
    /// `Error::Io` for other read failures,
    /// `Error::TomlDe` if the content is invalid TOML,
    /// or `Error::LockfileCorrupt` if entries are not sorted.
    pub fn read(path: &Path) -> Result<Self, Error> {
        let content = match std::fs::read_to_string(path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::LockfileNotFound { path: path.to_path_buf() });
            },
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };
        return Self::parse(&content);
    }

    /// Serialize to TOML.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlSer` if serialization fails.
    pub fn serialize(&self) -> Result<String, Error> {
        return Ok(toml::to_string_pretty(self)?);
    }

    /// Write the lockfile to disk.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlSer` if serialization fails,
    /// or `Error::Io` if the file cannot be written.
    pub fn write(&self, path: &Path) -> Result<(), Error> {
        let content = self.serialize()?;
        std::fs::write(path, content)?;
        tracing::info!(entries = self.entries.len(), "wrote {}", path.display());
        return Ok(());
    }
}

/// Validate that lockfile entries are strictly sorted by key.
///
/// # Errors
///
/// Returns `Error::LockfileCorrupt` if any adjacent pair is out of order or repeated.
fn enforce_lockfile_entry_ordering(entries: &[LockEntry]) -> Result<(), Error> {
    for window in entries.windows(2) {
        let [first, second] = window else {
            return Err(Error::LockfileCorrupt {
                reason: "window shorter than two entries".to_string(),
            });
        };
        if first.key >= second.key {
            return Err(Error::LockfileCorrupt {
                reason: format!("entries not sorted: `{}` >= `{}`", first.key, second.key),
            });
        }
    }
    return Ok(());
}
