//! Freshness checking for lockfile entries.

use crate::error::Error;
use crate::index::DriIndex;
use crate::lockfile::{LockEntry, Lockfile};

/// Result of checking a single lockfile entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckResult {
    /// The identifier still encodes to its recorded key.
    Fresh,
    /// The identifier now encodes differently; links built on the old key are dead.
    Stale {
        /// Canonical string the identifier encodes to today.
        current: String,
    },
}

/// Re-encode one entry and compare with its recorded key.
pub fn check_entry(entry: &LockEntry) -> CheckResult {
    let current = entry.dri.to_string();
    if current == entry.key {
        return CheckResult::Fresh;
    }
    return CheckResult::Stale { current };
}

/// Collisions between entries under today's encoding.
///
/// Distinct recorded keys can still collapse onto one canonical string if the
/// encoding changed; every such pair is returned as an
/// `Error::EncodingCollision`.
pub fn find_collisions(lockfile: &Lockfile) -> Vec<Error> {
    let mut index = DriIndex::new();
    let mut collisions = Vec::new();
    for entry in &lockfile.entries {
        if let Err(e) = index.insert(entry.dri.clone()) {
            collisions.push(e);
        }
    }
    return collisions;
}
