//! Core CLI commands for dri: encode, parents, init, check.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use serde::Serialize;

use crate::config::Config;
use crate::dri::Dri;
use crate::error;
use crate::freshness::{self, CheckResult};
use crate::index::DriIndex;
use crate::lockfile::Lockfile;
use crate::scanner;

/// One identifier with its canonical string, for JSON output.
#[derive(Serialize)]
struct EncodedJson<'a> {
    /// Canonical string.
    key: String,
    /// The identifier.
    dri: &'a Dri,
}

/// Load identifiers under the current directory's config.
///
/// # Errors
///
/// Returns errors from config loading or input parsing.
fn load_inputs(input: &Path) -> Result<(Config, Vec<Dri>), error::Error> {
    let root = PathBuf::from(".");
    let config = Config::load(&root)?;
    let dris = scanner::load(&root, input, &config)?;
    return Ok((config, dris));
}

/// Print the canonical form of every identifier in `input`.
///
/// # Errors
///
/// Returns errors from loading or JSON serialization.
pub fn cmd_encode(input: &Path, json: bool) -> Result<(), error::Error> {
    let (_, dris) = load_inputs(input)?;

    if json {
        let encoded: Vec<EncodedJson<'_>> = dris
            .iter()
            .map(|dri| return EncodedJson { key: dri.to_string(), dri })
            .collect();
        println!("{}", serde_json::to_string_pretty(&encoded)?);
        return Ok(());
    }

    for dri in &dris {
        println!("{dri}");
    }
    Ok(())
}

/// Print each identifier followed by its breadcrumb chain up to the root.
///
/// # Errors
///
/// Returns errors from loading.
pub fn cmd_parents(input: &Path) -> Result<(), error::Error> {
    let (_, dris) = load_inputs(input)?;

    for dri in &dris {
        println!("{dri}");
        for ancestor in dri.ancestors() {
            println!("  <- {ancestor}");
        }
    }
    Ok(())
}

/// Index every identifier in `input` and write the lockfile.
///
/// # Errors
///
/// Returns `Error::EncodingCollision` if two identifiers share a canonical
/// string, or errors from loading and lockfile writing.
pub fn cmd_init(input: &Path) -> Result<(), error::Error> {
    let (config, dris) = load_inputs(input)?;

    let index = DriIndex::from_dris(&dris)?;
    let lockfile = Lockfile::from_index(&index);
    lockfile.write(&config.lockfile)?;

    let count = lockfile.entries.len();
    println!("Wrote {count} identifiers to {}", config.lockfile.display());
    Ok(())
}

/// Re-encode every locked identifier and compare with its recorded key.
///
/// Exit code priority: collisions (2) > stale (1) > fresh (0).
///
/// # Errors
///
/// Returns errors from config or lockfile reading.
pub fn cmd_check() -> Result<ExitCode, error::Error> {
    let root = PathBuf::from(".");
    let config = Config::load(&root)?;
    let lockfile = Lockfile::read(&config.lockfile)?;

    let mut stale_count = 0u32;
    for entry in &lockfile.entries {
        if let CheckResult::Stale { current } = freshness::check_entry(entry) {
            stale_count = stale_count.saturating_add(1);
            println!("STALE   {} -> {current}", entry.key);
        }
    }

    let collisions = freshness::find_collisions(&lockfile);
    for collision in &collisions {
        println!("COLLIDE {collision}");
    }

    if !collisions.is_empty() {
        println!("{} collisions, {stale_count} stale", collisions.len());
        Ok(ExitCode::from(2))
    } else if stale_count > 0 {
        println!("{stale_count} stale");
        Ok(ExitCode::from(1))
    } else {
        let total = lockfile.entries.len();
        println!("All {total} identifiers fresh");
        Ok(ExitCode::SUCCESS)
    }
}
