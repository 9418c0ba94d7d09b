use std::path::{Path, PathBuf};

use crate::error::Error;

/// Default lockfile name, relative to the project root.
pub const DEFAULT_LOCKFILE: &str = ".dri.lock";

/// Config file name, relative to the project root.
pub const CONFIG_FILE: &str = ".dri.toml";

/// Project configuration loaded from `.dri.toml`.
/// Include/exclude patterns are path prefixes applied to identifier input files.
#[derive(Debug)]
pub struct Config {
    /// Prefixes an input file must start with (empty means everything).
    include: Vec<String>,
    /// Prefixes that drop an otherwise included input file.
    exclude: Vec<String>,
    /// Lockfile location relative to the root.
    pub lockfile: PathBuf,
}

/// Raw TOML structure for `.dri.toml`.
#[derive(serde::Deserialize)]
struct DriTomlConfig {
    /// Include prefixes.
    #[serde(default)]
    include: Vec<String>,
    /// Exclude prefixes.
    #[serde(default)]
    exclude: Vec<String>,
    /// Lockfile override.
    #[serde(default)]
    lockfile: Option<PathBuf>,
}

impl Config {
    /// Load config from `.dri.toml` in the given root directory.
    /// Returns a default that scans everything if the file doesn't exist.
    /// Returns an error if the file exists but is malformed; never silently
    /// falls back to defaults when the user wrote a config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no {CONFIG_FILE} in {}, using defaults", root.display());
                return Ok(Self::scan_everything_by_default());
            },
            Err(e) => return Err(Error::Io(e)),
        };

        let raw: DriTomlConfig = toml::from_str(&content)?;
        Ok(Self {
            include: raw.include,
            exclude: raw.exclude,
            lockfile: raw.lockfile.unwrap_or_else(|| PathBuf::from(DEFAULT_LOCKFILE)),
        })
    }

    /// Default config that includes everything and excludes nothing.
    fn scan_everything_by_default() -> Self {
        Self {
            include: Vec::new(),
            exclude: Vec::new(),
            lockfile: PathBuf::from(DEFAULT_LOCKFILE),
        }
    }

    /// Check whether an input file path should be loaded.
    ///
    /// A path is included if no include patterns are set (scan everything),
    /// or if the path starts with at least one include pattern.
    /// An included path is then excluded if it starts with any exclude pattern.
    pub fn should_scan(&self, relative_path: &str) -> bool {
        let included = self.include.is_empty()
            || self.include.iter().any(|p| relative_path.starts_with(p.as_str()));

        if !included {
            return false;
        }

        !self.exclude.iter().any(|p| relative_path.starts_with(p.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_scans_everything() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(config.should_scan("anything/at/all.toml"));
        assert_eq!(config.lockfile, PathBuf::from(DEFAULT_LOCKFILE));
    }

    #[test]
    fn include_then_exclude() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "include = [\"dris/\"]\nexclude = [\"dris/old/\"]\nlockfile = \"out.lock\"\n",
        )
        .unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(config.should_scan("dris/jvm.toml"));
        assert!(!config.should_scan("dris/old/jvm.toml"));
        assert!(!config.should_scan("other/jvm.toml"));
        assert_eq!(config.lockfile, PathBuf::from("out.lock"));
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "include = 3").unwrap();
        assert!(matches!(Config::load(dir.path()), Err(Error::TomlDe(_))));
    }
}
