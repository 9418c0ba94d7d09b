//! Loading identifiers from TOML or JSON input files.
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::{CONFIG_FILE, Config};
use crate::dri::Dri;
use crate::error::Error;

/// TOML input shape: a list of `[[dri]]` tables.
#[derive(serde::Deserialize)]
struct TomlInput {
    /// Identifiers in file order.
    #[serde(default)]
    dri: Vec<Dri>,
}

/// Load identifiers from a single file, or from every input file under a directory.
/// Directory walks are sorted by file name, filtered through the config's
/// include/exclude prefixes, and skip the config file and lockfile.
///
/// # Errors
///
/// Returns `Error::FileNotFound` if `path` does not exist, `Error::Io` if a
/// file cannot be read, or a parse error from the file's format.
pub fn load(root: &Path, path: &Path, config: &Config) -> Result<Vec<Dri>, Error> {
    if !path.exists() {
        return Err(Error::FileNotFound { path: path.to_path_buf() });
    }
    if path.is_file() {
        return load_file(path);
    }

    let mut dris = Vec::new();
    for file in collect_input_files(root, path, config) {
        let mut loaded = load_file(&file)?;
        tracing::debug!(count = loaded.len(), "loaded {}", file.display());
        dris.append(&mut loaded);
    }
    return Ok(dris);
}

/// Input files under `dir` that pass the config filters, in file-name order.
fn collect_input_files(root: &Path, dir: &Path, config: &Config) -> Vec<PathBuf> {
    let lockfile = root.join(&config.lockfile);
    return WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| return e.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|p| return is_input_extension(p))
        .filter(|p| return p.file_name().is_none_or(|n| return n != CONFIG_FILE))
        .filter(|p| return *p != lockfile)
        .filter(|p| {
            let relative = p.strip_prefix(root).unwrap_or(p);
            return config.should_scan(&relative.to_string_lossy());
        })
        .collect();
}

/// Whether the loader understands this file's extension.
fn is_input_extension(path: &Path) -> bool {
    return path.extension().is_some_and(|ext| return ext == "toml" || ext == "json");
}

/// Parse one input file by extension.
///
/// # Errors
///
/// Returns `Error::UnsupportedInput` for unknown extensions, `Error::Io` on
/// read failure, or `Error::TomlDe`/`Error::Json` on malformed content.
fn load_file(path: &Path) -> Result<Vec<Dri>, Error> {
    let ext = path.extension().and_then(|e| return e.to_str()).unwrap_or("");
    let content = std::fs::read_to_string(path)?;
    return match ext {
        "toml" => Ok(toml::from_str::<TomlInput>(&content)?.dri),
        "json" => Ok(serde_json::from_str(&content)?),
        _ => Err(Error::UnsupportedInput { path: path.to_path_buf() }),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::DriTarget;

    const PACKAGE_TOML: &str = r#"
[[dri]]
package_name = "pkg"
class_names = "Outer.Inner"

[[dri]]
package_name = "pkg"
class_names = "Outer"
target = { kind = "generic_parameter", index = 0 }
"#;

    #[test]
    fn loads_toml_tables() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("pkg.toml");
        std::fs::write(&file, PACKAGE_TOML).unwrap();

        let dris = load(dir.path(), &file, &Config::load(dir.path()).unwrap()).unwrap();
        assert_eq!(dris.len(), 2);
        assert_eq!(dris.first(), Some(&Dri::new("pkg", Some("Outer.Inner"))));
        assert_eq!(dris.get(1).map(Dri::target), Some(DriTarget::GenericParameter { index: 0 }));
    }

    #[test]
    fn loads_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("pkg.json");
        std::fs::write(&file, r#"[{ "package_name": "kotlin", "class_names": "Unit" }]"#).unwrap();

        let dris = load(dir.path(), &file, &Config::load(dir.path()).unwrap()).unwrap();
        assert_eq!(dris, vec![Dri::unit()]);
    }

    #[test]
    fn directory_walk_skips_config_and_excluded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("dris/old")).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "exclude = [\"dris/old\"]\n").unwrap();
        std::fs::write(dir.path().join("dris/a.toml"), PACKAGE_TOML).unwrap();
        std::fs::write(dir.path().join("dris/old/b.toml"), PACKAGE_TOML).unwrap();
        std::fs::write(dir.path().join("dris/notes.txt"), "ignored").unwrap();

        let config = Config::load(dir.path()).unwrap();
        let dris = load(dir.path(), dir.path(), &config).unwrap();
        assert_eq!(dris.len(), 2);
    }

    #[test]
    fn missing_path_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        let err = load(dir.path(), &dir.path().join("nope.toml"), &config).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }
}
