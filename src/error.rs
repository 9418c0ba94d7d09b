/// Crate-level error types for identifier encoding and the `dri` tool.
use std::path::PathBuf;

use crate::dri::Dri;

/// All errors in `dri` carry enough context to produce a useful diagnostic
/// without a debugger. Each variant names the identifier, file, or reason for failure.
#[allow(clippy::error_impl_error, reason = "single crate-wide error type")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Two structurally distinct identifiers produced the same canonical string.
    #[error("canonical collision on `{key}`: {first:?} and {second:?}")]
    EncodingCollision {
        /// Identifier that claimed the key first.
        first: Box<Dri>,
        /// The shared canonical string.
        key: String,
        /// Identifier that tried to claim the same key.
        second: Box<Dri>,
    },

    /// A referenced input file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON (de)serialization failed.
    #[error("json: {0}")]
    Json(
        /// The wrapped JSON error.
        #[from]
        serde_json::Error,
    ),

    /// Lockfile exists but cannot be parsed.
    #[error("lockfile corrupt: {reason}")]
    LockfileCorrupt {
        /// Description of the corruption.
        reason: String,
    },

    /// Expected lockfile does not exist on disk.
    #[error("lockfile not found: {}", path.display())]
    LockfileNotFound {
        /// Path to the missing lockfile.
        path: PathBuf,
    },

    /// An operation required a field the identifier does not carry.
    #[error("malformed DRI: {reason}")]
    MalformedDri {
        /// Which field was missing or invalid, and in what context.
        reason: String,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// TOML serialization failed.
    #[error("toml serialize: {0}")]
    TomlSer(
        /// The wrapped TOML serialization error.
        #[from]
        toml::ser::Error,
    ),

    /// Input file has an extension the loader does not understand.
    #[error("unsupported input: {}", path.display())]
    UnsupportedInput {
        /// File that could not be loaded.
        path: PathBuf,
    },
}

impl Error {
    /// Shorthand for a [`Error::MalformedDri`] with the given reason.
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        return Self::MalformedDri { reason: reason.into() };
    }
}
