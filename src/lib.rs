//! Documentation resource identifiers.
//!
//! A [`Dri`] names one documentable program element (package, class, nested
//! class, function or property overload, generic parameter, value parameter)
//! independent of the platform that compiled it. Identifiers compare
//! structurally and encode to a stable `/`-delimited canonical string that is
//! safe to persist as a link key.

pub mod commands;
pub mod config;
pub mod diagnostics;
pub mod dri;
pub mod error;
pub mod extra;
pub mod freshness;
pub mod index;
pub mod lockfile;
pub mod logging;
pub mod scanner;
pub mod target;
pub mod translator;
pub mod types;

pub use dri::{Callable, Dri};
pub use error::Error;
pub use extra::{EnumEntry, ExtraContainer, ExtraProperty};
pub use index::DriIndex;
pub use target::DriTarget;
pub use types::TypeReference;
