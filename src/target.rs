//! What exactly an identifier points at within a declaration.
use std::fmt;

use serde::{Deserialize, Serialize};

/// The sub-part of a declaration an identifier addresses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DriTarget {
    /// The declaration itself.
    #[default]
    Declaration,
    /// The declaration's generic parameter at `index`.
    GenericParameter {
        /// Zero-based position among the generic parameters.
        index: u32,
    },
    /// The callable's value parameter at `index`.
    CallableParameter {
        /// Zero-based position among the value parameters.
        index: u32,
    },
}

impl DriTarget {
    /// Advance to the next parameter index. Identity for [`DriTarget::Declaration`].
    ///
    /// Saturates at `u32::MAX`: the last index maps to itself.
    #[must_use]
    pub const fn next(self) -> Self {
        return match self {
            Self::Declaration => Self::Declaration,
            Self::GenericParameter { index } => Self::GenericParameter {
                index: index.saturating_add(1),
            },
            Self::CallableParameter { index } => Self::CallableParameter {
                index: index.saturating_add(1),
            },
        };
    }

    /// `self`, `self.next()`, `self.next().next()`, ...
    ///
    /// Zip against a declaration's parameters to mint one target per parameter.
    /// Indexed targets end after index `u32::MAX` instead of repeating it.
    /// [`DriTarget::Declaration`] repeats forever.
    pub fn successors(self) -> impl Iterator<Item = Self> {
        return std::iter::successors(Some(self), |t| {
            let next = t.next();
            return if next == *t && !t.is_declaration() { None } else { Some(next) };
        });
    }

    /// Whether this target points at the declaration itself.
    pub const fn is_declaration(self) -> bool {
        return matches!(self, Self::Declaration);
    }
}

impl fmt::Display for DriTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return match self {
            Self::Declaration => f.write_str("PointingToDeclaration"),
            Self::GenericParameter { index } => write!(f, "PointingToGenericParameters({index})"),
            Self::CallableParameter { index } => write!(f, "PointingToCallableParameters({index})"),
        };
    }
}
