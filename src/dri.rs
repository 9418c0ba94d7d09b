//! The documentation resource identifier and its canonical encoding.
//!
//! A [`Dri`] addresses one documentable element independent of which
//! platform produced it. Identifiers are immutable: every operation here
//! returns a new value.
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;
use crate::extra::{ExtraContainer, ExtraProperty};
use crate::target::DriTarget;
use crate::types::TypeReference;

/// Separator between the slots of the canonical form.
pub const SLOT_SEPARATOR: char = '/';

/// Separator between the receiver and parameters of a callable signature.
pub const SIGNATURE_SEPARATOR: char = '#';

/// A function or property: a name plus the types that tell its overloads apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Callable {
    /// Declared name.
    pub name: String,
    /// Extension receiver, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<TypeReference>,
    /// Value parameter types in declaration order.
    #[serde(default)]
    pub params: Vec<TypeReference>,
}

impl Callable {
    /// Build a callable from its parts.
    pub fn new(
        name: impl Into<String>,
        receiver: Option<TypeReference>,
        params: Vec<TypeReference>,
    ) -> Self {
        return Self {
            name: name.into(),
            receiver,
            params,
        };
    }

    /// Overload-disambiguating signature: `receiver#param1#param2`.
    pub fn signature(&self) -> String {
        let mut out = self.receiver.as_ref().map(ToString::to_string).unwrap_or_default();
        out.push(SIGNATURE_SEPARATOR);
        let params = self.params.iter().map(ToString::to_string).collect::<Vec<_>>();
        out.push_str(&params.join(&SIGNATURE_SEPARATOR.to_string()));
        return out;
    }
}

/// Documentation resource identifier.
///
/// Equality is field-wise and agrees with the canonical form produced by
/// `Display`. Optional string fields never hold an empty string; empty input
/// is stored as absent so that the two cannot encode alike.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dri {
    /// Dotted package path.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "non_empty")]
    package_name: Option<String>,
    /// Dot-separated nested class path relative to the package.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "non_empty")]
    class_names: Option<String>,
    /// Encoded metadata blob, see [`ExtraContainer`].
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "non_empty")]
    extra: Option<String>,
    /// Function or property within the class or package.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    callable: Option<Callable>,
    /// Sub-part of the declaration this identifier points at.
    #[serde(default, skip_serializing_if = "is_declaration")]
    target: DriTarget,
}

/// Serde predicate for skipping the default target.
fn is_declaration(target: &DriTarget) -> bool {
    return target.is_declaration();
}

/// Deserialize an optional string, folding `""` into `None`.
fn non_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    return Ok(raw.and_then(non_empty_string));
}

/// `None` for an empty string.
fn non_empty_string(s: String) -> Option<String> {
    return if s.is_empty() { None } else { Some(s) };
}

impl Dri {
    /// The root identifier: no package, class, callable, or metadata.
    pub const fn top_level() -> Self {
        return Self {
            package_name: None,
            class_names: None,
            extra: None,
            callable: None,
            target: DriTarget::Declaration,
        };
    }

    /// Identifier of a package-level declaration, or of the package itself when `class_names` is `None`.
    pub fn new(package_name: impl Into<String>, class_names: Option<&str>) -> Self {
        return Self::top_level()
            .with_package(package_name)
            .with_class_names(class_names.map(str::to_string));
    }

    /// `kotlin.Unit`.
    pub fn unit() -> Self {
        return Self::new("kotlin", Some("Unit"));
    }

    /// `kotlin.Any`.
    pub fn any() -> Self {
        return Self::new("kotlin", Some("Any"));
    }

    /// Package path, if any.
    pub fn package_name(&self) -> Option<&str> {
        return self.package_name.as_deref();
    }

    /// Nested class path, if any.
    pub fn class_names(&self) -> Option<&str> {
        return self.class_names.as_deref();
    }

    /// Callable, if any.
    pub const fn callable(&self) -> Option<&Callable> {
        return self.callable.as_ref();
    }

    /// What this identifier points at.
    pub const fn target(&self) -> DriTarget {
        return self.target;
    }

    /// Raw metadata blob, if any.
    pub fn extra_blob(&self) -> Option<&str> {
        return self.extra.as_deref();
    }

    /// Class path for contexts that cannot proceed without one.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedDri` if the identifier has no class path.
    pub fn sure_class_names(&self) -> Result<&str, Error> {
        return self
            .class_names
            .as_deref()
            .ok_or_else(|| return Error::malformed(format!("`{self}` requires class names in this context")));
    }

    /// Whether this is the root identifier.
    pub fn is_root(&self) -> bool {
        return *self == Self::top_level();
    }

    /// Copy with the package replaced. An empty name clears it.
    #[must_use]
    pub fn with_package(self, package_name: impl Into<String>) -> Self {
        return Self {
            package_name: non_empty_string(package_name.into()),
            ..self
        };
    }

    /// Copy with the whole class path replaced.
    #[must_use]
    pub fn with_class_names(self, class_names: Option<String>) -> Self {
        return Self {
            class_names: class_names.and_then(non_empty_string),
            ..self
        };
    }

    /// Copy with `name` appended as the innermost nested class.
    #[must_use]
    pub fn with_class(self, name: &str) -> Self {
        let class_names = match self.class_names.as_deref() {
            Some(existing) if !existing.trim().is_empty() => format!("{existing}.{name}"),
            _ => name.to_string(),
        };
        return self.with_class_names(Some(class_names));
    }

    /// Copy with the callable replaced.
    #[must_use]
    pub fn with_callable(self, callable: Option<Callable>) -> Self {
        return Self { callable, ..self };
    }

    /// Copy with the target replaced.
    #[must_use]
    pub fn with_target(self, target: DriTarget) -> Self {
        return Self { target, ..self };
    }

    /// Copy pointing at the declaration itself.
    #[must_use]
    pub fn with_declaration_target(self) -> Self {
        return self.with_target(DriTarget::Declaration);
    }

    /// Copy with the raw metadata blob replaced. The blob is not validated
    /// here; [`Dri::extra_container`] reports a malformed one.
    #[must_use]
    pub fn with_extra_blob(self, extra: Option<String>) -> Self {
        return Self {
            extra: extra.and_then(non_empty_string),
            ..self
        };
    }

    /// Decode the metadata blob.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedDri` if the blob is not a valid key/value sequence.
    pub fn extra_container(&self) -> Result<ExtraContainer, Error> {
        return ExtraContainer::parse(self.extra.as_deref());
    }

    /// Read one metadata fact.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedDri` if the blob cannot be decoded.
    pub fn extra<P: ExtraProperty>(&self, property: &P) -> Result<Option<P::Value>, Error> {
        return Ok(self.extra_container()?.get(property));
    }

    /// Copy with one metadata fact set.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedDri` if the existing blob cannot be decoded
    /// or the new key or value contains the blob separator.
    pub fn with_extra<P: ExtraProperty>(self, property: &P, value: &P::Value) -> Result<Self, Error> {
        let container = self.extra_container()?.with(property, value)?;
        return Ok(Self {
            extra: container.encode(),
            ..self
        });
    }

    /// The logically enclosing identifier.
    ///
    /// Strips, in priority order: metadata, a non-declaration target, the
    /// callable, the innermost class segment. An identifier with none of
    /// those goes straight to the root, dropping its package as well.
    #[must_use]
    pub fn parent(&self) -> Self {
        if self.extra.is_some() {
            return Self {
                extra: None,
                ..self.clone()
            };
        }
        if !self.target.is_declaration() {
            return self.clone().with_declaration_target();
        }
        if self.callable.is_some() {
            return self.clone().with_callable(None);
        }
        if let Some(class_names) = &self.class_names {
            let enclosing = class_names
                .rsplit_once('.')
                .map(|(head, _)| return head)
                .filter(|head| return !head.trim().is_empty())
                .map(str::to_string);
            return Self {
                class_names: enclosing,
                ..self.clone()
            };
        }
        return Self::top_level();
    }

    /// Successive parents up to and including the root. Empty for the root itself.
    pub fn ancestors(&self) -> impl Iterator<Item = Self> + use<> {
        let first = if self.is_root() { None } else { Some(self.parent()) };
        return std::iter::successors(first, |dri| {
            return if dri.is_root() { None } else { Some(dri.parent()) };
        });
    }
}

impl fmt::Display for Dri {
    /// `package/classNames/callableName/signature/target/extra`, absent fields as empty slots.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = SLOT_SEPARATOR;
        let package = self.package_name.as_deref().unwrap_or_default();
        let classes = self.class_names.as_deref().unwrap_or_default();
        let name = self.callable.as_ref().map(|c| return c.name.as_str()).unwrap_or_default();
        let signature = self.callable.as_ref().map(Callable::signature).unwrap_or_default();
        let extra = self.extra.as_deref().unwrap_or_default();
        return write!(
            f,
            "{package}{sep}{classes}{sep}{name}{sep}{signature}{sep}{}{sep}{extra}",
            self.target
        );
    }
}
