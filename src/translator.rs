//! Boundary with the compiler-specific translation step.
//!
//! A translator walks one platform's native symbol containers and produces a
//! [`Module`] tree whose every node carries a [`Dri`]. The walk itself is
//! toolchain-bound and lives outside this crate; only its shape is fixed here.
use serde::{Deserialize, Serialize};

use crate::dri::Dri;
use crate::error::Error;

/// Compilation platform a module was produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// Shared code compiled for every platform.
    Common,
    /// JVM bytecode.
    Jvm,
    /// JavaScript.
    Js,
    /// Native binaries.
    Native,
}

/// Which platform and targets a translated module describes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatformData {
    /// Platform kind.
    pub platform: Platform,
    /// Concrete target names, e.g. `jvm` or `linuxX64`.
    pub targets: Vec<String>,
}

/// Kind of a documentable node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentableKind {
    /// Package; its identifier has no class path.
    Package,
    /// Class, interface or object.
    Class,
    /// Enum class; its entries are children.
    Enum,
    /// Entry of an enum; its identifier carries the [`EnumEntry`](crate::extra::EnumEntry) marker.
    EnumEntry,
    /// Function or constructor; its identifier carries a callable.
    Function,
    /// Property; its identifier carries a callable with no parameters.
    Property,
    /// Generic parameter; its identifier targets [`DriTarget::GenericParameter`](crate::target::DriTarget::GenericParameter).
    TypeParameter,
    /// Value parameter; its identifier targets [`DriTarget::CallableParameter`](crate::target::DriTarget::CallableParameter).
    Parameter,
}

/// One node of the documentable tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Documentable {
    /// Identifier addressing this node.
    pub dri: Dri,
    /// Simple name as declared.
    pub name: String,
    /// What kind of element this is.
    pub kind: DocumentableKind,
    /// Nested members, generic parameters, and value parameters.
    #[serde(default)]
    pub children: Vec<Documentable>,
}

impl Documentable {
    /// Leaf node with no children.
    pub fn new(dri: Dri, name: impl Into<String>, kind: DocumentableKind) -> Self {
        return Self {
            dri,
            name: name.into(),
            kind,
            children: Vec::new(),
        };
    }

    /// Copy with `child` appended.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        return self;
    }

    /// Pre-order walk over this node and every descendant.
    pub fn walk(&self) -> Box<dyn Iterator<Item = &Self> + '_> {
        return Box::new(std::iter::once(self).chain(self.children.iter().flat_map(Self::walk)));
    }
}

/// Root of a translated tree: one module for one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Module name.
    pub name: String,
    /// Platform this module was translated for.
    pub platform_data: PlatformData,
    /// Top-level packages.
    pub packages: Vec<Documentable>,
}

impl Module {
    /// Every node identifier, depth-first in declaration order.
    pub fn dris(&self) -> impl Iterator<Item = &Dri> {
        return self.packages.iter().flat_map(Documentable::walk).map(|d| return &d.dri);
    }
}

/// Translates compiler-native package fragments into a [`Module`].
pub trait DocumentableTranslator {
    /// Native symbol container for one package fragment.
    type Fragment;

    /// Build the module tree for `module_name` on `platform_data`.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedDri` when a node needs an identifier field
    /// its context did not supply.
    fn translate<I>(&self, module_name: &str, fragments: I, platform_data: &PlatformData) -> Result<Module, Error>
    where
        I: IntoIterator<Item = Self::Fragment>;
}
