//! Table of identifiers keyed by canonical form.
//!
//! Each analysis worker builds its own [`DriIndex`]; the results are folded
//! together afterwards with [`DriIndex::merge`] by a single writer.
use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::dri::Dri;
use crate::error::Error;

/// Identifiers keyed by canonical string, in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriIndex {
    /// Canonical string to identifier.
    entries: IndexMap<String, Dri>,
}

impl DriIndex {
    /// Empty index.
    pub fn new() -> Self {
        return Self::default();
    }

    /// Build an index from a sequence of identifiers.
    ///
    /// # Errors
    ///
    /// Returns `Error::EncodingCollision` if two distinct identifiers share a canonical string.
    pub fn from_dris<'a, I>(dris: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = &'a Dri>,
    {
        let mut index = Self::new();
        for dri in dris {
            index.insert(dri.clone())?;
        }
        return Ok(index);
    }

    /// Insert `dri`. Returns `false` when an equal identifier was already present.
    ///
    /// # Errors
    ///
    /// Returns `Error::EncodingCollision` if a different identifier already owns the same canonical string.
    pub fn insert(&mut self, dri: Dri) -> Result<bool, Error> {
        match self.entries.entry(dri.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(dri);
                return Ok(true);
            },
            Entry::Occupied(slot) if *slot.get() == dri => return Ok(false),
            Entry::Occupied(slot) => {
                tracing::warn!(key = %slot.key(), "canonical collision between distinct identifiers");
                return Err(Error::EncodingCollision {
                    first: Box::new(slot.get().clone()),
                    key: slot.key().clone(),
                    second: Box::new(dri),
                });
            },
        }
    }

    /// Fold every entry of `other` into `self`.
    ///
    /// # Errors
    ///
    /// Returns `Error::EncodingCollision` on the first conflicting key. Entries
    /// merged before the conflict stay merged.
    pub fn merge(&mut self, other: Self) -> Result<(), Error> {
        let incoming = other.entries.len();
        let before = self.entries.len();
        for dri in other.entries.into_values() {
            self.insert(dri)?;
        }
        tracing::debug!(
            incoming,
            added = self.entries.len().saturating_sub(before),
            "merged identifier index"
        );
        return Ok(());
    }

    /// Identifier stored under a canonical string.
    pub fn get(&self, key: &str) -> Option<&Dri> {
        return self.entries.get(key);
    }

    /// `(canonical string, identifier)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Dri)> {
        return self.entries.iter().map(|(k, v)| return (k.as_str(), v));
    }

    /// Number of identifiers.
    pub fn len(&self) -> usize {
        return self.entries.len();
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        return self.entries.is_empty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dri::Callable;
    use crate::target::DriTarget;
    use crate::types::TypeReference;

    #[test]
    fn equal_identifiers_deduplicate() {
        let mut index = DriIndex::new();
        assert!(index.insert(Dri::unit()).unwrap());
        assert!(!index.insert(Dri::unit()).unwrap());
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("kotlin/Unit///PointingToDeclaration/"), Some(&Dri::unit()));
    }

    #[test]
    fn colliding_identifiers_are_rejected() {
        // A `/` inside a class path shifts slots: not representable without collision.
        let a = Dri::new("a", Some("b/c"));
        let b = Dri::new("a/b", Some("c"));
        assert_ne!(a, b);
        assert_eq!(a.to_string(), b.to_string());

        let mut index = DriIndex::new();
        index.insert(a).unwrap();
        let err = index.insert(b).unwrap_err();
        assert!(matches!(err, Error::EncodingCollision { .. }));
    }

    #[test]
    fn leaf_and_bare_constructor_collide() {
        let leaf = Dri::new("pkg", Some("C"))
            .with_callable(Some(Callable::new("f", None, vec![TypeReference::class("kotlin.Int")])));
        let bare = Dri::new("pkg", Some("C")).with_callable(Some(Callable::new(
            "f",
            None,
            vec![TypeReference::constructor("kotlin.Int", Vec::new())],
        )));
        assert_ne!(leaf, bare);
        assert_eq!(leaf.to_string(), "pkg/C/f/#kotlin.Int/PointingToDeclaration/");
        assert_eq!(leaf.to_string(), bare.to_string());

        let mut index = DriIndex::new();
        index.insert(leaf).unwrap();
        let err = index.insert(bare).unwrap_err();
        assert!(matches!(err, Error::EncodingCollision { .. }));
    }

    #[test]
    fn separator_inside_type_name_collides() {
        let merged = Callable::new("f", None, vec![TypeReference::class("a#b")]);
        let split = Callable::new("f", None, vec![TypeReference::class("a"), TypeReference::class("b")]);
        assert_eq!(merged.signature(), "#a#b");
        assert_eq!(merged.signature(), split.signature());

        let mut index = DriIndex::new();
        index.insert(Dri::top_level().with_callable(Some(merged))).unwrap();
        let err = index.insert(Dri::top_level().with_callable(Some(split))).unwrap_err();
        assert!(matches!(err, Error::EncodingCollision { .. }));
    }

    #[test]
    fn per_platform_indexes_merge() {
        let common = Dri::new("pkg", Some("Shared"));
        let jvm_only = Dri::new("pkg", Some("JvmThing"));
        let js_only = Dri::new("pkg", Some("JsThing"))
            .with_callable(Some(Callable::new("f", None, vec![TypeReference::Star])))
            .with_target(DriTarget::CallableParameter { index: 0 });

        let platforms = [vec![common.clone(), jvm_only.clone()], vec![common.clone(), js_only.clone()]];
        let built: Vec<DriIndex> = std::thread::scope(|scope| {
            let handles: Vec<_> = platforms
                .iter()
                .map(|dris| return scope.spawn(move || return DriIndex::from_dris(dris).unwrap()))
                .collect();
            return handles.into_iter().map(|h| return h.join().unwrap()).collect();
        });

        let mut merged = DriIndex::new();
        for index in built {
            merged.merge(index).unwrap();
        }
        assert_eq!(merged.len(), 3);
        let keys: Vec<&str> = merged.iter().map(|(k, _)| return k).collect();
        assert_eq!(
            keys,
            vec![
                "pkg/Shared///PointingToDeclaration/",
                "pkg/JvmThing///PointingToDeclaration/",
                "pkg/JsThing/f/#*/PointingToCallableParameters(0)/",
            ]
        );
        assert_eq!(merged.get(&js_only.to_string()), Some(&js_only));
    }
}
