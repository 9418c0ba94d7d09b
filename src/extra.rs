//! Typed key/value side-channel attached to identifiers.
//!
//! The store is a single string blob of interleaved keys and values. Each
//! fact is addressed through an [`ExtraProperty`] descriptor that owns its
//! key and codec, so independent modules can attach facts without widening
//! [`Dri`](crate::dri::Dri) and without ever spelling raw keys at call sites.

use indexmap::IndexMap;

use crate::error::Error;

/// Separator between keys and values in the encoded blob.
pub const SEPARATOR: char = '/';

/// A named codec for one fact stored in an [`ExtraContainer`].
pub trait ExtraProperty {
    /// Decoded value type.
    type Value;

    /// The reserved key this descriptor stores under.
    fn key(&self) -> &'static str;

    /// Encode a value. `None` means "store nothing for this key".
    fn encode(&self, value: &Self::Value) -> Option<String>;

    /// Decode a stored value. `None` if the stored text is not a valid value.
    fn decode(&self, raw: &str) -> Option<Self::Value>;
}

/// Marks an identifier as denoting an enum entry rather than an ordinary nested class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumEntry;

impl ExtraProperty for EnumEntry {
    type Value = Self;

    fn key(&self) -> &'static str {
        return "EnumEntry";
    }

    fn encode(&self, _value: &Self) -> Option<String> {
        return Some(String::new());
    }

    fn decode(&self, _raw: &str) -> Option<Self> {
        return Some(Self);
    }
}

/// Decoded form of an identifier's metadata blob.
///
/// Iteration order is insertion order, which makes [`ExtraContainer::encode`]
/// deterministic for a given construction sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraContainer {
    /// Key/value pairs in insertion order.
    map: IndexMap<String, String>,
}

impl ExtraContainer {
    /// Decode a blob. An absent or empty blob is an empty container.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedDri` if the blob has a dangling key or repeats a key.
    pub fn parse(blob: Option<&str>) -> Result<Self, Error> {
        let mut map = IndexMap::new();
        let Some(blob) = blob.filter(|b| return !b.is_empty()) else {
            return Ok(Self { map });
        };

        let mut parts = blob.split(SEPARATOR);
        while let Some(key) = parts.next() {
            let Some(value) = parts.next() else {
                return Err(Error::malformed(format!("extra blob `{blob}` has a dangling key `{key}`")));
            };
            if map.insert(key.to_string(), value.to_string()).is_some() {
                return Err(Error::malformed(format!("extra blob `{blob}` repeats key `{key}`")));
            }
        }
        return Ok(Self { map });
    }

    /// Look up and decode the descriptor's value. `None` when unset.
    pub fn get<P: ExtraProperty>(&self, property: &P) -> Option<P::Value> {
        return self.map.get(property.key()).and_then(|raw| return property.decode(raw));
    }

    /// Whether the descriptor's key is present, regardless of its payload.
    pub fn contains<P: ExtraProperty>(&self, property: &P) -> bool {
        return self.map.contains_key(property.key());
    }

    /// Copy of `self` with the descriptor's value inserted or overwritten.
    /// A descriptor that encodes to `None` leaves the container unchanged.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedDri` if the key is empty or the key or encoded
    /// value contains [`SEPARATOR`].
    pub fn with<P: ExtraProperty>(&self, property: &P, value: &P::Value) -> Result<Self, Error> {
        let key = property.key();
        if key.is_empty() || key.contains(SEPARATOR) {
            return Err(Error::malformed(format!("extra key `{key}` is empty or contains `{SEPARATOR}`")));
        }

        let Some(encoded) = property.encode(value) else {
            return Ok(self.clone());
        };
        if encoded.contains(SEPARATOR) {
            return Err(Error::malformed(format!(
                "extra value `{encoded}` for `{key}` contains `{SEPARATOR}`"
            )));
        }

        let mut map = self.map.clone();
        map.insert(key.to_string(), encoded);
        return Ok(Self { map });
    }

    /// Copy of `self` without the descriptor's key.
    #[must_use]
    pub fn without<P: ExtraProperty>(&self, property: &P) -> Self {
        let mut map = self.map.clone();
        map.shift_remove(property.key());
        return Self { map };
    }

    /// Encode to a blob, `None` when empty.
    pub fn encode(&self) -> Option<String> {
        if self.map.is_empty() {
            return None;
        }
        let sep = SEPARATOR.to_string();
        let blob = self
            .map
            .iter()
            .flat_map(|(k, v)| return [k.as_str(), v.as_str()])
            .collect::<Vec<_>>()
            .join(&sep);
        return Some(blob);
    }

    /// Raw pairs in insertion order, including keys no descriptor at this call site knows.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        return self.map.iter().map(|(k, v)| return (k.as_str(), v.as_str()));
    }

    /// Number of stored facts.
    pub fn len(&self) -> usize {
        return self.map.len();
    }

    /// Whether no facts are stored.
    pub fn is_empty(&self) -> bool {
        return self.map.is_empty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test descriptor carrying a number.
    struct Arity;

    impl ExtraProperty for Arity {
        type Value = u32;

        fn key(&self) -> &'static str {
            return "Arity";
        }

        fn encode(&self, value: &u32) -> Option<String> {
            return Some(value.to_string());
        }

        fn decode(&self, raw: &str) -> Option<u32> {
            return raw.parse().ok();
        }
    }

    /// Test descriptor that never stores anything.
    struct Ephemeral;

    impl ExtraProperty for Ephemeral {
        type Value = bool;

        fn key(&self) -> &'static str {
            return "Ephemeral";
        }

        fn encode(&self, _value: &bool) -> Option<String> {
            return None;
        }

        fn decode(&self, _raw: &str) -> Option<bool> {
            return Some(true);
        }
    }

    #[test]
    fn set_then_get_round_trips() {
        let container = ExtraContainer::default();
        for v in [0, 1, 42, u32::MAX] {
            let updated = container.with(&Arity, &v).unwrap();
            assert_eq!(updated.get(&Arity), Some(v));
        }
    }

    #[test]
    fn unset_key_is_absent_not_error() {
        let container = ExtraContainer::parse(Some("Other/x")).unwrap();
        assert_eq!(container.get(&Arity), None);
        assert_eq!(container.get(&EnumEntry), None);
    }

    #[test]
    fn set_is_copy_on_write() {
        let original = ExtraContainer::default();
        let updated = original.with(&EnumEntry, &EnumEntry).unwrap();
        assert!(original.is_empty());
        assert_eq!(updated.get(&EnumEntry), Some(EnumEntry));
    }

    #[test]
    fn enum_entry_is_presence_marker() {
        let updated = ExtraContainer::default().with(&EnumEntry, &EnumEntry).unwrap();
        assert_eq!(updated.encode().as_deref(), Some("EnumEntry/"));
        let back = ExtraContainer::parse(Some("EnumEntry/")).unwrap();
        assert!(back.contains(&EnumEntry));
    }

    #[test]
    fn none_encoding_stores_nothing() {
        let updated = ExtraContainer::default().with(&Ephemeral, &true).unwrap();
        assert!(updated.is_empty());
        assert_eq!(updated.encode(), None);
    }

    #[test]
    fn encoding_follows_insertion_order() {
        let a = ExtraContainer::default()
            .with(&Arity, &2)
            .unwrap()
            .with(&EnumEntry, &EnumEntry)
            .unwrap();
        let b = ExtraContainer::default()
            .with(&Arity, &2)
            .unwrap()
            .with(&EnumEntry, &EnumEntry)
            .unwrap();
        assert_eq!(a.encode(), b.encode());
        assert_eq!(a.encode().as_deref(), Some("Arity/2/EnumEntry/"));

        // Overwriting keeps the original slot.
        let c = a.with(&Arity, &3).unwrap();
        assert_eq!(c.encode().as_deref(), Some("Arity/3/EnumEntry/"));
    }

    #[test]
    fn unknown_keys_survive_round_trip() {
        let container = ExtraContainer::parse(Some("Foreign/payload")).unwrap();
        let updated = container.with(&Arity, &7).unwrap();
        assert_eq!(updated.encode().as_deref(), Some("Foreign/payload/Arity/7"));
        assert_eq!(updated.iter().next(), Some(("Foreign", "payload")));
    }

    #[test]
    fn dangling_key_is_malformed() {
        let err = ExtraContainer::parse(Some("a/b/c")).unwrap_err();
        assert!(matches!(err, Error::MalformedDri { .. }));
    }

    #[test]
    fn repeated_key_is_malformed() {
        let err = ExtraContainer::parse(Some("a/1/a/2")).unwrap_err();
        assert!(matches!(err, Error::MalformedDri { .. }));
    }

    #[test]
    fn separator_in_value_is_rejected() {
        /// Descriptor whose values may contain the separator.
        struct PathLike;

        impl ExtraProperty for PathLike {
            type Value = String;

            fn key(&self) -> &'static str {
                return "Path";
            }

            fn encode(&self, value: &String) -> Option<String> {
                return Some(value.clone());
            }

            fn decode(&self, raw: &str) -> Option<String> {
                return Some(raw.to_string());
            }
        }

        let err = ExtraContainer::default()
            .with(&PathLike, &"a/b".to_string())
            .unwrap_err();
        assert!(matches!(err, Error::MalformedDri { .. }));
    }

    #[test]
    fn without_removes_key() {
        let container = ExtraContainer::parse(Some("Arity/1/EnumEntry/")).unwrap();
        let removed = container.without(&Arity);
        assert_eq!(removed.encode().as_deref(), Some("EnumEntry/"));
    }
}
