//! Formal type shapes used inside callable signatures.
use std::fmt;

use serde::{Deserialize, Serialize};

/// A formal type as it appears in a signature. Carries no behavior beyond
/// its canonical string form, which is what disambiguates overloads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeReference {
    /// Leaf reference to a class by fully-qualified name.
    Class {
        /// Fully-qualified class name such as `kotlin.Int`.
        name: String,
    },
    /// Generic type parameter described by its upper bounds.
    TypeParam {
        /// Upper bounds in declaration order.
        bounds: Vec<TypeReference>,
    },
    /// Parameterized type constructor such as `kotlin.collections.List[kotlin.Int]`.
    Constructor {
        /// Fully-qualified name of the constructor.
        fully_qualified_name: String,
        /// Type arguments in declaration order.
        #[serde(default)]
        params: Vec<TypeReference>,
    },
    /// Back-reference into an enclosing generic context, `rank` levels up.
    /// Terminates the expansion of self-referential bounds like `T : Comparable<T>`.
    Recursive {
        /// Number of enclosing generic contexts between this use and its target.
        rank: u32,
    },
    /// Nullable wrapper around another type.
    Nullable {
        /// The non-null inner type.
        wrapped: Box<TypeReference>,
    },
    /// Star projection: an unknown type argument.
    Star,
}

impl TypeReference {
    /// Leaf class reference.
    pub fn class(name: impl Into<String>) -> Self {
        return Self::Class { name: name.into() };
    }

    /// Type constructor applied to the given arguments.
    pub fn constructor(fully_qualified_name: impl Into<String>, params: Vec<Self>) -> Self {
        return Self::Constructor {
            fully_qualified_name: fully_qualified_name.into(),
            params,
        };
    }

    /// Wrap `self` as nullable.
    #[must_use]
    pub fn nullable(self) -> Self {
        return Self::Nullable { wrapped: Box::new(self) };
    }
}

/// Write `items` separated by `sep`.
fn write_joined(f: &mut fmt::Formatter<'_>, items: &[TypeReference], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    return Ok(());
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return match self {
            Self::Class { name } => f.write_str(name),
            Self::TypeParam { bounds } => {
                f.write_str("TypeParam(bounds=[")?;
                write_joined(f, bounds, ", ")?;
                f.write_str("])")
            },
            Self::Constructor { fully_qualified_name, params } => {
                f.write_str(fully_qualified_name)?;
                if params.is_empty() {
                    return Ok(());
                }
                f.write_str("[")?;
                write_joined(f, params, ",")?;
                f.write_str("]")
            },
            Self::Recursive { rank } => {
                for _ in 0..=*rank {
                    f.write_str("^")?;
                }
                Ok(())
            },
            Self::Nullable { wrapped } => write!(f, "{wrapped}?"),
            Self::Star => f.write_str("*"),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_without_arguments_is_bare_name() {
        let list = TypeReference::constructor("kotlin.collections.List", Vec::new());
        assert_eq!(list.to_string(), "kotlin.collections.List");
    }

    #[test]
    fn constructor_renders_arguments_in_brackets() {
        let map = TypeReference::constructor(
            "kotlin.collections.Map",
            vec![TypeReference::class("kotlin.String"), TypeReference::Star],
        );
        assert_eq!(map.to_string(), "kotlin.collections.Map[kotlin.String,*]");
    }

    #[test]
    fn recursive_rank_repeats_marker() {
        assert_eq!(TypeReference::Recursive { rank: 0 }.to_string(), "^");
        assert_eq!(TypeReference::Recursive { rank: 2 }.to_string(), "^^^");
    }

    #[test]
    fn self_referential_bound_terminates() {
        // T : Comparable<T>
        let t = TypeReference::TypeParam {
            bounds: vec![TypeReference::constructor(
                "kotlin.Comparable",
                vec![TypeReference::Recursive { rank: 0 }],
            )],
        };
        assert_eq!(t.to_string(), "TypeParam(bounds=[kotlin.Comparable[^]])");
    }

    #[test]
    fn nullable_appends_question_mark() {
        let s = TypeReference::class("kotlin.String").nullable();
        assert_eq!(s.to_string(), "kotlin.String?");
        assert_ne!(s, TypeReference::class("kotlin.String"));
    }

    #[test]
    fn tagged_json_shape() {
        let json = serde_json::to_value(TypeReference::class("kotlin.Int").nullable()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "nullable",
                "wrapped": { "kind": "class", "name": "kotlin.Int" }
            })
        );
        let back: TypeReference = serde_json::from_value(json).unwrap();
        assert_eq!(back.to_string(), "kotlin.Int?");
    }
}
