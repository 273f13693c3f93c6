//! Entry and category traits shared by every content domain.

use std::fmt;
use std::hash::Hash;
use thiserror::Error;

/// A closed classification used to filter entries.
pub trait Category: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// Every declared value, in declaration order.
    const ALL: &'static [Self];

    /// The kebab-case identifier used in content sources and on the wire.
    fn as_str(&self) -> &'static str;

    /// Parse a kebab-case identifier.
    fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == value)
    }
}

/// One record in a content repository.
pub trait Entry {
    type Category: Category;

    /// Unique primary key within the entry's repository.
    fn id(&self) -> &str;

    /// The single category this entry belongs to.
    fn category(&self) -> Self::Category;

    /// English display name.
    fn name(&self) -> &str;
}

/// An unrecognized category string at an input boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} category: {value}")]
pub struct UnknownCategory {
    pub kind: &'static str,
    pub value: String,
}

/// Declare a closed category enum with its kebab-case names.
///
/// Generates the enum with serde renames, the [`Category`] impl,
/// `Display`, `FromStr`, and `AsFieldValue` so the category can be a
/// designated search field.
#[macro_export]
macro_rules! content_category {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ::serde::Serialize, ::serde::Deserialize)]
        $vis enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant ),+
        }

        impl $crate::entry::Category for $name {
            const ALL: &'static [Self] = &[$( $name::$variant ),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.pad($crate::entry::Category::as_str(self))
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::entry::UnknownCategory;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                <$name as $crate::entry::Category>::parse(s).ok_or_else(|| {
                    $crate::entry::UnknownCategory {
                        kind: $kind,
                        value: s.to_string(),
                    }
                })
            }
        }

        impl $crate::search::AsFieldValue for $name {
            fn as_field_value(&self) -> $crate::search::FieldValue<'_> {
                $crate::search::FieldValue::Text($crate::entry::Category::as_str(self))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    content_category! {
        enum Shade: "shade" {
            Light => "light",
            DarkRed => "dark-red",
        }
    }

    #[test]
    fn test_category_names_round_trip() {
        for shade in Shade::ALL {
            assert_eq!(Shade::parse(shade.as_str()), Some(*shade));
        }
        assert_eq!(Shade::DarkRed.to_string(), "dark-red");
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let err = "purple".parse::<Shade>().unwrap_err();
        assert_eq!(err.kind, "shade");
        assert_eq!(err.to_string(), "unknown shade category: purple");
    }

    #[test]
    fn test_serde_uses_kebab_names() {
        let json = serde_json::to_string(&Shade::DarkRed).unwrap();
        assert_eq!(json, "\"dark-red\"");
        let back: Shade = serde_json::from_str("\"light\"").unwrap();
        assert_eq!(back, Shade::Light);
        assert!(serde_json::from_str::<Shade>("\"purple\"").is_err());
    }
}
