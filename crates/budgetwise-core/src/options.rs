//! Fixed option sets
//!
//! Every selectable field in the expense form and the behavior survey is a
//! small closed set of options. Each option has a stable snake_case `id`
//! (used in config files and JSON) and a display `label` (used in prompts).

use serde::Serialize;

/// An option as exposed to form widgets
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OptionInfo {
    pub id: &'static str,
    pub label: &'static str,
}

/// Declare a closed option set.
///
/// Generates the enum plus `id()`, `label()`, `all()`, `options()`,
/// `Default` (first option), `FromStr` (accepts id or label, case-insensitive),
/// `Display` (label), and serde impls (serialize as id, deserialize via `FromStr`).
macro_rules! option_set {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => ($id:literal, $label:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            const ALL: &'static [$name] = &[$( $name::$variant ),+];

            /// Stable identifier used in config files and JSON
            pub fn id(&self) -> &'static str {
                match self {
                    $( Self::$variant => $id ),+
                }
            }

            /// Human-readable label, as shown to the user and embedded in prompts
            pub fn label(&self) -> &'static str {
                match self {
                    $( Self::$variant => $label ),+
                }
            }

            /// All options in display order
            pub fn all() -> &'static [$name] {
                Self::ALL
            }

            /// All options as id/label pairs
            pub fn options() -> Vec<$crate::options::OptionInfo> {
                Self::ALL
                    .iter()
                    .map(|o| $crate::options::OptionInfo {
                        id: o.id(),
                        label: o.label(),
                    })
                    .collect()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::ALL[0]
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|o| o.id().eq_ignore_ascii_case(s) || o.label().to_lowercase() == s.to_lowercase())
                    .ok_or_else(|| {
                        let valid: Vec<&str> = Self::ALL.iter().map(|o| o.label()).collect();
                        format!(
                            "Unknown {}: '{}' (expected one of: {})",
                            stringify!($name),
                            s,
                            valid.join(", ")
                        )
                    })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.label())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.id())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}
