//! Typed requests and results.
//!
//! Requests are plain structs with public fields; build them with struct
//! literals and `..Default::default()`, or with the `new` constructors for
//! the required fields. Results mirror the XML payload of each operation.

use std::collections::BTreeMap;

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Deserializer};

use crate::error::Result;
use crate::request::{QueryEntry, QueryParams};

/// Declares an enum over a fixed set of wire strings with an `Unknown`
/// catch-all, so new service values never fail decoding.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Deserialize)]
        #[serde(from = "String")]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
            /// A value not known to this version of the crate.
            Unknown(String),
        }

        impl $name {
            /// Returns the wire representation.
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $wire,)+
                    Self::Unknown(value) => value,
                }
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                match value.as_str() {
                    $($wire => Self::$variant,)+
                    _ => Self::Unknown(value),
                }
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::from(value.to_string())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub mod account;
pub mod group;
pub mod keys;
pub mod policy;
pub mod role;
pub mod simulation;
pub mod user;

pub use account::*;
pub use group::*;
pub use keys::*;
pub use policy::*;
pub use role::*;
pub use simulation::*;
pub use user::*;

/// A key/value tag on a user or role.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl QueryEntry for Tag {
    fn marshal(&self, prefix: &str, params: &mut QueryParams) -> Result<()> {
        params.required(&format!("{}.Key", prefix), &self.key)?;
        params.insert(format!("{}.Value", prefix), self.value.as_str());
        Ok(())
    }
}

/// Deserializes `<X><member>…</member>…</X>` into a `Vec`.
pub(crate) fn members<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    struct Members<M> {
        #[serde(default = "Vec::new")]
        member: Vec<M>,
    }

    Ok(Members::deserialize(deserializer)?.member)
}

/// Deserializes `<X><entry><key/><value/></entry>…</X>` into a map.
pub(crate) fn entries<'de, D, V>(deserializer: D) -> std::result::Result<BTreeMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    #[derive(Deserialize)]
    struct Entry<E> {
        key: String,
        value: E,
    }

    #[derive(Deserialize)]
    struct Entries<E> {
        #[serde(default = "Vec::new")]
        entry: Vec<Entry<E>>,
    }

    Ok(Entries::deserialize(deserializer)?
        .entry
        .into_iter()
        .map(|entry| (entry.key, entry.value))
        .collect())
}

/// IAM returns policy documents URL-encoded.
pub(crate) fn decode_policy_document(document: &str) -> String {
    percent_decode_str(document).decode_utf8_lossy().into_owned()
}
