//! Identifier newtypes for dialog content.
//!
//! Nodes, choices and trees each live in their own namespace, so the three id
//! types are distinct and cannot be mixed up at a lookup site.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// The registry an identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntryKind {
    Node,
    Choice,
    Tree,
}

impl EntryKind {
    /// Lowercase name used in error messages and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Node => "node",
            EntryKind::Choice => "choice",
            EntryKind::Tree => "tree",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Implemented by every identifier type so generic registries can name what
/// they hold.
pub trait ContentId: Clone + Ord + std::fmt::Display {
    const KIND: EntryKind;

    fn as_str(&self) -> &str;
}

macro_rules! content_id {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }
        }

        impl ContentId for $name {
            const KIND: EntryKind = $kind;

            fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

content_id!(
    /// Identifier of a dialog node, unique within the node registry.
    NodeId,
    EntryKind::Node
);

content_id!(
    /// Identifier of a player choice, unique within the choice registry.
    ChoiceId,
    EntryKind::Choice
);

content_id!(
    /// Identifier of a dialog tree, unique within the tree registry.
    TreeId,
    EntryKind::Tree
);
