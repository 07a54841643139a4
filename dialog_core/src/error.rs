//! Errors raised by registries and the dialog engine.

use dialog_content::{ChoiceId, ContentError, EntryKind, NodeId, TreeId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DialogError>;

/// The record holding a reference that failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Referrer {
    Tree(TreeId),
    Node(NodeId),
    Choice(ChoiceId),
}

impl std::fmt::Display for Referrer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Referrer::Tree(id) => write!(f, "tree '{}'", id),
            Referrer::Node(id) => write!(f, "node '{}'", id),
            Referrer::Choice(id) => write!(f, "choice '{}'", id),
        }
    }
}

#[derive(Error, Debug)]
pub enum DialogError {
    /// A caller asked for an id that no registry holds.
    #[error("{kind} '{id}' not found")]
    NotFound { kind: EntryKind, id: String },

    /// Two content modules define the same id. Fatal at load time.
    #[error("{kind} '{id}' from module '{module}' is already defined by module '{existing_module}'")]
    DuplicateId {
        kind: EntryKind,
        id: String,
        module: String,
        existing_module: String,
    },

    /// Content links to a record that does not exist.
    #[error("tree '{tree}' is corrupt: {referrer} references missing {missing_kind} '{missing}'")]
    CorruptTree {
        tree: TreeId,
        referrer: Referrer,
        missing_kind: EntryKind,
        missing: String,
    },

    /// The choice is not among those currently offered.
    #[error("choice '{choice}' is not offered at node '{node}'")]
    InvalidChoice { node: NodeId, choice: ChoiceId },

    /// `advance` was called on a node that waits for a player choice.
    #[error("node '{node}' offers choices and cannot be advanced automatically")]
    ChoiceRequired { node: NodeId },

    /// `advance` was called on a session that already ended.
    #[error("session for tree '{tree}' has already ended")]
    SessionEnded { tree: TreeId },

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("invalid session snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl DialogError {
    /// Whether the error points at broken content rather than caller misuse.
    pub fn is_content_defect(&self) -> bool {
        matches!(
            self,
            DialogError::DuplicateId { .. } | DialogError::CorruptTree { .. } | DialogError::Content(_)
        )
    }
}
