//! Dialog sessions - immutable snapshots of progress through one tree.

use dialog_content::{ChoiceId, NodeId, TreeId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

/// Identifies one playthrough of a tree. Every snapshot produced from the
/// same `start` shares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Create a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a node was reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Arrival {
    /// The tree's start node.
    Start,
    /// Automatic advancement through `next_id`.
    Advance,
    /// The player took this choice.
    Choice(ChoiceId),
}

/// One node shown during the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    pub node_id: NodeId,
    pub via: Arrival,
}

/// Why a session ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ending {
    /// Advanced past a node with no successor.
    NoSuccessor,
    /// Took a choice with no successor.
    Chose(ChoiceId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Active,
    Ended(Ending),
}

/// A snapshot of one playthrough.
///
/// Transitions never mutate a session; the engine returns a new one, so an
/// older snapshot keeps describing the earlier state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogSession {
    id: SessionId,
    tree_id: TreeId,
    /// Visits before the current one, oldest first.
    history: Vec<Visit>,
    current: Visit,
    status: SessionStatus,
}

impl DialogSession {
    pub(crate) fn begin(tree_id: TreeId, start_id: NodeId) -> Self {
        Self {
            id: SessionId::new(),
            tree_id,
            history: Vec::new(),
            current: Visit {
                node_id: start_id,
                via: Arrival::Start,
            },
            status: SessionStatus::Active,
        }
    }

    /// A new snapshot positioned at `node_id`.
    pub(crate) fn moved_to(&self, node_id: NodeId, via: Arrival) -> Self {
        let mut history = self.history.clone();
        history.push(self.current.clone());
        Self {
            id: self.id,
            tree_id: self.tree_id.clone(),
            history,
            current: Visit { node_id, via },
            status: SessionStatus::Active,
        }
    }

    /// A new snapshot that has ended at the current node.
    pub(crate) fn ended(&self, ending: Ending) -> Self {
        Self {
            status: SessionStatus::Ended(ending),
            ..self.clone()
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn tree_id(&self) -> &TreeId {
        &self.tree_id
    }

    /// The node the session points to. For an ended session this is the last
    /// node shown.
    pub fn current_node_id(&self) -> &NodeId {
        &self.current.node_id
    }

    pub fn current_visit(&self) -> &Visit {
        &self.current
    }

    /// Visits before the current one, oldest first.
    pub fn history(&self) -> &[Visit] {
        &self.history
    }

    /// Every visit including the current one, oldest first.
    pub fn visits(&self) -> impl Iterator<Item = &Visit> + '_ {
        self.history.iter().chain(std::iter::once(&self.current))
    }

    /// Number of nodes shown so far.
    pub fn steps(&self) -> usize {
        self.history.len() + 1
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn ending(&self) -> Option<&Ending> {
        match &self.status {
            SessionStatus::Ended(ending) => Some(ending),
            SessionStatus::Active => None,
        }
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.status, SessionStatus::Ended(_))
    }

    /// Serialize for save games.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restore a saved snapshot. Pass the result through
    /// `DialogEngine::resume` before use so it is checked against the
    /// loaded content.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
