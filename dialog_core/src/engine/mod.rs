//! Dialog Engine - drives playthroughs of dialog trees.
//!
//! A session moves through two states:
//! 1. **Active**: pointing at a node. `advance` follows the node's `next_id`
//!    when it offers no choices; `choose` follows the selected choice.
//! 2. **Ended**: reached by advancing past a node without a successor or by
//!    taking a choice without one. No transition leaves it.
//!
//! Every transition returns a fresh [`DialogSession`].

mod session;

pub use session::*;

use dialog_content::{ChoiceId, ContentId, DialogChoice, DialogNode, EntryKind, NodeId, TreeId};
use std::sync::Arc;
use tracing::{debug, error, trace};

use crate::error::{DialogError, Referrer, Result};
use crate::registry::DialogLibrary;

/// A choice currently offered to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfferedChoice<'a> {
    pub id: &'a ChoiceId,
    pub choice: &'a DialogChoice,
}

impl<'a> OfferedChoice<'a> {
    pub fn text(&self) -> &'a str {
        &self.choice.text
    }
}

/// One entry of a session log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLine<'a> {
    pub node_id: NodeId,
    pub text: &'a str,
    /// Label of the choice the player took at this node, if any.
    pub response: Option<&'a str>,
}

/// Traversal over a read-only [`DialogLibrary`].
///
/// Cloning is cheap and the engine can be shared across threads; sessions
/// carry all per-playthrough state.
#[derive(Debug, Clone)]
pub struct DialogEngine {
    library: Arc<DialogLibrary>,
}

impl DialogEngine {
    pub fn new(library: DialogLibrary) -> Self {
        Self {
            library: Arc::new(library),
        }
    }

    pub fn from_shared(library: Arc<DialogLibrary>) -> Self {
        Self { library }
    }

    pub fn library(&self) -> &DialogLibrary {
        &self.library
    }

    /// `(tree id, name)` pairs for journal and menu screens.
    pub fn list_trees(&self) -> impl Iterator<Item = (&TreeId, &str)> + Clone + '_ {
        self.library.trees().list_trees()
    }

    /// Begin a playthrough at the tree's start node.
    pub fn start(&self, tree_id: &str) -> Result<DialogSession> {
        let tree = self.library.trees().get(tree_id)?;
        let tree_id = TreeId::from(tree_id);

        if !self.library.nodes().has(&tree.start_id) {
            return Err(self.corrupt(
                &tree_id,
                Referrer::Tree(tree_id.clone()),
                EntryKind::Node,
                tree.start_id.as_str(),
            ));
        }

        let session = DialogSession::begin(tree_id, tree.start_id.clone());
        debug!(
            session = %session.id(),
            tree = %session.tree_id(),
            start = %tree.start_id,
            "Dialog session started"
        );
        Ok(session)
    }

    /// The node the session points to.
    pub fn current(&self, session: &DialogSession) -> Result<&DialogNode> {
        let node_id = session.current_node_id();
        self.library.nodes().find(node_id).ok_or_else(|| {
            self.corrupt(
                session.tree_id(),
                arrival_referrer(session),
                EntryKind::Node,
                node_id.as_str(),
            )
        })
    }

    /// The choices offered at the current node, in declared order. Empty once
    /// the session has ended.
    pub fn available_choices(&self, session: &DialogSession) -> Result<Vec<OfferedChoice<'_>>> {
        if session.is_ended() {
            return Ok(Vec::new());
        }

        let node_id = session.current_node_id();
        let node = self.current(session)?;

        node.choice_ids
            .iter()
            .map(|choice_id| match self.library.choices().find(choice_id) {
                Some(choice) => Ok(OfferedChoice {
                    id: choice_id,
                    choice,
                }),
                None => Err(self.corrupt(
                    session.tree_id(),
                    Referrer::Node(node_id.clone()),
                    EntryKind::Choice,
                    choice_id.as_str(),
                )),
            })
            .collect()
    }

    /// Follow the current node's `next_id`. Only valid when the node offers no
    /// choices.
    pub fn advance(&self, session: &DialogSession) -> Result<DialogSession> {
        if session.is_ended() {
            return Err(DialogError::SessionEnded {
                tree: session.tree_id().clone(),
            });
        }

        let node_id = session.current_node_id();
        let node = self.current(session)?;

        // Broken choice links surface as CorruptTree before ChoiceRequired.
        if !self.available_choices(session)?.is_empty() {
            return Err(DialogError::ChoiceRequired {
                node: node_id.clone(),
            });
        }

        match &node.next_id {
            Some(next_id) => {
                self.ensure_node(session.tree_id(), Referrer::Node(node_id.clone()), next_id)?;
                trace!(session = %session.id(), from = %node_id, to = %next_id, "Advanced");
                Ok(session.moved_to(next_id.clone(), Arrival::Advance))
            }
            None => {
                debug!(session = %session.id(), node = %node_id, "Dialog session ended");
                Ok(session.ended(Ending::NoSuccessor))
            }
        }
    }

    /// Take one of the offered choices.
    pub fn choose(&self, session: &DialogSession, choice_id: &str) -> Result<DialogSession> {
        let offered = self.available_choices(session)?;
        let selected = offered
            .iter()
            .find(|offer| offer.id == choice_id)
            .ok_or_else(|| DialogError::InvalidChoice {
                node: session.current_node_id().clone(),
                choice: ChoiceId::from(choice_id),
            })?;

        match &selected.choice.next_id {
            Some(next_id) => {
                self.ensure_node(
                    session.tree_id(),
                    Referrer::Choice(selected.id.clone()),
                    next_id,
                )?;
                trace!(
                    session = %session.id(),
                    choice = %selected.id,
                    to = %next_id,
                    "Choice taken"
                );
                Ok(session.moved_to(next_id.clone(), Arrival::Choice(selected.id.clone())))
            }
            None => {
                debug!(
                    session = %session.id(),
                    choice = %selected.id,
                    "Dialog session ended by choice"
                );
                Ok(session.ended(Ending::Chose(selected.id.clone())))
            }
        }
    }

    pub fn is_ended(&self, session: &DialogSession) -> bool {
        session.is_ended()
    }

    /// Check a restored snapshot against the loaded content.
    ///
    /// Fails with `NotFound` if the tree no longer exists and with
    /// `CorruptTree` if any visited node or taken choice does not resolve.
    pub fn resume(&self, session: DialogSession) -> Result<DialogSession> {
        let tree_id = session.tree_id();
        self.library.trees().get(tree_id.as_str())?;

        let mut referrer = Referrer::Tree(tree_id.clone());
        for visit in session.visits() {
            if let Arrival::Choice(choice_id) = &visit.via {
                if !self.library.choices().has(choice_id) {
                    return Err(self.corrupt(
                        tree_id,
                        referrer,
                        EntryKind::Choice,
                        choice_id.as_str(),
                    ));
                }
                referrer = Referrer::Choice(choice_id.clone());
            }
            self.ensure_node(tree_id, referrer, &visit.node_id)?;
            referrer = Referrer::Node(visit.node_id.clone());
        }

        if let Some(Ending::Chose(choice_id)) = session.ending() {
            if !self.library.choices().has(choice_id) {
                return Err(self.corrupt(tree_id, referrer, EntryKind::Choice, choice_id.as_str()));
            }
        }

        debug!(session = %session.id(), tree = %tree_id, steps = session.steps(), "Dialog session resumed");
        Ok(session)
    }

    /// Resolve the session's history into displayable lines.
    pub fn transcript(&self, session: &DialogSession) -> Result<Vec<TranscriptLine<'_>>> {
        let visits: Vec<&Visit> = session.visits().collect();
        let mut lines = Vec::with_capacity(visits.len());

        for (index, visit) in visits.iter().enumerate() {
            let node = self.library.nodes().find(&visit.node_id).ok_or_else(|| {
                self.corrupt(
                    session.tree_id(),
                    Referrer::Tree(session.tree_id().clone()),
                    EntryKind::Node,
                    visit.node_id.as_str(),
                )
            })?;

            let taken = match visits.get(index + 1) {
                Some(next) => match &next.via {
                    Arrival::Choice(choice_id) => Some(choice_id),
                    _ => None,
                },
                None => match session.ending() {
                    Some(Ending::Chose(choice_id)) => Some(choice_id),
                    _ => None,
                },
            };
            let response = match taken {
                Some(choice_id) => {
                    let choice = self.library.choices().find(choice_id).ok_or_else(|| {
                        self.corrupt(
                            session.tree_id(),
                            Referrer::Node(visit.node_id.clone()),
                            EntryKind::Choice,
                            choice_id.as_str(),
                        )
                    })?;
                    Some(choice.text.as_str())
                }
                None => None,
            };

            lines.push(TranscriptLine {
                node_id: visit.node_id.clone(),
                text: &node.text,
                response,
            });
        }

        Ok(lines)
    }

    fn ensure_node(&self, tree: &TreeId, referrer: Referrer, node_id: &NodeId) -> Result<()> {
        if self.library.nodes().has(node_id) {
            Ok(())
        } else {
            Err(self.corrupt(tree, referrer, EntryKind::Node, node_id.as_str()))
        }
    }

    fn corrupt(
        &self,
        tree: &TreeId,
        referrer: Referrer,
        missing_kind: EntryKind,
        missing: &str,
    ) -> DialogError {
        error!(
            tree = %tree,
            referrer = %referrer,
            missing_kind = %missing_kind,
            missing = %missing,
            "Dialog content references a missing record"
        );
        DialogError::CorruptTree {
            tree: tree.clone(),
            referrer,
            missing_kind,
            missing: missing.to_string(),
        }
    }
}

/// The record whose link led to the session's current node.
fn arrival_referrer(session: &DialogSession) -> Referrer {
    match &session.current_visit().via {
        Arrival::Start => Referrer::Tree(session.tree_id().clone()),
        Arrival::Choice(choice_id) => Referrer::Choice(choice_id.clone()),
        Arrival::Advance => match session.history().last() {
            Some(previous) => Referrer::Node(previous.node_id.clone()),
            None => Referrer::Tree(session.tree_id().clone()),
        },
    }
}
