//! Dialog data model - nodes, choices and trees.
//!
//! Records link to each other by id only. Resolving a link is always an
//! explicit lookup in the owning registry.

use serde::{Deserialize, Serialize};

use crate::ids::{ChoiceId, NodeId};

/// One line (or block) of narration shown to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DialogNode {
    /// Display text.
    pub text: String,

    /// Choices offered after this node, in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choice_ids: Vec<ChoiceId>,

    /// Node to advance to when there are no choices. `None` ends the tree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_id: Option<NodeId>,
}

impl DialogNode {
    /// Create a terminal node with the given text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            choice_ids: Vec::new(),
            next_id: None,
        }
    }

    /// Set the node to advance to.
    pub fn with_next(mut self, next: impl Into<NodeId>) -> Self {
        self.next_id = Some(next.into());
        self
    }

    /// Offer a choice after this node.
    pub fn with_choice(mut self, choice: impl Into<ChoiceId>) -> Self {
        self.choice_ids.push(choice.into());
        self
    }

    /// Offer several choices after this node.
    pub fn with_choices<I, C>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ChoiceId>,
    {
        self.choice_ids.extend(choices.into_iter().map(Into::into));
        self
    }

    /// Whether the player has to pick a choice to leave this node.
    pub fn is_branching(&self) -> bool {
        !self.choice_ids.is_empty()
    }

    /// Whether the node has neither choices nor a successor.
    pub fn is_terminal(&self) -> bool {
        self.choice_ids.is_empty() && self.next_id.is_none()
    }
}

/// A player-selectable branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DialogChoice {
    /// Label shown on the option.
    pub text: String,

    /// Node reached when selected. `None` ends the tree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_id: Option<NodeId>,
}

impl DialogChoice {
    /// Create a choice that ends the tree when taken.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            next_id: None,
        }
    }

    /// Set the node reached when this choice is taken.
    pub fn with_next(mut self, next: impl Into<NodeId>) -> Self {
        self.next_id = Some(next.into());
        self
    }
}

/// A named, independently startable unit of narrative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DialogTree {
    /// Human-readable label for journal and log screens.
    pub name: String,

    /// First node shown when the tree starts.
    pub start_id: NodeId,
}

impl DialogTree {
    pub fn new(name: impl Into<String>, start: impl Into<NodeId>) -> Self {
        Self {
            name: name.into(),
            start_id: start.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_builder() {
        let node = DialogNode::new("Fuel is limited.")
            .with_choice("ack_fuel")
            .with_choices(["ask_again", "skip"]);

        assert_eq!(node.text, "Fuel is limited.");
        assert_eq!(node.choice_ids.len(), 3);
        assert_eq!(node.choice_ids[0], "ack_fuel");
        assert!(node.is_branching());
        assert!(!node.is_terminal());
    }

    #[test]
    fn test_terminal_node() {
        let node = DialogNode::new("The end.");
        assert!(node.is_terminal());
        assert!(!node.is_branching());

        let linked = DialogNode::new("More to come.").with_next("later");
        assert!(!linked.is_terminal());
        assert_eq!(linked.next_id, Some(NodeId::from("later")));
    }

    #[test]
    fn test_choice_builder() {
        let choice = DialogChoice::new("Tell me more").with_next("details");
        assert_eq!(choice.text, "Tell me more");
        assert_eq!(choice.next_id.as_ref().map(|id| id.0.as_str()), Some("details"));

        assert!(DialogChoice::new("Got it").next_id.is_none());
    }

    #[test]
    fn test_tree_new() {
        let tree = DialogTree::new("Fuel", "explain_fuel_1");
        assert_eq!(tree.name, "Fuel");
        assert_eq!(tree.start_id, "explain_fuel_1");
    }
}
