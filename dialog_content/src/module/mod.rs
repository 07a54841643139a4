//! Content modules - the unit in which narrative is authored.
//!
//! Each module defines a disjoint slice of nodes, choices and trees. Modules
//! are merged into the running registries once, at content-load time.

mod toml_format;

use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::error::ContentError;
use crate::ids::{ChoiceId, ContentId, NodeId, TreeId};
use crate::model::{DialogChoice, DialogNode, DialogTree};

/// One narrative unit's worth of content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentModule {
    /// Module name, used to attribute collisions during assembly.
    pub name: String,

    pub nodes: BTreeMap<NodeId, DialogNode>,

    pub choices: BTreeMap<ChoiceId, DialogChoice>,

    pub trees: BTreeMap<TreeId, DialogTree>,
}

impl ContentModule {
    /// Create an empty module.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a node, replacing any node with the same id.
    pub fn with_node(mut self, id: impl Into<NodeId>, node: DialogNode) -> Self {
        self.nodes.insert(id.into(), node);
        self
    }

    /// Add a choice, replacing any choice with the same id.
    pub fn with_choice(mut self, id: impl Into<ChoiceId>, choice: DialogChoice) -> Self {
        self.choices.insert(id.into(), choice);
        self
    }

    /// Add a tree, replacing any tree with the same id.
    pub fn with_tree(mut self, id: impl Into<TreeId>, tree: DialogTree) -> Self {
        self.trees.insert(id.into(), tree);
        self
    }

    /// Add a node, failing if the id is already defined in this module.
    pub fn try_with_node(
        mut self,
        id: impl Into<NodeId>,
        node: DialogNode,
    ) -> Result<Self, ContentError> {
        insert_unique(&self.name, &mut self.nodes, id.into(), node)?;
        Ok(self)
    }

    /// Add a choice, failing if the id is already defined in this module.
    pub fn try_with_choice(
        mut self,
        id: impl Into<ChoiceId>,
        choice: DialogChoice,
    ) -> Result<Self, ContentError> {
        insert_unique(&self.name, &mut self.choices, id.into(), choice)?;
        Ok(self)
    }

    /// Add a tree, failing if the id is already defined in this module.
    pub fn try_with_tree(
        mut self,
        id: impl Into<TreeId>,
        tree: DialogTree,
    ) -> Result<Self, ContentError> {
        insert_unique(&self.name, &mut self.trees, id.into(), tree)?;
        Ok(self)
    }

    /// Total number of records defined by this module.
    pub fn len(&self) -> usize {
        self.nodes.len() + self.choices.len() + self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn insert_unique<K: ContentId, V>(
    module: &str,
    map: &mut BTreeMap<K, V>,
    id: K,
    value: V,
) -> Result<(), ContentError> {
    match map.entry(id) {
        Entry::Occupied(entry) => Err(ContentError::DuplicateKey {
            module: module.to_string(),
            kind: K::KIND,
            id: entry.key().to_string(),
        }),
        Entry::Vacant(entry) => {
            entry.insert(value);
            Ok(())
        }
    }
}
