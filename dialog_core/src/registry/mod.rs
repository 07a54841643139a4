//! Registries - id-keyed arenas holding all merged content.
//!
//! Records refer to each other by id, so every lookup is an explicit,
//! fallible step. Registries only grow through [`Registry::merge`], which is
//! called while content is assembled and never afterwards.

mod library;

pub use library::*;

use dialog_content::{ChoiceId, ContentId, DialogChoice, DialogNode, DialogTree, NodeId, TreeId};
use std::borrow::Borrow;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::error::{DialogError, Result};

pub type NodeRegistry = Registry<NodeId, DialogNode>;
pub type ChoiceRegistry = Registry<ChoiceId, DialogChoice>;
pub type TreeRegistry = Registry<TreeId, DialogTree>;

#[derive(Debug, Clone)]
struct Registered<V> {
    value: V,
    /// Content module that defined this entry.
    module: String,
}

/// An id-keyed store of one kind of content record.
#[derive(Debug, Clone)]
pub struct Registry<K, V> {
    entries: BTreeMap<K, Registered<V>>,
}

impl<K, V> Default for Registry<K, V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<K: ContentId, V> Registry<K, V> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an entry, failing with `NotFound` if it is absent.
    pub fn get<Q>(&self, id: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Ord + std::fmt::Display + ?Sized,
    {
        self.find(id).ok_or_else(|| DialogError::NotFound {
            kind: K::KIND,
            id: id.to_string(),
        })
    }

    /// Look up an entry.
    pub fn find<Q>(&self, id: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.entries.get(id).map(|entry| &entry.value)
    }

    pub fn has<Q>(&self, id: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.entries.contains_key(id)
    }

    /// Name of the module that defined an entry.
    pub fn module_of<Q>(&self, id: &Q) -> Option<&str>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.entries.get(id).map(|entry| entry.module.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + Clone + '_ {
        self.entries.iter().map(|(id, entry)| (id, &entry.value))
    }

    /// Iterate over all ids in order.
    pub fn ids(&self) -> impl Iterator<Item = &K> + Clone + '_ {
        self.entries.keys()
    }

    /// Check that none of `ids` is already registered or repeated.
    pub fn check_merge<'a, I>(&self, module: &str, ids: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        let mut incoming: BTreeMap<&K, ()> = BTreeMap::new();
        for id in ids {
            if let Some(existing) = self.entries.get(id) {
                return Err(duplicate::<K>(id, module, &existing.module));
            }
            if incoming.insert(id, ()).is_some() {
                return Err(duplicate::<K>(id, module, module));
            }
        }
        Ok(())
    }

    /// Merge a module's entries. Either every entry is added or, on a
    /// collision with any previously merged module, none is.
    pub fn merge<I>(&mut self, module: &str, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let entries: Vec<(K, V)> = entries.into_iter().collect();
        self.check_merge(module, entries.iter().map(|(id, _)| id))?;

        for (id, value) in entries {
            if let Entry::Vacant(slot) = self.entries.entry(id) {
                slot.insert(Registered {
                    value,
                    module: module.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Registry<TreeId, DialogTree> {
    /// `(tree id, name)` pairs in id order, for journal and menu screens.
    ///
    /// The iterator is lazy and finite; clone it (or call again) to restart.
    pub fn list_trees(&self) -> impl Iterator<Item = (&TreeId, &str)> + Clone + '_ {
        self.iter().map(|(id, tree)| (id, tree.name.as_str()))
    }
}

fn duplicate<K: ContentId>(id: &K, module: &str, existing_module: &str) -> DialogError {
    DialogError::DuplicateId {
        kind: K::KIND,
        id: id.to_string(),
        module: module.to_string(),
        existing_module: existing_module.to_string(),
    }
}
