//! Library assembly - merging content modules into one read-only set of
//! registries.

use dialog_content::{builtin, ContentModule, DialogChoice, DialogNode, DialogTree};
use tracing::{debug, info};

use super::{ChoiceRegistry, NodeRegistry, TreeRegistry};
use crate::error::Result;

/// The merged node, choice and tree registries.
///
/// Built once through [`LibraryBuilder`] and read-only afterwards, so it can
/// be shared between any number of concurrent readers.
#[derive(Debug, Clone, Default)]
pub struct DialogLibrary {
    nodes: NodeRegistry,
    choices: ChoiceRegistry,
    trees: TreeRegistry,
    modules: Vec<String>,
}

impl DialogLibrary {
    /// Start assembling a library.
    pub fn builder() -> LibraryBuilder {
        LibraryBuilder::default()
    }

    /// Merge all modules in order into a new library.
    pub fn assemble(modules: impl IntoIterator<Item = ContentModule>) -> Result<Self> {
        let mut builder = Self::builder();
        for module in modules {
            builder.merge(module)?;
        }
        Ok(builder.build())
    }

    /// Assemble the game's built-in narrative content.
    pub fn builtin() -> Result<Self> {
        Self::assemble(builtin::modules()?)
    }

    pub fn nodes(&self) -> &NodeRegistry {
        &self.nodes
    }

    pub fn choices(&self) -> &ChoiceRegistry {
        &self.choices
    }

    pub fn trees(&self) -> &TreeRegistry {
        &self.trees
    }

    /// Names of the merged modules, in merge order.
    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    pub fn node(&self, id: &str) -> Result<&DialogNode> {
        self.nodes.get(id)
    }

    pub fn choice(&self, id: &str) -> Result<&DialogChoice> {
        self.choices.get(id)
    }

    pub fn tree(&self, id: &str) -> Result<&DialogTree> {
        self.trees.get(id)
    }
}

/// The assembly stage of a [`DialogLibrary`]. This is the only place content
/// can be added.
#[derive(Debug, Default)]
pub struct LibraryBuilder {
    library: DialogLibrary,
}

impl LibraryBuilder {
    /// Merge one content module.
    ///
    /// All ids are checked against every previously merged module before
    /// anything is inserted, so a module is merged completely or not at all.
    pub fn merge(&mut self, module: ContentModule) -> Result<&mut Self> {
        let library = &mut self.library;
        let name = module.name.as_str();

        library.nodes.check_merge(name, module.nodes.keys())?;
        library.choices.check_merge(name, module.choices.keys())?;
        library.trees.check_merge(name, module.trees.keys())?;

        debug!(
            module = %name,
            nodes = module.nodes.len(),
            choices = module.choices.len(),
            trees = module.trees.len(),
            "Merging content module"
        );

        library.nodes.merge(name, module.nodes)?;
        library.choices.merge(name, module.choices)?;
        library.trees.merge(name, module.trees)?;
        library.modules.push(module.name);

        Ok(self)
    }

    /// Chaining form of [`LibraryBuilder::merge`].
    pub fn with_module(mut self, module: ContentModule) -> Result<Self> {
        self.merge(module)?;
        Ok(self)
    }

    /// Freeze the merged content.
    pub fn build(self) -> DialogLibrary {
        let library = self.library;
        info!(
            modules = library.modules.len(),
            nodes = library.nodes.len(),
            choices = library.choices.len(),
            trees = library.trees.len(),
            "Dialog library assembled"
        );
        library
    }
}
