//! TOML representation of a content module.
//!
//! ```toml
//! [trees.level_fuel_part_one]
//! name = "Fuel"
//! start_id = "explain_fuel_1"
//!
//! [nodes.explain_fuel_1]
//! text = "Your rover burns fuel with every move."
//! next_id = "explain_fuel_2"
//!
//! [nodes.explain_fuel_2]
//! text = "Grab a fuel cell before you run dry."
//! choice_ids = ["ack_fuel"]
//!
//! [choices.ack_fuel]
//! text = "Got it!"
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use super::ContentModule;
use crate::error::ContentError;
use crate::ids::{ChoiceId, NodeId, TreeId};
use crate::model::{DialogChoice, DialogNode, DialogTree};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModuleFile {
    #[serde(default)]
    nodes: BTreeMap<NodeId, DialogNode>,

    #[serde(default)]
    choices: BTreeMap<ChoiceId, DialogChoice>,

    #[serde(default)]
    trees: BTreeMap<TreeId, DialogTree>,
}

impl ContentModule {
    /// Parse a module from TOML text.
    pub fn from_toml_str(name: impl Into<String>, text: &str) -> Result<Self, ContentError> {
        let name = name.into();
        let file: ModuleFile = toml::from_str(text).map_err(|source| ContentError::Parse {
            module: name.clone(),
            source,
        })?;

        debug!(
            module = %name,
            nodes = file.nodes.len(),
            choices = file.choices.len(),
            trees = file.trees.len(),
            "Parsed content module"
        );

        Ok(Self {
            name,
            nodes: file.nodes,
            choices: file.choices,
            trees: file.trees,
        })
    }

    /// Load a module from a TOML file. The module is named after the file stem.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ContentError> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| ContentError::UnnamedModule(path.to_path_buf()))?;

        let text = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(name, &text)
    }
}
