//! Errors raised while loading or authoring content modules.

use std::path::PathBuf;

use thiserror::Error;

use crate::ids::EntryKind;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("failed to read content file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("content module '{module}' is not valid TOML: {source}")]
    Parse {
        module: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("content module '{module}' defines {kind} '{id}' twice")]
    DuplicateKey {
        module: String,
        kind: EntryKind,
        id: String,
    },

    #[error("content file {0} has no usable module name")]
    UnnamedModule(PathBuf),
}
