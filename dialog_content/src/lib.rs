//! # Dialog Content
//!
//! The data side of the dialog system: identifiers, the node/choice/tree
//! model, content modules and the game's built-in narrative. This crate holds
//! no traversal logic.
//!
//! ## Core Components
//!
//! - **ids**: Typed identifiers, one namespace per registry
//! - **model**: `DialogNode`, `DialogChoice`, `DialogTree`
//! - **module**: `ContentModule`, the unit of authoring, and its TOML format
//! - **builtin**: The narrative modules shipped with the game

pub mod builtin;
pub mod error;
pub mod ids;
pub mod model;
pub mod module;

pub use error::*;
pub use ids::*;
pub use model::*;
pub use module::*;
