//! # Dialog Core
//!
//! The dialog tree engine behind the game's tutorial and story sequences.
//! Content from `dialog_content` is merged into read-only registries, walked
//! one immutable session snapshot at a time, and checked offline by the
//! validator before it ships.
//!
//! ## Core Components
//!
//! - **registry**: Id-keyed node, choice and tree registries and library assembly
//! - **engine**: Sessions and the start/advance/choose traversal
//! - **validator**: Dangling-reference, loop and reachability checks
//!
//! ## Design Philosophy
//!
//! - **Explicit Resolution**: Links are ids; every lookup can fail and says so
//! - **Assemble Once**: Registries are only written while content loads
//! - **Value Sessions**: Transitions return new sessions, old ones stay valid

pub mod engine;
pub mod error;
pub mod registry;
pub mod validator;

pub use engine::*;
pub use error::*;
pub use registry::*;
pub use validator::*;
