//! CodeGame project handling.
//!
//! ## Modules
//!
//! - [`descriptor`] - `.codegame.json` reading, writing and discovery
//! - [`scaffold`] - Project directory creation
//!
//! ## Key Types
//!
//! - [`CodeGameFile`] - The project descriptor

pub mod descriptor;
pub mod scaffold;

pub use descriptor::{CodeGameFile, find_project_root};
pub use scaffold::create_project_dir;
