//! Functions, macros, types, and whatever else comes along, which are required by
//! more than one of the tools in this workspace.
//!
pub mod command_helpers;
pub mod macros;
pub mod rules;
pub mod spec_helper;
pub mod types;

// Re-exported so the output macros work in crates which don't depend on colored.
pub use colored;
