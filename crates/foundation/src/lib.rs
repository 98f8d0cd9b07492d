//! Identifier and time primitives shared by every crate in the workspace.

pub mod ids;
pub mod time;

pub use ids::*;
pub use time::*;
