pub mod config;
pub mod coordinator;
pub mod focus;

pub use config::*;
pub use coordinator::*;
pub use focus::*;
