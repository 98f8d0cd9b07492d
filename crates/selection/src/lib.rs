pub mod error;
pub mod state;
pub mod transition;

pub use error::*;
pub use state::*;
pub use transition::*;
