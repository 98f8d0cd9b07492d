pub mod analysis;
pub mod error;
pub mod ingest;
pub mod record;
pub mod store;

pub use analysis::*;
pub use error::*;
pub use record::*;
pub use store::*;
