pub mod choropleth;
pub mod layer;
pub mod scatter;
pub mod symbology;

pub use choropleth::*;
pub use layer::*;
pub use scatter::*;
