pub mod choropleth_view;
pub mod display;
pub mod scatter_view;

pub use choropleth_view::*;
pub use display::*;
pub use scatter_view::*;
