pub mod dataset;
pub mod series;

pub use dataset::*;
pub use series::*;
