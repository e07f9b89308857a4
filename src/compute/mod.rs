//! Compute module - Search strategies, rendering and scoring.

mod objective;
mod primitive;
mod raster;
mod search;
mod sketch;

pub use objective::*;
pub use primitive::*;
pub use raster::*;
pub use search::*;
pub use sketch::*;
