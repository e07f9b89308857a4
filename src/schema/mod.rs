//! Schema module - Configuration and solution types for sketch runs.

mod config;
mod figure;

pub use config::*;
pub use figure::*;
