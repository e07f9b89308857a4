//! Circle Sketch - approximate an image with a handful of flat-colored circles.
//!
//! The crate pairs a generic stochastic local-search engine with an image
//! objective that renders candidate circle lists and scores them against a
//! target picture.
//!
//! # Architecture
//!
//! - `schema`: Configuration and solution types (serde-serializable)
//! - `compute`: Search strategies, primitives, rendering and scoring
//! - `io`: Loading targets and saving renderings
//!
//! # Example
//!
//! ```rust,no_run
//! use circle_sketch::{RgbBuffer, SketchConfig, SketchEngine};
//!
//! let target = RgbBuffer::filled(64, 48, [200, 120, 40]);
//! let config = SketchConfig {
//!     evaluations: 500,
//!     random_seed: Some(7),
//!     ..Default::default()
//! };
//!
//! let mut engine = SketchEngine::new(config, &target).unwrap();
//! let result = engine.run();
//! println!("score {:.3} with {} circles", result.score, result.sketch.len());
//! ```

pub mod compute;
pub mod io;
pub mod schema;

// Re-export commonly used types
pub use compute::{
    ImageObjective, RgbBuffer, SketchEngine, SketchError, SketchResult, hill_climbing,
    hill_climbing_with_restarts, random_search,
};
pub use schema::{Circle, SearchAlgorithm, Sketch, SketchConfig};
