//! Figure and solution types.

use serde::{Deserialize, Serialize};

/// A filled circle in pixel coordinates.
///
/// The center may lie outside the image; only the overlap is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circle {
    /// Center column.
    pub x: i32,
    /// Center row.
    pub y: i32,
    /// Radius in pixels (at least 1).
    pub radius: i32,
}

impl Circle {
    pub fn new(x: i32, y: i32, radius: i32) -> Self {
        Self { x, y, radius }
    }
}

/// An ordered list of figures. Later figures are drawn over earlier ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sketch<F> {
    pub figures: Vec<F>,
}

impl<F> Sketch<F> {
    pub fn new(figures: Vec<F>) -> Self {
        Self { figures }
    }

    pub fn empty() -> Self {
        Self {
            figures: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.figures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }
}

impl<F> From<Vec<F>> for Sketch<F> {
    fn from(figures: Vec<F>) -> Self {
        Self { figures }
    }
}

impl<F> AsRef<[F]> for Sketch<F> {
    fn as_ref(&self) -> &[F] {
        &self.figures
    }
}
