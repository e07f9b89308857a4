//! Image approximation objective.
//!
//! A solution is rendered with the painter's algorithm: each figure, in
//! order, is filled with the target's mean color over the figure's area,
//! overwriting whatever lies beneath. Pixels no figure touches form the
//! background and are filled with the target's mean color over that area.
//! The score is the mean per-pixel sum of absolute channel differences
//! between the rendering and the target; 0 means an exact reproduction.

use super::primitive::Primitive;
use super::raster::{RenderScratch, RgbBuffer};

/// Scores solutions against a fixed target image.
///
/// Owns the scratch buffers for one run. Not shareable between concurrent
/// searches; give each search its own objective.
pub struct ImageObjective<'a> {
    target: &'a RgbBuffer,
    scratch: RenderScratch,
}

impl<'a> ImageObjective<'a> {
    /// Create an objective with freshly allocated scratch buffers.
    pub fn new(target: &'a RgbBuffer) -> Self {
        Self {
            target,
            scratch: RenderScratch::for_target(target),
        }
    }

    /// Create an objective reusing `scratch`. Buffers of the wrong size are
    /// reallocated.
    pub fn with_scratch(target: &'a RgbBuffer, scratch: RenderScratch) -> Self {
        let scratch = if scratch.fits(target) {
            scratch
        } else {
            RenderScratch::for_target(target)
        };
        Self { target, scratch }
    }

    /// Release the scratch buffers for another run.
    pub fn into_scratch(self) -> RenderScratch {
        self.scratch
    }

    pub fn target(&self) -> &RgbBuffer {
        self.target
    }

    /// The most recent rendering.
    pub fn canvas(&self) -> &RgbBuffer {
        &self.scratch.canvas
    }

    /// Render `figures` in order and return the canvas.
    pub fn render<F: Primitive>(&mut self, figures: &[F]) -> &RgbBuffer {
        let target = self.target;
        let RenderScratch {
            canvas,
            mask,
            coverage,
        } = &mut self.scratch;

        canvas.fill([0, 0, 0]);
        coverage.clear();

        for figure in figures {
            mask.clear();
            figure.rasterize(mask);
            let color = target.mean_color(mask);
            canvas.paint_masked(mask, color);
            coverage.union_with(mask);
        }

        coverage.invert();
        let background = target.mean_color(coverage);
        canvas.paint_masked(coverage, background);

        canvas
    }

    /// Render `figures` and return the dissimilarity to the target.
    pub fn score<F: Primitive>(&mut self, figures: &[F]) -> f64 {
        let target = self.target;
        self.render(figures).mean_abs_diff(target)
    }
}
