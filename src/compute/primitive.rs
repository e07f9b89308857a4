//! Primitive shapes and the random generators the search consumes.
//!
//! The renderer only needs a primitive to mark its pixels in a mask, and the
//! search only needs fresh or perturbed primitives. Anything implementing
//! [`Primitive`] can be sketched with.

use rand::Rng;
use tiny_skia as sk;

use super::raster::Mask;
use crate::schema::{Circle, Sketch};

/// Capability set for a drawable figure.
pub trait Primitive: Clone {
    /// Parameters for random generation (image size, size limits).
    type Params;

    /// Mark the figure's pixels in `mask`. Pixels outside the figure are
    /// left as they are.
    fn rasterize(&self, mask: &mut Mask);

    /// Draw an independent random figure.
    fn random<R: Rng + ?Sized>(rng: &mut R, params: &Self::Params) -> Self;

    /// Localized replacement for this figure. Defaults to a fresh draw.
    fn perturb<R: Rng + ?Sized>(&self, rng: &mut R, params: &Self::Params) -> Self {
        Self::random(rng, params)
    }
}

/// Generation bounds for random circles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircleParams {
    pub width: usize,
    pub height: usize,
    /// Lower bound of the diameter draw.
    pub min_diameter: i32,
}

impl CircleParams {
    pub fn new(width: usize, height: usize, min_diameter: i32) -> Self {
        Self {
            width,
            height,
            min_diameter,
        }
    }
}

impl Primitive for Circle {
    type Params = CircleParams;

    fn rasterize(&self, mask: &mut Mask) {
        if self.radius <= 0 {
            return;
        }

        // Fully off-image: skip the path work.
        let (w, h) = (mask.width() as i64, mask.height() as i64);
        let (cx, cy, r) = (self.x as i64, self.y as i64, self.radius as i64);
        if cx + r < 0 || cy + r < 0 || cx - r >= w || cy - r >= h {
            return;
        }

        // Pixel (x, y) spans [x, x + 1), so the disc is centered on its middle.
        let path = sk::PathBuilder::from_circle(
            self.x as f32 + 0.5,
            self.y as f32 + 0.5,
            self.radius as f32,
        );
        if let Some(path) = path {
            mask.fill_path(&path);
        }
    }

    /// Diameter is uniform in `[min_diameter, max(width, height)]`; the
    /// center may fall up to half a radius outside the image.
    fn random<R: Rng + ?Sized>(rng: &mut R, params: &CircleParams) -> Self {
        let min_diameter = params.min_diameter.max(1);
        let longest = params.width.max(params.height) as i32;
        let diameter = rng.gen_range(min_diameter..=longest.max(min_diameter));
        let radius = (diameter / 2).max(1);

        let margin = radius / 2;
        let x = rng.gen_range(-margin..=params.width as i32 + margin);
        let y = rng.gen_range(-margin..=params.height as i32 + margin);

        Circle { x, y, radius }
    }
}

/// A sketch of `1..=max_figures` independent random figures.
pub fn random_sketch<F, R>(rng: &mut R, params: &F::Params, max_figures: usize) -> Sketch<F>
where
    F: Primitive,
    R: Rng + ?Sized,
{
    let count = rng.gen_range(1..=max_figures.max(1));
    let figures = (0..count).map(|_| F::random(rng, params)).collect();
    Sketch::new(figures)
}

/// Copy of `sketch` with exactly one randomly chosen figure perturbed.
///
/// Draw order is kept. An empty sketch gains a single figure.
pub fn neighbor_sketch<F, R>(rng: &mut R, params: &F::Params, sketch: &Sketch<F>) -> Sketch<F>
where
    F: Primitive,
    R: Rng + ?Sized,
{
    let mut figures = sketch.figures.clone();
    if figures.is_empty() {
        figures.push(F::random(rng, params));
    } else {
        let idx = rng.gen_range(0..figures.len());
        figures[idx] = figures[idx].perturb(rng, params);
    }
    Sketch::new(figures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn mask_of(circle: Circle, width: usize, height: usize) -> Mask {
        let mut mask = Mask::new(width, height);
        circle.rasterize(&mut mask);
        mask
    }

    #[test]
    fn test_radius_one_marks_its_center() {
        let mask = mask_of(Circle::new(2, 2, 1), 5, 5);
        assert!(mask.get(2, 2));
        assert!((1..=5).contains(&mask.count()));
        assert!(!mask.get(1, 1) && !mask.get(3, 3));
    }

    #[test]
    fn test_disc_extent() {
        let mask = mask_of(Circle::new(20, 20, 10), 41, 41);

        // Area of a radius-10 disc is about 314 pixels.
        assert!((290..=340).contains(&mask.count()), "{}", mask.count());
        assert!(mask.get(20, 20));
        assert!(mask.get(20, 12) && mask.get(28, 20) && mask.get(12, 20));
        assert!(!mask.get(20, 8) && !mask.get(32, 20));
        assert!(!mask.get(28, 28));
    }

    #[test]
    fn test_large_circle_covers_image() {
        let mask = mask_of(Circle::new(2, 2, 10), 4, 4);
        assert_eq!(mask.count(), 16);
    }

    #[test]
    fn test_clipped_at_corner() {
        // Quarter disc of radius 2 centered on the origin.
        let mask = mask_of(Circle::new(0, 0, 2), 6, 6);
        assert!(mask.get(0, 0) && mask.get(1, 0) && mask.get(0, 1) && mask.get(1, 1));
        assert!(!mask.get(2, 1) && !mask.get(1, 2) && !mask.get(2, 2));
        assert!((4..=6).contains(&mask.count()));
    }

    #[test]
    fn test_zero_radius_marks_nothing() {
        let mask = mask_of(Circle::new(3, 3, 0), 6, 6);
        assert_eq!(mask.count(), 0);
    }

    #[test]
    fn test_offscreen_circle_marks_nothing() {
        let mask = mask_of(Circle::new(-50, -50, 5), 8, 8);
        assert_eq!(mask.count(), 0);
        let mask = mask_of(Circle::new(100, 3, 5), 8, 8);
        assert_eq!(mask.count(), 0);
    }

    #[test]
    fn test_rasterize_adds_to_existing_mask() {
        let mut mask = Mask::new(10, 10);
        mask.set(9, 9);
        Circle::new(0, 0, 1).rasterize(&mut mask);
        assert!(mask.get(9, 9));
        assert!(mask.get(0, 0));
    }

    #[test]
    fn test_random_circle_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let params = CircleParams::new(64, 32, 10);

        for _ in 0..1000 {
            let c = Circle::random(&mut rng, &params);
            assert!(c.radius >= 5 && c.radius <= 32);
            let margin = c.radius / 2;
            assert!(c.x >= -margin && c.x <= 64 + margin);
            assert!(c.y >= -margin && c.y <= 32 + margin);
        }
    }

    #[test]
    fn test_random_circle_on_tiny_image() {
        let mut rng = StdRng::seed_from_u64(42);
        let params = CircleParams::new(4, 4, 10);

        for _ in 0..100 {
            let c = Circle::random(&mut rng, &params);
            assert_eq!(c.radius, 5);
        }

        let params = CircleParams::new(1, 1, 1);
        for _ in 0..100 {
            assert_eq!(Circle::random(&mut rng, &params).radius, 1);
        }
    }

    #[test]
    fn test_random_sketch_length() {
        let mut rng = StdRng::seed_from_u64(7);
        let params = CircleParams::new(20, 20, 4);

        for _ in 0..200 {
            let sketch: Sketch<Circle> = random_sketch(&mut rng, &params, 6);
            assert!((1..=6).contains(&sketch.len()));
        }

        let single: Sketch<Circle> = random_sketch(&mut rng, &params, 1);
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn test_neighbor_replaces_one_figure() {
        let mut rng = StdRng::seed_from_u64(7);
        let params = CircleParams::new(100, 100, 10);
        let original: Sketch<Circle> = random_sketch(&mut rng, &params, 8);
        let snapshot = original.clone();

        for _ in 0..50 {
            let next = neighbor_sketch(&mut rng, &params, &original);
            assert_eq!(next.len(), original.len());
            let changed = next
                .figures
                .iter()
                .zip(&original.figures)
                .filter(|(a, b)| a != b)
                .count();
            assert!(changed <= 1);
        }

        assert_eq!(original, snapshot);
    }

    #[test]
    fn test_neighbor_of_empty_sketch() {
        let mut rng = StdRng::seed_from_u64(7);
        let params = CircleParams::new(10, 10, 2);
        let next = neighbor_sketch(&mut rng, &params, &Sketch::<Circle>::empty());
        assert_eq!(next.len(), 1);
    }

    #[test]
    fn test_generation_is_seeded() {
        let params = CircleParams::new(50, 40, 10);
        let draw = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            random_sketch::<Circle, _>(&mut rng, &params, 10)
        };
        assert_eq!(draw(3), draw(3));
    }
}
