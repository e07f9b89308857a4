//! Pixel buffers used by the renderer.
//!
//! Images are `image::RgbImage`s. Masks are tiny-skia alpha masks filled
//! without anti-aliasing, so every byte is either 0 or 255.

use image::{Rgb, RgbImage};
use tiny_skia as sk;

/// Mask byte for a selected pixel.
const SELECTED: u8 = u8::MAX;

/// A three-channel, 8-bit image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbBuffer {
    image: RgbImage,
}

impl RgbBuffer {
    /// Black image of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            image: RgbImage::new(width as u32, height as u32),
        }
    }

    /// Image where every pixel has `color`.
    pub fn filled(width: usize, height: usize, color: [u8; 3]) -> Self {
        Self {
            image: RgbImage::from_pixel(width as u32, height as u32, Rgb(color)),
        }
    }

    /// Wrap raw RGB bytes. Returns `None` if the length does not match.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        if data.len() != width * height * 3 {
            return None;
        }
        RgbImage::from_raw(width as u32, height as u32, data).map(Self::from)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.image.width() as usize
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.image.height() as usize
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width() * self.height()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixel_count() == 0
    }

    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.image.into_raw()
    }

    pub fn as_image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Color at column `x`, row `y`.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        self.image.get_pixel(x as u32, y as u32).0
    }

    /// Set every pixel to `color`.
    pub fn fill(&mut self, color: [u8; 3]) {
        for px in self.image.pixels_mut() {
            *px = Rgb(color);
        }
    }

    /// Per-channel mean over the pixels selected by `mask`, truncated to
    /// bytes. An empty selection yields black.
    pub fn mean_color(&self, mask: &Mask) -> [u8; 3] {
        debug_assert_eq!(mask.len(), self.pixel_count());

        let mut sums = [0u64; 3];
        let mut count = 0u64;
        for (px, &m) in self.image.pixels().zip(mask.as_raw()) {
            if m != 0 {
                for (sum, &c) in sums.iter_mut().zip(&px.0) {
                    *sum += c as u64;
                }
                count += 1;
            }
        }

        if count == 0 {
            return [0, 0, 0];
        }
        sums.map(|sum| (sum / count) as u8)
    }

    /// Paint `color` on the pixels selected by `mask`, leaving the rest.
    pub fn paint_masked(&mut self, mask: &Mask, color: [u8; 3]) {
        debug_assert_eq!(mask.len(), self.pixel_count());

        for (px, &m) in self.image.pixels_mut().zip(mask.as_raw()) {
            if m != 0 {
                *px = Rgb(color);
            }
        }
    }

    /// Mean over pixels of the summed per-channel absolute difference.
    pub fn mean_abs_diff(&self, other: &RgbBuffer) -> f64 {
        debug_assert_eq!(self.as_raw().len(), other.as_raw().len());
        if self.is_empty() {
            return 0.0;
        }

        let total: u64 = self
            .as_raw()
            .iter()
            .zip(other.as_raw())
            .map(|(&a, &b)| a.abs_diff(b) as u64)
            .sum();
        total as f64 / self.pixel_count() as f64
    }
}

impl From<RgbImage> for RgbBuffer {
    fn from(image: RgbImage) -> Self {
        Self { image }
    }
}

/// A binary pixel selection.
#[derive(Clone)]
pub struct Mask {
    width: usize,
    height: usize,
    /// `None` when a side is zero; tiny-skia has no empty masks.
    inner: Option<sk::Mask>,
}

impl std::fmt::Debug for Mask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mask")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("selected", &self.count())
            .finish()
    }
}

impl Mask {
    /// Empty mask (nothing selected).
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            inner: sk::Mask::new(width as u32, height as u32),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_raw(&self) -> &[u8] {
        match &self.inner {
            Some(mask) => mask.data(),
            None => &[],
        }
    }

    fn as_raw_mut(&mut self) -> &mut [u8] {
        match &mut self.inner {
            Some(mask) => mask.data_mut(),
            None => &mut [],
        }
    }

    /// Deselect every pixel.
    pub fn clear(&mut self) {
        self.as_raw_mut().fill(0);
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.as_raw()[y * self.width + x] != 0
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize) {
        let width = self.width;
        self.as_raw_mut()[y * width + x] = SELECTED;
    }

    /// Select the pixels whose centers fall inside `path`, in pixel
    /// coordinates. Pixels outside the path keep their state.
    pub fn fill_path(&mut self, path: &sk::Path) {
        if let Some(mask) = &mut self.inner {
            mask.fill_path(path, sk::FillRule::Winding, false, sk::Transform::identity());
        }
    }

    /// Add every pixel selected in `other`.
    pub fn union_with(&mut self, other: &Mask) {
        debug_assert_eq!(self.len(), other.len());
        for (a, &b) in self.as_raw_mut().iter_mut().zip(other.as_raw()) {
            *a |= b;
        }
    }

    /// Swap selected and unselected pixels.
    pub fn invert(&mut self) {
        for m in self.as_raw_mut() {
            *m = if *m == 0 { SELECTED } else { 0 };
        }
    }

    /// Number of selected pixels.
    pub fn count(&self) -> usize {
        self.as_raw().iter().filter(|&&m| m != 0).count()
    }
}

/// Scratch buffers for rendering, sized to one target image.
///
/// Acquired once per optimization run and handed to the objective, which
/// resets each buffer before use.
#[derive(Debug, Clone)]
pub struct RenderScratch {
    pub(crate) canvas: RgbBuffer,
    pub(crate) mask: Mask,
    pub(crate) coverage: Mask,
}

impl RenderScratch {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            canvas: RgbBuffer::new(width, height),
            mask: Mask::new(width, height),
            coverage: Mask::new(width, height),
        }
    }

    /// Scratch sized to match `target`.
    pub fn for_target(target: &RgbBuffer) -> Self {
        Self::new(target.width(), target.height())
    }

    pub fn fits(&self, target: &RgbBuffer) -> bool {
        self.canvas.width() == target.width() && self.canvas.height() == target.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_checks_length() {
        assert!(RgbBuffer::from_raw(2, 2, vec![0; 12]).is_some());
        assert!(RgbBuffer::from_raw(2, 2, vec![0; 11]).is_none());
        // image accepts oversized buffers; a target must match exactly.
        assert!(RgbBuffer::from_raw(2, 2, vec![0; 13]).is_none());
    }

    #[test]
    fn test_wraps_rgb_image() {
        let image = RgbImage::from_pixel(3, 2, Rgb([4, 5, 6]));
        let buffer = RgbBuffer::from(image.clone());

        assert_eq!(buffer.width(), 3);
        assert_eq!(buffer.height(), 2);
        assert_eq!(buffer, RgbBuffer::filled(3, 2, [4, 5, 6]));
        assert_eq!(buffer.as_image(), &image);
        assert_eq!(buffer.into_image(), image);
    }

    #[test]
    fn test_mean_color_truncates() {
        let img = RgbBuffer::from_raw(2, 1, vec![10, 0, 255, 11, 1, 254]).unwrap();
        let mut mask = Mask::new(2, 1);
        mask.set(0, 0);
        mask.set(1, 0);

        // (10 + 11) / 2 = 10.5 -> 10
        assert_eq!(img.mean_color(&mask), [10, 0, 254]);
    }

    #[test]
    fn test_mean_color_empty_mask_is_black() {
        let img = RgbBuffer::filled(3, 3, [90, 90, 90]);
        let mask = Mask::new(3, 3);
        assert_eq!(img.mean_color(&mask), [0, 0, 0]);
    }

    #[test]
    fn test_paint_masked_leaves_rest() {
        let mut img = RgbBuffer::filled(2, 2, [1, 2, 3]);
        let mut mask = Mask::new(2, 2);
        mask.set(1, 1);
        img.paint_masked(&mask, [9, 9, 9]);

        assert_eq!(img.pixel(1, 1), [9, 9, 9]);
        assert_eq!(img.pixel(0, 0), [1, 2, 3]);
        assert_eq!(img.pixel(1, 0), [1, 2, 3]);
    }

    #[test]
    fn test_mean_abs_diff() {
        let a = RgbBuffer::filled(2, 2, [10, 20, 30]);
        let b = RgbBuffer::filled(2, 2, [20, 10, 30]);
        assert_eq!(a.mean_abs_diff(&b), 20.0);
        assert_eq!(a.mean_abs_diff(&a), 0.0);
    }

    #[test]
    fn test_mask_union_and_invert() {
        let mut a = Mask::new(3, 1);
        let mut b = Mask::new(3, 1);
        a.set(0, 0);
        b.set(2, 0);
        a.union_with(&b);
        assert_eq!(a.count(), 2);

        a.invert();
        assert!(a.get(1, 0));
        assert!(!a.get(0, 0));
        assert_eq!(a.count(), 1);
    }

    #[test]
    fn test_fill_path_selects_pixel_centers() {
        let mut mask = Mask::new(6, 4);
        mask.set(0, 0);

        // Covers the centers of columns 1..=3 on rows 1..=2.
        let rect = sk::Rect::from_xywh(1.0, 1.0, 3.0, 2.0).unwrap();
        mask.fill_path(&sk::PathBuilder::from_rect(rect));

        assert_eq!(mask.count(), 7);
        assert!(mask.get(0, 0));
        assert!(mask.get(1, 1) && mask.get(3, 2));
        assert!(!mask.get(4, 1) && !mask.get(1, 3));
    }

    #[test]
    fn test_empty_mask() {
        let mut mask = Mask::new(0, 5);
        assert!(mask.is_empty());
        assert_eq!(mask.as_raw(), &[] as &[u8]);
        mask.invert();
        mask.clear();
        assert_eq!(mask.count(), 0);
    }
}
