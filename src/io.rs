//! Loading targets and writing results.
//!
//! Decoding and encoding go through the `image` crate; the format follows
//! the file extension.

use std::fs;
use std::path::Path;

use crate::compute::{RgbBuffer, SketchError};
use crate::schema::{Sketch, SketchConfig};

/// Decode an image file into an RGB target.
pub fn load_target<P: AsRef<Path>>(path: P) -> Result<RgbBuffer, SketchError> {
    let path = path.as_ref();
    let image = image::open(path)?.to_rgb8();
    if image.width() == 0 || image.height() == 0 {
        return Err(SketchError::EmptyTarget);
    }

    log::debug!("Loaded {} ({}x{})", path.display(), image.width(), image.height());
    Ok(RgbBuffer::from(image))
}

/// Encode `canvas` to `path`.
pub fn save_canvas<P: AsRef<Path>>(path: P, canvas: &RgbBuffer) -> Result<(), SketchError> {
    canvas.as_image().save(path.as_ref())?;
    log::debug!("Wrote {}", path.as_ref().display());
    Ok(())
}

/// Write a sketch as pretty-printed JSON.
pub fn save_sketch_json<P, F>(path: P, sketch: &Sketch<F>) -> Result<(), SketchError>
where
    P: AsRef<Path>,
    F: serde::Serialize,
{
    let json = serde_json::to_string_pretty(sketch)?;
    fs::write(path, json)?;
    Ok(())
}

/// Read a sketch previously written by [`save_sketch_json`].
pub fn load_sketch_json<P, F>(path: P) -> Result<Sketch<F>, SketchError>
where
    P: AsRef<Path>,
    F: serde::de::DeserializeOwned,
{
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Read a JSON configuration file. Missing fields take their defaults.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SketchConfig, SketchError> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}
