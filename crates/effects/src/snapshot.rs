//! PNG output of a [`RasterSurface`].
//!
//! Feature-gated behind `png` (default on) so the WASM build can depend on
//! this crate without pulling in `image`.

use std::path::Path;

use log::debug;
use voicefx_core::error::FxError;
use voicefx_core::Surface;

use crate::raster::RasterSurface;

/// Writes the surface's pixels as a PNG file.
///
/// Returns `FxError::InvalidDimensions` if the size does not fit in `u32`,
/// or `FxError::Io` on encode/write failure.
pub fn write_png(surface: &RasterSurface, path: &Path) -> Result<(), FxError> {
    let (width, height) = surface.size();
    let w = u32::try_from(width).map_err(|_| FxError::InvalidDimensions)?;
    let h = u32::try_from(height).map_err(|_| FxError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, surface.as_rgba().to_vec())
        .ok_or_else(|| FxError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| FxError::Io(e.to_string()))?;
    debug!("wrote {width}x{height} snapshot to {}", path.display());
    Ok(())
}
