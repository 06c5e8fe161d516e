//! CPU implementation of [`Surface`] over an RGBA8 buffer.
//!
//! Always available (no feature gate) so tests and the `png` snapshot path
//! share one rasterizer. Shapes are anti-aliased by a one-pixel coverage ramp
//! and alpha-blended over the existing pixels.

use glam::DVec2;
use voicefx_core::error::FxError;
use voicefx_core::{Hsla, Surface};

/// Dark page background, `#0b1020`.
pub const DEFAULT_BACKGROUND: [u8; 3] = [0x0b, 0x10, 0x20];

#[derive(Debug, Clone)]
pub struct RasterSurface {
    width: usize,
    height: usize,
    background: [u8; 3],
    pixels: Vec<u8>,
}

impl RasterSurface {
    /// Creates a surface filled with [`DEFAULT_BACKGROUND`].
    ///
    /// Returns `FxError::InvalidDimensions` if either side is zero or the
    /// buffer size overflows.
    pub fn new(width: usize, height: usize) -> Result<Self, FxError> {
        Self::with_background(width, height, DEFAULT_BACKGROUND)
    }

    pub fn with_background(
        width: usize,
        height: usize,
        background: [u8; 3],
    ) -> Result<Self, FxError> {
        if width == 0 || height == 0 {
            return Err(FxError::InvalidDimensions);
        }
        let len = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .ok_or(FxError::InvalidDimensions)?;
        let mut surface = Self {
            width,
            height,
            background,
            pixels: vec![0; len],
        };
        surface.clear();
        Ok(surface)
    }

    /// RGBA8 bytes, row-major, `width * height * 4` long.
    pub fn as_rgba(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = (y * self.width + x) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    fn blend(&mut self, x: usize, y: usize, rgb: [u8; 3], alpha: f64) {
        if alpha <= 0.0 {
            return;
        }
        let i = (y * self.width + x) * 4;
        for (c, &src) in rgb.iter().enumerate() {
            let dst = self.pixels[i + c] as f64;
            self.pixels[i + c] = (src as f64 * alpha + dst * (1.0 - alpha)).round() as u8;
        }
        self.pixels[i + 3] = 255;
    }

    /// Pixel index range covering `[lo, hi]` on an axis of length `len`.
    fn span(lo: f64, hi: f64, len: usize) -> std::ops::Range<usize> {
        let start = lo.floor().max(0.0) as usize;
        let end = (hi.ceil().max(0.0) as usize).min(len);
        start.min(end)..end
    }

    fn stroke_segment(&mut self, a: DVec2, b: DVec2, rgb: [u8; 3], alpha: f64, half_width: f64) {
        let pad = half_width + 1.0;
        let xs = Self::span(a.x.min(b.x) - pad, a.x.max(b.x) + pad, self.width);
        let ys = Self::span(a.y.min(b.y) - pad, a.y.max(b.y) + pad, self.height);
        for y in ys {
            for x in xs.clone() {
                let p = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                let coverage = (half_width + 0.5 - distance_to_segment(p, a, b)).clamp(0.0, 1.0);
                self.blend(x, y, rgb, alpha * coverage);
            }
        }
    }
}

fn distance_to_segment(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

impl Surface for RasterSurface {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        let [r, g, b] = self.background;
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&[r, g, b, 255]);
        }
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Hsla) {
        let rgb = color.to_rgb8();
        let pad = radius + 1.0;
        let xs = Self::span(center.x - pad, center.x + pad, self.width);
        let ys = Self::span(center.y - pad, center.y + pad, self.height);
        for y in ys {
            for x in xs.clone() {
                let p = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                let coverage = (radius + 0.5 - p.distance(center)).clamp(0.0, 1.0);
                self.blend(x, y, rgb, color.a * coverage);
            }
        }
    }

    fn stroke_polyline(&mut self, points: &[DVec2], color: Hsla, width: f64) {
        let rgb = color.to_rgb8();
        let half_width = (width / 2.0).max(0.0);
        for pair in points.windows(2) {
            self.stroke_segment(pair[0], pair[1], rgb, color.a, half_width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Hsla = Hsla {
        h: 0.0,
        s: 0.0,
        l: 1.0,
        a: 1.0,
    };

    #[test]
    fn new_rejects_zero_and_overflowing_sizes() {
        assert!(RasterSurface::new(0, 10).is_err());
        assert!(RasterSurface::new(10, 0).is_err());
        assert!(RasterSurface::new(usize::MAX, 2).is_err());
    }

    #[test]
    fn buffer_has_rgba_length_and_background() {
        let s = RasterSurface::new(8, 4).unwrap();
        assert_eq!(s.as_rgba().len(), 8 * 4 * 4);
        assert_eq!(s.pixel(3, 2), [0x0b, 0x10, 0x20, 255]);
    }

    #[test]
    fn opaque_circle_covers_its_center() {
        let mut s = RasterSurface::new(20, 20).unwrap();
        s.fill_circle(DVec2::new(10.0, 10.0), 3.0, WHITE);
        assert_eq!(s.pixel(10, 10), [255, 255, 255, 255]);
        assert_eq!(s.pixel(0, 0), [0x0b, 0x10, 0x20, 255]);
    }

    #[test]
    fn translucent_circle_blends_with_background() {
        let mut s = RasterSurface::with_background(10, 10, [0, 0, 0]).unwrap();
        s.fill_circle(DVec2::new(5.0, 5.0), 2.0, WHITE.with_alpha(0.5));
        let [r, g, b, a] = s.pixel(5, 5);
        assert_eq!((r, g, b, a), (128, 128, 128, 255));
    }

    #[test]
    fn circle_outside_surface_is_clipped() {
        let mut s = RasterSurface::new(10, 10).unwrap();
        s.fill_circle(DVec2::new(-50.0, 400.0), 2.0, WHITE);
        assert!(s
            .as_rgba()
            .chunks_exact(4)
            .all(|px| px == [0x0b, 0x10, 0x20, 255]));
    }

    #[test]
    fn horizontal_stroke_marks_its_row_only() {
        let mut s = RasterSurface::with_background(20, 10, [0, 0, 0]).unwrap();
        s.stroke_polyline(&[DVec2::new(0.0, 5.5), DVec2::new(20.0, 5.5)], WHITE, 1.0);
        assert_eq!(s.pixel(10, 5), [255, 255, 255, 255]);
        assert_eq!(s.pixel(10, 1), [0, 0, 0, 255]);
        assert_eq!(s.pixel(10, 9), [0, 0, 0, 255]);
    }

    #[test]
    fn clear_restores_background() {
        let mut s = RasterSurface::new(6, 6).unwrap();
        s.fill_circle(DVec2::new(3.0, 3.0), 3.0, WHITE);
        s.clear();
        assert!(s
            .as_rgba()
            .chunks_exact(4)
            .all(|px| px == [0x0b, 0x10, 0x20, 255]));
    }

    #[test]
    fn distance_to_degenerate_segment_is_point_distance() {
        let d = distance_to_segment(DVec2::new(3.0, 4.0), DVec2::ZERO, DVec2::ZERO);
        assert!((d - 5.0).abs() < 1e-12);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn drawing_anywhere_keeps_pixels_opaque(
                cx in -200.0_f64..200.0,
                cy in -200.0_f64..200.0,
                radius in 0.0_f64..80.0,
                alpha in 0.0_f64..1.0,
                hue in 0.0_f64..360.0,
            ) {
                let mut surface = RasterSurface::new(32, 24).unwrap();
                let color = Hsla::new(hue, 0.9, 0.6, alpha);
                surface.fill_circle(DVec2::new(cx, cy), radius, color);
                surface.stroke_polyline(&[DVec2::new(cx, cy), DVec2::new(-cx, cy * 0.5)], color, 2.0);
                for px in surface.as_rgba().chunks_exact(4) {
                    prop_assert_eq!(px[3], 255);
                }
            }

            #[test]
            fn circle_clear_of_the_canvas_changes_nothing(
                cx in 100.0_f64..1000.0,
                cy in -1000.0_f64..1000.0,
                radius in 0.0_f64..50.0,
            ) {
                let mut surface = RasterSurface::new(32, 24).unwrap();
                let before = surface.as_rgba().to_vec();
                surface.fill_circle(DVec2::new(cx, cy), radius, WHITE);
                prop_assert_eq!(surface.as_rgba(), before.as_slice());
            }
        }
    }
}
