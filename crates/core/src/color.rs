//! HSLA colors as used by the Canvas 2D API.
//!
//! Effects describe their strokes and fills in HSLA (a fixed hue with varying
//! alpha). Browser surfaces pass the CSS form straight to the context; the CPU
//! raster converts to 8-bit RGB.

use serde::{Deserialize, Serialize};

/// Hue in degrees, saturation and lightness in [0, 1], alpha in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsla {
    pub h: f64,
    pub s: f64,
    pub l: f64,
    pub a: f64,
}

impl Hsla {
    pub fn new(h: f64, s: f64, l: f64, a: f64) -> Self {
        Self {
            h: h.rem_euclid(360.0),
            s: s.clamp(0.0, 1.0),
            l: l.clamp(0.0, 1.0),
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Same color with a different alpha, clamped to [0, 1].
    pub fn with_alpha(self, a: f64) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS `hsla()` string, e.g. `hsla(195, 90%, 60%, 0.5)`.
    pub fn to_css(self) -> String {
        format!(
            "hsla({}, {}%, {}%, {})",
            round2(self.h),
            round2(self.s * 100.0),
            round2(self.l * 100.0),
            round2(self.a)
        )
    }

    /// Converts hue/saturation/lightness to 8-bit RGB, ignoring alpha.
    pub fn to_rgb8(self) -> [u8; 3] {
        let c = (1.0 - (2.0 * self.l - 1.0).abs()) * self.s;
        let hp = self.h.rem_euclid(360.0) / 60.0;
        let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
        let (r1, g1, b1) = match hp as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = self.l - c / 2.0;
        let to_u8 = |v: f64| ((v + m).clamp(0.0, 1.0) * 255.0).round() as u8;
        [to_u8(r1), to_u8(g1), to_u8(b1)]
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
