//! The drawing target effects paint onto.
//!
//! A browser `<canvas>` 2D context and the CPU raster used by the CLI both
//! implement [`Surface`]. Constructing a surface is the only step that can
//! fail for lack of a drawing context, so painting itself is infallible.

use glam::DVec2;

use crate::color::Hsla;

/// A 2D drawing target measured in device pixels.
///
/// Object-safe so a driver can hold `&mut dyn Surface`.
pub trait Surface {
    /// Backing buffer size `(width, height)` in device pixels.
    fn size(&self) -> (usize, usize);

    /// Erases the previous frame.
    fn clear(&mut self);

    /// Fills a circle of `radius` pixels centered at `center`.
    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Hsla);

    /// Strokes connected line segments through `points`.
    fn stroke_polyline(&mut self, points: &[DVec2], color: Hsla, width: f64);
}

/// In-memory surface that logs every call instead of drawing.
///
/// Used by renderer tests across the workspace to assert what was painted.
pub mod recording {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawCall {
        Clear,
        Circle {
            center: DVec2,
            radius: f64,
            color: Hsla,
        },
        Polyline {
            points: Vec<DVec2>,
            color: Hsla,
            width: f64,
        },
    }

    pub struct RecordingSurface {
        pub width: usize,
        pub height: usize,
        pub calls: Vec<DrawCall>,
    }

    impl RecordingSurface {
        pub fn new(width: usize, height: usize) -> Self {
            Self {
                width,
                height,
                calls: Vec::new(),
            }
        }
    }

    impl Surface for RecordingSurface {
        fn size(&self) -> (usize, usize) {
            (self.width, self.height)
        }

        fn clear(&mut self) {
            self.calls.push(DrawCall::Clear);
        }

        fn fill_circle(&mut self, center: DVec2, radius: f64, color: Hsla) {
            self.calls.push(DrawCall::Circle {
                center,
                radius,
                color,
            });
        }

        fn stroke_polyline(&mut self, points: &[DVec2], color: Hsla, width: f64) {
            self.calls.push(DrawCall::Polyline {
                points: points.to_vec(),
                color,
                width,
            });
        }
    }
}
