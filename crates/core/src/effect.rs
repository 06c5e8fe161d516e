//! The `Effect` trait every animated canvas implements.
//!
//! The trait is object-safe so the frame driver and the registry can hold
//! `Box<dyn Effect>` and switch between effects at runtime.

use glam::DVec2;
use serde_json::Value;

use crate::surface::Surface;

/// A cosmetic animation advanced once per display frame.
///
/// One frame is always `step` followed by `render`; the driver clears the
/// surface in between.
pub trait Effect {
    /// Advance the simulation by exactly one frame, reading the pointer
    /// position snapshot taken for this frame.
    fn step(&mut self, pointer: DVec2);

    /// Paint the current state. The surface has already been cleared.
    fn render(&self, surface: &mut dyn Surface);

    /// Adopt new drawing-surface bounds without reinitializing state.
    ///
    /// Zero-sized bounds are ignored; the previous bounds stay in effect.
    fn resize(&mut self, width: usize, height: usize);

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing the parameters, their ranges, and defaults.
    fn param_schema(&self) -> Value;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Hsla;
    use crate::surface::recording::{DrawCall, RecordingSurface};
    use serde_json::json;

    /// Single dot that follows the pointer, for trait-level checks.
    struct Follower {
        at: DVec2,
        bounds: (usize, usize),
    }

    impl Effect for Follower {
        fn step(&mut self, pointer: DVec2) {
            self.at = pointer;
        }

        fn render(&self, surface: &mut dyn Surface) {
            surface.fill_circle(self.at, 1.0, Hsla::new(0.0, 0.0, 1.0, 1.0));
        }

        fn resize(&mut self, width: usize, height: usize) {
            if width > 0 && height > 0 {
                self.bounds = (width, height);
            }
        }

        fn params(&self) -> Value {
            json!({"bounds": [self.bounds.0, self.bounds.1]})
        }

        fn param_schema(&self) -> Value {
            json!({})
        }
    }

    #[test]
    fn effect_trait_is_object_safe() {
        let mut effect: Box<dyn Effect> = Box::new(Follower {
            at: DVec2::ZERO,
            bounds: (10, 10),
        });
        effect.step(DVec2::new(3.0, 4.0));
        let mut surface = RecordingSurface::new(10, 10);
        effect.render(&mut surface);
        assert!(matches!(
            surface.calls[0],
            DrawCall::Circle { center, .. } if center == DVec2::new(3.0, 4.0)
        ));
    }

    #[test]
    fn resize_ignores_zero_bounds() {
        let mut effect = Follower {
            at: DVec2::ZERO,
            bounds: (10, 10),
        };
        effect.resize(0, 40);
        assert_eq!(effect.params()["bounds"], json!([10, 10]));
        effect.resize(20, 40);
        assert_eq!(effect.params()["bounds"], json!([20, 40]));
    }
}
