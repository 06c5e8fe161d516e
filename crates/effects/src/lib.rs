#![deny(unsafe_code)]
//! Effect registry: maps effect names to implementations and provides a CPU
//! raster surface for offline rendering.
//!
//! Both the CLI and the WASM bindings go through this crate so name dispatch
//! lives in one place.

pub mod raster;

#[cfg(feature = "png")]
pub mod snapshot;

use glam::DVec2;
use log::debug;
use serde_json::Value;
use voicefx_core::driver::EffectFactory;
use voicefx_core::error::FxError;
use voicefx_core::{Effect, Surface};
use voicefx_particles::PointField;
use voicefx_waves::WaveField;

const EFFECT_NAMES: &[&str] = &["particles", "waves"];

/// Every effect a canvas can run.
pub enum EffectKind {
    /// Cursor-reactive point field.
    Particles(PointField),
    /// Layered sound wave.
    Waves(WaveField),
}

impl EffectKind {
    /// Constructs an effect by name. `seed` only affects the point layout.
    pub fn from_name(
        name: &str,
        width: usize,
        height: usize,
        seed: u64,
        params: &Value,
    ) -> Result<Self, FxError> {
        match name {
            "particles" => Ok(EffectKind::Particles(PointField::from_json(
                width, height, seed, params,
            )?)),
            "waves" => Ok(EffectKind::Waves(WaveField::from_json(width, height, params)?)),
            _ => Err(FxError::UnknownEffect(name.to_string())),
        }
    }

    pub fn list_effects() -> &'static [&'static str] {
        EFFECT_NAMES
    }

    pub fn is_known(name: &str) -> bool {
        EFFECT_NAMES.contains(&name)
    }

    /// A factory for [`FrameDriver`](voicefx_core::FrameDriver) that builds
    /// the named effect once the surface has a size.
    pub fn factory(name: &str, seed: u64, params: Value) -> EffectFactory {
        let name = name.to_string();
        Box::new(move |width, height| {
            let effect = EffectKind::from_name(&name, width, height, seed, &params)?;
            debug!("built {name} effect at {width}x{height}");
            Ok(Box::new(effect) as Box<dyn Effect>)
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            EffectKind::Particles(_) => "particles",
            EffectKind::Waves(_) => "waves",
        }
    }
}

impl Effect for EffectKind {
    fn step(&mut self, pointer: DVec2) {
        match self {
            EffectKind::Particles(e) => e.step(pointer),
            EffectKind::Waves(e) => e.step(pointer),
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        match self {
            EffectKind::Particles(e) => e.render(surface),
            EffectKind::Waves(e) => e.render(surface),
        }
    }

    fn resize(&mut self, width: usize, height: usize) {
        match self {
            EffectKind::Particles(e) => e.resize(width, height),
            EffectKind::Waves(e) => e.resize(width, height),
        }
    }

    fn params(&self) -> Value {
        match self {
            EffectKind::Particles(e) => e.params(),
            EffectKind::Waves(e) => e.params(),
        }
    }

    fn param_schema(&self) -> Value {
        match self {
            EffectKind::Particles(e) => e.param_schema(),
            EffectKind::Waves(e) => e.param_schema(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use voicefx_core::driver::{FrameDriver, ManualScheduler};
    use voicefx_core::pointer::PointerTracker;
    use voicefx_core::surface::recording::RecordingSurface;

    #[test]
    fn from_name_builds_each_listed_effect() {
        for name in EffectKind::list_effects() {
            let effect = EffectKind::from_name(name, 64, 48, 1, &json!({})).unwrap();
            assert_eq!(effect.name(), *name);
        }
    }

    #[test]
    fn from_name_unknown_returns_error() {
        let result = EffectKind::from_name("fireworks", 32, 32, 42, &json!({}));
        assert!(matches!(result, Err(FxError::UnknownEffect(_))));
        assert!(!EffectKind::is_known("fireworks"));
    }

    #[test]
    fn from_name_propagates_zero_size() {
        let result = EffectKind::from_name("waves", 0, 32, 42, &json!({}));
        assert!(matches!(result, Err(FxError::InvalidDimensions)));
    }

    #[test]
    fn trait_delegation_params_and_schema() {
        let effect = EffectKind::from_name("particles", 100, 100, 42, &json!({})).unwrap();
        assert!(effect.params().get("damping").is_some());
        assert!(effect.param_schema().get("damping").is_some());
        let waves = EffectKind::from_name("waves", 100, 100, 42, &json!({})).unwrap();
        assert!(waves.params().get("layers").is_some());
    }

    #[test]
    fn determinism_same_seed() {
        let mut a = EffectKind::from_name("particles", 120, 80, 9, &json!({})).unwrap();
        let mut b = EffectKind::from_name("particles", 120, 80, 9, &json!({})).unwrap();
        for _ in 0..20 {
            a.step(DVec2::new(60.0, 40.0));
            b.step(DVec2::new(60.0, 40.0));
        }
        let (mut sa, mut sb) = (RecordingSurface::new(120, 80), RecordingSurface::new(120, 80));
        a.render(&mut sa);
        b.render(&mut sb);
        assert_eq!(sa.calls, sb.calls);
    }

    #[test]
    fn factory_drives_a_frame_driver() {
        let tracker = PointerTracker::new();
        let mut driver = FrameDriver::new(
            ManualScheduler::new(),
            tracker.reader(),
            EffectKind::factory("waves", 1, json!({})),
        );
        let mut surface = RecordingSurface::new(80, 40);
        driver.start(80, 40).unwrap();
        assert!(driver.on_frame(&mut surface).unwrap());
        assert!(!surface.calls.is_empty());
    }

    #[test]
    fn factory_with_unknown_name_fails_at_start() {
        let tracker = PointerTracker::new();
        let mut driver = FrameDriver::new(
            ManualScheduler::new(),
            tracker.reader(),
            EffectKind::factory("nope", 1, json!({})),
        );
        assert!(matches!(driver.start(10, 10), Err(FxError::UnknownEffect(_))));
    }

    #[test]
    fn object_safety() {
        let effect = EffectKind::from_name("waves", 16, 16, 42, &json!({})).unwrap();
        let boxed: Box<dyn Effect> = Box::new(effect);
        assert!(boxed.params().get("dt").is_some());
    }
}
