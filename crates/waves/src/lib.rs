#![deny(unsafe_code)]
//! Layered sound-wave effect.
//!
//! Five sine curves are traced across the full canvas width, each with its
//! own hue, amplitude, frequency, and phase speed. A single time accumulator
//! drives every layer; the pointer's horizontal position shifts the phase of
//! all layers together. A faint fixed grid is drawn over the curves.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use voicefx_core::error::FxError;
use voicefx_core::params::{param_f64, param_positive};
use voicefx_core::{Effect, Hsla, Surface};

/// Time added to the accumulator per frame.
const DEFAULT_DT: f64 = 1.0;
/// Horizontal distance between polyline vertices, in device pixels.
const DEFAULT_STEP_PX: f64 = 4.0;
const DEFAULT_GRID_SPACING: f64 = 40.0;
/// Smallest accepted vertex step; finer steps only add vertices.
const MIN_STEP_PX: f64 = 1.0;
const MIN_GRID_SPACING: f64 = 4.0;
const DEFAULT_GRID_ALPHA: f64 = 0.05;
/// Phase shift in radians between the pointer at the left and right edges.
const DEFAULT_POINTER_PHASE: f64 = std::f64::consts::PI;

const BASE_STROKE_ALPHA: f64 = 0.8;
const STROKE_ALPHA_STEP: f64 = 0.12;
const BASE_STROKE_WIDTH: f64 = 1.5;
const STROKE_WIDTH_STEP: f64 = 0.5;
const GRID_HUE: f64 = 210.0;

/// One curve of the sound wave. Immutable once the effect is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveLayer {
    /// Stroke hue in degrees.
    pub hue: f64,
    /// Peak displacement as a fraction of half the canvas height.
    pub amplitude: f64,
    /// Spatial frequency in radians per pixel.
    pub frequency: f64,
    /// Phase advance in radians per unit of time.
    pub speed: f64,
}

/// The five default layers, back to front.
pub const DEFAULT_LAYERS: [WaveLayer; 5] = [
    WaveLayer { hue: 190.0, amplitude: 0.50, frequency: 0.010, speed: 0.030 },
    WaveLayer { hue: 200.0, amplitude: 0.42, frequency: 0.013, speed: 0.036 },
    WaveLayer { hue: 215.0, amplitude: 0.34, frequency: 0.016, speed: 0.042 },
    WaveLayer { hue: 260.0, amplitude: 0.26, frequency: 0.019, speed: 0.048 },
    WaveLayer { hue: 280.0, amplitude: 0.18, frequency: 0.022, speed: 0.054 },
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParams {
    pub dt: f64,
    pub step_px: f64,
    pub grid_spacing: f64,
    pub grid_alpha: f64,
    pub pointer_phase: f64,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            dt: DEFAULT_DT,
            step_px: DEFAULT_STEP_PX,
            grid_spacing: DEFAULT_GRID_SPACING,
            grid_alpha: DEFAULT_GRID_ALPHA,
            pointer_phase: DEFAULT_POINTER_PHASE,
        }
    }
}

impl WaveParams {
    /// Reads parameters from JSON, falling back to defaults. `dt`,
    /// `step_px`, and `grid_spacing` must be positive; positive steps and
    /// spacings below 1 px and 4 px are raised to those minimums.
    pub fn from_json(params: &Value) -> Self {
        Self {
            dt: param_positive(params, "dt", DEFAULT_DT),
            step_px: param_positive(params, "step_px", DEFAULT_STEP_PX).max(MIN_STEP_PX),
            grid_spacing: param_positive(params, "grid_spacing", DEFAULT_GRID_SPACING)
                .max(MIN_GRID_SPACING),
            grid_alpha: param_f64(params, "grid_alpha", DEFAULT_GRID_ALPHA).clamp(0.0, 1.0),
            pointer_phase: param_f64(params, "pointer_phase", DEFAULT_POINTER_PHASE),
        }
    }
}

pub struct WaveField {
    layers: Vec<WaveLayer>,
    time: f64,
    pointer: DVec2,
    width: f64,
    height: f64,
    params: WaveParams,
}

impl WaveField {
    /// Builds the effect with [`DEFAULT_LAYERS`].
    ///
    /// Returns `FxError::InvalidDimensions` for a zero-sized surface.
    pub fn new(width: usize, height: usize, params: WaveParams) -> Result<Self, FxError> {
        Self::with_layers(width, height, DEFAULT_LAYERS.to_vec(), params)
    }

    pub fn with_layers(
        width: usize,
        height: usize,
        layers: Vec<WaveLayer>,
        params: WaveParams,
    ) -> Result<Self, FxError> {
        if width == 0 || height == 0 {
            return Err(FxError::InvalidDimensions);
        }
        Ok(Self {
            layers,
            time: 0.0,
            pointer: DVec2::ZERO,
            width: width as f64,
            height: height as f64,
            params,
        })
    }

    pub fn from_json(width: usize, height: usize, json_params: &Value) -> Result<Self, FxError> {
        Self::new(width, height, WaveParams::from_json(json_params))
    }

    pub fn layers(&self) -> &[WaveLayer] {
        &self.layers
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Phase offset contributed by the pointer: zero at the horizontal
    /// center, `±pointer_phase / 2` at the edges.
    pub fn pointer_influence(&self) -> f64 {
        (self.pointer.x / self.width - 0.5) * self.params.pointer_phase
    }

    /// Vertical position of `layer` at horizontal position `x`.
    pub fn sample(&self, layer: &WaveLayer, x: f64) -> f64 {
        let center_y = self.height / 2.0;
        let amplitude = layer.amplitude * center_y;
        let phase = x * layer.frequency + self.time * layer.speed + self.pointer_influence();
        center_y + phase.sin() * amplitude
    }

    /// Vertices of `layer` from `x = 0` to `x = width` inclusive.
    pub fn polyline(&self, layer: &WaveLayer) -> Vec<DVec2> {
        let step = self.params.step_px.max(MIN_STEP_PX);
        let mut xs: Vec<f64> = (0_usize..)
            .map(|i| i as f64 * step)
            .take_while(|&x| x < self.width)
            .collect();
        xs.push(self.width);
        xs.into_iter()
            .map(|x| DVec2::new(x, self.sample(layer, x)))
            .collect()
    }

    /// Stroke color and width for the layer at `index`: later layers are
    /// fainter and thicker.
    pub fn stroke_style(layer: &WaveLayer, index: usize) -> (Hsla, f64) {
        let alpha = (BASE_STROKE_ALPHA - STROKE_ALPHA_STEP * index as f64).max(0.05);
        let width = BASE_STROKE_WIDTH + STROKE_WIDTH_STEP * index as f64;
        (Hsla::new(layer.hue, 0.85, 0.6, alpha), width)
    }

    fn render_grid(&self, surface: &mut dyn Surface) {
        let color = Hsla::new(GRID_HUE, 0.3, 0.7, self.params.grid_alpha);
        let spacing = self.params.grid_spacing.max(MIN_GRID_SPACING);
        let mut x = spacing;
        while x < self.width {
            surface.stroke_polyline(&[DVec2::new(x, 0.0), DVec2::new(x, self.height)], color, 1.0);
            x += spacing;
        }
        let mut y = spacing;
        while y < self.height {
            surface.stroke_polyline(&[DVec2::new(0.0, y), DVec2::new(self.width, y)], color, 1.0);
            y += spacing;
        }
    }
}

impl Effect for WaveField {
    fn step(&mut self, pointer: DVec2) {
        self.time += self.params.dt;
        self.pointer = pointer;
    }

    fn render(&self, surface: &mut dyn Surface) {
        for (index, layer) in self.layers.iter().enumerate() {
            let (color, width) = Self::stroke_style(layer, index);
            surface.stroke_polyline(&self.polyline(layer), color, width);
        }
        self.render_grid(surface);
    }

    fn resize(&mut self, width: usize, height: usize) {
        if width == 0 || height == 0 {
            return;
        }
        self.width = width as f64;
        self.height = height as f64;
    }

    fn params(&self) -> Value {
        json!({
            "dt": self.params.dt,
            "step_px": self.params.step_px,
            "grid_spacing": self.params.grid_spacing,
            "grid_alpha": self.params.grid_alpha,
            "pointer_phase": self.params.pointer_phase,
            "layers": self.layers,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "dt": {
                "type": "number",
                "default": DEFAULT_DT,
                "min": 0.0,
                "description": "Time added to the accumulator per frame"
            },
            "step_px": {
                "type": "number",
                "default": DEFAULT_STEP_PX,
                "min": MIN_STEP_PX,
                "max": 64.0,
                "description": "Horizontal spacing of polyline vertices in pixels"
            },
            "grid_spacing": {
                "type": "number",
                "default": DEFAULT_GRID_SPACING,
                "min": MIN_GRID_SPACING,
                "description": "Distance between grid lines in pixels"
            },
            "grid_alpha": {
                "type": "number",
                "default": DEFAULT_GRID_ALPHA,
                "min": 0.0,
                "max": 1.0,
                "description": "Opacity of the grid overlay"
            },
            "pointer_phase": {
                "type": "number",
                "default": DEFAULT_POINTER_PHASE,
                "description": "Phase shift in radians across the full pointer sweep"
            },
            "layers": {
                "type": "array",
                "description": "Fixed wave layers (hue, amplitude, frequency, speed); read-only"
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voicefx_core::surface::recording::{DrawCall, RecordingSurface};

    fn waves(width: usize, height: usize) -> WaveField {
        WaveField::new(width, height, WaveParams::default()).unwrap()
    }

    fn polylines(calls: &[DrawCall]) -> Vec<(&Vec<DVec2>, Hsla, f64)> {
        calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Polyline {
                    points,
                    color,
                    width,
                } => Some((points, *color, *width)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn rejects_zero_sized_surface() {
        assert!(matches!(
            WaveField::new(0, 10, WaveParams::default()),
            Err(FxError::InvalidDimensions)
        ));
    }

    #[test]
    fn has_five_default_layers() {
        assert_eq!(waves(100, 100).layers().len(), 5);
    }

    #[test]
    fn time_advances_by_dt_each_step() {
        let mut w = waves(100, 100);
        for _ in 0..3 {
            w.step(DVec2::ZERO);
        }
        assert!((w.time() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn polyline_spans_full_width() {
        let w = waves(103, 80);
        let line = w.polyline(&w.layers()[0]);
        assert_eq!(line.first().unwrap().x, 0.0);
        assert_eq!(line.last().unwrap().x, 103.0);
        for pair in line.windows(2) {
            assert!(pair[1].x > pair[0].x);
            assert!(pair[1].x - pair[0].x <= DEFAULT_STEP_PX + 1e-9);
        }
    }

    #[test]
    fn sample_stays_within_layer_amplitude() {
        let mut w = waves(400, 200);
        w.step(DVec2::new(123.0, 45.0));
        for layer in w.layers().to_vec() {
            for x in 0..400 {
                let y = w.sample(&layer, x as f64);
                assert!((y - 100.0).abs() <= layer.amplitude * 100.0 + 1e-9);
            }
        }
    }

    #[test]
    fn sample_matches_sine_formula() {
        let mut w = waves(200, 100);
        w.step(DVec2::new(100.0, 0.0));
        let layer = w.layers()[2];
        let x = 37.0;
        let expected = 50.0 + (x * layer.frequency + 1.0 * layer.speed).sin() * layer.amplitude * 50.0;
        assert!((w.sample(&layer, x) - expected).abs() < 1e-9);
    }

    #[test]
    fn pointer_position_shifts_phase() {
        let mut left = waves(200, 100);
        let mut right = waves(200, 100);
        left.step(DVec2::new(0.0, 50.0));
        right.step(DVec2::new(200.0, 50.0));
        assert!((left.pointer_influence() + DEFAULT_POINTER_PHASE / 2.0).abs() < 1e-12);
        assert!((right.pointer_influence() - DEFAULT_POINTER_PHASE / 2.0).abs() < 1e-12);
        let layer = left.layers()[0];
        assert!((left.sample(&layer, 10.0) - right.sample(&layer, 10.0)).abs() > 1e-6);
    }

    #[test]
    fn later_layers_are_fainter_and_thicker() {
        let styles: Vec<(Hsla, f64)> = DEFAULT_LAYERS
            .iter()
            .enumerate()
            .map(|(i, l)| WaveField::stroke_style(l, i))
            .collect();
        for pair in styles.windows(2) {
            assert!(pair[1].0.a < pair[0].0.a);
            assert!(pair[1].1 > pair[0].1);
        }
    }

    #[test]
    fn render_draws_waves_then_grid() {
        let w = waves(120, 80);
        let mut surface = RecordingSurface::new(120, 80);
        w.render(&mut surface);
        let lines = polylines(&surface.calls);
        // 5 waves, then vertical grid lines at 40 and 80, horizontal at 40.
        assert_eq!(lines.len(), 5 + 2 + 1);
        for (i, (_, color, _)) in lines.iter().take(5).enumerate() {
            assert_eq!(color.h, DEFAULT_LAYERS[i].hue);
        }
        for (points, color, width) in lines.iter().skip(5) {
            assert_eq!(points.len(), 2);
            assert_eq!(color.a, DEFAULT_GRID_ALPHA);
            assert_eq!(*width, 1.0);
        }
    }

    #[test]
    fn resize_keeps_time_and_layers() {
        let mut w = waves(100, 100);
        w.step(DVec2::ZERO);
        w.resize(640, 360);
        assert_eq!(w.bounds(), (640.0, 360.0));
        assert!((w.time() - 1.0).abs() < 1e-12);
        assert_eq!(w.layers(), &DEFAULT_LAYERS);
    }

    #[test]
    fn from_json_ignores_non_positive_step() {
        let w = WaveField::from_json(100, 100, &json!({"step_px": 0, "dt": 0.5})).unwrap();
        assert_eq!(w.params()["step_px"], DEFAULT_STEP_PX);
        assert_eq!(w.params()["dt"], 0.5);
    }

    #[test]
    fn tiny_step_and_spacing_are_raised_to_minimums() {
        let w = WaveField::from_json(
            100,
            100,
            &json!({"step_px": 1e-4, "grid_spacing": 1e-300}),
        )
        .unwrap();
        assert_eq!(w.params()["step_px"], MIN_STEP_PX);
        assert_eq!(w.params()["grid_spacing"], MIN_GRID_SPACING);
        assert_eq!(w.polyline(&DEFAULT_LAYERS[0]).len(), 101);

        let mut surface = RecordingSurface::new(100, 100);
        w.render(&mut surface);
        // 5 layers plus 24 grid lines at 4 px spacing
        assert_eq!(surface.calls.len(), 5 + 24 + 24);
    }

    #[test]
    fn params_built_in_code_are_also_bounded() {
        let params = WaveParams {
            step_px: 1e-9,
            grid_spacing: 1e-9,
            ..WaveParams::default()
        };
        let w = WaveField::new(40, 40, params).unwrap();
        assert_eq!(w.polyline(&DEFAULT_LAYERS[0]).len(), 41);
        let mut surface = RecordingSurface::new(40, 40);
        w.render(&mut surface);
        assert_eq!(surface.calls.len(), 5 + 9 + 9);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn time_is_strictly_increasing(dt in 1e-3_f64..10.0, frames in 1_usize..200) {
                let mut w = WaveField::new(64, 64, WaveParams { dt, ..WaveParams::default() }).unwrap();
                let mut last = w.time();
                for _ in 0..frames {
                    w.step(DVec2::ZERO);
                    prop_assert!(w.time() > last);
                    last = w.time();
                }
            }

            #[test]
            fn polyline_ends_at_width_for_any_size(width in 1_usize..2000, step in 1.0_f64..50.0) {
                let w = WaveField::new(width, 100, WaveParams { step_px: step, ..WaveParams::default() }).unwrap();
                let line = w.polyline(&DEFAULT_LAYERS[0]);
                prop_assert_eq!(line.last().unwrap().x, width as f64);
            }
        }
    }
}
