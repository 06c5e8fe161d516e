#![deny(unsafe_code)]
//! Cursor-reactive point field.
//!
//! A few dozen dots drift slowly across the canvas. Each frame the pointer
//! pushes nearby dots away with a force that falls off with distance and is
//! capped near the pointer, velocities decay geometrically, and dots bounce
//! off the canvas edges.

use glam::DVec2;
use serde_json::{json, Value};
use voicefx_core::error::FxError;
use voicefx_core::params::{param_f64, param_positive, param_string, param_usize};
use voicefx_core::prng::Xorshift64;
use voicefx_core::{Effect, Hsla, Surface};

/// Distance scale of the pointer repulsion: force is `repel_radius / dist`.
const DEFAULT_REPEL_RADIUS: f64 = 30.0;
/// Upper bound on the repulsion force.
const DEFAULT_MAX_FORCE: f64 = 0.6;
/// Fraction of the force applied to velocity per frame.
const DEFAULT_FORCE_SCALE: f64 = 0.02;
/// Per-frame velocity multiplier.
const DEFAULT_DAMPING: f64 = 0.98;
/// Canvas area (device px²) per point.
const DEFAULT_AREA_PER_POINT: f64 = 18_000.0;
const DEFAULT_MIN_POINTS: usize = 60;
const DEFAULT_HUE: f64 = 195.0;

/// Keeps the distance strictly positive when a point sits on the pointer.
const DIST_EPSILON: f64 = 1e-4;
/// Initial velocity components are drawn from [-INITIAL_SPEED, INITIAL_SPEED].
const INITIAL_SPEED: f64 = 0.2;
const RADIUS_RANGE: (f64, f64) = (0.5, 2.5);
const OPACITY_RANGE: (f64, f64) = (0.2, 0.8);

/// What happens when a point crosses a canvas edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Flip the outward velocity component; the point may sit outside the
    /// canvas for a frame before coming back.
    Bounce,
    /// Flip the velocity and fold the position back inside the canvas.
    Mirror,
}

impl Boundary {
    pub fn from_name(name: &str) -> Result<Self, FxError> {
        match name {
            "bounce" => Ok(Boundary::Bounce),
            "mirror" => Ok(Boundary::Mirror),
            other => Err(FxError::ParamTypeMismatch {
                name: "boundary".into(),
                expected: "bounce | mirror".into(),
                got: other.into(),
            }),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Boundary::Bounce => "bounce",
            Boundary::Mirror => "mirror",
        }
    }
}

/// Tunable constants of the point field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointFieldParams {
    pub repel_radius: f64,
    pub max_force: f64,
    pub force_scale: f64,
    pub damping: f64,
    pub area_per_point: f64,
    pub min_points: usize,
    pub hue: f64,
    pub boundary: Boundary,
}

impl Default for PointFieldParams {
    fn default() -> Self {
        Self {
            repel_radius: DEFAULT_REPEL_RADIUS,
            max_force: DEFAULT_MAX_FORCE,
            force_scale: DEFAULT_FORCE_SCALE,
            damping: DEFAULT_DAMPING,
            area_per_point: DEFAULT_AREA_PER_POINT,
            min_points: DEFAULT_MIN_POINTS,
            hue: DEFAULT_HUE,
            boundary: Boundary::Bounce,
        }
    }
}

impl PointFieldParams {
    /// Reads parameters from JSON, falling back to defaults for missing keys.
    ///
    /// `damping` is clamped below 1 so the field can never gain energy. An
    /// unrecognized `boundary` name is an error.
    pub fn from_json(params: &Value) -> Result<Self, FxError> {
        Ok(Self {
            repel_radius: param_f64(params, "repel_radius", DEFAULT_REPEL_RADIUS).max(0.0),
            max_force: param_f64(params, "max_force", DEFAULT_MAX_FORCE).max(0.0),
            force_scale: param_f64(params, "force_scale", DEFAULT_FORCE_SCALE).max(0.0),
            damping: param_f64(params, "damping", DEFAULT_DAMPING).clamp(0.0, 0.999),
            area_per_point: param_positive(params, "area_per_point", DEFAULT_AREA_PER_POINT),
            min_points: param_usize(params, "min_points", DEFAULT_MIN_POINTS),
            hue: param_f64(params, "hue", DEFAULT_HUE),
            boundary: Boundary::from_name(&param_string(params, "boundary", "bounce"))?,
        })
    }

    /// `max(min_points, floor(width * height / area_per_point))`.
    pub fn point_count(&self, width: usize, height: usize) -> usize {
        let area = width as f64 * height as f64;
        self.min_points
            .max((area / self.area_per_point).floor() as usize)
    }
}

/// A single dot. Radius and opacity never change after creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub pos: DVec2,
    pub vel: DVec2,
    radius: f64,
    opacity: f64,
}

impl Point {
    pub fn new(pos: DVec2, vel: DVec2, radius: f64, opacity: f64) -> Self {
        Self {
            pos,
            vel,
            radius,
            opacity: opacity.clamp(0.0, 1.0),
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }
}

/// Owns the points and advances them one frame per [`Effect::step`].
pub struct PointField {
    points: Vec<Point>,
    width: f64,
    height: f64,
    params: PointFieldParams,
}

impl PointField {
    /// Scatters [`PointFieldParams::point_count`] points uniformly over the
    /// surface. Returns `FxError::InvalidDimensions` for a zero-sized surface.
    pub fn new(
        width: usize,
        height: usize,
        seed: u64,
        params: PointFieldParams,
    ) -> Result<Self, FxError> {
        if width == 0 || height == 0 {
            return Err(FxError::InvalidDimensions);
        }
        let (w, h) = (width as f64, height as f64);
        let mut rng = Xorshift64::new(seed);
        let points = (0..params.point_count(width, height))
            .map(|_| {
                Point::new(
                    DVec2::new(rng.next_range(0.0, w), rng.next_range(0.0, h)),
                    DVec2::new(
                        rng.next_signed(INITIAL_SPEED),
                        rng.next_signed(INITIAL_SPEED),
                    ),
                    rng.next_range(RADIUS_RANGE.0, RADIUS_RANGE.1),
                    rng.next_range(OPACITY_RANGE.0, OPACITY_RANGE.1),
                )
            })
            .collect();
        Ok(Self {
            points,
            width: w,
            height: h,
            params,
        })
    }

    pub fn from_json(
        width: usize,
        height: usize,
        seed: u64,
        json_params: &Value,
    ) -> Result<Self, FxError> {
        Self::new(width, height, seed, PointFieldParams::from_json(json_params)?)
    }

    /// Builds a field from explicit points, for scripted scenarios.
    pub fn with_points(
        width: usize,
        height: usize,
        points: Vec<Point>,
        params: PointFieldParams,
    ) -> Result<Self, FxError> {
        if width == 0 || height == 0 {
            return Err(FxError::InvalidDimensions);
        }
        Ok(Self {
            points,
            width: width as f64,
            height: height as f64,
            params,
        })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn settings(&self) -> &PointFieldParams {
        &self.params
    }

    fn advance(&mut self, pointer: DVec2) {
        let p = self.params;
        let (w, h) = (self.width, self.height);
        for point in &mut self.points {
            let d = point.pos - pointer;
            let dist = d.length() + DIST_EPSILON;
            let force = (p.repel_radius / dist).min(p.max_force);
            let push = d / dist * force * p.force_scale;
            point.vel.x += inward_only(point.pos.x, push.x, w);
            point.vel.y += inward_only(point.pos.y, push.y, h);

            point.pos += point.vel;
            point.vel *= p.damping;

            reflect_axis(&mut point.pos.x, &mut point.vel.x, w, p.boundary);
            reflect_axis(&mut point.pos.y, &mut point.vel.y, h, p.boundary);
        }
    }
}

/// Drops the part of a push that would carry a point already outside
/// `[0, limit]` further out, so a pointer near an edge cannot hold a point
/// off the canvas.
fn inward_only(pos: f64, push: f64, limit: f64) -> f64 {
    if pos < 0.0 {
        push.max(0.0)
    } else if pos > limit {
        push.min(0.0)
    } else {
        push
    }
}

/// Points the velocity component back inside `[0, limit]` when the point is
/// outside. Rather than negating, the component is set to its inward-facing
/// magnitude, so a point that is outside but already heading back in keeps
/// going in instead of being flipped outward again.
fn reflect_axis(pos: &mut f64, vel: &mut f64, limit: f64, boundary: Boundary) {
    if *pos < 0.0 {
        *vel = vel.abs();
        if boundary == Boundary::Mirror {
            *pos = (-*pos).min(limit);
        }
    } else if *pos > limit {
        *vel = -vel.abs();
        if boundary == Boundary::Mirror {
            *pos = (2.0 * limit - *pos).max(0.0);
        }
    }
}

impl Effect for PointField {
    fn step(&mut self, pointer: DVec2) {
        self.advance(pointer);
    }

    fn render(&self, surface: &mut dyn Surface) {
        let base = Hsla::new(self.params.hue, 0.9, 0.65, 1.0);
        for point in &self.points {
            surface.fill_circle(point.pos, point.radius, base.with_alpha(point.opacity));
        }
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
            "repel_radius": self.params.repel_radius,
            "max_force": self.params.max_force,
            "force_scale": self.params.force_scale,
            "damping": self.params.damping,
            "area_per_point": self.params.area_per_point,
            "min_points": self.params.min_points,
            "hue": self.params.hue,
            "boundary": self.params.boundary.name(),
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "repel_radius": {
                "type": "number",
                "default": DEFAULT_REPEL_RADIUS,
                "min": 0.0,
                "max": 200.0,
                "description": "Repulsion scale: force = repel_radius / distance"
            },
            "max_force": {
                "type": "number",
                "default": DEFAULT_MAX_FORCE,
                "min": 0.0,
                "max": 5.0,
                "description": "Cap on the repulsion force near the pointer"
            },
            "force_scale": {
                "type": "number",
                "default": DEFAULT_FORCE_SCALE,
                "min": 0.0,
                "max": 1.0,
                "description": "Fraction of the force added to velocity per frame"
            },
            "damping": {
                "type": "number",
                "default": DEFAULT_DAMPING,
                "min": 0.0,
                "max": 0.999,
                "description": "Velocity multiplier per frame"
            },
            "area_per_point": {
                "type": "number",
                "default": DEFAULT_AREA_PER_POINT,
                "min": 1.0,
                "description": "Canvas area in device px² per point"
            },
            "min_points": {
                "type": "integer",
                "default": DEFAULT_MIN_POINTS,
                "min": 0,
                "description": "Lower bound on the number of points"
            },
            "hue": {
                "type": "number",
                "default": DEFAULT_HUE,
                "min": 0.0,
                "max": 360.0,
                "description": "Fill hue in degrees"
            },
            "boundary": {
                "type": "string",
                "default": "bounce",
                "enum": ["bounce", "mirror"],
                "description": "Edge behavior: flip velocity only, or also fold position back"
            }
        })
    }
}
