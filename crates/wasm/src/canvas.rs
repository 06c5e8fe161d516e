//! [`Surface`] over a `<canvas>` 2D context.

use std::f64::consts::TAU;

use glam::DVec2;
use voicefx_core::{FxError, Hsla, Surface};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::{host_err, window};

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    width: usize,
    height: usize,
}

impl CanvasSurface {
    /// Acquires the 2D context. Fails when the browser refuses one.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, FxError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| host_err("getContext", e))?
            .ok_or_else(|| FxError::Host("2d context unavailable".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| FxError::Host("context is not 2d".into()))?;
        let mut surface = Self {
            canvas,
            ctx,
            width: 0,
            height: 0,
        };
        surface.fit_to_display()?;
        Ok(surface)
    }

    /// Resizes the backing buffer to the element's CSS size times the device
    /// pixel ratio. Returns the new size, which may be zero while the canvas
    /// is hidden.
    pub fn fit_to_display(&mut self) -> Result<(usize, usize), FxError> {
        let dpr = window()?.device_pixel_ratio().max(1.0);
        let width = (f64::from(self.canvas.client_width()) * dpr).round().max(0.0) as usize;
        let height = (f64::from(self.canvas.client_height()) * dpr).round().max(0.0) as usize;
        if (width, height) != (self.width, self.height) {
            self.canvas.set_width(width as u32);
            self.canvas.set_height(height as u32);
            self.width = width;
            self.height = height;
        }
        Ok((width, height))
    }

    /// Maps viewport coordinates to device pixels on this canvas.
    pub fn to_device(&self, client_x: f64, client_y: f64) -> DVec2 {
        let rect = self.canvas.get_bounding_client_rect();
        let scale_x = if rect.width() > 0.0 {
            self.width as f64 / rect.width()
        } else {
            1.0
        };
        let scale_y = if rect.height() > 0.0 {
            self.height as f64 / rect.height()
        } else {
            1.0
        };
        DVec2::new(
            (client_x - rect.left()) * scale_x,
            (client_y - rect.top()) * scale_y,
        )
    }

    pub fn element(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.ctx
            .clear_rect(0.0, 0.0, self.width as f64, self.height as f64);
    }

    #[allow(deprecated)]
    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Hsla) {
        self.ctx.begin_path();
        if self.ctx.arc(center.x, center.y, radius, 0.0, TAU).is_err() {
            return;
        }
        self.ctx.set_fill_style(&JsValue::from_str(&color.to_css()));
        self.ctx.fill();
    }

    #[allow(deprecated)]
    fn stroke_polyline(&mut self, points: &[DVec2], color: Hsla, width: f64) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.begin_path();
        self.ctx.move_to(first.x, first.y);
        for p in rest {
            self.ctx.line_to(p.x, p.y);
        }
        self.ctx.set_stroke_style(&JsValue::from_str(&color.to_css()));
        self.ctx.set_line_width(width);
        self.ctx.stroke();
    }
}
