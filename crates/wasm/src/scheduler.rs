//! `requestAnimationFrame` as a [`FrameScheduler`].

use voicefx_core::{FrameScheduler, FxError};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

use crate::host_err;

/// Owns the per-frame callback. Dropping the scheduler invalidates the
/// callback, so the owning driver must have cancelled any pending frame first
/// ([`voicefx_core::FrameDriver`] does so in its own `Drop`).
pub struct RafScheduler {
    window: Window,
    callback: Closure<dyn FnMut()>,
}

impl RafScheduler {
    pub fn new(window: Window, callback: Closure<dyn FnMut()>) -> Self {
        Self { window, callback }
    }
}

impl FrameScheduler for RafScheduler {
    type Handle = i32;

    fn request_frame(&mut self) -> Result<i32, FxError> {
        self.window
            .request_animation_frame(self.callback.as_ref().unchecked_ref())
            .map_err(|e| host_err("requestAnimationFrame", e))
    }

    fn cancel_frame(&mut self, handle: i32) {
        let _ = self.window.cancel_animation_frame(handle);
    }
}
