#![cfg(target_arch = "wasm32")]
//! Browser bindings: mounts the canvas effects on `<canvas>` elements and
//! drives the page chrome (theme, lead form, booking modal, nav, FAQ).
//!
//! Rendering goes through [`canvas::CanvasSurface`], frames are scheduled
//! with `requestAnimationFrame` by [`scheduler::RafScheduler`], and every
//! DOM listener is held by a [`listener::Listener`] guard that detaches on
//! drop.

pub mod canvas;
pub mod lead;
pub mod listener;
pub mod mount;
pub mod page;
pub mod scheduler;
pub mod storage;

use voicefx_core::FxError;
use wasm_bindgen::prelude::*;

pub use mount::AnimatedCanvas;
pub use page::Page;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("voicefx wasm loaded");
}

/// Effects available to [`AnimatedCanvas::mount`].
#[wasm_bindgen(js_name = listEffects)]
pub fn list_effects() -> Vec<String> {
    voicefx_effects::EffectKind::list_effects()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

pub(crate) fn window() -> Result<web_sys::Window, FxError> {
    web_sys::window().ok_or_else(|| FxError::Host("no window".into()))
}

pub(crate) fn document() -> Result<web_sys::Document, FxError> {
    window()?
        .document()
        .ok_or_else(|| FxError::Host("no document".into()))
}

pub(crate) fn host_err(context: &str, value: JsValue) -> FxError {
    FxError::Host(format!("{context}: {value:?}"))
}

pub(crate) fn to_js(e: FxError) -> JsValue {
    JsValue::from_str(&e.to_string())
}
