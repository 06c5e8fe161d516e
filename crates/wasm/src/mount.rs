//! Mounting an effect on a `<canvas>`.
//!
//! An [`AnimatedCanvas`] owns everything it registered with the browser: the
//! animation-frame callback (inside its [`RafScheduler`]), its pointer
//! listeners, its window resize listener, and a `ResizeObserver` on the
//! canvas element. Dropping it, or calling `destroy`
//! from JS, cancels the pending frame and detaches all of them.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{debug, info, warn};
use voicefx_core::{FrameDriver, FxError, PointerTracker, Xorshift64};
use voicefx_effects::EffectKind;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlCanvasElement, MouseEvent, TouchEvent};

use crate::canvas::CanvasSurface;
use crate::listener::{Listener, SizeWatch};
use crate::scheduler::RafScheduler;
use crate::{document, to_js, window};

struct Animation {
    driver: FrameDriver<RafScheduler>,
    surface: CanvasSurface,
}

impl Animation {
    fn frame(&mut self) {
        if let Err(e) = self.driver.on_frame(&mut self.surface) {
            warn!("animation stopped: {e} ({})", self.driver.describe());
        }
    }

    /// Matches the buffer to the element size, then resizes the running
    /// effect or starts the driver if it was waiting for a usable size.
    fn refit(&mut self) {
        let (width, height) = match self.surface.fit_to_display() {
            Ok(size) => size,
            Err(e) => {
                warn!("canvas resize failed: {e}");
                return;
            }
        };
        if self.driver.is_running() {
            self.driver.resize(width, height);
        } else if let Err(e) = self.driver.start(width, height) {
            debug!("canvas waiting for a size: {e} ({})", self.driver.describe());
        }
    }
}

/// An effect animating on one canvas element.
#[wasm_bindgen]
pub struct AnimatedCanvas {
    animation: Rc<RefCell<Animation>>,
    _listeners: Vec<Listener>,
    _size_watch: SizeWatch,
}

#[wasm_bindgen]
impl AnimatedCanvas {
    /// Mounts `effect` ("particles" or "waves") on the canvas with id
    /// `canvas_id`. `params` is an optional JSON object of effect parameters.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas_id: &str,
        effect: &str,
        params: Option<String>,
    ) -> Result<AnimatedCanvas, JsValue> {
        Self::mount(canvas_id, effect, params.as_deref()).map_err(to_js)
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.animation
            .try_borrow()
            .map(|a| a.driver.is_running())
            .unwrap_or(true)
    }

    pub fn frames(&self) -> f64 {
        self.animation
            .try_borrow()
            .map(|a| a.driver.frames() as f64)
            .unwrap_or(0.0)
    }

    /// Stops the animation and releases every browser callback.
    pub fn destroy(self) {
        info!("canvas effect destroyed");
    }
}

impl AnimatedCanvas {
    pub fn mount(canvas_id: &str, effect: &str, params: Option<&str>) -> Result<Self, FxError> {
        if !EffectKind::is_known(effect) {
            return Err(FxError::UnknownEffect(effect.to_owned()));
        }
        let params: serde_json::Value = match params {
            Some(raw) => serde_json::from_str(raw).map_err(|e| FxError::ParamTypeMismatch {
                name: "params".into(),
                expected: "JSON object".into(),
                got: e.to_string(),
            })?,
            None => serde_json::json!({}),
        };

        let window = window()?;
        let canvas = document()?
            .get_element_by_id(canvas_id)
            .ok_or_else(|| FxError::Host(format!("no element #{canvas_id}")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| FxError::Host(format!("#{canvas_id} is not a canvas")))?;
        let surface = CanvasSurface::new(canvas)?;

        let tracker = Rc::new(PointerTracker::new());
        let seed = Xorshift64::from_millis(js_sys::Date::now()).next_u64();
        let factory = EffectKind::factory(effect, seed, params);
        let reader = tracker.reader();

        let animation = Rc::new_cyclic(|weak: &Weak<RefCell<Animation>>| {
            let weak = weak.clone();
            let callback = Closure::wrap(Box::new(move || {
                if let Some(animation) = weak.upgrade() {
                    if let Ok(mut animation) = animation.try_borrow_mut() {
                        animation.frame();
                    }
                }
            }) as Box<dyn FnMut()>);
            RefCell::new(Animation {
                driver: FrameDriver::new(
                    RafScheduler::new(window.clone(), callback),
                    reader,
                    factory,
                ),
                surface,
            })
        });

        let target: &web_sys::EventTarget = window.as_ref();
        let listeners = vec![
            pointer_listener(target, "mousemove", &animation, &tracker)?,
            pointer_listener(target, "touchmove", &animation, &tracker)?,
            {
                let weak = Rc::downgrade(&animation);
                Listener::new(target, "resize", move |_| {
                    if let Some(animation) = weak.upgrade() {
                        if let Ok(mut animation) = animation.try_borrow_mut() {
                            animation.refit();
                        }
                    }
                })?
            },
        ];

        // Layout changes resize the element without a window resize event.
        let size_watch = {
            let weak = Rc::downgrade(&animation);
            let element = animation.borrow().surface.element().clone();
            SizeWatch::new(&element, move || {
                if let Some(animation) = weak.upgrade() {
                    if let Ok(mut animation) = animation.try_borrow_mut() {
                        animation.refit();
                    }
                }
            })?
        };

        animation.borrow_mut().refit();
        info!("mounted {effect} on #{canvas_id}");
        Ok(Self {
            animation,
            _listeners: listeners,
            _size_watch: size_watch,
        })
    }
}

/// Records viewport pointer moves in the canvas's device pixels.
fn pointer_listener(
    target: &web_sys::EventTarget,
    event: &'static str,
    animation: &Rc<RefCell<Animation>>,
    tracker: &Rc<PointerTracker>,
) -> Result<Listener, FxError> {
    let weak = Rc::downgrade(animation);
    let tracker = Rc::clone(tracker);
    Listener::new(target, event, move |event: Event| {
        let Some((x, y)) = client_position(&event) else {
            return;
        };
        let Some(animation) = weak.upgrade() else {
            return;
        };
        let Ok(animation) = animation.try_borrow() else {
            return;
        };
        let p = animation.surface.to_device(x, y);
        tracker.record(p.x, p.y);
    })
}

fn client_position(event: &Event) -> Option<(f64, f64)> {
    if let Some(touch) = event.dyn_ref::<TouchEvent>() {
        let first = touch.touches().get(0)?;
        return Some((f64::from(first.client_x()), f64::from(first.client_y())));
    }
    let mouse = event.dyn_ref::<MouseEvent>()?;
    Some((f64::from(mouse.client_x()), f64::from(mouse.client_y())))
}
