//! Frame driver: runs one effect update and one render per display frame.
//!
//! The driver is an explicit two-state machine:
//!
//! - `Idle`: nothing scheduled.
//! - `Running(handle)`: exactly one frame callback is pending with the host
//!   scheduler.
//!
//! Each frame reschedules itself before doing any work, so animation keeps
//! going for as long as the driver is running. `stop` cancels the pending
//! handle synchronously. Resizing never rebuilds the effect, so motion is
//! continuous across resizes.

use std::fmt;

use log::debug;

use crate::effect::Effect;
use crate::error::FxError;
use crate::pointer::PointerReader;
use crate::surface::Surface;

/// Host facility that calls back once per display refresh.
///
/// In the browser this is `requestAnimationFrame`; offline it is a
/// [`ManualScheduler`] stepped by the caller.
pub trait FrameScheduler {
    type Handle: Copy + PartialEq + fmt::Debug;

    /// Schedules one callback for the next frame.
    fn request_frame(&mut self) -> Result<Self::Handle, FxError>;

    /// Cancels a pending callback. Unknown or already-fired handles are ignored.
    fn cancel_frame(&mut self, handle: Self::Handle);
}

/// Builds the effect once the surface has a usable size.
pub type EffectFactory = Box<dyn FnMut(usize, usize) -> Result<Box<dyn Effect>, FxError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState<H> {
    Idle,
    Running(H),
}

pub struct FrameDriver<S: FrameScheduler> {
    scheduler: S,
    pointer: PointerReader,
    factory: EffectFactory,
    effect: Option<Box<dyn Effect>>,
    state: DriverState<S::Handle>,
    frames: u64,
}

impl<S: FrameScheduler> FrameDriver<S> {
    /// Creates an idle driver. The effect is built lazily on the first
    /// successful [`start`](Self::start).
    pub fn new(scheduler: S, pointer: PointerReader, factory: EffectFactory) -> Self {
        Self {
            scheduler,
            pointer,
            factory,
            effect: None,
            state: DriverState::Idle,
            frames: 0,
        }
    }

    /// Idle → Running once the surface has a non-zero size.
    ///
    /// Returns `FxError::InvalidDimensions` and stays idle for a zero-sized
    /// surface; the host retries on the next resize. Starting a running
    /// driver does nothing.
    pub fn start(&mut self, width: usize, height: usize) -> Result<(), FxError> {
        if self.is_running() {
            return Ok(());
        }
        if width == 0 || height == 0 {
            debug!("frame driver not started: surface is {width}x{height}");
            return Err(FxError::InvalidDimensions);
        }
        match self.effect.as_mut() {
            Some(effect) => effect.resize(width, height),
            None => self.effect = Some((self.factory)(width, height)?),
        }
        let handle = self.scheduler.request_frame()?;
        self.state = DriverState::Running(handle);
        debug!("frame driver running at {width}x{height}");
        Ok(())
    }

    /// Runs one frame: reschedule, snapshot the pointer, step, clear, render.
    ///
    /// Returns `Ok(false)` when idle (a late callback after `stop`).
    pub fn on_frame(&mut self, surface: &mut dyn Surface) -> Result<bool, FxError> {
        if !self.is_running() {
            return Ok(false);
        }
        let Some(effect) = self.effect.as_mut() else {
            self.state = DriverState::Idle;
            return Ok(false);
        };
        match self.scheduler.request_frame() {
            Ok(handle) => self.state = DriverState::Running(handle),
            Err(e) => {
                self.state = DriverState::Idle;
                return Err(e);
            }
        }
        let pointer = self.pointer.position();
        effect.step(pointer);
        surface.clear();
        effect.render(surface);
        self.frames += 1;
        Ok(true)
    }

    /// Running → Idle, cancelling the pending callback. Returns whether a
    /// callback was cancelled.
    pub fn stop(&mut self) -> bool {
        match self.state {
            DriverState::Running(handle) => {
                self.scheduler.cancel_frame(handle);
                self.state = DriverState::Idle;
                debug!("frame driver stopped after {} frames", self.frames);
                true
            }
            DriverState::Idle => false,
        }
    }

    /// Forwards new surface bounds to the effect, keeping its state.
    pub fn resize(&mut self, width: usize, height: usize) {
        if let Some(effect) = self.effect.as_mut() {
            effect.resize(width, height);
        }
    }

    pub fn state(&self) -> DriverState<S::Handle> {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, DriverState::Running(_))
    }

    /// Frames rendered since construction.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn effect(&self) -> Option<&dyn Effect> {
        self.effect.as_deref()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }
}

impl<S: FrameScheduler> Drop for FrameDriver<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Scheduler whose callbacks are fired by the caller, one at a time.
///
/// Drives offline rendering and tests: `request_frame` records a pending
/// handle, `take_pending` consumes it as if the display had refreshed.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u32,
    pending: Option<u32>,
    cancelled: Vec<u32>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the pending callback, if any.
    pub fn take_pending(&mut self) -> Option<u32> {
        self.pending.take()
    }

    pub fn pending(&self) -> Option<u32> {
        self.pending
    }

    pub fn cancelled(&self) -> &[u32] {
        &self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    type Handle = u32;

    fn request_frame(&mut self) -> Result<u32, FxError> {
        self.next_id += 1;
        self.pending = Some(self.next_id);
        Ok(self.next_id)
    }

    fn cancel_frame(&mut self, handle: u32) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
        self.cancelled.push(handle);
    }
}

impl<S: FrameScheduler> FrameDriver<S> {
    /// One-line state summary for host logs.
    pub fn describe(&self) -> String {
        match self.state {
            DriverState::Idle => format!("idle after {} frames", self.frames),
            DriverState::Running(h) => format!("running ({h:?}) at frame {}", self.frames),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Hsla;
    use crate::pointer::PointerTracker;
    use crate::surface::recording::{DrawCall, RecordingSurface};
    use glam::DVec2;
    use serde_json::{json, Value};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Counts steps and remembers the pointer it saw; draws one dot.
    struct Counter {
        steps: usize,
        last_pointer: DVec2,
        bounds: (usize, usize),
    }

    impl Effect for Counter {
        fn step(&mut self, pointer: DVec2) {
            self.steps += 1;
            self.last_pointer = pointer;
        }

        fn render(&self, surface: &mut dyn Surface) {
            surface.fill_circle(self.last_pointer, 1.0, Hsla::new(0.0, 0.0, 1.0, 1.0));
        }

        fn resize(&mut self, width: usize, height: usize) {
            if width > 0 && height > 0 {
                self.bounds = (width, height);
            }
        }

        fn params(&self) -> Value {
            json!({"steps": self.steps, "width": self.bounds.0, "height": self.bounds.1})
        }

        fn param_schema(&self) -> Value {
            json!({})
        }
    }

    fn counting_driver(tracker: &PointerTracker) -> (FrameDriver<ManualScheduler>, Rc<RefCell<usize>>) {
        let builds = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&builds);
        let factory: EffectFactory = Box::new(move |w, h| {
            *counter.borrow_mut() += 1;
            Ok(Box::new(Counter {
                steps: 0,
                last_pointer: DVec2::ZERO,
                bounds: (w, h),
            }) as Box<dyn Effect>)
        });
        (
            FrameDriver::new(ManualScheduler::new(), tracker.reader(), factory),
            builds,
        )
    }

    #[test]
    fn zero_sized_surface_keeps_driver_idle() {
        let tracker = PointerTracker::new();
        let (mut driver, builds) = counting_driver(&tracker);
        assert!(matches!(driver.start(0, 300), Err(FxError::InvalidDimensions)));
        assert!(matches!(driver.start(300, 0), Err(FxError::InvalidDimensions)));
        assert_eq!(driver.state(), DriverState::Idle);
        assert_eq!(*builds.borrow(), 0);
        assert!(driver.scheduler().pending().is_none());
    }

    #[test]
    fn starts_once_the_surface_gains_a_size() {
        let tracker = PointerTracker::new();
        let (mut driver, builds) = counting_driver(&tracker);
        assert!(driver.start(0, 0).is_err());
        driver.start(640, 360).unwrap();
        assert!(driver.is_running());
        assert_eq!(*builds.borrow(), 1);
        assert_eq!(driver.effect().unwrap().params()["width"], 640);
    }

    #[test]
    fn start_schedules_exactly_one_frame() {
        let tracker = PointerTracker::new();
        let (mut driver, builds) = counting_driver(&tracker);
        driver.start(200, 100).unwrap();
        assert_eq!(driver.state(), DriverState::Running(1));
        assert_eq!(driver.scheduler().pending(), Some(1));
        driver.start(200, 100).unwrap();
        assert_eq!(driver.state(), DriverState::Running(1));
        assert_eq!(*builds.borrow(), 1);
    }

    #[test]
    fn each_frame_reschedules_then_updates_then_renders() {
        let tracker = PointerTracker::new();
        let (mut driver, _) = counting_driver(&tracker);
        let mut surface = RecordingSurface::new(200, 100);
        driver.start(200, 100).unwrap();

        tracker.record(7.0, 9.0);
        assert!(driver.on_frame(&mut surface).unwrap());
        assert_eq!(driver.state(), DriverState::Running(2));
        assert_eq!(surface.calls[0], DrawCall::Clear);
        assert!(matches!(
            surface.calls[1],
            DrawCall::Circle { center, .. } if center == DVec2::new(7.0, 9.0)
        ));
        assert!(driver.on_frame(&mut surface).unwrap());
        assert_eq!(driver.frames(), 2);
        assert_eq!(driver.effect().unwrap().params()["steps"], 2);
    }

    #[test]
    fn stop_cancels_pending_handle_and_ignores_late_callback() {
        let tracker = PointerTracker::new();
        let (mut driver, _) = counting_driver(&tracker);
        let mut surface = RecordingSurface::new(50, 50);
        driver.start(50, 50).unwrap();
        driver.on_frame(&mut surface).unwrap();

        assert!(driver.stop());
        assert_eq!(driver.state(), DriverState::Idle);
        assert_eq!(driver.scheduler().cancelled(), &[2]);
        assert!(driver.scheduler().pending().is_none());

        surface.calls.clear();
        assert!(!driver.on_frame(&mut surface).unwrap());
        assert!(surface.calls.is_empty());
        assert!(!driver.stop());
    }

    #[test]
    fn resize_keeps_effect_state() {
        let tracker = PointerTracker::new();
        let (mut driver, builds) = counting_driver(&tracker);
        let mut surface = RecordingSurface::new(100, 100);
        driver.start(100, 100).unwrap();
        driver.on_frame(&mut surface).unwrap();
        driver.resize(640, 480);

        let params = driver.effect().unwrap().params();
        assert_eq!(params["steps"], 1);
        assert_eq!(params["width"], 640);
        assert_eq!(*builds.borrow(), 1);
    }

    #[test]
    fn restart_after_stop_reuses_effect() {
        let tracker = PointerTracker::new();
        let (mut driver, builds) = counting_driver(&tracker);
        driver.start(10, 10).unwrap();
        driver.stop();
        driver.start(20, 20).unwrap();
        assert!(driver.is_running());
        assert_eq!(*builds.borrow(), 1);
        assert_eq!(driver.effect().unwrap().params()["width"], 20);
    }

    #[test]
    fn factory_error_leaves_driver_idle() {
        let tracker = PointerTracker::new();
        let factory: EffectFactory = Box::new(|_, _| Err(FxError::UnknownEffect("nope".into())));
        let mut driver = FrameDriver::new(ManualScheduler::new(), tracker.reader(), factory);
        assert!(matches!(driver.start(10, 10), Err(FxError::UnknownEffect(_))));
        assert!(!driver.is_running());
    }

    #[test]
    fn describe_reports_state() {
        let tracker = PointerTracker::new();
        let (mut driver, _) = counting_driver(&tracker);
        assert!(driver.describe().starts_with("idle"));
        driver.start(10, 10).unwrap();
        assert!(driver.describe().starts_with("running"));
    }
}
