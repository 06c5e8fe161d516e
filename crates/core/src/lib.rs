#![deny(unsafe_code)]
//! Core types and traits for the voicefx animated canvases.
//!
//! Provides the `Effect` and `Surface` traits, the `FrameDriver` state
//! machine with its `FrameScheduler` seam, the `PointerTracker`, `Hsla`
//! colors, the `Xorshift64` PRNG, JSON parameter helpers, and `FxError`.

pub mod color;
pub mod driver;
pub mod effect;
pub mod error;
pub mod params;
pub mod pointer;
pub mod prng;
pub mod surface;

pub use color::Hsla;
pub use driver::{DriverState, EffectFactory, FrameDriver, FrameScheduler, ManualScheduler};
pub use effect::Effect;
pub use error::FxError;
pub use pointer::{PointerReader, PointerTracker};
pub use prng::Xorshift64;
pub use surface::Surface;
