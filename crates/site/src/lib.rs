#![deny(unsafe_code)]
//! Landing-page state that has behavior beyond static markup.
//!
//! - [`config`]: webhook, booking, and contact settings.
//! - [`theme`]: dark/light theme persisted through a [`theme::KeyValueStore`].
//! - [`lead`]: the lead form, its webhook payload, and the outcome banner.
//! - [`ui`]: booking modal, mobile nav drawer, FAQ accordion, anchor links,
//!   each declaring its own accessibility attributes.

pub mod config;
pub mod lead;
pub mod theme;
pub mod ui;

pub use config::SiteConfig;
pub use lead::{LeadForm, LeadSubmission, SubmitOutcome};
pub use theme::{KeyValueStore, MemoryStore, Theme, ThemeStore};
