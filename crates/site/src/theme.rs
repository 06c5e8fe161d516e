//! Dark/light theme persisted under a single storage key.
//!
//! The stored value is read once at startup (absent or unrecognized means
//! dark) and written on every change.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};
use voicefx_core::error::FxError;

/// Storage key holding the theme name.
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Page background as 8-bit RGB.
    pub fn background_rgb(self) -> [u8; 3] {
        match self {
            Theme::Dark => [0x0b, 0x10, 0x20],
            Theme::Light => [0xf7, 0xf8, 0xfc],
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = FxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(FxError::ParamTypeMismatch {
                name: THEME_KEY.into(),
                expected: "dark | light".into(),
                got: other.into(),
            }),
        }
    }
}

/// Durable string storage, e.g. the browser's `localStorage`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, FxError>;
    fn set(&self, key: &str, value: &str) -> Result<(), FxError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, FxError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), FxError> {
        (**self).set(key, value)
    }
}

/// In-process store; stands in for browser storage offline and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, FxError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), FxError> {
        self.entries
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Current theme plus the store it is persisted to.
pub struct ThemeStore<S: KeyValueStore> {
    store: S,
    current: Theme,
}

impl<S: KeyValueStore> ThemeStore<S> {
    /// Loads the persisted theme. An unreadable store or unknown value falls
    /// back to dark.
    pub fn load(store: S) -> Self {
        let current = match store.get(THEME_KEY) {
            Ok(Some(value)) => value.parse::<Theme>().unwrap_or_else(|e| {
                warn!("ignoring stored theme: {e}");
                Theme::Dark
            }),
            Ok(None) => Theme::Dark,
            Err(e) => {
                warn!("theme storage unreadable, using dark: {e}");
                Theme::Dark
            }
        };
        Self { store, current }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    /// Switches theme and persists it. The in-memory theme changes even if
    /// the write fails; the error is returned for logging.
    pub fn set(&mut self, theme: Theme) -> Result<Theme, FxError> {
        self.current = theme;
        self.store.set(THEME_KEY, theme.as_str())?;
        Ok(theme)
    }

    pub fn toggle(&mut self) -> Result<Theme, FxError> {
        self.set(self.current.toggled())
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
