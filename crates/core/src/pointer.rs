//! Latest pointer position, shared between one writer and many readers.
//!
//! The host's pointer-move listener owns the [`PointerTracker`] and is the
//! only writer. Each animated canvas receives a [`PointerReader`] at
//! construction and takes one snapshot at the top of every frame.

use std::cell::Cell;
use std::rc::Rc;

use glam::DVec2;

/// Records the most recent pointer coordinates. Starts at the origin.
#[derive(Debug, Default)]
pub struct PointerTracker {
    position: Rc<Cell<DVec2>>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the stored position with the latest pointer-move coordinates.
    pub fn record(&self, x: f64, y: f64) {
        self.position.set(DVec2::new(x, y));
    }

    pub fn position(&self) -> DVec2 {
        self.position.get()
    }

    /// A read-only handle onto the same position.
    pub fn reader(&self) -> PointerReader {
        PointerReader {
            position: Rc::clone(&self.position),
        }
    }
}

/// Read-only view of a [`PointerTracker`].
#[derive(Debug, Clone)]
pub struct PointerReader {
    position: Rc<Cell<DVec2>>,
}

impl PointerReader {
    /// A reader pinned to a fixed position, for offline rendering.
    pub fn fixed(x: f64, y: f64) -> Self {
        Self {
            position: Rc::new(Cell::new(DVec2::new(x, y))),
        }
    }

    pub fn position(&self) -> DVec2 {
        self.position.get()
    }
}
