//! Host container binding.
//!
//! A chart never caches its width: every layout pass asks the live container
//! again, so hosts that resize their container only need to call `resize`.

use std::cell::Cell;
use std::rc::Rc;

/// Element a chart is bound to.
pub trait HostContainer {
    /// Full client width of the container, including its own padding.
    fn client_width(&self) -> f64;

    /// Sum of the container's left and right padding.
    fn horizontal_padding(&self) -> f64 {
        0.0
    }

    /// Width available to the chart.
    fn content_width(&self) -> f64 {
        (self.client_width() - self.horizontal_padding()).max(0.0)
    }
}

/// In-memory container for headless hosts and tests.
///
/// Clones share the same width cell, so a host can keep one handle and
/// resize the container a chart is bound to.
#[derive(Debug, Clone)]
pub struct FixedContainer {
    width: Rc<Cell<f64>>,
    padding: Rc<Cell<f64>>,
}

impl FixedContainer {
    #[must_use]
    pub fn new(width: f64) -> Self {
        Self {
            width: Rc::new(Cell::new(width)),
            padding: Rc::new(Cell::new(0.0)),
        }
    }

    #[must_use]
    pub fn with_horizontal_padding(self, padding: f64) -> Self {
        self.padding.set(padding);
        self
    }

    pub fn set_width(&self, width: f64) {
        self.width.set(width);
    }
}

impl HostContainer for FixedContainer {
    fn client_width(&self) -> f64 {
        self.width.get()
    }

    fn horizontal_padding(&self) -> f64 {
        self.padding.get()
    }
}
