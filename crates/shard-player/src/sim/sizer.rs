//! Viewport sizer for hosts without a window to measure

use shard_runtime::{Viewport, ViewportSizer};

/// Reports the surface size it was built with. Used by the headless runner.
pub struct FixedSizer {
    viewport: Viewport,
}

impl FixedSizer {
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport }
    }
}

impl ViewportSizer for FixedSizer {
    fn resize(&mut self) -> Viewport {
        self.viewport
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }
}
