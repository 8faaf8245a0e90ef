//! Presentation that records the overlay state and logs transitions

use log::info;
use shard_runtime::Presentation;

#[derive(Debug, Default)]
pub struct LogPresentation {
    game_over_visible: bool,
    pointer_captured: bool,
}

impl LogPresentation {
    /// Starts with the pointer captured, as a windowed host would after a click
    pub fn captured() -> Self {
        Self {
            game_over_visible: false,
            pointer_captured: true,
        }
    }

    pub fn game_over_visible(&self) -> bool {
        self.game_over_visible
    }

    pub fn pointer_captured(&self) -> bool {
        self.pointer_captured
    }
}

impl Presentation for LogPresentation {
    fn show_game_over(&mut self) {
        self.game_over_visible = true;
        info!("game over");
    }

    fn hide_game_over(&mut self) {
        self.game_over_visible = false;
    }

    fn release_pointer_capture(&mut self) {
        self.pointer_captured = false;
    }
}
