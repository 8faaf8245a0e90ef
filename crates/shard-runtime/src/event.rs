//! Events raised by subsystems during their advancement call
//!
//! Subsystems never touch the lifecycle flags directly. They push a
//! [`GameEvent`] onto the frame's [`EventBus`] and the loop applies it once
//! the simulation step is done.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// The player made its first move.
    PlayerStarted,
    /// The player collided with an obstacle or left the course.
    PlayerLost,
}

/// Events collected during one active frame, in the order they were raised
#[derive(Debug, Default)]
pub struct EventBus {
    pending: Vec<GameEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.pending.push(event);
    }

    /// Take everything raised so far, leaving the bus empty
    #[must_use]
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn contains(&self, event: GameEvent) -> bool {
        self.pending.contains(&event)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}
