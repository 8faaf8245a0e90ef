//! Game lifecycle: started/lost/paused flags and their transitions.
//!
//! The flags are private; the only way to change them is through the
//! transition methods, each of which reports whether it had any effect.
//! Redundant calls (pausing while lost, restarting while not lost, losing
//! twice) are resolved as [`Transition::Ignored`], never as errors.

/// Coarse lifecycle phase derived from the flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Not started, not lost, not paused.
    Idle,
    /// Started and simulating.
    Running,
    /// Simulation frozen by the player; reversible with another toggle.
    Paused,
    /// Simulation frozen by a loss; only a restart leaves this phase.
    Lost,
}

impl Phase {
    /// True when the loop must skip simulation this frame.
    pub fn is_frozen(self) -> bool {
        matches!(self, Phase::Paused | Phase::Lost)
    }
}

/// Outcome of a lifecycle action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Transition {
    /// State changed.
    Applied,
    /// Call was redundant with the current state; nothing changed.
    Ignored,
}

impl Transition {
    pub fn is_applied(self) -> bool {
        self == Transition::Applied
    }
}

/// Lifecycle flags for one game session.
///
/// `has_lost` and `is_paused` are independent: both gate simulation, only a
/// loss shows the game-over surface. Neither is ever set while `has_started`
/// is false, so losing or pausing also marks the game as started.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifecycleState {
    has_started: bool,
    has_lost: bool,
    is_paused: bool,
}

impl LifecycleState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_started(&self) -> bool {
        self.has_started
    }

    pub fn has_lost(&self) -> bool {
        self.has_lost
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    /// True when simulation must not advance.
    pub fn is_frozen(&self) -> bool {
        self.has_lost || self.is_paused
    }

    pub fn phase(&self) -> Phase {
        if self.has_lost {
            Phase::Lost
        } else if self.is_paused {
            Phase::Paused
        } else if self.has_started {
            Phase::Running
        } else {
            Phase::Idle
        }
    }

    /// Record the first enabling condition (e.g. first player movement).
    pub fn mark_started(&mut self) -> Transition {
        if self.has_started || self.has_lost {
            return Transition::Ignored;
        }
        self.has_started = true;
        Transition::Applied
    }

    /// Enter the lost phase. Idempotent.
    pub fn lose(&mut self) -> Transition {
        if self.has_lost {
            return Transition::Ignored;
        }
        self.has_lost = true;
        self.has_started = true;
        Transition::Applied
    }

    /// Flip the pause flag. Ignored while lost.
    pub fn toggle_pause(&mut self) -> Transition {
        if self.has_lost {
            return Transition::Ignored;
        }
        self.is_paused = !self.is_paused;
        if self.is_paused {
            self.has_started = true;
        }
        Transition::Applied
    }

    /// Clear every flag. Only valid from the lost phase.
    pub fn restart(&mut self) -> Transition {
        if !self.has_lost {
            return Transition::Ignored;
        }
        *self = Self::default();
        Transition::Applied
    }
}
