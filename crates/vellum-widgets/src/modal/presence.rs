#![forbid(unsafe_code)]

//! Mount/unmount tracking that outlives the "shown" flag.
//!
//! A modal stops being *present* the moment its exit starts, but stays
//! *mounted* (attached, rendered) until the exit transition finishes.
//!
//! ```text
//! Unmounted --mount--> Entering --enter_complete--> Present
//!     ^                   |  ^                         |
//!     |                  exit |                       exit
//!     |                   v   mount                    v
//!     +---exit_complete-- Exiting <--------------------+
//! ```

/// Where a modal is in its enter/exit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresencePhase {
    #[default]
    Unmounted,
    /// Enter transition running.
    Entering,
    /// Fully shown.
    Present,
    /// Exit transition running; still mounted.
    Exiting,
}

/// Presence state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Presence {
    phase: PresencePhase,
}

impl Presence {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: PresencePhase::Unmounted,
        }
    }

    #[must_use]
    pub fn phase(&self) -> PresencePhase {
        self.phase
    }

    /// Shown and not leaving.
    #[must_use]
    pub fn is_present(&self) -> bool {
        matches!(self.phase, PresencePhase::Entering | PresencePhase::Present)
    }

    /// Attached to the overlay, including while exiting.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.phase != PresencePhase::Unmounted
    }

    /// Start (or reverse into) the enter transition.
    pub fn mount(&mut self) -> bool {
        match self.phase {
            PresencePhase::Unmounted | PresencePhase::Exiting => {
                self.phase = PresencePhase::Entering;
                true
            }
            PresencePhase::Entering | PresencePhase::Present => false,
        }
    }

    pub fn enter_complete(&mut self) -> bool {
        self.transition(PresencePhase::Entering, PresencePhase::Present)
    }

    /// Start the exit transition.
    pub fn exit(&mut self) -> bool {
        match self.phase {
            PresencePhase::Entering | PresencePhase::Present => {
                self.phase = PresencePhase::Exiting;
                true
            }
            PresencePhase::Unmounted | PresencePhase::Exiting => false,
        }
    }

    pub fn exit_complete(&mut self) -> bool {
        self.transition(PresencePhase::Exiting, PresencePhase::Unmounted)
    }

    fn transition(&mut self, from: PresencePhase, to: PresencePhase) -> bool {
        if self.phase == from {
            self.phase = to;
            true
        } else {
            false
        }
    }
}
