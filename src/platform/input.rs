//! Discrete input events
//!
//! Events arrive whenever the presentation layer sees them and are queued;
//! the queue collapses into one `TickInput` at the start of the next tick.

use std::collections::VecDeque;

use crate::sim::TickInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    MoveLeft,
    MoveRight,
    Jump,
    Restart,
    /// Stop the tick loop entirely
    Quit,
}

/// Events queued since the last tick
#[derive(Debug, Default)]
pub struct InputQueue {
    events: VecDeque<InputEvent>,
    autopilot: bool,
}

/// Result of draining the queue
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Drained {
    pub input: TickInput,
    pub quit: bool,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue with the built-in pilot steering every tick
    pub fn with_autopilot() -> Self {
        Self {
            autopilot: true,
            ..Self::default()
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Collapse queued events into the next tick's input.
    ///
    /// Lanes move at most one step per tick, so opposite moves cancel.
    pub fn drain(&mut self) -> Drained {
        let mut drained = Drained::default();
        drained.input.autopilot = self.autopilot;

        for event in self.events.drain(..) {
            match event {
                InputEvent::MoveLeft => drained.input.move_left = true,
                InputEvent::MoveRight => drained.input.move_right = true,
                InputEvent::Jump => drained.input.jump = true,
                InputEvent::Restart => drained.input.restart = true,
                InputEvent::Quit => drained.quit = true,
            }
        }

        if drained.input.move_left && drained.input.move_right {
            drained.input.move_left = false;
            drained.input.move_right = false;
        }

        drained
    }
}
