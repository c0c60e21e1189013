//! Input events and the per-tick input snapshot
//!
//! UI handlers push events at any time; the queue is drained exactly once per
//! tick, before physics.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::consts::INPUT_QUEUE_CAPACITY;

/// Discrete events from the UI collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Click/tap/key: jump on the next tick if supported
    Jump,
    /// Held state of the left control
    MoveLeft(bool),
    /// Held state of the right control
    MoveRight(bool),
    /// Leave the idle state
    Start,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub jump: bool,
    pub move_left: bool,
    pub move_right: bool,
    /// Demo mode - the autopilot decides when to jump
    pub autopilot: bool,
}

impl TickInput {
    /// -1, 0 or 1 depending on held lateral controls
    pub fn steer(&self) -> f32 {
        match (self.move_left, self.move_right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Result of draining the queue for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Drained {
    pub input: TickInput,
    pub start: bool,
}

/// Bounded FIFO of pending events plus held control state
#[derive(Debug, Clone)]
pub struct InputQueue {
    events: VecDeque<InputEvent>,
    capacity: usize,
    left_held: bool,
    right_held: bool,
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new(INPUT_QUEUE_CAPACITY)
    }
}

impl InputQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
            left_held: false,
            right_held: false,
        }
    }

    /// Queue an event; returns `false` (and drops it) when full
    pub fn push(&mut self, event: InputEvent) -> bool {
        if self.events.len() >= self.capacity {
            log::warn!("Input queue full, dropping {:?}", event);
            return false;
        }
        self.events.push_back(event);
        true
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Fold every pending event into one tick's input
    ///
    /// Any number of jump events collapse into a single request.
    pub fn drain(&mut self) -> Drained {
        let mut drained = Drained::default();
        for event in self.events.drain(..) {
            match event {
                InputEvent::Jump => drained.input.jump = true,
                InputEvent::MoveLeft(held) => self.left_held = held,
                InputEvent::MoveRight(held) => self.right_held = held,
                InputEvent::Start => drained.start = true,
            }
        }
        drained.input.move_left = self.left_held;
        drained.input.move_right = self.right_held;
        drained
    }

    /// Forget pending events and release held controls
    pub fn clear(&mut self) {
        self.events.clear();
        self.left_held = false;
        self.right_held = false;
    }
}
