//! Stack collapse: a twist tween and a detach schedule running side by side.
//!
//! The tween's completion ends the animation; whatever the detach schedule has
//! not reached by then is swept up by the caller.

use std::time::Duration;

use bevy::time::{Timer, TimerMode};

use super::Tween;

/// What changed during one [`RemovalAnimation::advance`] call.
#[derive(Clone, Debug, PartialEq)]
pub struct RemovalStep {
    /// Current twist angle, before the per-index offset.
    pub rotation: f32,
    /// Stack indices to detach this frame, top-most first.
    pub detached: Vec<usize>,
    pub finished: bool,
}

#[derive(Clone, Debug)]
struct DetachSchedule {
    timer: Timer,
    next: Option<usize>,
}

impl DetachSchedule {
    fn new(len: usize, duration: Duration) -> Self {
        let ticks = u32::try_from(len).unwrap_or(u32::MAX);
        let period = (duration / ticks).max(Duration::from_nanos(1));
        Self {
            timer: Timer::new(period, TimerMode::Repeating),
            next: len.checked_sub(1),
        }
    }

    fn advance(&mut self, delta: Duration) -> Vec<usize> {
        self.timer.tick(delta);
        let mut detached = Vec::new();
        for _ in 0..self.timer.times_finished_this_tick() {
            let Some(index) = self.next else {
                break;
            };
            detached.push(index);
            self.next = index.checked_sub(1);
        }
        detached
    }
}

/// Drives the collapse of a stack of `len` blocks.
#[derive(Clone, Debug)]
pub struct RemovalAnimation {
    rotation: Tween,
    detach: DetachSchedule,
}

impl RemovalAnimation {
    /// Returns `None` for an empty stack: there is nothing to schedule.
    pub fn new(len: usize, duration: Duration, target_rotation: f32) -> Option<Self> {
        if len == 0 {
            return None;
        }
        Some(Self {
            rotation: Tween::new(0.0, target_rotation, duration),
            detach: DetachSchedule::new(len, duration),
        })
    }

    pub fn period(&self) -> Duration {
        self.timer().duration()
    }

    /// Index of the block the next detach tick will remove, if any remain.
    pub fn next_detach(&self) -> Option<usize> {
        self.detach.next
    }

    pub fn advance(&mut self, delta: Duration) -> RemovalStep {
        let detached = self.detach.advance(delta);
        let rotation = self.rotation.advance(delta);
        RemovalStep {
            rotation,
            detached,
            finished: self.rotation.finished(),
        }
    }

    fn timer(&self) -> &Timer {
        &self.detach.timer
    }
}
