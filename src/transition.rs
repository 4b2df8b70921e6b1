//! Animated transitions between displayed values.
//!
//! The engine never runs on its own. Starting an animation hands back a
//! [`FrameTask`]; the host runs it on its next display refresh through
//! [`TransitionEngine::advance`], and reschedules it for as long as the
//! outcome asks for more frames. Every new animation bumps the engine epoch,
//! so tasks belonging to a superseded animation fall through as
//! [`FrameOutcome::Stale`].

use std::time::{Duration, Instant};

/// Length of one value transition.
pub const TRANSITION_DURATION: Duration = Duration::from_millis(300);

/// Quartic ease-in/ease-out.
///
/// `t` is the elapsed time, `b` the start value, `c` the total change and `d`
/// the duration, all in the same unit. `ease_in_out_quart(d, b, c, d)` is
/// exactly `b + c`.
pub fn ease_in_out_quart(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / (d / 2.0);
    if t < 1.0 {
        return c / 2.0 * t * t * t * t + b;
    }
    let t = t - 2.0;
    -c / 2.0 * (t * t * t * t - 2.0) + b
}

/// Mutable state of one gauge instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeState {
    /// Value the liquid currently shows.
    pub current_value: f64,
    /// Last value requested by the caller, unclamped.
    pub target_value: f64,
    pub canvas_width: f64,
    pub canvas_height: f64,
}

impl GaugeState {
    pub fn new(min: f64) -> Self {
        Self {
            current_value: min,
            target_value: min,
            canvas_width: 0.0,
            canvas_height: 0.0,
        }
    }
}

/// Continuation of one animation, valid while its epoch is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTask {
    epoch: u64,
}

impl FrameTask {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Arranges for a frame task to run once on the next display refresh.
pub trait FrameScheduler {
    fn schedule_frame(&mut self, task: FrameTask);
}

/// Scheduler backed by a queue the host drains each refresh.
#[derive(Debug, Default)]
pub struct FrameQueue {
    pending: Vec<FrameTask>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns every task scheduled so far.
    pub fn take(&mut self) -> Vec<FrameTask> {
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl FrameScheduler for FrameQueue {
    fn schedule_frame(&mut self, task: FrameTask) {
        self.pending.push(task);
    }
}

fn millis(duration: Duration) -> f64 {
    duration.as_nanos() as f64 / 1_000_000.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Animating { from: f64, to: f64, started: Instant },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// The task belongs to a superseded animation: draw nothing.
    Stale,
    /// Redraw at `value`; reschedule the task unless `finished`.
    Draw { value: f64, finished: bool },
}

#[derive(Debug)]
pub struct TransitionEngine {
    phase: Phase,
    epoch: u64,
    primed: bool,
    duration: Duration,
}

impl Default for TransitionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitionEngine {
    pub fn new() -> Self {
        Self::with_duration(TRANSITION_DURATION)
    }

    pub fn with_duration(duration: Duration) -> Self {
        Self {
            phase: Phase::Idle,
            epoch: 0,
            primed: false,
            duration,
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.phase, Phase::Animating { .. })
    }

    /// Whether a value has ever been set.
    pub fn is_primed(&self) -> bool {
        self.primed
    }

    /// Starts moving towards `value` from whatever is displayed right now.
    ///
    /// The very first value is shown immediately and yields no task.
    pub fn set_target(
        &mut self,
        state: &mut GaugeState,
        value: f64,
        now: Instant,
    ) -> Option<FrameTask> {
        state.target_value = value;
        self.epoch += 1;
        if !self.primed {
            self.primed = true;
            state.current_value = value;
            self.phase = Phase::Idle;
            log::debug!("first value {value}, no transition");
            return None;
        }
        log::debug!(
            "transition {} -> {value} (epoch {})",
            state.current_value,
            self.epoch
        );
        self.phase = Phase::Animating {
            from: state.current_value,
            to: value,
            started: now,
        };
        Some(FrameTask { epoch: self.epoch })
    }

    /// Invalidates every outstanding task and stops animating.
    pub fn cancel(&mut self) {
        self.epoch += 1;
        self.phase = Phase::Idle;
    }

    /// Runs one frame of the animation `task` belongs to.
    pub fn advance(
        &mut self,
        task: FrameTask,
        state: &mut GaugeState,
        now: Instant,
    ) -> FrameOutcome {
        if task.epoch != self.epoch {
            log::trace!("dropping stale frame (epoch {} != {})", task.epoch, self.epoch);
            return FrameOutcome::Stale;
        }
        let Phase::Animating { from, to, started } = self.phase else {
            return FrameOutcome::Stale;
        };

        let elapsed = now.saturating_duration_since(started).min(self.duration);
        let duration_ms = millis(self.duration);
        let value = if duration_ms > 0.0 {
            ease_in_out_quart(millis(elapsed), from, to - from, duration_ms)
        } else {
            to
        };
        log::trace!("frame at {:?}: {value}", elapsed);

        if elapsed >= self.duration || value == to {
            state.current_value = to;
            self.phase = Phase::Idle;
            return FrameOutcome::Draw {
                value: to,
                finished: true,
            };
        }
        state.current_value = value;
        FrameOutcome::Draw {
            value,
            finished: false,
        }
    }
}
