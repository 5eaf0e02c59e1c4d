#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Monotonic level clock that reports normalized progress and phase boundaries.

use std::time::Duration;

/// Accumulates elapsed level time.
#[derive(Clone, Debug)]
pub struct LevelClock {
    elapsed: Duration,
    level_duration: Duration,
}

impl LevelClock {
    /// Creates a clock for a level lasting `level_duration`.
    #[must_use]
    pub const fn new(level_duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            level_duration,
        }
    }

    /// Advances the clock by `dt`, saturating at [`Duration::MAX`].
    pub fn advance(&mut self, dt: Duration) -> ClockStep {
        let before = self.elapsed;
        self.elapsed = self.elapsed.saturating_add(dt);
        ClockStep {
            before,
            after: self.elapsed,
            level_duration: self.level_duration,
        }
    }

    /// Total level time elapsed so far.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Elapsed time divided by the level duration, not clamped above one.
    #[must_use]
    pub fn progress(&self) -> f32 {
        progress_of(self.elapsed, self.level_duration)
    }
}

/// Interval of level time covered by a single [`LevelClock::advance`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockStep {
    before: Duration,
    after: Duration,
    level_duration: Duration,
}

impl ClockStep {
    /// Elapsed time when the step ended.
    #[must_use]
    pub const fn after(&self) -> Duration {
        self.after
    }

    /// Length of the step.
    #[must_use]
    pub fn delta(&self) -> Duration {
        self.after - self.before
    }

    /// Portion of the step that falls before the end of the level.
    #[must_use]
    pub fn in_level(&self) -> Duration {
        let end = self.after.min(self.level_duration);
        end.saturating_sub(self.before)
    }

    /// Progress once the step has been applied.
    #[must_use]
    pub fn progress_at_end(&self) -> f32 {
        progress_of(self.after, self.level_duration)
    }

    /// Reports whether this step reached the end of the level.
    #[must_use]
    pub fn reached_level_end(&self) -> bool {
        self.before < self.level_duration && self.after >= self.level_duration
    }
}

fn progress_of(elapsed: Duration, level_duration: Duration) -> f32 {
    if level_duration.is_zero() {
        return f32::INFINITY;
    }
    (elapsed.as_secs_f64() / level_duration.as_secs_f64()) as f32
}
