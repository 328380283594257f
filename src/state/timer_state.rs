//! Countdown timer state machine for work sessions

use serde::{Deserialize, Serialize};

/// Why the countdown is (or is not) advancing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    Stopped,
    Running,
    PausedManually,
    PausedForIdle,
}

impl TimerPhase {
    pub fn is_paused(&self) -> bool {
        matches!(self, TimerPhase::PausedManually | TimerPhase::PausedForIdle)
    }
}

/// Signals raised by the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TimerEvent {
    Updated { remaining: u64 },
    Finished,
}

/// Point-in-time view of the countdown, as returned over the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: TimerPhase,
    pub duration_seconds: u64,
    pub remaining_seconds: u64,
}

impl TimerSnapshot {
    /// Fraction of the session still left, 1.0 at the start
    pub fn progress(&self) -> f64 {
        if self.duration_seconds == 0 {
            return 0.0;
        }
        self.remaining_seconds as f64 / self.duration_seconds as f64
    }
}

/// Work session countdown.
///
/// The timer itself never schedules anything: the owner calls [`tick`] once
/// per second while [`phase`] is `Running`. Every entry into `Running`
/// bumps [`run_id`] so ticks belonging to an earlier run can be discarded.
///
/// [`tick`]: CountdownTimer::tick
/// [`phase`]: CountdownTimer::phase
/// [`run_id`]: CountdownTimer::run_id
#[derive(Debug, Clone)]
pub struct CountdownTimer {
    duration: u64,
    remaining: u64,
    phase: TimerPhase,
    run_id: u64,
}

impl CountdownTimer {
    /// Create a stopped timer. A zero duration is clamped to one second.
    pub fn new(duration_seconds: u64) -> Self {
        let duration = duration_seconds.max(1);
        Self {
            duration,
            remaining: duration,
            phase: TimerPhase::Stopped,
            run_id: 0,
        }
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase,
            duration_seconds: self.duration,
            remaining_seconds: self.remaining,
        }
    }

    fn enter_running(&mut self) {
        self.phase = TimerPhase::Running;
        self.run_id = self.run_id.wrapping_add(1);
    }

    /// Begin counting down. Returns false if the timer was not stopped.
    pub fn start(&mut self) -> bool {
        if self.phase != TimerPhase::Stopped {
            return false;
        }
        self.enter_running();
        true
    }

    /// Stop and reset the remaining time to the full duration
    pub fn stop(&mut self) {
        self.phase = TimerPhase::Stopped;
        self.remaining = self.duration;
    }

    /// Manual pause. Upgrades an idle pause so that activity will not resume it.
    pub fn pause(&mut self) -> bool {
        match self.phase {
            TimerPhase::Running | TimerPhase::PausedForIdle => {
                self.phase = TimerPhase::PausedManually;
                true
            }
            TimerPhase::Stopped | TimerPhase::PausedManually => false,
        }
    }

    /// Manual resume from either kind of pause
    pub fn resume(&mut self) -> bool {
        if !self.phase.is_paused() {
            return false;
        }
        self.enter_running();
        true
    }

    /// Pause/resume toggle used by the single pause button
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            TimerPhase::Running => self.pause(),
            TimerPhase::PausedManually | TimerPhase::PausedForIdle => self.resume(),
            TimerPhase::Stopped => false,
        }
    }

    pub fn pause_for_idle(&mut self) -> bool {
        if self.phase != TimerPhase::Running {
            return false;
        }
        self.phase = TimerPhase::PausedForIdle;
        true
    }

    pub fn resume_from_idle(&mut self) -> bool {
        if self.phase != TimerPhase::PausedForIdle {
            return false;
        }
        self.enter_running();
        true
    }

    /// Advance by one second.
    ///
    /// Yields nothing unless running. Reaching zero yields `Updated { remaining: 0 }`
    /// followed by `Finished` and leaves the timer stopped at full duration.
    pub fn tick(&mut self) -> Vec<TimerEvent> {
        if self.phase != TimerPhase::Running {
            return Vec::new();
        }

        self.remaining = self.remaining.saturating_sub(1);
        let mut events = vec![TimerEvent::Updated { remaining: self.remaining }];

        if self.remaining == 0 {
            self.stop();
            events.push(TimerEvent::Finished);
        }
        events
    }

    /// Change the work duration. Remaining time never exceeds the new duration.
    pub fn set_duration(&mut self, duration_seconds: u64) {
        self.duration = duration_seconds.max(1);
        if self.phase == TimerPhase::Stopped {
            self.remaining = self.duration;
        } else {
            self.remaining = self.remaining.min(self.duration);
        }
    }
}
