//! Countdown over the focused notes' planned minutes.
//!
//! The timer holds no schedule of its own: the owner calls [`WorkTimer::tick`]
//! at its cadence (see [`crate::driver::SessionDriver`]) and remaining time is
//! derived from the injected clock on every call.

use chrono::{DateTime, Utc};
use notestack_core::{Clock, NotestackError, NotestackResult};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pace {
    Faster,
    Slower,
    Exact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub planned_minutes: u32,
    pub actual_minutes: i64,
    /// Planned minus actual; positive means time to spare.
    pub difference_minutes: i64,
    pub pace: Pace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Expired(SessionSummary),
    FinishedEarly(SessionSummary),
}

impl TimerEvent {
    pub fn summary(&self) -> &SessionSummary {
        match self {
            TimerEvent::Expired(summary) | TimerEvent::FinishedEarly(summary) => summary,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ActiveSession {
    /// Rebased on every recalculation; the summary measures from here.
    start_time: DateTime<Utc>,
    total_seconds: i64,
    total_paused_ms: i64,
    pause_start: Option<DateTime<Utc>>,
    initial_planned_minutes: u32,
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Idle,
    Active(ActiveSession),
}

pub struct WorkTimer {
    phase: Phase,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for WorkTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkTimer").field("phase", &self.phase).finish()
    }
}

impl WorkTimer {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            phase: Phase::Idle,
            clock,
        }
    }

    pub fn state(&self) -> TimerState {
        match &self.phase {
            Phase::Idle => TimerState::Idle,
            Phase::Active(s) if s.pause_start.is_some() => TimerState::Paused,
            Phase::Active(_) => TimerState::Running,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Active(_))
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        match &self.phase {
            Phase::Active(s) => Some(s.start_time),
            Phase::Idle => None,
        }
    }

    pub fn initial_planned_minutes(&self) -> Option<u32> {
        match &self.phase {
            Phase::Active(s) => Some(s.initial_planned_minutes),
            Phase::Idle => None,
        }
    }

    pub fn total_seconds(&self) -> Option<i64> {
        match &self.phase {
            Phase::Active(s) => Some(s.total_seconds),
            Phase::Idle => None,
        }
    }

    pub fn start(&mut self, focused_minutes: u32) -> NotestackResult<()> {
        if self.is_active() {
            return Err(NotestackError::Validation(
                "timer is already running".to_string(),
            ));
        }
        if focused_minutes == 0 {
            return Err(NotestackError::Validation(
                "no focused minutes to time".to_string(),
            ));
        }
        let now = self.clock.now();
        self.phase = Phase::Active(ActiveSession {
            start_time: now,
            total_seconds: i64::from(focused_minutes) * 60,
            total_paused_ms: 0,
            pause_start: None,
            initial_planned_minutes: focused_minutes,
        });
        tracing::info!(planned_minutes = focused_minutes, "Timer started");
        Ok(())
    }

    pub fn pause(&mut self) -> bool {
        let now = self.clock.now();
        match &mut self.phase {
            Phase::Active(s) if s.pause_start.is_none() => {
                s.pause_start = Some(now);
                tracing::debug!("Timer paused");
                true
            }
            _ => false,
        }
    }

    pub fn resume(&mut self) -> bool {
        let now = self.clock.now();
        match &mut self.phase {
            Phase::Active(s) => match s.pause_start.take() {
                Some(paused_at) => {
                    s.total_paused_ms += (now - paused_at).num_milliseconds();
                    tracing::debug!(total_paused_ms = s.total_paused_ms, "Timer resumed");
                    true
                }
                None => false,
            },
            Phase::Idle => false,
        }
    }

    /// Remaining milliseconds, frozen while paused and never negative.
    pub fn remaining_ms(&self) -> Option<i64> {
        let Phase::Active(s) = &self.phase else {
            return None;
        };
        let until = s.pause_start.unwrap_or_else(|| self.clock.now());
        let elapsed = (until - s.start_time).num_milliseconds() - s.total_paused_ms;
        Some((s.total_seconds * 1000 - elapsed).max(0))
    }

    /// Check for expiry. Paused timers never expire.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if self.state() != TimerState::Running {
            return None;
        }
        if self.remaining_ms()? > 0 {
            return None;
        }
        let summary = self.finish()?;
        tracing::info!(actual_minutes = summary.actual_minutes, "Timer expired");
        Some(TimerEvent::Expired(summary))
    }

    /// Rebase onto a freshly computed focused-minutes sum. The new plan
    /// starts now; a sum of zero ends the session early.
    pub fn recalculate(&mut self, focused_minutes: u32) -> Option<TimerEvent> {
        if !self.is_active() {
            return None;
        }
        if focused_minutes == 0 {
            let summary = self.finish()?;
            tracing::info!(actual_minutes = summary.actual_minutes, "Work finished early");
            return Some(TimerEvent::FinishedEarly(summary));
        }
        let now = self.clock.now();
        if let Phase::Active(s) = &mut self.phase {
            s.start_time = now;
            s.total_seconds = i64::from(focused_minutes) * 60;
            s.total_paused_ms = 0;
            if s.pause_start.is_some() {
                s.pause_start = Some(now);
            }
            tracing::debug!(planned_minutes = focused_minutes, "Timer recalculated");
        }
        None
    }

    /// Go idle without a summary, discarding all timing state.
    pub fn stop(&mut self) -> bool {
        let was_active = self.is_active();
        self.phase = Phase::Idle;
        if was_active {
            tracing::info!("Timer stopped");
        }
        was_active
    }

    fn finish(&mut self) -> Option<SessionSummary> {
        let Phase::Active(s) = std::mem::replace(&mut self.phase, Phase::Idle) else {
            return None;
        };
        let elapsed_ms = (self.clock.now() - s.start_time).num_milliseconds();
        let actual_minutes = (elapsed_ms as f64 / 60_000.0).round() as i64;
        let difference_minutes = i64::from(s.initial_planned_minutes) - actual_minutes;
        let pace = match difference_minutes {
            d if d > 0 => Pace::Faster,
            d if d < 0 => Pace::Slower,
            _ => Pace::Exact,
        };
        Some(SessionSummary {
            planned_minutes: s.initial_planned_minutes,
            actual_minutes,
            difference_minutes,
            pace,
        })
    }
}
