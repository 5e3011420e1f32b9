//! Single-session countdown engine.
//!
//! The engine owns its tick schedule: it asks the [`Scheduler`] for one
//! periodic schedule per session and cancels it when the session ends.
//! Ticks are counted in logical seconds, so the wall-clock period of the
//! schedule only affects how fast a session runs, not its length.

use crate::core::clock::{ScheduleToken, Scheduler};
use crate::core::repository::PomodoroLedger;
use crate::errors::AppResult;
use crate::models::progress::Progress;
use crate::utils::time::{MILLIS_PER_SECOND, format_mm_ss, minutes_to_millis};
use std::time::Duration;
use tracing::{debug, warn};

/// Logical time added by every tick.
pub const TICK_MILLIS: u64 = MILLIS_PER_SECOND;

/// Longest session accepted from the command line or the config file.
pub const MAX_POMODORO_MINUTES: u64 = 24 * 60;

/// A stopped session passes straight back to `Idle`; only the
/// [`TimerEvent::Stopped`] event records that it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerSession {
    pub task_id: i64,
    pub elapsed_ms: u64,
    pub duration_ms: u64,
    pub token: ScheduleToken,
}

#[derive(Debug)]
pub enum TimerEvent {
    Progress(Progress),
    /// The session ran to its end; `commit` is the outcome of recording it.
    Completed { task_id: i64, commit: AppResult<i64> },
    Stopped { task_id: i64, elapsed_ms: u64 },
}

pub struct TimerEngine<'l, S: Scheduler> {
    scheduler: S,
    ledger: &'l dyn PomodoroLedger,
    duration_ms: u64,
    period: Duration,
    state: TimerState,
    session: Option<TimerSession>,
    next_token: u64,
}

impl<'l, S: Scheduler> TimerEngine<'l, S> {
    pub fn new(scheduler: S, ledger: &'l dyn PomodoroLedger, duration_ms: u64) -> Self {
        Self {
            scheduler,
            ledger,
            duration_ms,
            period: Duration::from_millis(TICK_MILLIS),
            state: TimerState::Idle,
            session: None,
            next_token: 0,
        }
    }

    pub fn with_minutes(scheduler: S, ledger: &'l dyn PomodoroLedger, minutes: u64) -> Self {
        Self::new(scheduler, ledger, minutes_to_millis(minutes))
    }

    /// Wall-clock period between ticks (one second unless overridden).
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn session(&self) -> Option<&TimerSession> {
        self.session.as_ref()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.session.as_ref().map_or(0, |s| s.elapsed_ms)
    }

    pub fn progress(&self) -> Option<Progress> {
        self.session
            .as_ref()
            .map(|s| Progress::new(s.task_id, s.elapsed_ms, s.duration_ms))
    }

    /// Countdown display, `MM:SS`. A fresh session shows the full duration.
    pub fn remaining_display(&self) -> String {
        format_mm_ss(self.duration_ms.saturating_sub(self.elapsed_ms()))
    }

    /// Begin tracking `task_id`.
    ///
    /// A session already running is stopped first; its `Stopped` event is returned.
    pub fn start(&mut self, task_id: i64) -> Option<TimerEvent> {
        let preempted = self.stop();

        self.next_token += 1;
        let token = ScheduleToken(self.next_token);
        self.session = Some(TimerSession {
            task_id,
            elapsed_ms: 0,
            duration_ms: self.duration_ms,
            token,
        });
        self.state = TimerState::Running;
        self.scheduler.schedule(token, self.period);

        debug!(task_id, token = token.0, "timer started");
        preempted
    }

    /// Advance the current session by one tick.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        let token = self.session.as_ref().map(|s| s.token)?;
        self.on_tick(token)
    }

    /// Handle a tick delivered by the schedule identified by `token`.
    /// Ticks from any other schedule, or while not running, are ignored.
    pub fn on_tick(&mut self, token: ScheduleToken) -> Option<TimerEvent> {
        if self.state != TimerState::Running {
            return None;
        }

        let (task_id, elapsed_ms, duration_ms) = {
            let session = self.session.as_mut()?;
            if session.token != token {
                debug!(token = token.0, "stale tick ignored");
                return None;
            }
            session.elapsed_ms = (session.elapsed_ms + TICK_MILLIS).min(session.duration_ms);
            (session.task_id, session.elapsed_ms, session.duration_ms)
        };

        if elapsed_ms < duration_ms {
            return Some(TimerEvent::Progress(Progress::new(
                task_id,
                elapsed_ms,
                duration_ms,
            )));
        }

        self.state = TimerState::Completed;
        self.scheduler.cancel(token);
        debug!(task_id, "timer completed");

        let commit = self.ledger.increment_pomodoro(task_id);
        if let Err(e) = &commit {
            warn!(task_id, error = %e, "completed pomodoro could not be recorded");
        }

        Some(TimerEvent::Completed { task_id, commit })
    }

    /// Abandon the running session without recording it; the engine is idle again.
    pub fn stop(&mut self) -> Option<TimerEvent> {
        if self.state != TimerState::Running {
            return None;
        }

        let session = self.session.take()?;
        let (task_id, elapsed_ms, token) = (session.task_id, session.elapsed_ms, session.token);

        self.scheduler.cancel(token);
        self.state = TimerState::Idle;
        debug!(task_id, elapsed_ms, "timer stopped");

        Some(TimerEvent::Stopped {
            task_id,
            elapsed_ms,
        })
    }

    /// Back to idle, dropping a completed session.
    pub fn reset(&mut self) {
        self.stop();
        self.state = TimerState::Idle;
        self.session = None;
    }
}

impl<S: Scheduler> Drop for TimerEngine<'_, S> {
    fn drop(&mut self) {
        if let Some(session) = &self.session
            && self.state == TimerState::Running
        {
            self.scheduler.cancel(session.token);
        }
    }
}
