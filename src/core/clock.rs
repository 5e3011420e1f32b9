//! Periodic tick sources for the timer engine.
//!
//! A schedule is identified by a [`ScheduleToken`]. Every tick a scheduler
//! delivers carries the token of the schedule that produced it, which lets
//! the engine drop ticks coming from a schedule it already cancelled.

use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScheduleToken(pub u64);

pub trait Scheduler {
    /// Start delivering `token` every `period`.
    fn schedule(&mut self, token: ScheduleToken, period: Duration);
    /// Stop delivering `token`. Unknown tokens are ignored.
    fn cancel(&mut self, token: ScheduleToken);
}

/// Scheduler backed by tokio tasks; ticks arrive on an mpsc channel.
///
/// Must be used from within a tokio runtime.
pub struct TokioScheduler {
    tx: UnboundedSender<ScheduleToken>,
    tasks: HashMap<ScheduleToken, JoinHandle<()>>,
}

impl TokioScheduler {
    pub fn new(tx: UnboundedSender<ScheduleToken>) -> Self {
        Self {
            tx,
            tasks: HashMap::new(),
        }
    }

    pub fn active(&self) -> usize {
        self.tasks.len()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, token: ScheduleToken, period: Duration) {
        self.cancel(token);

        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(token).is_err() {
                    break;
                }
            }
        });

        debug!(token = token.0, ?period, "tick schedule started");
        self.tasks.insert(token, handle);
    }

    fn cancel(&mut self, token: ScheduleToken) {
        if let Some(handle) = self.tasks.remove(&token) {
            handle.abort();
            debug!(token = token.0, "tick schedule cancelled");
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

/// Scheduler that only records what it was asked to do.
/// Ticks are delivered by hand through the engine.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    active: Vec<ScheduleToken>,
    scheduled: usize,
    cancelled: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules currently delivering ticks.
    pub fn active(&self) -> &[ScheduleToken] {
        &self.active
    }

    pub fn scheduled_count(&self) -> usize {
        self.scheduled
    }

    pub fn cancelled_count(&self) -> usize {
        self.cancelled
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, token: ScheduleToken, _period: Duration) {
        if !self.active.contains(&token) {
            self.active.push(token);
        }
        self.scheduled += 1;
    }

    fn cancel(&mut self, token: ScheduleToken) {
        let before = self.active.len();
        self.active.retain(|t| *t != token);
        if self.active.len() != before {
            self.cancelled += 1;
        }
    }
}
