//! Cancellable timers for the plan-scan debounce and the work-timer tick.
//!
//! Both hand their firings to the owner over an unbounded `mpsc` channel so
//! that every mutation still happens on the owner's single event loop.

use notestack_core::AppConfig;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Fires once after `delay` of quiet. Each `trigger` restarts the wait.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<()>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                delay,
                pending: None,
                tx,
            },
            rx,
        )
    }

    /// Debouncer for plan scans at the configured delay.
    pub fn for_plan(config: &AppConfig) -> (Self, mpsc::UnboundedReceiver<()>) {
        Self::new(config.effective_plan_debounce())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn trigger(&mut self) {
        self.cancel();
        let tx = self.tx.clone();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            time::sleep(delay).await;
            if tx.send(()).is_err() {
                tracing::debug!("Debounce receiver dropped");
            }
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Periodic tick source. The first tick arrives one period after `start`.
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    task: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<()>,
}

impl Ticker {
    pub fn new(period: Duration) -> (Self, mpsc::UnboundedReceiver<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                period,
                task: None,
                tx,
            },
            rx,
        )
    }

    /// Ticker for the work timer at the configured cadence.
    pub fn for_timer(config: &AppConfig) -> (Self, mpsc::UnboundedReceiver<()>) {
        Self::new(config.effective_timer_tick())
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn start(&mut self) {
        self.stop();
        let tx = self.tx.clone();
        let period = self.period;
        self.task = Some(tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if tx.send(()).is_err() {
                    break;
                }
            }
        }));
        tracing::debug!(period_ms = period.as_millis() as u64, "Ticker started");
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("Ticker stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}
