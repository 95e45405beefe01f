//! Async owner of a [`Session`] that runs the work-timer tick and the
//! debounced plan scan on the session's single event loop.

use notestack_core::{AppConfig, KeyValueStore, NotestackResult};
use tokio::sync::mpsc;

use crate::plan::{PlanDocument, PlanScan};
use crate::schedule::{Debouncer, Ticker};
use crate::session::Session;
use crate::timer::TimerEvent;

#[derive(Debug, Clone, PartialEq)]
pub enum DriverEvent {
    /// The timer is still counting down.
    Tick { remaining_ms: i64 },
    /// The timer expired; ticking has stopped.
    TimerFinished(TimerEvent),
    /// The last edited plan was parsed; `document` carries the markers.
    PlanScanned { document: PlanDocument, scan: PlanScan },
}

pub struct SessionDriver<S: KeyValueStore> {
    session: Session<S>,
    ticker: Ticker,
    ticks: mpsc::UnboundedReceiver<()>,
    debouncer: Debouncer,
    debounced: mpsc::UnboundedReceiver<()>,
    pending_plan: Option<PlanDocument>,
}

impl<S: KeyValueStore> SessionDriver<S> {
    pub fn new(session: Session<S>, config: &AppConfig) -> Self {
        let (ticker, ticks) = Ticker::for_timer(config);
        let (debouncer, debounced) = Debouncer::for_plan(config);
        Self {
            session,
            ticker,
            ticks,
            debouncer,
            debounced,
            pending_plan: None,
        }
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    pub fn into_session(self) -> Session<S> {
        self.session
    }

    /// Run a session mutation. Ticking stops if it ended the timer.
    pub fn update<R>(&mut self, mutate: impl FnOnce(&mut Session<S>) -> R) -> R {
        let result = mutate(&mut self.session);
        self.sync_ticker();
        result
    }

    pub fn start_timer(&mut self) -> NotestackResult<()> {
        self.session.start_timer()?;
        self.ticker.start();
        Ok(())
    }

    pub fn stop_timer(&mut self) -> bool {
        let was_active = self.session.stop_timer();
        self.stop_ticking();
        was_active
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_running()
    }

    /// Queue `document` for parsing once edits go quiet. A newer edit
    /// replaces the queued one and restarts the wait.
    pub fn edit_plan(&mut self, document: PlanDocument) {
        self.pending_plan = Some(document);
        while self.debounced.try_recv().is_ok() {}
        self.debouncer.trigger();
    }

    pub fn has_pending_plan(&self) -> bool {
        self.pending_plan.is_some()
    }

    /// Parse the queued plan now instead of waiting for the debounce.
    pub fn flush_plan(&mut self) -> Option<NotestackResult<DriverEvent>> {
        self.debouncer.cancel();
        while self.debounced.try_recv().is_ok() {}
        self.scan_pending()
    }

    /// Wait for the next tick or debounced parse. Returns `None` once both
    /// sources are closed.
    pub async fn next_event(&mut self) -> Option<NotestackResult<DriverEvent>> {
        loop {
            tokio::select! {
                Some(()) = self.ticks.recv() => {
                    if let Some(event) = self.on_tick() {
                        return Some(Ok(event));
                    }
                }
                Some(()) = self.debounced.recv() => {
                    if let Some(result) = self.scan_pending() {
                        return Some(result);
                    }
                }
                else => return None,
            }
        }
    }

    fn on_tick(&mut self) -> Option<DriverEvent> {
        if let Some(event) = self.session.tick_timer() {
            self.stop_ticking();
            return Some(DriverEvent::TimerFinished(event));
        }
        match self.session.timer().remaining_ms() {
            Some(remaining_ms) => Some(DriverEvent::Tick { remaining_ms }),
            None => {
                self.stop_ticking();
                None
            }
        }
    }

    fn scan_pending(&mut self) -> Option<NotestackResult<DriverEvent>> {
        let mut document = self.pending_plan.take()?;
        let result = self.session.scan_plan_document(&mut document);
        self.sync_ticker();
        Some(result.map(|scan| DriverEvent::PlanScanned { document, scan }))
    }

    fn sync_ticker(&mut self) {
        if self.ticker.is_running() && !self.session.timer().is_active() {
            self.stop_ticking();
        }
    }

    /// Stop the ticker and drop ticks it already queued.
    fn stop_ticking(&mut self) {
        self.ticker.stop();
        while self.ticks.try_recv().is_ok() {}
    }
}
