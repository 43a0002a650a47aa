//! The controller that owns the clock, the countdown and their tickers.

use crate::common::{TickerId, TickerKind};
use crate::components::alert::CompletionAlert;
use crate::components::clock::{ClockState, ClockTicker};
use crate::components::timer::{
    StartOutcome, TickOutcome, TimerConfiguration, TimerEngine, TimerPhase, TimerSnapshot,
};
use crate::config::{AlertConfig, ClockTimerConfig};
use crate::error::TimerError;
use crate::events::{ClockEvent, RejectionNotice, SystemEvent, TimerEvent};
use crate::time::TickerHandle;
use slotmap::SlotMap;
use std::ops::ControlFlow;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

struct ScheduledTicker {
    kind: TickerKind,
    handle: TickerHandle,
}

/// The countdown plus the id of the one ticker allowed to decrement it.
struct TimerSlot {
    engine: TimerEngine,
    ticker: Option<TickerId>,
}

/// The main clocktimer engine.
///
/// This struct is the single logical owner of the clock and timer state. It
/// is cheap to clone; clones are handles to the same instance. Every timer
/// transition runs while holding the timer lock, and the timer lock is always
/// taken before the ticker registry, never after.
#[derive(Clone)]
pub struct ClockTimerEngine {
    config: Arc<ClockTimerConfig>,
    clock: Arc<RwLock<ClockTicker>>,
    timer: Arc<RwLock<TimerSlot>>,
    tickers: Arc<RwLock<SlotMap<TickerId, ScheduledTicker>>>,
    alert: Arc<CompletionAlert>,
    system_event_sender: broadcast::Sender<SystemEvent>,
    clock_event_sender: broadcast::Sender<ClockEvent>,
    timer_event_sender: broadcast::Sender<TimerEvent>,
}

// Core implementation block for internal logic.
impl ClockTimerEngine {
    /// Creates an engine whose completion alert is built from the configuration.
    pub fn new(config: ClockTimerConfig) -> Self {
        Self::with_alert(config, CompletionAlert::from_config)
    }

    /// Creates an engine with a caller-supplied completion alert.
    ///
    /// `build_alert` receives the timer event sender so a notifier can publish
    /// on the engine's own stream.
    pub fn with_alert(
        config: ClockTimerConfig,
        build_alert: impl FnOnce(&AlertConfig, broadcast::Sender<TimerEvent>) -> CompletionAlert,
    ) -> Self {
        const CHANNEL_CAPACITY: usize = 256;
        let (system_event_sender, _) = broadcast::channel(64);
        let (clock_event_sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (timer_event_sender, _) = broadcast::channel(CHANNEL_CAPACITY);

        let alert = build_alert(&config.alert, timer_event_sender.clone());

        Self {
            config: Arc::new(config),
            clock: Arc::new(RwLock::new(ClockTicker::new())),
            timer: Arc::new(RwLock::new(TimerSlot {
                engine: TimerEngine::new(),
                ticker: None,
            })),
            tickers: Arc::new(RwLock::new(SlotMap::with_key())),
            alert: Arc::new(alert),
            system_event_sender,
            clock_event_sender,
            timer_event_sender,
        }
    }

    /// Replaces the clock ticker, e.g. with one reading a pinned time source.
    pub fn with_clock_ticker(mut self, ticker: ClockTicker) -> Self {
        self.clock = Arc::new(RwLock::new(ticker));
        self
    }

    /// Runs the clock until a shutdown signal is received, then tears down.
    pub async fn run(&self) -> anyhow::Result<()> {
        info!("ClockTimerEngine starting up...");
        self.start_clock().await;
        self.system_event_sender
            .send(SystemEvent::EngineStarted {
                timestamp: Instant::now(),
            })
            .ok();

        info!(
            "Engine running at a {:?} cadence. Press Ctrl+C to shut down.",
            self.config.tick_interval()
        );
        tokio::signal::ctrl_c().await?;

        info!("Shutdown signal received. Cancelling all tickers...");
        self.shutdown().await;
        Ok(())
    }

    #[doc(hidden)]
    async fn on_clock_tick(&self) {
        let state = self.clock.write().await.tick();
        trace!(time = %state.current_time, "Clock tick.");
        self.clock_event_sender.send(ClockEvent::Tick(state)).ok();
    }

    #[doc(hidden)]
    async fn on_timer_tick(&self, id: TickerId) -> ControlFlow<()> {
        let mut slot = self.timer.write().await;
        if slot.ticker != Some(id) {
            debug!(?id, "Superseded timer ticker stopping.");
            return ControlFlow::Break(());
        }
        match slot.engine.tick() {
            TickOutcome::Decremented => {
                let snapshot = slot.engine.snapshot();
                self.timer_event_sender
                    .send(TimerEvent::Tick(snapshot))
                    .ok();
                ControlFlow::Continue(())
            }
            TickOutcome::Completed => {
                let snapshot = slot.engine.snapshot();
                slot.ticker = None;
                info!(duration = snapshot.state.duration_seconds, "Countdown complete.");
                self.timer_event_sender
                    .send(TimerEvent::Completed(snapshot))
                    .ok();
                drop(slot);
                // Playback runs detached; the timer lock is already released.
                self.alert.fire();
                self.retire_ticker(id).await;
                ControlFlow::Break(())
            }
            TickOutcome::Ignored => {
                slot.ticker = None;
                drop(slot);
                self.retire_ticker(id).await;
                ControlFlow::Break(())
            }
        }
    }

    #[doc(hidden)]
    async fn start_locked(&self, slot: &mut TimerSlot) -> Result<StartOutcome, TimerError> {
        match slot.engine.start() {
            Ok(StartOutcome::AlreadyRunning) => {
                debug!("Start ignored; the countdown is already running.");
                Ok(StartOutcome::AlreadyRunning)
            }
            Ok(outcome) => {
                slot.ticker = Some(self.schedule_timer_ticker().await);
                let snapshot = slot.engine.snapshot();
                let event = if outcome == StartOutcome::Resumed {
                    info!(remaining = snapshot.state.remaining_seconds, "Countdown resumed.");
                    TimerEvent::Resumed(snapshot)
                } else {
                    info!(duration = snapshot.state.duration_seconds, "Countdown started.");
                    TimerEvent::Started(snapshot)
                };
                self.timer_event_sender.send(event).ok();
                Ok(outcome)
            }
            Err(e) => {
                warn!(error = %e, "Start rejected.");
                self.timer_event_sender
                    .send(TimerEvent::Rejected(RejectionNotice {
                        title: self.config.alert.invalid_title.clone(),
                        message: self.config.alert.invalid_message.clone(),
                    }))
                    .ok();
                Err(e)
            }
        }
    }

    /// Schedules the decrement stream, cancelling any previous one first.
    #[doc(hidden)]
    async fn schedule_timer_ticker(&self) -> TickerId {
        let period = self.config.tick_interval();
        let mut tickers = self.tickers.write().await;
        self.cancel_kind(&mut tickers, TickerKind::Timer);
        let id = tickers.insert_with_key(|id| {
            let engine = self.clone();
            ScheduledTicker {
                kind: TickerKind::Timer,
                handle: TickerHandle::spawn(period, move || {
                    let engine = engine.clone();
                    async move { engine.on_timer_tick(id).await }
                }),
            }
        });
        self.system_event_sender
            .send(SystemEvent::TickerScheduled {
                id,
                kind: TickerKind::Timer,
            })
            .ok();
        id
    }

    #[doc(hidden)]
    fn cancel_kind(&self, tickers: &mut SlotMap<TickerId, ScheduledTicker>, kind: TickerKind) {
        let ids: Vec<TickerId> = tickers
            .iter()
            .filter(|(_, ticker)| ticker.kind == kind)
            .map(|(id, _)| id)
            .collect();
        for id in ids {
            if let Some(mut ticker) = tickers.remove(id) {
                ticker.handle.cancel();
                self.system_event_sender
                    .send(SystemEvent::TickerCancelled { id, kind })
                    .ok();
            }
        }
    }

    #[doc(hidden)]
    async fn cancel_ticker(&self, id: TickerId) -> bool {
        let removed = self.tickers.write().await.remove(id);
        match removed {
            Some(mut ticker) => {
                ticker.handle.cancel();
                self.system_event_sender
                    .send(SystemEvent::TickerCancelled {
                        id,
                        kind: ticker.kind,
                    })
                    .ok();
                true
            }
            None => false,
        }
    }

    /// Forgets a ticker that is ending on its own, without aborting it.
    #[doc(hidden)]
    async fn retire_ticker(&self, id: TickerId) {
        let removed = self.tickers.write().await.remove(id);
        if let Some(ticker) = removed {
            let kind = ticker.kind;
            ticker.handle.release();
            self.system_event_sender
                .send(SystemEvent::TickerCancelled { id, kind })
                .ok();
        }
    }
}

// Public API implementation block.
impl ClockTimerEngine {
    /// Starts the clock ticker, replacing any running one.
    pub async fn start_clock(&self) -> TickerId {
        let period = self.config.tick_interval();
        let mut tickers = self.tickers.write().await;
        self.cancel_kind(&mut tickers, TickerKind::Clock);
        let engine = self.clone();
        let id = tickers.insert(ScheduledTicker {
            kind: TickerKind::Clock,
            handle: TickerHandle::spawn(period, move || {
                let engine = engine.clone();
                async move {
                    engine.on_clock_tick().await;
                    ControlFlow::Continue(())
                }
            }),
        });
        self.system_event_sender
            .send(SystemEvent::TickerScheduled {
                id,
                kind: TickerKind::Clock,
            })
            .ok();
        id
    }

    /// Re-reads the system clock immediately and publishes the result.
    pub async fn manual_refresh(&self) -> ClockState {
        let state = self.clock.write().await.manual_refresh();
        debug!(time = %state.current_time, "Clock refreshed on request.");
        self.clock_event_sender
            .send(ClockEvent::Refreshed(state))
            .ok();
        state
    }

    /// Replaces the timer configuration.
    ///
    /// Returns `false` and leaves the configuration untouched while a
    /// countdown is running or paused.
    pub async fn configure(&self, configuration: TimerConfiguration) -> bool {
        self.timer.write().await.engine.configure(configuration)
    }

    /// Starts a fresh countdown from the stored configuration, or resumes a paused one.
    ///
    /// A zero duration is rejected with `TimerError::InvalidDuration`; the
    /// rejection is also published as `TimerEvent::Rejected`.
    pub async fn start(&self) -> Result<StartOutcome, TimerError> {
        let mut slot = self.timer.write().await;
        self.start_locked(&mut slot).await
    }

    /// Applies `configuration` (if no countdown is active) and starts.
    pub async fn start_with(
        &self,
        configuration: TimerConfiguration,
    ) -> Result<StartOutcome, TimerError> {
        let mut slot = self.timer.write().await;
        slot.engine.configure(configuration);
        self.start_locked(&mut slot).await
    }

    /// Resumes a paused countdown. Returns `false` if nothing was paused.
    pub async fn resume(&self) -> bool {
        let mut slot = self.timer.write().await;
        if slot.engine.phase() != TimerPhase::Paused {
            debug!(phase = %slot.engine.phase(), "Resume ignored.");
            return false;
        }
        matches!(
            self.start_locked(&mut slot).await,
            Ok(StartOutcome::Resumed)
        )
    }

    /// Pauses a running countdown. Returns `false` if it was not running.
    pub async fn pause(&self) -> bool {
        let mut slot = self.timer.write().await;
        if !slot.engine.pause() {
            debug!(phase = %slot.engine.phase(), "Pause ignored.");
            return false;
        }
        if let Some(id) = slot.ticker.take() {
            self.cancel_ticker(id).await;
        }
        let snapshot = slot.engine.snapshot();
        info!(remaining = snapshot.state.remaining_seconds, "Countdown paused.");
        self.timer_event_sender
            .send(TimerEvent::Paused(snapshot))
            .ok();
        true
    }

    /// Stops any countdown and zeroes the timer and its configuration.
    pub async fn reset(&self) {
        let mut slot = self.timer.write().await;
        if let Some(id) = slot.ticker.take() {
            self.cancel_ticker(id).await;
        }
        slot.engine.reset();
        info!("Timer reset.");
        self.timer_event_sender
            .send(TimerEvent::Reset(slot.engine.snapshot()))
            .ok();
    }

    /// Cancels every ticker. A running countdown is left paused.
    pub async fn shutdown(&self) {
        {
            let mut tickers = self.tickers.write().await;
            for (id, mut ticker) in tickers.drain() {
                ticker.handle.cancel();
                self.system_event_sender
                    .send(SystemEvent::TickerCancelled {
                        id,
                        kind: ticker.kind,
                    })
                    .ok();
            }
        }
        {
            let mut slot = self.timer.write().await;
            slot.ticker = None;
            slot.engine.pause();
        }
        self.system_event_sender
            .send(SystemEvent::EngineShutdown)
            .ok();
        info!("ClockTimerEngine has shut down.");
    }

    pub async fn clock_state(&self) -> ClockState {
        self.clock.read().await.state()
    }

    pub async fn timer_snapshot(&self) -> TimerSnapshot {
        self.timer.read().await.engine.snapshot()
    }

    /// Lists tickers that are still running.
    pub async fn active_tickers(&self) -> Vec<(TickerId, TickerKind)> {
        self.tickers
            .read()
            .await
            .iter()
            .filter(|(_, ticker)| ticker.handle.is_active())
            .map(|(id, ticker)| (id, ticker.kind))
            .collect()
    }

    pub fn config(&self) -> &ClockTimerConfig {
        &self.config
    }

    /// Subscribes to the `SystemEvent` stream.
    pub fn subscribe_system_events(&self) -> broadcast::Receiver<SystemEvent> {
        self.system_event_sender.subscribe()
    }

    /// Subscribes to the `ClockEvent` stream.
    pub fn subscribe_clock_events(&self) -> broadcast::Receiver<ClockEvent> {
        self.clock_event_sender.subscribe()
    }

    /// Subscribes to the `TimerEvent` stream.
    pub fn subscribe_timer_events(&self) -> broadcast::Receiver<TimerEvent> {
        self.timer_event_sender.subscribe()
    }
}
