use std::time::Duration;

use crossbeam_channel::Receiver;
use stardust_core::{RandomSource, TrailEngine, TrailSnapshot};
use tracing::{info, warn};

use crate::{Clock, HostEvent, InputSource, Result, TickSource};

/// One activation of a trail engine together with its listener and timer.
///
/// The engine is only mutated from [`TrailSession::pump`], on the thread that
/// owns the session. Sources deliver events through a channel whose receiver
/// lives exactly as long as the activation, so nothing they send after
/// [`TrailSession::stop`] can reach the engine.
pub struct TrailSession<R: RandomSource> {
    engine: TrailEngine<R>,
    input: Box<dyn InputSource>,
    ticker: Box<dyn TickSource>,
    clock: Box<dyn Clock>,
    events: Option<Receiver<HostEvent>>,
}

impl<R: RandomSource> TrailSession<R> {
    pub fn new(
        engine: TrailEngine<R>,
        input: impl InputSource + 'static,
        ticker: impl TickSource + 'static,
        clock: impl Clock + 'static,
    ) -> Self {
        Self {
            engine,
            input: Box::new(input),
            ticker: Box::new(ticker),
            clock: Box::new(clock),
            events: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.events.is_some()
    }

    /// Resets the engine, starts the timer, then registers the listener.
    ///
    /// If the listener fails to register, the timer is stopped again before
    /// the error is returned.
    pub fn start(&mut self) -> Result<()> {
        if self.is_active() {
            warn!("trail session already active; ignoring start");
            return Ok(());
        }
        self.engine.reset();
        let (sink, events) = crossbeam_channel::unbounded();
        self.ticker.start(sink.clone())?;
        if let Err(err) = self.input.start(sink) {
            if let Err(stop_err) = self.ticker.stop() {
                warn!("failed to stop ticker after listener error: {stop_err}");
            }
            return Err(err);
        }
        self.events = Some(events);
        info!(
            tick_period_ms = self.engine.preset().tick_period_ms,
            spawn_per_move = self.engine.preset().spawn_per_move,
            "trail session started"
        );
        Ok(())
    }

    /// Drops pending events and releases the listener and timer.
    ///
    /// Both are released even if one of them fails; the first error is returned.
    pub fn stop(&mut self) -> Result<()> {
        let Some(events) = self.events.take() else {
            return Ok(());
        };
        let discarded = events.len();
        drop(events);
        let input = self.input.stop();
        let ticker = self.ticker.stop();
        info!(
            discarded,
            particles = self.engine.particles().len(),
            "trail session stopped"
        );
        input.and(ticker)
    }

    /// Applies every queued event in arrival order. Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let Some(events) = &self.events else {
            return 0;
        };
        let mut applied = 0;
        for event in events.try_iter() {
            match event {
                HostEvent::PointerMoved { pos, at } => self.engine.handle_move(pos, at),
                HostEvent::Tick => self.engine.handle_tick(),
            }
            applied += 1;
        }
        applied
    }

    pub fn snapshot(&self) -> TrailSnapshot<'_> {
        self.engine.snapshot()
    }

    pub fn engine(&self) -> &TrailEngine<R> {
        &self.engine
    }

    /// Current session time, for stamping [`HostEvent::PointerMoved`].
    pub fn now(&self) -> Duration {
        self.clock.now()
    }
}

impl<R: RandomSource> Drop for TrailSession<R> {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            warn!("failed to stop trail session on drop: {err}");
        }
    }
}
