//! Platform abstraction traits so `stardust-core` stays host-agnostic.

use std::time::{Duration, Instant};

use glam::Vec2;

mod forwarder;
mod session;
mod ticker;

pub use forwarder::Forwarder;
pub use session::TrailSession;
pub use ticker::{IntervalTicker, DEFAULT_BACKLOG};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Messages delivered to the single owner of a trail engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// Pointer position in viewport pixels, stamped by the host when it saw the move.
    PointerMoved { pos: Vec2, at: Duration },
    Tick,
}

impl HostEvent {
    pub fn moved(pos: Vec2, at: Duration) -> Self {
        HostEvent::PointerMoved { pos, at }
    }
}

pub type EventSink = crossbeam_channel::Sender<HostEvent>;

/// Source of pointer-move events.
pub trait InputSource: Send {
    fn start(&mut self, sink: EventSink) -> Result<()>;
    fn stop(&mut self) -> Result<()>;
}

/// Periodic timer driving trail decay.
pub trait TickSource: Send {
    fn start(&mut self, sink: EventSink) -> Result<()>;
    fn stop(&mut self) -> Result<()>;
}

/// Monotonic host clock, used to stamp particles.
pub trait Clock: Send {
    fn now(&self) -> Duration;
}

/// Time since construction.
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}
