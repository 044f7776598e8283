use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{select, Sender};
use tracing::{debug, warn};

use crate::{EventSink, HostEvent, Result, TickSource};

/// Ticks are skipped while this many events wait unread.
pub const DEFAULT_BACKLOG: usize = 256;

struct Running {
    stop: Sender<()>,
    handle: JoinHandle<()>,
}

/// Sends `HostEvent::Tick` every `period` from a background thread.
///
/// The thread exits when stopped, when dropped, or as soon as the receiving
/// side of the sink is gone. While the owner is not pumping, at most `backlog`
/// events accumulate; further ticks are dropped.
pub struct IntervalTicker {
    period: Duration,
    backlog: usize,
    running: Option<Running>,
}

impl IntervalTicker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            backlog: DEFAULT_BACKLOG,
            running: None,
        }
    }

    pub fn with_backlog(mut self, backlog: usize) -> Self {
        self.backlog = backlog.max(1);
        self
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }
}

impl TickSource for IntervalTicker {
    fn start(&mut self, sink: EventSink) -> Result<()> {
        if self.running.is_some() {
            return Err("interval ticker already running".into());
        }
        let (stop, stop_requested) = crossbeam_channel::bounded::<()>(0);
        let ticks = crossbeam_channel::tick(self.period);
        let backlog = self.backlog;
        let handle = std::thread::Builder::new()
            .name("stardust-tick".into())
            .spawn(move || loop {
                select! {
                    recv(stop_requested) -> _ => break,
                    recv(ticks) -> _ => {
                        if sink.len() >= backlog {
                            continue;
                        }
                        if sink.send(HostEvent::Tick).is_err() {
                            debug!("tick sink closed; ticker exiting");
                            break;
                        }
                    }
                }
            })?;
        debug!(
            period_ms = self.period.as_millis() as u64,
            backlog, "interval ticker started"
        );
        self.running = Some(Running { stop, handle });
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        let Some(running) = self.running.take() else {
            return Ok(());
        };
        // Disconnecting the stop channel wakes the select.
        drop(running.stop);
        running
            .handle
            .join()
            .map_err(|_| "tick thread panicked")?;
        debug!("interval ticker stopped");
        Ok(())
    }
}

impl Drop for IntervalTicker {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            warn!("failed to stop interval ticker: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_without_start_is_a_no_op() {
        let mut ticker = IntervalTicker::new(Duration::from_millis(50));
        assert!(ticker.stop().is_ok());
        assert!(!ticker.is_running());
    }

    #[test]
    fn double_start_is_rejected() {
        let (sink, _events) = crossbeam_channel::unbounded();
        let mut ticker = IntervalTicker::new(Duration::from_millis(50));
        ticker.start(sink.clone()).unwrap();
        assert!(ticker.start(sink).is_err());
        ticker.stop().unwrap();
    }

    #[test]
    fn unread_ticks_stop_at_the_backlog() {
        let (sink, events) = crossbeam_channel::unbounded();
        let mut ticker = IntervalTicker::new(Duration::from_millis(1)).with_backlog(3);
        ticker.start(sink).unwrap();
        std::thread::sleep(Duration::from_millis(60));
        ticker.stop().unwrap();
        assert_eq!(events.len(), 3);
        assert!(events.try_iter().all(|event| event == HostEvent::Tick));
    }
}
