use std::sync::{Arc, Mutex};

use crate::{EventSink, HostEvent, InputSource, Result, TickSource};

/// Event source fed by the host itself.
///
/// Clones share one slot: the session owns one clone and starts/stops it, the
/// host keeps another and calls [`Forwarder::forward`] from its own event loop.
#[derive(Clone, Default)]
pub struct Forwarder {
    sink: Arc<Mutex<Option<EventSink>>>,
}

impl Forwarder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.sink.lock().map(|slot| slot.is_some()).unwrap_or(false)
    }

    /// Returns `false` when no active session is listening.
    pub fn forward(&self, event: HostEvent) -> bool {
        let Ok(slot) = self.sink.lock() else {
            return false;
        };
        match slot.as_ref() {
            Some(sink) => sink.send(event).is_ok(),
            None => false,
        }
    }

    fn connect(&self, sink: EventSink) -> Result<()> {
        let mut slot = self.sink.lock().map_err(|_| "forwarder lock poisoned")?;
        if slot.is_some() {
            return Err("forwarder already connected".into());
        }
        *slot = Some(sink);
        Ok(())
    }

    fn disconnect(&self) -> Result<()> {
        let mut slot = self.sink.lock().map_err(|_| "forwarder lock poisoned")?;
        *slot = None;
        Ok(())
    }
}

impl InputSource for Forwarder {
    fn start(&mut self, sink: EventSink) -> Result<()> {
        self.connect(sink)
    }

    fn stop(&mut self) -> Result<()> {
        self.disconnect()
    }
}

impl TickSource for Forwarder {
    fn start(&mut self, sink: EventSink) -> Result<()> {
        self.connect(sink)
    }

    fn stop(&mut self) -> Result<()> {
        self.disconnect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwards_only_while_connected() {
        let host = Forwarder::new();
        let mut owned = host.clone();
        assert!(!host.forward(HostEvent::Tick));

        let (sink, events) = crossbeam_channel::unbounded();
        InputSource::start(&mut owned, sink).unwrap();
        assert!(host.is_connected());
        assert!(host.forward(HostEvent::Tick));
        assert_eq!(events.try_recv(), Ok(HostEvent::Tick));

        InputSource::stop(&mut owned).unwrap();
        assert!(!host.forward(HostEvent::Tick));
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn second_connect_is_rejected() {
        let mut owned = Forwarder::new();
        let (sink, _events) = crossbeam_channel::unbounded();
        TickSource::start(&mut owned, sink.clone()).unwrap();
        assert!(TickSource::start(&mut owned, sink).is_err());
    }
}
