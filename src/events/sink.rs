use super::Event;

/// Receives events published by the engine. Implemented for crossbeam
/// senders; hosts plug in their own sinks for custom transport.
pub trait EventSink {
    fn send_event(&self, event: Event);
}

impl EventSink for crossbeam::channel::Sender<Event> {
    fn send_event(&self, event: Event) {
        // A disconnected receiver just drops the event.
        let _ = self.send(event);
    }
}
