use parking_lot::Mutex;
use tokio::sync::mpsc;

pub type EventSender = mpsc::UnboundedSender<EmoteEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<EmoteEvent>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmoteEvent {
    /// The emote db finished loading.
    IndexLoaded { entries: usize, yields: usize },
    /// The emote db could not be loaded. The index keeps whatever it had.
    IndexLoadFailed(String),
    Enabled,
    Disabled,
    FavouritesChanged,
}

/// Fans events out to every live subscriber.
///
/// A subscription lasts as long as its receiver. Dropped receivers are
/// forgotten on the next [`EventBus::emit`].
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Mutex<Vec<EventSender>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> EventReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().push(tx);
        rx
    }

    pub fn emit(&self, event: EmoteEvent) {
        self.subscribers.lock().retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_subscriber_gets_events() {
        let bus = EventBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        bus.emit(EmoteEvent::Enabled);

        assert_eq!(first.try_recv().ok(), Some(EmoteEvent::Enabled));
        assert_eq!(second.try_recv().ok(), Some(EmoteEvent::Enabled));
        assert!(first.try_recv().is_err());
    }

    #[test]
    fn dropped_receivers_are_pruned() {
        let bus = EventBus::new();
        let kept = bus.subscribe();
        drop(bus.subscribe());
        assert_eq!(bus.subscriber_count(), 2);

        bus.emit(EmoteEvent::Disabled);
        assert_eq!(bus.subscriber_count(), 1);
        drop(kept);
    }
}
