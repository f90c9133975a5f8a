//! Motion event source.
//!
//! `MotionBus` stands in for the platform `devicemotion` event target. The
//! platform side publishes events; a running session holds a
//! `MotionSubscription`. Dropping the subscription detaches the listener,
//! after which published events reach nobody.

use tokio::sync::broadcast;
use tracing::warn;

use crate::types::MotionEvent;

/// Broadcast source of motion events.
#[derive(Debug, Clone)]
pub struct MotionBus {
    tx: broadcast::Sender<MotionEvent>,
}

impl MotionBus {
    /// Creates a bus buffering up to `capacity` events per listener.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Delivers an event to every attached listener.
    ///
    /// Returns the number of listeners reached; zero when none is attached.
    pub fn publish(&self, event: MotionEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    /// Attaches a new listener.
    pub fn subscribe(&self) -> MotionSubscription {
        MotionSubscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for MotionBus {
    fn default() -> Self {
        Self::new(64)
    }
}

/// An attached motion listener. Detaches on drop.
#[derive(Debug)]
pub struct MotionSubscription {
    rx: broadcast::Receiver<MotionEvent>,
}

impl MotionSubscription {
    /// Waits for the next event.
    ///
    /// Returns `None` once every `MotionBus` handle has been dropped. Events
    /// lost to a full buffer are logged and skipped.
    pub async fn recv(&mut self) -> Option<MotionEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Motion listener lagged; dropping events");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_without_listeners() {
        let bus = MotionBus::default();
        assert_eq!(bus.listener_count(), 0);
        assert_eq!(bus.publish(MotionEvent::new(0.0, 0.0, 9.8)), 0);
    }

    #[tokio::test]
    async fn test_subscription_receives_and_detaches() {
        let bus = MotionBus::default();
        let mut subscription = bus.subscribe();
        assert_eq!(bus.listener_count(), 1);

        assert_eq!(bus.publish(MotionEvent::new(1.0, 2.0, 3.0)), 1);
        assert_eq!(subscription.recv().await, Some(MotionEvent::new(1.0, 2.0, 3.0)));

        drop(subscription);
        assert_eq!(bus.listener_count(), 0);
        assert_eq!(bus.publish(MotionEvent::empty()), 0);
    }

    #[tokio::test]
    async fn test_lagged_listener_keeps_receiving() {
        let bus = MotionBus::new(2);
        let mut subscription = bus.subscribe();
        for i in 0..5 {
            bus.publish(MotionEvent::new(i as f64, 0.0, 0.0));
        }
        // Oldest events are gone; the newest two survive.
        assert_eq!(subscription.recv().await, Some(MotionEvent::new(3.0, 0.0, 0.0)));
        assert_eq!(subscription.recv().await, Some(MotionEvent::new(4.0, 0.0, 0.0)));
    }

    #[tokio::test]
    async fn test_closed_bus_ends_subscription() {
        let bus = MotionBus::default();
        let mut subscription = bus.subscribe();
        drop(bus);
        assert_eq!(subscription.recv().await, None);
    }
}
