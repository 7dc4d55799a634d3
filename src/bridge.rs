//! Cross-thread event bridge — background producer to foreground consumer.
//!
//! Built on `calloop::channel`: an unbounded ordered queue replacing the
//! single pending-event slot such a pipeline is often built around.  The
//! chosen delivery policy is queue-over-drop: `publish` never blocks the
//! frame loop, and every published symbol reaches the consumer exactly once,
//! in publish order.  The consumer side is a calloop event source owned by
//! an `EventPump`; the foreground thread idles in the pump until woken by a
//! bridge notification.
//!
//! The producer half is dropped by the background thread after its final
//! iteration, so the pump observes channel closure only once no further
//! publish is possible.

use std::time::Duration;

use calloop::channel::{self, Channel, Sender};
use calloop::EventLoop;
use tracing::debug;

use crate::events::Event;

// ── Producer side ──────────────────────────────────────────

/// The background loop's handle for publishing events.
#[derive(Clone)]
pub struct EventSender {
    tx: Sender<Event>,
}

impl EventSender {
    /// Fire-and-forget publish.  Never blocks; a send after the consumer has
    /// gone away (shutdown teardown) is silently discarded.
    pub fn publish(&self, event: Event) {
        if self.tx.send(event).is_err() {
            debug!(event = event.as_str(), "event published after pump closed");
        }
    }
}

// ── Consumer side ──────────────────────────────────────────

#[derive(Default)]
struct PumpState {
    pending: Vec<Event>,
    closed: bool,
}

/// Foreground owner of the bridge's receiving half.
pub struct EventPump {
    event_loop: EventLoop<'static, PumpState>,
    state: PumpState,
}

impl EventPump {
    fn new(channel: Channel<Event>) -> Result<Self, calloop::Error> {
        let event_loop = EventLoop::try_new()?;
        event_loop
            .handle()
            .insert_source(channel, |evt, _, state: &mut PumpState| match evt {
                channel::Event::Msg(event) => state.pending.push(event),
                channel::Event::Closed => state.closed = true,
            })
            .map_err(|e| e.error)?;
        Ok(Self {
            event_loop,
            state: PumpState::default(),
        })
    }

    /// Wait up to `timeout` (or indefinitely with `None`) for bridge
    /// notifications, forwarding each pending event to `handler` in publish
    /// order.  Returns `false` once the producer side has closed and all
    /// events have been delivered.
    pub fn dispatch(
        &mut self,
        timeout: Option<Duration>,
        handler: &mut dyn FnMut(Event),
    ) -> Result<bool, calloop::Error> {
        self.event_loop
            .dispatch(timeout, &mut self.state)
            .map_err(calloop::Error::from)?;
        for event in self.state.pending.drain(..) {
            handler(event);
        }
        Ok(!self.state.closed)
    }

    /// Dispatch until the producer side closes.
    pub fn run(mut self, mut handler: impl FnMut(Event)) -> Result<(), calloop::Error> {
        while self.dispatch(None, &mut handler)? {}
        Ok(())
    }
}

/// Create a connected sender/pump pair.
pub fn bridge() -> Result<(EventSender, EventPump), calloop::Error> {
    let (tx, rx) = channel::channel();
    let pump = EventPump::new(rx)?;
    Ok((EventSender { tx }, pump))
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Drain the pump until the channel closes, collecting everything.
    fn collect_all(mut pump: EventPump) -> Vec<Event> {
        let mut seen = Vec::new();
        loop {
            let open = pump
                .dispatch(Some(Duration::from_millis(200)), &mut |ev| seen.push(ev))
                .expect("dispatch failed");
            if !open {
                return seen;
            }
        }
    }

    #[test]
    fn test_burst_is_delivered_in_publish_order() {
        let (sender, pump) = bridge().expect("bridge");

        let producer = std::thread::spawn(move || {
            sender.publish(Event::NewUser);
            sender.publish(Event::SkeletonCalibrating);
            sender.publish(Event::SkeletonTracking);
            sender.publish(Event::SwipeLeft);
            // Dropping the sender closes the channel.
        });

        let seen = collect_all(pump);
        producer.join().expect("producer panicked");

        assert_eq!(
            seen,
            vec![
                Event::NewUser,
                Event::SkeletonCalibrating,
                Event::SkeletonTracking,
                Event::SwipeLeft,
            ]
        );
    }

    #[test]
    fn test_run_returns_once_producer_closes() {
        let (sender, pump) = bridge().expect("bridge");
        sender.publish(Event::DeviceInitialized);
        drop(sender);

        let mut seen = Vec::new();
        pump.run(|ev| seen.push(ev)).expect("run failed");
        assert_eq!(seen, vec![Event::DeviceInitialized]);
    }

    #[test]
    fn test_publish_after_pump_dropped_is_discarded() {
        let (sender, pump) = bridge().expect("bridge");
        drop(pump);
        // Must not block or panic.
        sender.publish(Event::Wave);
    }
}
