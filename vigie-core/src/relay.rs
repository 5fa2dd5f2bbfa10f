// Appointment booking: scheduling-widget messages and the confirmation relay

use crate::analytics::{self, AnalyticsEvent, EventSink};
use crate::lifecycle::UserContext;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use vigie_client::ApiClient;

/// Time left to the scheduling widget to finish its own confirmation flow.
pub const CONFIRMATION_GRACE_DELAY: Duration = Duration::from_millis(2000);

pub const WIDGET_EVENT_PREFIX: &str = "calendly";
pub const EVENT_SCHEDULED: &str = "calendly.event_scheduled";

/// A message posted by the scheduling widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetMessage {
    pub event: String,
}

impl WidgetMessage {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
        }
    }

    pub fn event_scheduled() -> Self {
        Self::new(EVENT_SCHEDULED)
    }

    pub fn is_widget_event(&self) -> bool {
        self.event.starts_with(WIDGET_EVENT_PREFIX)
    }

    pub fn is_scheduled(&self) -> bool {
        self.event == EVENT_SCHEDULED
    }
}

/// Broadcast channel carrying widget messages to whoever is listening.
#[derive(Debug, Clone)]
pub struct WidgetBus {
    sender: broadcast::Sender<WidgetMessage>,
}

impl WidgetBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes a message, returning how many listeners received it.
    pub fn publish(&self, message: WidgetMessage) -> usize {
        self.sender.send(message).unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    fn subscribe(&self) -> broadcast::Receiver<WidgetMessage> {
        self.sender.subscribe()
    }
}

impl Default for WidgetBus {
    fn default() -> Self {
        Self::new(16)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    Sent,
    /// No analysis to relay.
    Skipped,
    Cancelled,
    /// The backend could not be told; the visitor is not.
    Failed,
}

/// Sends the stored analysis to the backend once a slot has been booked.
#[derive(Clone)]
pub struct ConfirmationRelay {
    client: ApiClient,
    delay: Duration,
    events: Arc<dyn EventSink>,
}

impl ConfirmationRelay {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            delay: CONFIRMATION_GRACE_DELAY,
            events: analytics::default_sink(),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Waits the grace delay, then posts the confirmation once. Never retries.
    pub async fn relay(
        &self,
        context: Option<UserContext>,
        cancel: CancellationToken,
    ) -> RelayOutcome {
        let Some(context) = context else {
            debug!("No analysis stored, skipping appointment confirmation");
            return RelayOutcome::Skipped;
        };

        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Booking closed before confirmation was relayed");
                return RelayOutcome::Cancelled;
            }
            _ = tokio::time::sleep(self.delay) => {}
        }

        let payload = context.confirmation_payload();
        match self.client.confirm_appointment(&payload).await {
            Ok(()) => {
                info!("Appointment confirmed for {}", payload.email);
                if let Err(e) = self.events.track(&AnalyticsEvent::appointment_confirmed()) {
                    debug!("Failed to record appointment confirmation: {}", e);
                }
                RelayOutcome::Sent
            }
            Err(e) => {
                error!("Failed to send appointment confirmation: {}", e);
                RelayOutcome::Failed
            }
        }
    }
}

/// An open booking dialog.
///
/// Listens to the widget bus from `open` until `close` (or drop). The first
/// scheduling confirmation marks the session confirmed immediately and starts the
/// deferred relay; closing the session before the grace delay elapses cancels it.
pub struct BookingSession {
    token: CancellationToken,
    confirmed: watch::Receiver<bool>,
    listener: Option<JoinHandle<Option<RelayOutcome>>>,
}

impl BookingSession {
    pub fn open(bus: &WidgetBus, relay: ConfirmationRelay, context: Option<UserContext>) -> Self {
        let token = CancellationToken::new();
        let (confirmed_tx, confirmed) = watch::channel(false);
        let mut messages = bus.subscribe();

        if let Err(e) = relay.events.track(&AnalyticsEvent::booking_opened()) {
            debug!("Failed to record booking opening: {}", e);
        }

        let listener_token = token.clone();
        let listener = tokio::spawn(async move {
            loop {
                let message = tokio::select! {
                    _ = listener_token.cancelled() => return None,
                    message = messages.recv() => message,
                };

                match message {
                    Ok(message) if message.is_scheduled() => break,
                    Ok(message) if message.is_widget_event() => {
                        debug!("Widget event {}", message.event);
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!("Widget listener lagged, {} messages skipped", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }

            drop(messages);
            let _ = confirmed_tx.send(true);
            Some(relay.relay(context, listener_token).await)
        });

        Self {
            token,
            confirmed,
            listener: Some(listener),
        }
    }

    pub fn is_confirmed(&self) -> bool {
        *self.confirmed.borrow()
    }

    /// Resolves once the widget reports a booking; false if the session ended first.
    pub async fn wait_confirmed(&self) -> bool {
        let mut confirmed = self.confirmed.clone();
        confirmed.wait_for(|c| *c).await.is_ok()
    }

    /// Waits for the relay to finish without closing the session.
    ///
    /// `None` means the session ended before any booking was confirmed.
    pub async fn finished(mut self) -> Option<RelayOutcome> {
        let listener = self.listener.take()?;
        listener.await.ok().flatten()
    }

    /// Unsubscribes from the bus and cancels a pending relay.
    pub async fn close(mut self) -> Option<RelayOutcome> {
        self.token.cancel();
        let listener = self.listener.take()?;
        listener.await.ok().flatten()
    }
}

impl Drop for BookingSession {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_message_classification() {
        assert!(WidgetMessage::event_scheduled().is_scheduled());
        assert!(WidgetMessage::new("calendly.date_and_time_selected").is_widget_event());
        assert!(!WidgetMessage::new("calendly.date_and_time_selected").is_scheduled());
        assert!(!WidgetMessage::new("openLegalModal").is_widget_event());
    }

    #[test]
    fn test_publish_without_listener() {
        let bus = WidgetBus::default();
        assert_eq!(bus.publish(WidgetMessage::event_scheduled()), 0);
        assert_eq!(bus.subscriber_count(), 0);
    }
}
