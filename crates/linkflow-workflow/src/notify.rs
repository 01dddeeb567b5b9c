/*
[INPUT]:  User-facing status messages from auth and task workflow
[OUTPUT]: Fire-and-forget delivery to the host UI
[POS]:    Notification boundary - contract plus stock sinks
[UPDATE]: When adding notification kinds or sink implementations
*/

use tokio::sync::mpsc;

const SIMULATED_SUFFIX: &str = " (offline mode)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

/// One user-facing status message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    /// Set when the outcome was synthesized locally because the backend was unreachable
    pub simulated: bool,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            simulated: false,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, message)
    }

    /// Flag as an offline outcome
    pub fn simulated(mut self) -> Self {
        if !self.simulated {
            self.message.push_str(SIMULATED_SUFFIX);
            self.simulated = true;
        }
        self
    }
}

/// Receives status messages. The core never waits on or inspects delivery.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the tracing subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Error => {
                tracing::warn!(simulated = notification.simulated, "{}", notification.message)
            }
            NotificationKind::Success | NotificationKind::Info => {
                tracing::info!(simulated = notification.simulated, "{}", notification.message)
            }
        }
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&self, _notification: Notification) {}
}

/// Forwards notifications to a channel the UI drains
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl NotificationSink for ChannelSink {
    fn notify(&self, notification: Notification) {
        // receiver gone means nobody is listening anymore
        let _ = self.tx.send(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_suffix_applied_once() {
        let n = Notification::success("Login successful!").simulated().simulated();
        assert!(n.simulated);
        assert_eq!(n.message, "Login successful! (offline mode)");
    }

    #[test]
    fn test_channel_sink_delivers_in_order() {
        let (sink, mut rx) = ChannelSink::new();
        sink.notify(Notification::info("first"));
        sink.notify(Notification::error("second"));

        assert_eq!(rx.try_recv().unwrap().message, "first");
        let second = rx.try_recv().unwrap();
        assert_eq!(second.kind, NotificationKind::Error);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_stock_sinks_as_trait_objects() {
        let sinks: Vec<Box<dyn NotificationSink>> = vec![Box::new(TracingSink), Box::new(NullSink)];
        for sink in &sinks {
            sink.notify(Notification::error("backend down"));
            sink.notify(Notification::success("done").simulated());
        }
    }

    #[test]
    fn test_channel_sink_survives_dropped_receiver() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);
        sink.notify(Notification::success("nobody listening"));
    }
}
