//! Progress and status messages emitted while a filter runs.

use crossbeam_channel::Sender;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Debug,
    Progress { percent: u8 },
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
}

impl Message {
    pub fn new(kind: MessageKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

type Callback = Arc<dyn Fn(&Message) + Send + Sync>;

/// Receives messages from filters. Cloning shares the same sink.
#[derive(Clone, Default)]
pub struct MessageHandler {
    callback: Option<Callback>,
}

impl std::fmt::Debug for MessageHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageHandler")
            .field("connected", &self.callback.is_some())
            .finish()
    }
}

impl MessageHandler {
    pub fn new(callback: impl Fn(&Message) + Send + Sync + 'static) -> Self {
        Self {
            callback: Some(Arc::new(callback)),
        }
    }

    /// Discard every message (they still reach the log).
    pub fn noop() -> Self {
        Self::default()
    }

    /// Forward messages into a channel. A disconnected receiver is ignored.
    pub fn from_sender(sender: Sender<Message>) -> Self {
        Self::new(move |message| {
            let _ = sender.send(message.clone());
        })
    }

    pub fn send(&self, message: Message) {
        debug!("[{:?}] {}", message.kind, message.text);
        if let Some(callback) = &self.callback {
            callback(&message);
        }
    }

    pub fn info(&self, text: impl Into<String>) {
        self.send(Message::new(MessageKind::Info, text));
    }

    pub fn warning(&self, text: impl Into<String>) {
        self.send(Message::new(MessageKind::Warning, text));
    }

    /// Percentage is clamped to 100.
    pub fn progress(&self, percent: u8, text: impl Into<String>) {
        self.send(Message::new(
            MessageKind::Progress {
                percent: percent.min(100),
            },
            text,
        ));
    }
}
