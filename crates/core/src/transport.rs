use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("The transport is closed")]
    Closed,
    #[error("Failed to deliver to {recipient}: {message}")]
    Delivery { recipient: String, message: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A chat message received from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub sender: String,
    pub text: String,
}

impl InboundMessage {
    pub fn new(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub recipient: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Show {
    #[default]
    Available,
    Chat,
    Away,
    Dnd,
    Xa,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presence {
    #[serde(default)]
    pub show: Show,
    pub status: Option<String>,
    pub priority: Option<i8>,
}

/// The messaging network the agent talks over. Implementations must accept
/// calls from several threads at once.
pub trait Transport: Send + Sync {
    fn send(&self, recipient: &str, text: &str) -> Result<(), TransportError>;

    fn set_presence(&self, _presence: &Presence) -> Result<(), TransportError> {
        Ok(())
    }
}

/// One identity or a list of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipients {
    One(String),
    Many(Vec<String>),
}

impl Recipients {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let identities = match self {
            Recipients::One(identity) => std::slice::from_ref(identity),
            Recipients::Many(identities) => identities.as_slice(),
        };
        identities.iter().map(String::as_str)
    }
}

impl From<&str> for Recipients {
    fn from(identity: &str) -> Self {
        Recipients::One(identity.to_string())
    }
}

impl From<String> for Recipients {
    fn from(identity: String) -> Self {
        Recipients::One(identity)
    }
}

impl From<Vec<String>> for Recipients {
    fn from(identities: Vec<String>) -> Self {
        Recipients::Many(identities)
    }
}

impl From<&[String]> for Recipients {
    fn from(identities: &[String]) -> Self {
        Recipients::Many(identities.to_vec())
    }
}

impl From<&IndexSet<String>> for Recipients {
    fn from(identities: &IndexSet<String>) -> Self {
        Recipients::Many(identities.iter().cloned().collect())
    }
}

/// The agent's sending side. Cheap to clone; every clone sends through the same
/// transport.
#[derive(Clone)]
pub struct Outbox {
    transport: Arc<dyn Transport>,
}

impl Outbox {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Sends `text` to every recipient and returns how many sends succeeded.
    /// Failures are logged and do not stop delivery to the remaining recipients.
    pub fn deliver(&self, to: impl Into<Recipients>, text: &str) -> usize {
        let recipients = to.into();
        let mut delivered = 0;
        for recipient in recipients.iter() {
            match self.transport.send(recipient, text) {
                Ok(()) => delivered += 1,
                Err(err) => warn!("Could not deliver message to {}: {}", recipient, err),
            }
        }
        delivered
    }

    pub fn set_presence(&self, presence: &Presence) -> Result<(), TransportError> {
        self.transport.set_presence(presence)
    }
}

impl fmt::Debug for Outbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Outbox").finish_non_exhaustive()
    }
}

/// A transport that hands every outbound message to a channel. Useful for
/// bridging to another thread and for tests.
pub struct ChannelTransport {
    messages: Sender<OutboundMessage>,
    presence: Sender<Presence>,
}

impl ChannelTransport {
    pub fn new() -> (Self, Receiver<OutboundMessage>, Receiver<Presence>) {
        let (messages, message_receiver) = mpsc::channel();
        let (presence, presence_receiver) = mpsc::channel();
        (
            Self { messages, presence },
            message_receiver,
            presence_receiver,
        )
    }
}

impl Transport for ChannelTransport {
    fn send(&self, recipient: &str, text: &str) -> Result<(), TransportError> {
        self.messages
            .send(OutboundMessage {
                recipient: recipient.to_string(),
                text: text.to_string(),
            })
            .map_err(|_| TransportError::Closed)
    }

    fn set_presence(&self, presence: &Presence) -> Result<(), TransportError> {
        self.presence
            .send(presence.clone())
            .map_err(|_| TransportError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivers_to_every_recipient() {
        let (transport, outbound, _) = ChannelTransport::new();
        let outbox = Outbox::new(Arc::new(transport));

        let masters = vec!["a@example.org".to_string(), "b@example.org".to_string()];
        assert_eq!(outbox.deliver(masters, "hello"), 2);
        assert_eq!(outbox.deliver("c@example.org", "hi"), 1);

        let recipients: Vec<_> = outbound.try_iter().map(|m| m.recipient).collect();
        assert_eq!(recipients, ["a@example.org", "b@example.org", "c@example.org"]);
    }

    #[test]
    fn closed_transport_counts_no_deliveries() {
        let (transport, outbound, _) = ChannelTransport::new();
        drop(outbound);
        let outbox = Outbox::new(Arc::new(transport));
        assert_eq!(outbox.deliver("a@example.org", "hello"), 0);
    }

    #[test]
    fn presence_is_forwarded() {
        let (transport, _, presence) = ChannelTransport::new();
        let outbox = Outbox::new(Arc::new(transport));
        let away = Presence {
            show: Show::Away,
            status: Some("Back soon".to_string()),
            priority: Some(5),
        };
        outbox.set_presence(&away).unwrap();
        assert_eq!(presence.try_recv().unwrap(), away);
    }
}
