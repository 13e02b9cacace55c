use jabbot_core::transport::{InboundMessage, Presence, Transport, TransportError};
use std::io::Write;
use tracing::info;

/// Prints outbound messages to stdout, one line per message line.
pub struct ConsoleTransport;

impl Transport for ConsoleTransport {
    fn send(&self, recipient: &str, text: &str) -> Result<(), TransportError> {
        let mut stdout = std::io::stdout().lock();
        for line in text.lines() {
            writeln!(stdout, "-> {recipient}: {line}")?;
        }
        stdout.flush()?;
        Ok(())
    }

    fn set_presence(&self, presence: &Presence) -> Result<(), TransportError> {
        info!("Presence is now {:?}", presence);
        Ok(())
    }
}

/// Parses `<sender>: <message>`.
pub fn parse_line(line: &str) -> Option<InboundMessage> {
    let (sender, text) = line.split_once(':')?;
    let sender = sender.trim();
    if sender.is_empty() {
        return None;
    }
    Some(InboundMessage::new(sender, text.trim()))
}
