use crate::commands::{
    self, CommandBuilder, CommandRegistry, DispatchOutcome, Dispatcher, RegistrationError,
    SharedRegistry,
};
use crate::config::BotConfig;
use crate::permissions::Authorizer;
use crate::transport::{InboundMessage, Outbox, Presence, Recipients, Transport, TransportError};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{debug, info, warn};

/// `AgentMessage` gets sent to the listener thread.
#[derive(Debug)]
pub enum AgentMessage {
    /// A chat message from the transport that may contain a command.
    Inbound(InboundMessage),
    /// Stops the listener after the messages queued before it are handled.
    Shutdown,
}

/// A chat agent: one command registry, one master list, one transport.
pub struct Agent {
    config: BotConfig,
    registry: SharedRegistry,
    authorizer: Arc<Authorizer>,
    outbox: Outbox,
}

impl Agent {
    pub fn new(
        config: BotConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Agent, RegistrationError> {
        let authorizer = Authorizer::new(config.master.identities(), config.is_public);

        let mut registry = CommandRegistry::new();
        commands::register_commands(&mut registry, config.is_public)?;

        Ok(Agent {
            config,
            registry: SharedRegistry::new(registry),
            authorizer: Arc::new(authorizer),
            outbox: Outbox::new(transport),
        })
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn add_command(&self, command: CommandBuilder) -> Result<(), RegistrationError> {
        self.registry.register(command)
    }

    pub fn add_alias(
        &self,
        name: &str,
        syntax: &str,
        pattern: &str,
    ) -> Result<(), RegistrationError> {
        self.registry.write().add_alias(name, syntax, pattern)
    }

    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    pub fn is_master(&self, identity: &str) -> bool {
        self.authorizer.is_master(identity)
    }

    pub fn masters(&self) -> Vec<String> {
        self.authorizer.masters().iter().cloned().collect()
    }

    /// Sends `text` to one or more recipients. Returns the number of successful sends.
    pub fn deliver(&self, to: impl Into<Recipients>, text: &str) -> usize {
        self.outbox.deliver(to, text)
    }

    pub fn set_presence(&self, presence: &Presence) -> Result<(), TransportError> {
        self.outbox.set_presence(presence)
    }

    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(
            self.registry.clone(),
            Arc::clone(&self.authorizer),
            self.outbox.clone(),
            self.config.misunderstood_message,
        )
    }

    /// Handles messages until a `Shutdown` arrives or every sender is dropped.
    pub fn run(self, receiver: Receiver<AgentMessage>) {
        let start_time = Instant::now();
        if let Some(presence) = &self.config.presence {
            if let Err(err) = self.set_presence(presence) {
                warn!("Failed to set presence: {}", err);
            }
        }

        let dispatcher = self.dispatcher();
        info!(
            "{} is listening ({} commands registered)",
            self.name(),
            self.registry.read().len()
        );
        self.announce(&format!("{} reporting for duty.", self.name()));

        let mut handled = 0usize;
        for message in receiver.iter() {
            match message {
                AgentMessage::Inbound(message) => {
                    let outcome = dispatcher.dispatch(&message);
                    if outcome != DispatchOutcome::Ignored {
                        handled += 1;
                    }
                    debug!("{} -> {:?}", message.sender, outcome);
                }
                AgentMessage::Shutdown => break,
            }
        }

        self.announce(&format!("{} disconnecting...", self.name()));
        info!(
            "{} stopped after handling {} messages in {:?}",
            self.name(),
            handled,
            start_time.elapsed()
        );
    }

    /// Starts the listener on its own thread.
    pub fn spawn(self) -> io::Result<AgentHandle> {
        let (sender, receiver) = mpsc::channel();
        let registry = self.registry.clone();
        let thread = thread::Builder::new()
            .name("jabbot-listener".to_string())
            .spawn(move || self.run(receiver))?;
        Ok(AgentHandle {
            sender,
            registry,
            thread,
        })
    }

    fn announce(&self, text: &str) {
        let masters = self.authorizer.masters();
        if !masters.is_empty() {
            self.outbox.deliver(masters, text);
        }
    }
}

/// Owner side of a running agent.
pub struct AgentHandle {
    sender: Sender<AgentMessage>,
    registry: SharedRegistry,
    thread: JoinHandle<()>,
}

impl AgentHandle {
    pub fn sender(&self) -> Sender<AgentMessage> {
        self.sender.clone()
    }

    /// Queues a chat message. Returns false once the listener has stopped.
    pub fn send_message(&self, sender: impl Into<String>, text: impl Into<String>) -> bool {
        self.sender
            .send(AgentMessage::Inbound(InboundMessage::new(sender, text)))
            .is_ok()
    }

    pub fn add_command(&self, command: CommandBuilder) -> Result<(), RegistrationError> {
        self.registry.register(command)
    }

    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    /// Asks the listener to stop and waits for it.
    pub fn shutdown(self) -> thread::Result<()> {
        // The listener may already be gone
        let _ = self.sender.send(AgentMessage::Shutdown);
        self.thread.join()
    }

    /// Waits for the listener to stop on its own.
    pub fn join(self) -> thread::Result<()> {
        drop(self.sender);
        self.thread.join()
    }
}
