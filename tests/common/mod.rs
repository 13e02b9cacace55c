#![allow(dead_code)]

use jabbot_core::commands::{CommandBuilder, DispatchOutcome, Dispatcher};
use jabbot_core::config::Masters;
use jabbot_core::transport::{ChannelTransport, InboundMessage, OutboundMessage, Presence};
use jabbot_core::{Agent, BotConfig};
use std::sync::Arc;
use std::sync::mpsc::Receiver;

pub const MASTER: &str = "master@example.org";
pub const GUEST: &str = "guest@example.org";

/// An agent wired to an in-memory transport, dispatching on the test thread.
pub struct TestBot {
    pub agent: Agent,
    pub dispatcher: Dispatcher,
    outbound: Receiver<OutboundMessage>,
    pub presence: Receiver<Presence>,
}

impl TestBot {
    pub fn new(is_public: bool) -> TestBot {
        TestBot::with_config(config(is_public))
    }

    pub fn with_config(config: BotConfig) -> TestBot {
        let (transport, outbound, presence) = ChannelTransport::new();
        let agent = Agent::new(config, Arc::new(transport)).unwrap();
        let dispatcher = agent.dispatcher();
        TestBot {
            agent,
            dispatcher,
            outbound,
            presence,
        }
    }

    pub fn add(&self, command: CommandBuilder) {
        self.agent.add_command(command).unwrap();
    }

    /// Dispatches one message and returns everything it caused to be sent.
    pub fn send(&self, sender: &str, text: &str) -> (DispatchOutcome, Vec<OutboundMessage>) {
        let outcome = self.dispatcher.dispatch(&InboundMessage::new(sender, text));
        (outcome, self.outbound.try_iter().collect())
    }

    /// Dispatches one message and returns the texts sent back to `sender`.
    pub fn replies(&self, sender: &str, text: &str) -> Vec<String> {
        let (_, outbound) = self.send(sender, text);
        outbound
            .into_iter()
            .inspect(|message| assert_eq!(message.recipient, sender))
            .map(|message| message.text)
            .collect()
    }
}

pub fn config(is_public: bool) -> BotConfig {
    BotConfig {
        master: Masters::One(MASTER.to_string()),
        is_public,
        ..Default::default()
    }
}

/// `add <a> <b>` with a `sum` alias, as a public command.
pub fn add_command() -> CommandBuilder {
    CommandBuilder::new("add <a> <b>", r"^add\s+(\d+)\s+(\d+)$")
        .description("Adds two integers")
        .public()
        .alias("sum <a> <b>", r"^sum\s+(\d+)\s+(\d+)$")
        .executes(|ctx| {
            let a = ctx.params().parse::<i64>(0)?;
            let b = ctx.params().parse::<i64>(1)?;
            Ok(Some((a + b).to_string()))
        })
}

pub fn echo_command() -> CommandBuilder {
    CommandBuilder::new("echo <message>", r"^echo\s+(.+)$")
        .description("Repeats the message back")
        .public()
        .executes(|ctx| Ok(ctx.params().single().map(str::to_string)))
}

/// A command only masters may run.
pub fn shutdown_command() -> CommandBuilder {
    CommandBuilder::new("shutdown", r"^shutdown$")
        .description("Stops the bot")
        .executes(|_| Ok(Some("Shutting down".to_string())))
}
