use crate::{
    commands::{
        command::Command,
        context::ExecutionContext,
        error::CommandError,
        registry::SharedRegistry,
        usage,
    },
    permissions::Authorizer,
    transport::{InboundMessage, Outbox},
};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Which way a message went through the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The message was blank.
    Ignored,
    /// No command matched. `notified` tells whether the sender got the fallback text.
    Misunderstood { notified: bool },
    /// A command matched but the sender may not run it. Nothing is sent.
    Unauthorized { command: String },
    /// The callback ran. `responded` tells whether anything was sent back.
    Executed { command: String, responded: bool },
    /// The callback panicked or hit an internal error. Nothing is sent.
    Failed { command: String },
}

/// Routes inbound messages to commands. Messages are handled one at a time, so
/// a callback that blocks holds up every message behind it.
#[derive(Clone)]
pub struct Dispatcher {
    registry: SharedRegistry,
    authorizer: Arc<Authorizer>,
    outbox: Outbox,
    misunderstood_message: bool,
}

impl Dispatcher {
    pub fn new(
        registry: SharedRegistry,
        authorizer: Arc<Authorizer>,
        outbox: Outbox,
        misunderstood_message: bool,
    ) -> Self {
        Self {
            registry,
            authorizer,
            outbox,
            misunderstood_message,
        }
    }

    pub fn dispatch(&self, message: &InboundMessage) -> DispatchOutcome {
        let sender = message.sender.as_str();
        let text = message.text.trim();
        if text.is_empty() {
            return DispatchOutcome::Ignored;
        }

        // The read lock is released before the callback runs
        let found = self.registry.read().find_match(text);
        let Some((command, captures)) = found else {
            debug!("No command matches {:?} from {}", text, sender);
            if self.misunderstood_message {
                self.outbox.deliver(sender, &usage::misunderstood(text));
            }
            return DispatchOutcome::Misunderstood {
                notified: self.misunderstood_message,
            };
        };

        if !self.authorizer.authorized(sender, &command) {
            debug!(
                "{} is not allowed to run '{}', ignoring",
                sender,
                command.name()
            );
            return DispatchOutcome::Unauthorized {
                command: command.name().to_string(),
            };
        }

        info!("{} issued command: {}", sender, text);
        let parameters = Command::extract_parameters(captures);
        let ctx = ExecutionContext::new(sender, parameters, &self.registry, &self.authorizer);
        self.execute(&command, &ctx)
    }

    fn execute(&self, command: &Command, ctx: &ExecutionContext<'_>) -> DispatchOutcome {
        let name = command.name().to_string();
        let result = panic::catch_unwind(AssertUnwindSafe(|| command.invoke(ctx)));

        let response = match result {
            Ok(Ok(response)) => response,
            Ok(Err(CommandError::Runtime(err))) => Some(err.to_string()),
            Ok(Err(CommandError::Internal(err))) => {
                error!("Command '{}' from {} failed: {}", name, ctx.sender(), err);
                return DispatchOutcome::Failed { command: name };
            }
            Err(payload) => {
                error!(
                    "Command '{}' from {} panicked: {}",
                    name,
                    ctx.sender(),
                    panic_message(payload.as_ref())
                );
                return DispatchOutcome::Failed { command: name };
            }
        };

        let responded = match response {
            Some(response) if !response.is_empty() => {
                self.outbox.deliver(ctx.sender(), &response);
                true
            }
            _ => false,
        };
        DispatchOutcome::Executed {
            command: name,
            responded,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "<non-string panic payload>"
    }
}
