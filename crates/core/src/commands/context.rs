use super::{parameters::Parameters, registry::CommandRegistry, registry::SharedRegistry};
use crate::permissions::Authorizer;
use std::sync::RwLockReadGuard;

/// What a callback gets to see about the message that triggered it.
pub struct ExecutionContext<'a> {
    sender: &'a str,
    parameters: Parameters,
    registry: &'a SharedRegistry,
    authorizer: &'a Authorizer,
}

impl<'a> ExecutionContext<'a> {
    pub(super) fn new(
        sender: &'a str,
        parameters: Parameters,
        registry: &'a SharedRegistry,
        authorizer: &'a Authorizer,
    ) -> Self {
        Self {
            sender,
            parameters,
            registry,
            authorizer,
        }
    }

    pub fn sender(&self) -> &str {
        self.sender
    }

    pub fn params(&self) -> &Parameters {
        &self.parameters
    }

    pub fn authorizer(&self) -> &Authorizer {
        self.authorizer
    }

    pub fn is_master(&self) -> bool {
        self.authorizer.is_master(self.sender)
    }

    /// Takes a read lock on the registry. The dispatcher never holds one while a
    /// callback runs.
    pub fn registry(&self) -> RwLockReadGuard<'_, CommandRegistry> {
        self.registry.read()
    }
}
