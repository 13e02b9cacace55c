use crate::commands::Command;
use indexmap::IndexSet;

/// Decides who may run which command. Masters may run everything; everyone
/// else may only run public commands, and only while the agent itself is public.
#[derive(Debug, Clone, Default)]
pub struct Authorizer {
    masters: IndexSet<String>,
    agent_is_public: bool,
}

impl Authorizer {
    pub fn new<I, S>(masters: I, agent_is_public: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            masters: masters.into_iter().map(Into::into).collect(),
            agent_is_public,
        }
    }

    pub fn is_master(&self, sender: &str) -> bool {
        self.masters.contains(sender)
    }

    pub fn masters(&self) -> &IndexSet<String> {
        &self.masters
    }

    pub fn agent_is_public(&self) -> bool {
        self.agent_is_public
    }

    pub fn authorized(&self, sender: &str, command: &Command) -> bool {
        self.is_master(sender) || (self.agent_is_public && command.is_public())
    }
}
