use super::{
    command::{Command, CommandBuilder},
    error::RegistrationError,
    matcher::MatchResult,
};
use indexmap::IndexMap;
use itertools::Itertools;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Every command an agent understands, keyed by name. Insertion order is the
/// order in which messages are matched against commands.
#[derive(Default)]
pub struct CommandRegistry {
    commands: IndexMap<String, Arc<Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command together with its aliases. Either every entry is
    /// added or, on error, none is.
    pub fn register(&mut self, builder: CommandBuilder) -> Result<(), RegistrationError> {
        let commands = builder.build()?;

        if let Some(name) = commands.iter().map(Command::name).duplicates().next() {
            return Err(RegistrationError::DuplicateCommand {
                name: name.to_string(),
            });
        }
        for command in &commands {
            self.ensure_vacant(command.name())?;
        }

        for command in commands {
            self.add(command)?;
        }
        Ok(())
    }

    /// Adds a single entry, refusing names that are already taken.
    pub fn add(&mut self, command: Command) -> Result<(), RegistrationError> {
        self.ensure_vacant(command.name())?;
        self.insert(command);
        Ok(())
    }

    /// Adds another syntax form to an already registered command. The alias is
    /// stored as its own entry that shares the command's callback and visibility.
    pub fn add_alias(
        &mut self,
        name: &str,
        syntax: &str,
        pattern: &str,
    ) -> Result<(), RegistrationError> {
        let mut target = self
            .named(name)
            .cloned()
            .ok_or_else(|| RegistrationError::UnknownCommand {
                name: name.to_string(),
            })?;
        let alias = target.add_alias(syntax, pattern)?;
        self.ensure_vacant(alias.name())?;

        self.commands.insert(name.to_string(), Arc::new(target));
        self.insert(alias);
        Ok(())
    }

    /// Returns the first command, in registration order, whose pattern matches.
    pub fn find_match(&self, text: &str) -> Option<(Arc<Command>, Vec<String>)> {
        self.commands.values().find_map(|command| match command.matches(text) {
            MatchResult::Matched(captures) => Some((Arc::clone(command), captures)),
            MatchResult::NoMatch => None,
        })
    }

    pub fn by_name_sorted(&self) -> impl Iterator<Item = &Command> + '_ {
        self.commands
            .values()
            .map(Arc::as_ref)
            .sorted_by(|a, b| a.name().cmp(b.name()))
    }

    pub fn named(&self, name: &str) -> Option<&Command> {
        self.commands.get(name).map(Arc::as_ref)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn ensure_vacant(&self, name: &str) -> Result<(), RegistrationError> {
        if self.commands.contains_key(name) {
            return Err(RegistrationError::DuplicateCommand {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn insert(&mut self, command: Command) {
        debug!(
            "Registered command '{}'{}",
            command.name(),
            if command.is_alias() { " (alias)" } else { "" }
        );
        self.commands
            .insert(command.name().to_string(), Arc::new(command));
    }
}

/// A registry handle that can be shared between the listener thread and the
/// rest of the agent. Writers are serialized by the lock.
#[derive(Clone, Default)]
pub struct SharedRegistry(Arc<RwLock<CommandRegistry>>);

impl SharedRegistry {
    pub fn new(registry: CommandRegistry) -> Self {
        Self(Arc::new(RwLock::new(registry)))
    }

    pub fn read(&self) -> RwLockReadGuard<'_, CommandRegistry> {
        // A panicking writer can't leave a half-inserted command behind
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, CommandRegistry> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register(&self, builder: CommandBuilder) -> Result<(), RegistrationError> {
        self.write().register(builder)
    }
}
