use crate::commands::{
    context::ExecutionContext,
    error::{CommandResult, RegistrationError},
    matcher::{MatchResult, PatternMatcher},
    parameters::Parameters,
    usage,
};
use std::fmt;
use std::sync::Arc;

pub type Callback =
    Arc<dyn Fn(&ExecutionContext<'_>) -> CommandResult<Option<String>> + Send + Sync>;

/// A registered dispatch entry. Aliases are stored as their own `Command` that
/// shares the canonical command's callback and visibility.
#[derive(Clone)]
pub struct Command {
    pub(super) name: String,
    /// Every form shown in help. The canonical entry also lists its aliases'
    /// forms, but only `matcher` is used for dispatch.
    pub(super) syntax: Vec<String>,
    pub(super) description: String,
    pub(super) matcher: PatternMatcher,
    pub(super) is_public: bool,
    pub(super) is_alias: bool,
    pub(super) callback: Callback,
}

impl Command {
    pub(super) fn new(
        syntax: &str,
        description: &str,
        pattern: &str,
        is_public: bool,
        callback: Callback,
    ) -> Result<Self, RegistrationError> {
        let name = derive_name(syntax)?;
        let matcher = compile(syntax, pattern)?;
        Ok(Self {
            name,
            syntax: vec![syntax.trim().to_string()],
            description: description.to_string(),
            matcher,
            is_public,
            is_alias: false,
            callback,
        })
    }

    /// Appends `syntax` to this command's help forms and returns the separate
    /// alias entry that matches `pattern` and routes to the same callback.
    pub(super) fn add_alias(
        &mut self,
        syntax: &str,
        pattern: &str,
    ) -> Result<Command, RegistrationError> {
        let name = derive_name(syntax)?;
        let matcher = compile(syntax, pattern)?;
        let syntax = syntax.trim().to_string();

        self.syntax.push(syntax.clone());

        Ok(Command {
            name,
            syntax: vec![syntax],
            description: self.description.clone(),
            matcher,
            is_public: self.is_public,
            is_alias: true,
            callback: self.callback.clone(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn syntax(&self) -> &[String] {
        &self.syntax
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_public(&self) -> bool {
        self.is_public
    }

    pub fn is_alias(&self) -> bool {
        self.is_alias
    }

    pub fn callback(&self) -> &Callback {
        &self.callback
    }

    pub fn matches(&self, text: &str) -> MatchResult {
        self.matcher.try_match(text)
    }

    pub fn extract_parameters(captures: Vec<String>) -> Parameters {
        Parameters::from_captures(captures)
    }

    pub fn help_text(&self) -> String {
        usage::help_lines(self).join("\n")
    }

    pub(super) fn invoke(&self, ctx: &ExecutionContext<'_>) -> CommandResult<Option<String>> {
        (self.callback)(ctx)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("syntax", &self.syntax)
            .field("is_public", &self.is_public)
            .field("is_alias", &self.is_alias)
            .finish_non_exhaustive()
    }
}

fn derive_name(syntax: &str) -> Result<String, RegistrationError> {
    syntax
        .split_whitespace()
        .next()
        .map(str::to_string)
        .ok_or(RegistrationError::InvalidCommand)
}

fn compile(syntax: &str, pattern: &str) -> Result<PatternMatcher, RegistrationError> {
    PatternMatcher::parse(pattern).map_err(|source| RegistrationError::InvalidPattern {
        syntax: syntax.trim().to_string(),
        source,
    })
}

/// Describes a command and its aliases before it is added to a registry.
pub struct CommandBuilder {
    syntax: String,
    pattern: String,
    description: String,
    is_public: bool,
    aliases: Vec<(String, String)>,
    callback: Option<Callback>,
}

impl CommandBuilder {
    pub fn new(syntax: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            syntax: syntax.into(),
            pattern: pattern.into(),
            description: String::new(),
            is_public: false,
            aliases: Vec::new(),
            callback: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn public(self) -> Self {
        self.set_public(true)
    }

    pub fn set_public(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }

    pub fn alias(mut self, syntax: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.aliases.push((syntax.into(), pattern.into()));
        self
    }

    pub fn executes<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ExecutionContext<'_>) -> CommandResult<Option<String>> + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(callback));
        self
    }

    /// Builds the canonical command followed by one entry per alias.
    pub fn build(self) -> Result<Vec<Command>, RegistrationError> {
        let name = derive_name(&self.syntax)?;
        let callback = self
            .callback
            .ok_or(RegistrationError::MissingCallback { name })?;

        let mut canonical = Command::new(
            &self.syntax,
            &self.description,
            &self.pattern,
            self.is_public,
            callback,
        )?;
        let aliases = self
            .aliases
            .iter()
            .map(|(syntax, pattern)| canonical.add_alias(syntax, pattern))
            .collect::<Result<Vec<_>, _>>()?;

        let mut commands = Vec::with_capacity(aliases.len() + 1);
        commands.push(canonical);
        commands.extend(aliases);
        Ok(commands)
    }
}
