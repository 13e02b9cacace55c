mod builtin;
mod command;
mod context;
mod dispatcher;
mod error;
mod matcher;
mod parameters;
mod registry;
mod usage;

pub use builtin::register_commands;
pub use command::{Callback, Command, CommandBuilder};
pub use context::ExecutionContext;
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use error::{CommandError, CommandResult, InternalError, RegistrationError, RuntimeError};
pub use matcher::{MatchResult, PatternMatcher};
pub use parameters::Parameters;
pub use registry::{CommandRegistry, SharedRegistry};
