use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Command syntax must not be empty")]
    InvalidCommand,
    #[error("A command named '{name}' is already registered")]
    DuplicateCommand { name: String },
    #[error("No command named '{name}' is registered")]
    UnknownCommand { name: String },
    #[error("Command '{name}' has no callback")]
    MissingCallback { name: String },
    #[error("Invalid pattern for '{syntax}': {source}")]
    InvalidPattern {
        syntax: String,
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("'{value}' is not a valid {expected}")]
    InvalidParameter { value: String, expected: String },
    #[error("{0}")]
    Message(String),
}

#[derive(Debug, Error)]
pub enum InternalError {
    #[error(
        "Internal error: Parameter {index} not captured, command has {count} (pattern registration bug)"
    )]
    MissingParameter { index: usize, count: usize },
    #[error("Internal error (bug): {message}")]
    Message { message: String },
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl CommandError {
    pub fn runtime(message: impl Into<String>) -> Self {
        CommandError::Runtime(RuntimeError::Message(message.into()))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CommandError::Internal(InternalError::Message {
            message: message.into(),
        })
    }
}

pub type CommandResult<T> = Result<T, CommandError>;
