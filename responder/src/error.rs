//! Error types for command handling.

use pipbot_fx::FxError;
use thiserror::Error;

use crate::registry::Arity;

/// Errors returned by external collaborators (flair, knowledge, time, lending).
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The collaborator could not be reached or refused the request.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// The collaborator answered with something that could not be used.
    #[error("Unexpected service response: {0}")]
    InvalidResponse(String),

    /// Transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors a command handler can fail with.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Currency conversion failed.
    #[error(transparent)]
    Fx(#[from] FxError),

    /// A collaborator failed.
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Why a message produced no reply.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The message does not start with the command prefix.
    #[error("Message is not a command")]
    NotACommand,

    /// No handler is registered under this name.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// The handler does not accept this many arguments.
    #[error("Command {command} expects {expected} arguments, got {got}")]
    ArityMismatch {
        command: String,
        expected: Arity,
        got: usize,
    },

    /// The handler itself failed.
    #[error("Command {command} failed: {source}")]
    Handler {
        command: String,
        #[source]
        source: CommandError,
    },
}

impl DispatchError {
    /// Get error code for log fields.
    pub fn error_code(&self) -> &'static str {
        match self {
            DispatchError::NotACommand => "NOT_A_COMMAND",
            DispatchError::UnknownCommand(_) => "UNKNOWN_COMMAND",
            DispatchError::ArityMismatch { .. } => "ARITY_MISMATCH",
            DispatchError::Handler { .. } => "HANDLER_FAILED",
        }
    }
}

/// Result type for command handlers.
pub type CommandResult<T> = Result<T, CommandError>;
