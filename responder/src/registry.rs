//! Command registry: explicit mapping from command name to handler.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::error::CommandResult;
use crate::reply::Reply;

/// Number of positional arguments a handler accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many.
    Exact(usize),
    /// Between `min` and `max`, inclusive.
    Range { min: usize, max: usize },
    /// At least this many.
    AtLeast(usize),
    /// Any number, including none.
    Any,
}

impl Arity {
    /// Check whether `count` arguments are accepted.
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exact(n) => count == n,
            Arity::Range { min, max } => (min..=max).contains(&count),
            Arity::AtLeast(n) => count >= n,
            Arity::Any => true,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{}", n),
            Arity::Range { min, max } => write!(f, "{}..={}", min, max),
            Arity::AtLeast(n) => write!(f, "{}+", n),
            Arity::Any => write!(f, "any"),
        }
    }
}

/// A command bound to a name.
pub trait CommandHandler: Send + Sync {
    /// Command name, lower case, without prefix.
    fn name(&self) -> &'static str;

    /// Arguments accepted after the command name.
    fn arity(&self) -> Arity {
        Arity::Any
    }

    /// Run the command for `user`.
    ///
    /// Only called with an argument count accepted by [`CommandHandler::arity`].
    fn call(&self, user: &str, args: &[String]) -> CommandResult<Reply>;
}

/// Immutable name to handler table.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its own name.
    pub fn with(self, handler: Arc<dyn CommandHandler>) -> Self {
        let name = handler.name();
        self.with_alias(name, handler)
    }

    /// Register a handler under an additional name.
    pub fn with_alias(mut self, name: &str, handler: Arc<dyn CommandHandler>) -> Self {
        let key = name.to_lowercase();
        if self.handlers.insert(key.clone(), handler).is_some() {
            warn!(command = %key, "Command registered twice, keeping the last handler");
        }
        self
    }

    /// Look up a handler by exact name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn CommandHandler>> {
        self.handlers.get(name)
    }

    /// Check if a command is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered command names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered names, aliases included.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.names())
            .finish()
    }
}
