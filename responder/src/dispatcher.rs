//! Message dispatch.
//!
//! A message is a command when it starts with the configured prefix. The
//! first token names the handler, the rest are its positional arguments.
//! Whatever goes wrong on the way, the transport only ever sees a reply or
//! nothing.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::config::BotConfig;
use crate::error::DispatchError;
use crate::handlers::builtin_registry;
use crate::metrics::Metrics;
use crate::registry::CommandRegistry;
use crate::reply::Reply;
use crate::services::Services;

/// Routes chat messages to command handlers.
pub struct Responder {
    prefix: String,
    case_insensitive: bool,
    registry: CommandRegistry,
    metrics: Arc<Metrics>,
    name: RwLock<Option<String>>,
}

impl Responder {
    /// Create a responder with every built-in command registered.
    pub fn new(config: &BotConfig, services: Services) -> Self {
        let registry = builtin_registry(config, &services);
        Self::with_registry(config, registry)
    }

    /// Create a responder over a custom registry.
    pub fn with_registry(config: &BotConfig, registry: CommandRegistry) -> Self {
        debug!(commands = ?registry.names(), "Command registry built");

        Self {
            prefix: config.command_prefix.clone(),
            case_insensitive: config.case_insensitive_commands,
            registry,
            metrics: Arc::new(Metrics::new()),
            name: RwLock::new(config.bot_name.clone()),
        }
    }

    /// Record the nickname the transport ended up with.
    pub fn set_name(&self, name: impl Into<String>) {
        *self.name.write() = Some(name.into());
    }

    /// Current nickname, if known.
    pub fn name(&self) -> Option<String> {
        self.name.read().clone()
    }

    /// Command prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Registered commands.
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Dispatch counters.
    pub fn metrics(&self) -> Arc<Metrics> {
        self.metrics.clone()
    }

    /// Handle one message from `user`.
    ///
    /// Never fails. Anything short of a reply becomes [`Reply::None`].
    pub fn dispatch(&self, message: &str, user: &str) -> Reply {
        match self.try_dispatch(message, user) {
            Ok(reply) => reply,
            Err(DispatchError::NotACommand) | Err(DispatchError::ArityMismatch { .. }) => Reply::None,
            Err(DispatchError::UnknownCommand(command)) => {
                debug!(user = %user, command = %command, "Unknown command");
                Reply::None
            }
            Err(e @ DispatchError::Handler { .. }) => {
                warn!(user = %user, error = %e, code = e.error_code(), "Command failed");
                Reply::None
            }
        }
    }

    /// Handle one message, reporting why no reply was produced.
    pub fn try_dispatch(&self, message: &str, user: &str) -> Result<Reply, DispatchError> {
        self.metrics.message_received();

        let message = message.trim();
        let Some(rest) = message.strip_prefix(self.prefix.as_str()) else {
            return Err(DispatchError::NotACommand);
        };

        let mut tokens = rest.split_whitespace();
        let command = match tokens.next() {
            Some(command) if !rest.starts_with(char::is_whitespace) => command,
            _ => return Err(DispatchError::NotACommand),
        };
        let command = if self.case_insensitive {
            command.to_lowercase()
        } else {
            command.to_string()
        };
        let args: Vec<String> = tokens.map(str::to_string).collect();

        let Some(handler) = self.registry.get(&command) else {
            self.metrics.unknown_command();
            return Err(DispatchError::UnknownCommand(command));
        };

        let arity = handler.arity();
        if !arity.accepts(args.len()) {
            self.metrics.arity_mismatch();
            warn!(
                handler = handler.name(),
                user = %user,
                command = %command,
                args = ?args,
                "Argument count mismatch"
            );
            return Err(DispatchError::ArityMismatch {
                command,
                expected: arity,
                got: args.len(),
            });
        }

        self.metrics.command_dispatched();
        debug!(user = %user, command = %command, args = args.len(), "Dispatching command");

        handler.call(user, &args).map_err(|source| {
            self.metrics.handler_failed();
            DispatchError::Handler { command, source }
        })
    }

    /// Dispatch and wait for the reply text.
    ///
    /// A pending reply that fails counts as a handler failure.
    pub async fn respond(&self, message: &str, user: &str) -> Option<String> {
        let reply = match self.dispatch(message, user).try_resolve().await {
            Ok(reply) => reply,
            Err(e) => {
                self.metrics.handler_failed();
                warn!(user = %user, error = %e, "Command failed");
                None
            }
        };
        if reply.is_some() {
            self.metrics.reply_sent();
        }
        reply
    }
}
