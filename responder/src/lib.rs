//! pipbot Responder
//!
//! Turns chat messages into command replies. The [`Responder`] recognizes
//! the command prefix, resolves the command against an immutable
//! [`CommandRegistry`] and hands the arguments to a [`CommandHandler`].
//! Every failure below the responder ends as a log line and no reply.

pub mod config;
pub mod console;
pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod registry;
pub mod reply;
pub mod services;

pub use config::BotConfig;
pub use dispatcher::Responder;
pub use error::{CommandError, DispatchError, ServiceError};
pub use registry::{Arity, CommandHandler, CommandRegistry};
pub use reply::Reply;
pub use services::Services;
