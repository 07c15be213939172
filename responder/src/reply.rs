//! Replies produced by command handlers.

use std::fmt;
use std::future::Future;

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::warn;

use crate::error::CommandResult;

/// What a command produces: nothing, a ready string, or a string still being computed.
pub enum Reply {
    /// No reply is sent.
    None,
    /// Reply available immediately.
    Text(String),
    /// Reply produced once an external lookup completes.
    Pending(BoxFuture<'static, CommandResult<Option<String>>>),
}

impl Reply {
    /// Create an immediate reply.
    pub fn text(text: impl Into<String>) -> Self {
        Reply::Text(text.into())
    }

    /// Create a pending reply from a future.
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = CommandResult<Option<String>>> + Send + 'static,
    {
        Reply::Pending(future.boxed())
    }

    /// Check whether this is the empty reply.
    pub fn is_none(&self) -> bool {
        matches!(self, Reply::None)
    }

    /// Check whether the reply still has to be awaited.
    pub fn is_pending(&self) -> bool {
        matches!(self, Reply::Pending(_))
    }

    /// Wait for the reply text, keeping the error of a failed pending reply.
    pub async fn try_resolve(self) -> CommandResult<Option<String>> {
        match self {
            Reply::None => Ok(None),
            Reply::Text(text) => Ok(Some(text)),
            Reply::Pending(future) => future.await,
        }
    }

    /// Wait for the reply text.
    ///
    /// A pending reply that fails is logged and collapses to no reply.
    pub async fn resolve(self) -> Option<String> {
        match self.try_resolve().await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Pending reply failed");
                None
            }
        }
    }
}

impl From<Option<String>> for Reply {
    fn from(text: Option<String>) -> Self {
        match text {
            Some(text) => Reply::Text(text),
            None => Reply::None,
        }
    }
}

impl fmt::Debug for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::None => write!(f, "Reply::None"),
            Reply::Text(text) => f.debug_tuple("Reply::Text").field(text).finish(),
            Reply::Pending(_) => write!(f, "Reply::Pending(..)"),
        }
    }
}
