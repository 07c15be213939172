//! `flair` command: bull/bear sentiment bookkeeping.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::CommandResult;
use crate::registry::CommandHandler;
use crate::reply::Reply;
use crate::services::{FlairDirection, FlairService};

/// Parsed `flair` subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlairAction {
    Status(String),
    Change(FlairDirection),
    Top,
}

impl FlairAction {
    /// Interpret the arguments on behalf of `user`.
    pub fn parse(user: &str, args: &[String]) -> Option<Self> {
        let Some(sub) = args.first() else {
            return Some(FlairAction::Status(user.to_string()));
        };

        if let Ok(direction) = sub.parse::<FlairDirection>() {
            return Some(FlairAction::Change(direction));
        }

        match sub.as_str() {
            "status" => {
                let target = args.get(1).map(String::as_str).unwrap_or(user);
                Some(FlairAction::Status(target.to_string()))
            }
            "top" => Some(FlairAction::Top),
            _ => None,
        }
    }
}

pub struct FlairHandler {
    flair: Option<Arc<dyn FlairService>>,
    top_count: usize,
}

impl FlairHandler {
    pub fn new(flair: Option<Arc<dyn FlairService>>, top_count: usize) -> Self {
        Self { flair, top_count }
    }
}

impl CommandHandler for FlairHandler {
    fn name(&self) -> &'static str {
        "flair"
    }

    fn call(&self, user: &str, args: &[String]) -> CommandResult<Reply> {
        let flair = match &self.flair {
            Some(flair) => flair.clone(),
            None => {
                warn!("No flair service configured");
                return Ok(Reply::None);
            }
        };

        let Some(action) = FlairAction::parse(user, args) else {
            debug!(user = %user, args = ?args, "Unknown flair subcommand");
            return Ok(Reply::None);
        };

        let user = user.to_string();
        let top_count = self.top_count;

        Ok(Reply::pending(async move {
            let reply = match action {
                FlairAction::Status(target) => flair.status(&target).await?,
                FlairAction::Change(direction) => flair.change(&user, direction).await?,
                FlairAction::Top => flair.top(top_count).await?,
            };
            Ok(reply)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ServiceResult;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingFlair {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl FlairService for RecordingFlair {
        async fn status(&self, user: &str) -> ServiceResult<Option<String>> {
            self.calls.lock().push(format!("status {}", user));
            Ok(Some(format!("{} is neutral", user)))
        }

        async fn change(&self, user: &str, direction: FlairDirection) -> ServiceResult<Option<String>> {
            self.calls.lock().push(format!("change {} {}", user, direction));
            Ok(Some(format!("{} is now a {}", user, direction)))
        }

        async fn top(&self, count: usize) -> ServiceResult<Option<String>> {
            self.calls.lock().push(format!("top {}", count));
            Ok(None)
        }
    }

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_parse_actions() {
        assert_eq!(
            FlairAction::parse("alice", &[]),
            Some(FlairAction::Status("alice".to_string()))
        );
        assert_eq!(
            FlairAction::parse("alice", &args(&["status", "bob"])),
            Some(FlairAction::Status("bob".to_string()))
        );
        assert_eq!(
            FlairAction::parse("alice", &args(&["bear"])),
            Some(FlairAction::Change(FlairDirection::Bear))
        );
        assert_eq!(FlairAction::parse("alice", &args(&["top"])), Some(FlairAction::Top));
        assert_eq!(FlairAction::parse("alice", &args(&["sideways"])), None);
    }

    #[tokio::test]
    async fn test_routes_to_service() {
        let service = Arc::new(RecordingFlair::default());
        let handler = FlairHandler::new(Some(service.clone()), 7);

        let reply = handler.call("alice", &args(&["bull"])).unwrap().resolve().await;
        assert_eq!(reply.as_deref(), Some("alice is now a bull"));

        let reply = handler.call("alice", &args(&["top"])).unwrap().resolve().await;
        assert!(reply.is_none());

        assert_eq!(*service.calls.lock(), vec!["change alice bull", "top 7"]);
    }

    #[test]
    fn test_without_service() {
        let reply = FlairHandler::new(None, 5).call("alice", &[]).unwrap();

        assert!(reply.is_none());
    }
}
