//! `math` / `wolfram` command: free-form questions.

use std::sync::Arc;

use tracing::warn;

use crate::error::CommandResult;
use crate::registry::CommandHandler;
use crate::reply::Reply;
use crate::services::KnowledgeService;

const NO_ANSWER: &str = "I don't know what you mean.";

pub struct MathHandler {
    knowledge: Option<Arc<dyn KnowledgeService>>,
}

impl MathHandler {
    pub fn new(knowledge: Option<Arc<dyn KnowledgeService>>) -> Self {
        Self { knowledge }
    }
}

impl CommandHandler for MathHandler {
    fn name(&self) -> &'static str {
        "math"
    }

    fn call(&self, user: &str, args: &[String]) -> CommandResult<Reply> {
        let knowledge = match &self.knowledge {
            Some(knowledge) => knowledge.clone(),
            None => {
                warn!("No knowledge service configured");
                return Ok(Reply::None);
            }
        };

        let query = args.join(" ");
        let user = user.to_string();

        Ok(Reply::pending(async move {
            let answers = knowledge.query(&query).await?;
            let answer = answers
                .first()
                .map(|a| a.trim())
                .filter(|a| !a.is_empty())
                .unwrap_or(NO_ANSWER);
            Ok(Some(format!("{}: {}", user, answer)))
        }))
    }
}
