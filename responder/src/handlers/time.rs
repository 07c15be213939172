//! `time` command: local time at a named location.

use std::sync::Arc;

use pipbot_common::format_local_time;
use tracing::{debug, warn};

use crate::error::CommandResult;
use crate::registry::CommandHandler;
use crate::reply::Reply;
use crate::services::TimeLookup;

pub struct TimeHandler {
    lookup: Option<Arc<dyn TimeLookup>>,
}

impl TimeHandler {
    pub fn new(lookup: Option<Arc<dyn TimeLookup>>) -> Self {
        Self { lookup }
    }
}

/// Join the arguments into a location, dropping a leading `in`.
pub fn location_from_args(args: &[String]) -> String {
    let args = match args {
        [first, rest @ ..] if !rest.is_empty() && first.eq_ignore_ascii_case("in") => rest,
        _ => args,
    };
    args.join(" ")
}

impl CommandHandler for TimeHandler {
    fn name(&self) -> &'static str {
        "time"
    }

    fn call(&self, user: &str, args: &[String]) -> CommandResult<Reply> {
        let location = location_from_args(args);
        if location.chars().count() <= 1 {
            debug!(user = %user, "Time lookup without a location");
            return Ok(Reply::None);
        }

        let lookup = match &self.lookup {
            Some(lookup) => lookup.clone(),
            None => {
                warn!("No time lookup configured");
                return Ok(Reply::None);
            }
        };

        Ok(Reply::pending(async move {
            let found = lookup.lookup(&location, pipbot_common::now()).await?;
            Ok(Some(match found {
                Some(local) => format!(
                    "The time in {} is {}",
                    local.location,
                    format_local_time(&local.time)
                ),
                None => "Invalid location.".to_string(),
            }))
        }))
    }
}
