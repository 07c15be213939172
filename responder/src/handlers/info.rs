//! Static informational commands.

use crate::error::CommandResult;
use crate::registry::{Arity, CommandHandler};
use crate::reply::Reply;

/// Lists the available commands.
pub struct HelpHandler {
    text: String,
}

impl HelpHandler {
    pub fn new(prefix: &str) -> Self {
        Self {
            text: format!(
                "Commands: {0}time <location>, {0}flair <bear|bull>, {0}flair status [user], \
                 {0}flair top, {0}forex <conversion>, {0}wolfram <query>, {0}swaps",
                prefix
            ),
        }
    }
}

impl CommandHandler for HelpHandler {
    fn name(&self) -> &'static str {
        "help"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(0)
    }

    fn call(&self, _user: &str, _args: &[String]) -> CommandResult<Reply> {
        Ok(Reply::text(self.text.clone()))
    }
}

/// Shows the donation address, when one is configured.
pub struct DonateHandler {
    address: Option<String>,
}

impl DonateHandler {
    pub fn new(address: Option<String>) -> Self {
        Self { address }
    }
}

impl CommandHandler for DonateHandler {
    fn name(&self) -> &'static str {
        "donate"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(0)
    }

    fn call(&self, _user: &str, _args: &[String]) -> CommandResult<Reply> {
        Ok(self
            .address
            .as_ref()
            .map(|addr| format!("Bitcoin donations accepted at {}.", addr))
            .into())
    }
}
