//! Built-in command handlers.

pub mod flair;
pub mod forex;
pub mod info;
pub mod math;
pub mod swaps;
pub mod time;

use std::sync::Arc;

use crate::config::BotConfig;
use crate::registry::CommandRegistry;
use crate::services::Services;

pub use flair::FlairHandler;
pub use forex::ForexHandler;
pub use info::{DonateHandler, HelpHandler};
pub use math::MathHandler;
pub use swaps::SwapsHandler;
pub use time::TimeHandler;

/// Registry holding every built-in command.
pub fn builtin_registry(config: &BotConfig, services: &Services) -> CommandRegistry {
    let prefix = config.command_prefix.as_str();
    let math = Arc::new(MathHandler::new(services.knowledge.clone()));

    CommandRegistry::new()
        .with(Arc::new(HelpHandler::new(prefix)))
        .with(Arc::new(DonateHandler::new(config.btc_donation_addr.clone())))
        .with(Arc::new(ForexHandler::new(services.fx.clone(), prefix)))
        .with(Arc::new(TimeHandler::new(services.time.clone())))
        .with(math.clone())
        .with_alias("wolfram", math)
        .with(Arc::new(FlairHandler::new(
            services.flair.clone(),
            config.flair_top_list_size,
        )))
        .with(Arc::new(SwapsHandler::new(services.lending.clone())))
}
