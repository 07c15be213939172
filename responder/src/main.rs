//! pipbot console binary
//!
//! Reads `user: message` lines from stdin and prints the bot's replies.

use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pipbot_fx::{FxEngine, HttpRateSource};
use pipbot_responder::console::parse_line;
use pipbot_responder::services::BitfinexLendingBook;
use pipbot_responder::{BotConfig, Responder, Services};

/// pipbot console
#[derive(Parser, Debug)]
#[command(name = "pipbot")]
#[command(about = "Chat command responder on a console transport")]
struct Args {
    /// Command prefix (overrides COMMAND_PREFIX)
    #[arg(short, long)]
    prefix: Option<String>,

    /// Speaker for lines without a `user:` part
    #[arg(short, long, default_value = "console")]
    user: String,

    /// Bot nickname (overrides BOT_NAME)
    #[arg(long)]
    botname: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let json = std::env::var("LOG_FORMAT").map(|f| f == "json").unwrap_or(false);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();

    let args = Args::parse();

    let mut config = BotConfig::from_env();
    if let Some(prefix) = args.prefix {
        config.command_prefix = prefix;
    }
    if let Some(name) = args.botname {
        config.bot_name = Some(name);
    }
    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    let source = Arc::new(HttpRateSource::new(
        config.forex.rates_url.clone(),
        config.http_timeout,
    )?);
    let fx = Arc::new(FxEngine::new(source, config.fx_engine_config()));
    let rates = fx.clone();
    let lending = Arc::new(BitfinexLendingBook::new(
        config.bitfinex_api_url.clone(),
        config.http_timeout,
    )?);
    let services = Services::new(fx).with_lending(lending);

    let responder = Arc::new(Responder::new(&config, services));

    info!(
        prefix = %responder.prefix(),
        name = ?responder.name(),
        commands = responder.registry().len(),
        "pipbot ready"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut tasks = JoinSet::new();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let Some((user, message)) = parse_line(&line, &args.user) else { continue };

                let responder = responder.clone();
                tasks.spawn(async move {
                    if let Some(reply) = responder.respond(&message, &user).await {
                        println!("{}", reply);
                    }
                });
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    while let Some(result) = tasks.join_next().await {
        if let Err(e) = result {
            warn!(error = %e, "Reply task failed");
        }
    }

    let metrics = responder.metrics().snapshot();
    info!(
        messages = metrics.messages_received,
        commands = metrics.commands_dispatched,
        unknown = metrics.unknown_commands,
        arity_mismatches = metrics.arity_mismatches,
        failures = metrics.handler_failures,
        replies = metrics.replies_sent,
        "pipbot shutdown complete"
    );

    let cache = rates.cache().stats();
    info!(
        currencies = cache.currencies,
        refreshed_at = ?cache.refreshed_at,
        fresh = cache.fresh,
        "Rate cache state"
    );

    Ok(())
}
