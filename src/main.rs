use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use shopping_list::bot::{command_handler, Command, CommandDispatcher};
use shopping_list::config::{BotConfig, LogFormat};
use shopping_list::localization::init_localization;
use shopping_list::shutdown::{wait_for_signal, ShutdownHook};
use shopping_list::store::ItemStore;
use shopping_list::transport::TelegramMessenger;
use teloxide::prelude::*;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = BotConfig::from_env()?;
    init_tracing(config.log_format);

    info!("Starting Shopping List Telegram Bot");

    init_localization()?;

    let store = Arc::new(ItemStore::new());
    match store.restore(&config.dump_path).await {
        Ok(chats) => info!(chats, "Restored shopping lists"),
        Err(e) => warn!(error = %e, "Can't restore snapshot, starting with an empty store"),
    }

    let bot = Bot::new(config.token.clone());
    let dispatcher = Arc::new(CommandDispatcher::new(
        Arc::clone(&store),
        TelegramMessenger::new(bot.clone()),
    ));

    info!("Bot initialized, starting dispatcher");

    let handler = Update::filter_message()
        .filter_command::<Command>()
        .endpoint(command_handler::<TelegramMessenger>);

    let mut updates = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![dispatcher])
        .default_handler(|_| async {})
        .build();

    let shutdown_token = updates.shutdown_token();
    let dispatch = updates.dispatch();
    tokio::pin!(dispatch);

    tokio::select! {
        () = &mut dispatch => info!("Dispatcher stopped"),
        () = wait_for_signal() => match shutdown_token.shutdown() {
            Ok(stopped) => {
                tokio::join!(dispatch, stopped);
            }
            // dispatch() had not started polling updates yet, nothing to drain
            Err(_) => info!("Signal received before the dispatcher started"),
        },
    }

    let hook = ShutdownHook::new(store, &config.dump_path, config.shutdown_timeout);
    match hook.flush().await {
        Ok(()) => {
            info!("Snapshot saved, bye");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!(error = %e, "Failed to save snapshot");
            Ok(ExitCode::FAILURE)
        }
    }
}
