use std::sync::Arc;

use anyhow::Context;
use teloxide::{prelude::*, utils::command::BotCommands};

mod api;
mod bot_state;
mod config;
mod conversation;
mod handlers;
mod models;

use crate::api::ApiClient;
use crate::bot_state::BotState;
use crate::config::BotConfig;
use crate::handlers::{callback_handler, command_handler, message_handler, EventDispatcher};

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Доступные команды:")]
pub enum Command {
    #[command(description = "начать работу с ботом")]
    Start,
    #[command(description = "показать помощь")]
    Help,
    #[command(description = "зарегистрироваться")]
    Register,
    #[command(description = "войти в систему")]
    Login,
    #[command(description = "выйти из системы")]
    Logout,
    #[command(description = "просмотр учебных материалов")]
    Materials,
    #[command(description = "панель администратора")]
    Admin,
    #[command(description = "отменить текущую операцию")]
    Cancel,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Загружаем .env и инициализируем логирование
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Starting materials bot...");

    // Без токена бот не стартует
    let config = BotConfig::from_env().context("invalid bot configuration")?;
    log::info!("✅ API endpoint: {}", config.api_base_url);

    let api = ApiClient::new(config.api_base_url.clone());
    let dispatcher = EventDispatcher::new(BotState::new(), Arc::new(api), config.flow.clone());

    let bot = Bot::new(config.telegram_token.clone());
    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        log::error!("Failed to register bot commands: {}", e);
    }

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(command_handler),
        )
        .branch(Update::filter_callback_query().endpoint(callback_handler))
        .branch(Update::filter_message().endpoint(message_handler));

    log::info!("🚀 Starting dispatcher...");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![dispatcher])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
