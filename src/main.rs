//! GameKeeper Telegram Bot
//!
//! Main application entry point

use std::sync::Arc;

use anyhow::Context;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, Update};
use teloxide::utils::command::BotCommands as TeloxideBotCommands;
use tracing::{error, info, warn};

use GameKeeper::{
    config::Settings,
    handlers::{CatalogQuery, ConversationEngine},
    i18n::I18n,
    services::BackendRegistry,
    transport::{TelegramTransport, Transport},
    utils::logging,
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("Failed to load configuration")?;
    settings.validate().context("Invalid configuration")?;

    // Initialize logging; the guard flushes the file writer on exit
    let _log_guard = logging::init_logging(&settings.logging).context("Failed to initialize logging")?;

    info!("Starting {}...", GameKeeper::info());

    // Initialize i18n system
    info!("Loading translations...");
    let mut i18n = I18n::new(&settings.i18n).context("Failed to load translations")?;
    if let Some(dir) = &settings.i18n.translations_dir {
        i18n.load_translations_dir(dir)
            .await
            .with_context(|| format!("Failed to load translations from {}", dir))?;
    }
    let i18n = Arc::new(i18n);

    // Storage backends are opened on first selection
    let backends = Arc::new(BackendRegistry::new(&settings));
    if let Some(kind) = settings.storage.default_backend {
        info!(backend = %kind, "Activating default backend");
        if let Err(e) = backends.activate(kind).await {
            warn!(backend = %kind, error = %e, "Default backend unavailable, users will choose one");
        }
    }

    // Initialize bot
    let bot = Bot::new(&settings.bot.token);
    let transport = Arc::new(TelegramTransport::new(bot.clone()));
    let engine = Arc::new(ConversationEngine::new(
        transport.clone() as Arc<dyn Transport>,
        i18n,
        backends,
    ));

    info!("Setting up bot handlers...");

    let mut dispatcher = Dispatcher::builder(bot, create_handler())
        .dependencies(dptree::deps![engine, transport])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd.id);
        })
        .enable_ctrlc_handler()
        .build();

    info!("GameKeeper bot is ready, starting polling...");
    dispatcher.dispatch().await;

    info!("GameKeeper bot has been shut down.");
    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .branch(
                    // Handle commands
                    dptree::entry()
                        .filter_command::<BotCommands>()
                        .endpoint(handle_commands),
                )
                .branch(
                    // Everything else goes to the conversation
                    dptree::endpoint(handle_messages),
                ),
        )
        .branch(Update::filter_callback_query().endpoint(handle_callbacks))
}

#[derive(TeloxideBotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "GameKeeper Bot Commands")]
enum BotCommands {
    #[command(description = "Choose a data source and open the menu")]
    Start,
    #[command(description = "Show help information")]
    Help,
    #[command(description = "Find games by title or category")]
    Search(String),
    #[command(description = "Games of a category for at least N players")]
    Find(String),
    #[command(description = "Games playable by exactly N players")]
    Players(String),
}

/// Handle bot commands
async fn handle_commands(msg: Message, cmd: BotCommands, engine: Arc<ConversationEngine>) -> HandlerResult {
    let user_id = msg.chat.id.0;
    let language = msg.from.as_ref().and_then(|u| u.language_code.clone());

    match cmd {
        BotCommands::Start => {
            if let Some(event) = TelegramTransport::text_event(&msg) {
                engine.dispatch(event).await;
            }
        }
        BotCommands::Help => engine.send_help(user_id, language.as_deref()).await,
        BotCommands::Search(query) => {
            engine
                .answer_query(user_id, language.as_deref(), CatalogQuery::Search(query))
                .await
        }
        BotCommands::Find(args) => {
            engine
                .answer_query(user_id, language.as_deref(), CatalogQuery::Find(args))
                .await
        }
        BotCommands::Players(args) => {
            engine
                .answer_query(user_id, language.as_deref(), CatalogQuery::Players(args))
                .await
        }
    }

    Ok(())
}

/// Handle regular messages
async fn handle_messages(msg: Message, engine: Arc<ConversationEngine>) -> HandlerResult {
    match TelegramTransport::text_event(&msg) {
        Some(event) => engine.dispatch(event).await,
        None => info!(chat_id = ?msg.chat.id, "Ignoring message without text"),
    }
    Ok(())
}

/// Handle callback queries
async fn handle_callbacks(
    query: CallbackQuery,
    engine: Arc<ConversationEngine>,
    transport: Arc<TelegramTransport>,
) -> HandlerResult {
    let query_id = query.id.clone();
    match transport.selection_event(query) {
        Some(event) => engine.dispatch(event).await,
        None => error!(callback_id = %query_id, "Callback query without data"),
    }
    Ok(())
}
