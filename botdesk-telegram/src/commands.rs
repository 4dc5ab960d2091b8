//! Administrative helpers: token validation and menu→command synchronization.

use botdesk_core::{is_valid_token, BotConfig, DispatchError, Result};
use tracing::info;

use crate::gateway::{BotCommand, BotIdentity, TelegramGateway};

/// Validates a bot token before persistence: shape check first, then a live
/// `getMe` call. Returns the bot identity Telegram reports.
pub async fn validate_token(gateway: &TelegramGateway, token: &str) -> Result<BotIdentity> {
    if !is_valid_token(token) {
        return Err(DispatchError::Config(
            "token does not match the expected bot token format".to_string(),
        ));
    }
    gateway.get_me(token).await
}

/// Publishes the bot's menu as its Telegram command list.
///
/// Menus are sorted by `order`; the leading `/` is stripped (Telegram rejects
/// it in command names) and the display label becomes the description.
/// Returns the number of commands pushed.
pub async fn sync_commands(gateway: &TelegramGateway, bot: &BotConfig) -> Result<usize> {
    let mut menus: Vec<_> = bot.menus.iter().collect();
    menus.sort_by_key(|m| m.order);

    let commands: Vec<BotCommand> = menus
        .into_iter()
        .filter_map(|menu| {
            let name = menu.command.trim_start_matches('/').to_lowercase();
            if name.is_empty() {
                return None;
            }
            Some(BotCommand {
                command: name,
                description: menu.text.clone(),
            })
        })
        .collect();

    let count = commands.len();
    gateway.set_my_commands(&bot.token, &commands).await?;
    info!(bot_id = %bot.id, count, "synced bot commands");
    Ok(count)
}
