//! Integration tests for [`botdesk_telegram::WebhookController`].
//!
//! Uses an in-memory SQLite store and a mockito Telegram API server; mock
//! paths follow the Bot API request shape `/bot<token>/<method>`. Mock guards
//! must be held until the request completes.

use std::sync::Arc;

use botdesk_core::{AutoReplyRule, BotConfig, MenuItem, ResponseSpec, RuleType};
use botdesk_telegram::{BotLookup, TelegramGateway, Update, WebhookController};
use storage::SqliteBotStore;

const TOKEN: &str = "123456:TESTTOKEN";

async fn store_with(bot: &BotConfig) -> Arc<SqliteBotStore> {
    let store = SqliteBotStore::new("sqlite::memory:")
        .await
        .expect("store init");
    store.save(bot).await.expect("save bot");
    Arc::new(store)
}

fn help_bot() -> BotConfig {
    let mut bot = BotConfig::new("helper", TOKEN);
    bot.menus.push(MenuItem {
        text: "Help".to_string(),
        command: "/help".to_string(),
        order: 0,
        response: Some(ResponseSpec::text("Help text")),
    });
    bot
}

fn parse_update(json: &str) -> Update {
    serde_json::from_str(json).expect("update should parse")
}

/// **Test: Command match sends exactly one sendMessage and acknowledges.**
///
/// **Setup:** Bot with `/help` menu; mock sendMessage expecting the rendered body.
/// **Action:** Handle a `/help` message via the token-in-path route.
/// **Expected:** Ack success; mock hit once.
#[tokio::test]
async fn test_command_match_sends_reply() {
    let mut server = mockito::Server::new_async().await;
    let send_mock = server
        .mock("POST", format!("/bot{}/sendMessage", TOKEN).as_str())
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "chat_id": 42,
            "text": "Help text"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok": true, "result": {"message_id": 1}}"#)
        .expect(1)
        .create_async()
        .await;

    let bot = help_bot();
    let store = store_with(&bot).await;
    let controller = WebhookController::new(store, TelegramGateway::new(server.url()));

    let update = parse_update(r#"{"message": {"chat": {"id": 42}, "text": "/help"}}"#);
    let ack = controller
        .handle_update(BotLookup::ByToken(TOKEN.to_string()), &update)
        .await;

    assert!(ack.success);
    send_mock.assert_async().await;
}

/// **Test: Unresolvable bot acknowledges success with no outbound calls.**
#[tokio::test]
async fn test_unknown_bot_acknowledged_without_sends() {
    let mut server = mockito::Server::new_async().await;
    let send_mock = server
        .mock("POST", mockito::Matcher::Regex(r"^/bot.*".to_string()))
        .expect(0)
        .create_async()
        .await;

    let bot = help_bot();
    let store = store_with(&bot).await;
    let controller = WebhookController::new(store, TelegramGateway::new(server.url()));

    let update = parse_update(r#"{"message": {"chat": {"id": 42}, "text": "/help"}}"#);
    let ack = controller
        .handle_update(BotLookup::ByToken("999999:UNKNOWN".to_string()), &update)
        .await;

    assert!(ack.success);
    send_mock.assert_async().await;
}

/// **Test: Disabled bot rejects processing but still acknowledges.**
#[tokio::test]
async fn test_disabled_bot_acknowledged_without_sends() {
    let mut server = mockito::Server::new_async().await;
    let send_mock = server
        .mock("POST", mockito::Matcher::Regex(r"^/bot.*".to_string()))
        .expect(0)
        .create_async()
        .await;

    let mut bot = help_bot();
    bot.is_enabled = false;
    let store = store_with(&bot).await;
    let controller = WebhookController::new(store, TelegramGateway::new(server.url()));

    let update = parse_update(r#"{"message": {"chat": {"id": 42}, "text": "/help"}}"#);
    let ack = controller
        .handle_update(BotLookup::ByToken(TOKEN.to_string()), &update)
        .await;

    assert!(ack.success);
    send_mock.assert_async().await;
}

/// **Test: Update without a chat id is acknowledged without touching the store
/// or the network.**
#[tokio::test]
async fn test_malformed_update_acknowledged() {
    let mut server = mockito::Server::new_async().await;
    let send_mock = server
        .mock("POST", mockito::Matcher::Regex(r"^/bot.*".to_string()))
        .expect(0)
        .create_async()
        .await;

    let bot = help_bot();
    let store = store_with(&bot).await;
    let controller = WebhookController::new(store, TelegramGateway::new(server.url()));

    let update = parse_update(r#"{"callback_query": {"id": "cb1", "data": "x"}}"#);
    let ack = controller
        .handle_update(BotLookup::ByToken(TOKEN.to_string()), &update)
        .await;

    assert!(ack.success);
    send_mock.assert_async().await;
}

/// **Test: A callback query is answered even when the matched reply send fails.**
///
/// **Setup:** Keyword rule matching the callback data; sendMessage mocked to
/// fail with 400; answerCallbackQuery mocked to succeed.
/// **Action:** Handle a callback_query update.
/// **Expected:** Ack success; both mocks hit exactly once.
#[tokio::test]
async fn test_callback_answered_after_failed_send() {
    let mut server = mockito::Server::new_async().await;
    let send_mock = server
        .mock("POST", format!("/bot{}/sendMessage", TOKEN).as_str())
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok": false, "error_code": 400, "description": "Bad Request"}"#)
        .expect(1)
        .create_async()
        .await;
    let answer_mock = server
        .mock("POST", format!("/bot{}/answerCallbackQuery", TOKEN).as_str())
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "callback_query_id": "cb7"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok": true, "result": true}"#)
        .expect(1)
        .create_async()
        .await;

    let mut bot = help_bot();
    bot.auto_replies.push(AutoReplyRule {
        name: "confirm".to_string(),
        rule_type: RuleType::Keyword,
        triggers: vec!["confirm".to_string()],
        is_enabled: true,
        priority: 1,
        response: ResponseSpec::text("confirmed"),
    });
    let store = store_with(&bot).await;
    let controller = WebhookController::new(store, TelegramGateway::new(server.url()));

    let update = parse_update(
        r#"{"callback_query": {"id": "cb7", "data": "confirm", "message": {"chat": {"id": 5}}}}"#,
    );
    let ack = controller
        .handle_update(BotLookup::ByToken(TOKEN.to_string()), &update)
        .await;

    assert!(ack.success);
    send_mock.assert_async().await;
    answer_mock.assert_async().await;
}

/// **Test: id-in-path route requires the provisioned secret (the bot id).**
#[tokio::test]
async fn test_id_route_secret_mismatch() {
    let mut server = mockito::Server::new_async().await;
    let send_mock = server
        .mock("POST", mockito::Matcher::Regex(r"^/bot.*".to_string()))
        .expect(0)
        .create_async()
        .await;

    let bot = help_bot();
    let store = store_with(&bot).await;
    let controller = WebhookController::new(store, TelegramGateway::new(server.url()));

    let update = parse_update(r#"{"message": {"chat": {"id": 42}, "text": "/help"}}"#);
    let ack = controller
        .handle_update(
            BotLookup::ById {
                id: bot.id.clone(),
                secret: Some("wrong".to_string()),
            },
            &update,
        )
        .await;

    assert!(ack.success);
    send_mock.assert_async().await;
}

/// **Test: id-in-path route dispatches when the secret matches the bot id.**
#[tokio::test]
async fn test_id_route_with_valid_secret() {
    let mut server = mockito::Server::new_async().await;
    let send_mock = server
        .mock("POST", format!("/bot{}/sendMessage", TOKEN).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok": true, "result": {"message_id": 1}}"#)
        .expect(1)
        .create_async()
        .await;

    let bot = help_bot();
    let store = store_with(&bot).await;
    let controller = WebhookController::new(store, TelegramGateway::new(server.url()));

    let update = parse_update(r#"{"message": {"chat": {"id": 42}, "text": "/help"}}"#);
    let ack = controller
        .handle_update(
            BotLookup::ById {
                id: bot.id.clone(),
                secret: Some(bot.id.clone()),
            },
            &update,
        )
        .await;

    assert!(ack.success);
    send_mock.assert_async().await;
}

/// **Test: Global route resolves the bot from the command @mention hint.**
#[tokio::test]
async fn test_global_route_resolves_from_mention() {
    let mut server = mockito::Server::new_async().await;
    let send_mock = server
        .mock("POST", "/botMyBot/sendMessage")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok": true, "result": {"message_id": 1}}"#)
        .expect(1)
        .create_async()
        .await;

    // The hint extracted from the mention is the store lookup key.
    let mut bot = help_bot();
    bot.token = "MyBot".to_string();
    let store = store_with(&bot).await;
    let controller = WebhookController::new(store, TelegramGateway::new(server.url()));

    let update = parse_update(
        r#"{"message": {"chat": {"id": 42}, "text": "/help@MyBot",
            "entities": [{"type": "bot_command", "offset": 0, "length": 11}]}}"#,
    );
    let ack = controller.handle_update(BotLookup::FromUpdate, &update).await;

    assert!(ack.success);
    send_mock.assert_async().await;
}
