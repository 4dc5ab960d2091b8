//! Integration tests for [`botdesk_telegram::WebhookRegistrar`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use botdesk_core::{BotConfig, DispatchError};
use botdesk_telegram::{TelegramGateway, WebhookRegistrar};
use storage::{BotConfigStore, SqliteBotStore};

const TOKEN: &str = "123456:TESTTOKEN";

async fn store_with(bot: &BotConfig) -> Arc<SqliteBotStore> {
    let store = SqliteBotStore::new("sqlite::memory:")
        .await
        .expect("store init");
    store.save(bot).await.expect("save bot");
    Arc::new(store)
}

/// **Test: Successful registration verifies via getWebhookInfo and persists
/// the URL.**
///
/// **Setup:** setWebhook succeeds on the first attempt, getWebhookInfo echoes
/// the registered URL.
/// **Action:** Register with an explicit webhook URL.
/// **Expected:** Ok with the URL; both endpoints hit once; URL persisted.
#[tokio::test]
async fn test_register_success_persists_url() {
    let mut server = mockito::Server::new_async().await;
    let set_mock = server
        .mock("POST", format!("/bot{}/setWebhook", TOKEN).as_str())
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "url": "https://example.com/hook",
            "allowed_updates": ["message", "callback_query"],
            "drop_pending_updates": true
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok": true, "result": true}"#)
        .expect(1)
        .create_async()
        .await;
    let info_mock = server
        .mock("POST", format!("/bot{}/getWebhookInfo", TOKEN).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"ok": true, "result": {"url": "https://example.com/hook", "pending_update_count": 0}}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let bot = BotConfig::new("hooked", TOKEN);
    let store = store_with(&bot).await;
    let registrar = WebhookRegistrar::new(
        store.clone(),
        TelegramGateway::new(server.url()),
        None,
    );

    let url = registrar
        .register(&bot, Some("https://example.com/hook"))
        .await
        .expect("registration should succeed");
    assert_eq!(url, "https://example.com/hook");

    set_mock.assert_async().await;
    info_mock.assert_async().await;

    let saved = store
        .find_by_id(&bot.id)
        .await
        .expect("lookup")
        .expect("bot present");
    assert_eq!(
        saved.settings.webhook_url.as_deref(),
        Some("https://example.com/hook")
    );
}

/// **Test: The registered secret token is the bot id.**
#[tokio::test]
async fn test_register_provisions_bot_id_as_secret() {
    let mut server = mockito::Server::new_async().await;
    let bot = BotConfig::new("secretive", TOKEN);
    let set_mock = server
        .mock("POST", format!("/bot{}/setWebhook", TOKEN).as_str())
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "secret_token": bot.id
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok": true, "result": true}"#)
        .expect(1)
        .create_async()
        .await;
    let _info_mock = server
        .mock("POST", format!("/bot{}/getWebhookInfo", TOKEN).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok": true, "result": {"url": ""}}"#)
        .create_async()
        .await;

    let store = store_with(&bot).await;
    let registrar = WebhookRegistrar::new(
        store,
        TelegramGateway::new(server.url()),
        Some("https://dash.example.com".to_string()),
    );

    let url = registrar
        .register(&bot, None)
        .await
        .expect("registration should succeed");
    assert_eq!(
        url,
        format!("https://dash.example.com/api/bot/telegram/bots/{}/webhook", bot.id)
    );

    set_mock.assert_async().await;
}

/// **Test: Persistent setWebhook failure exhausts 3 attempts with backoff.**
///
/// **Setup:** setWebhook always returns 500.
/// **Action:** Register.
/// **Expected:** WebhookRegistrationFailed after exactly 3 requests, with at
/// least 3s elapsed (1s + 2s delays between attempts).
#[tokio::test]
async fn test_register_retries_then_fails() {
    let mut server = mockito::Server::new_async().await;
    let set_mock = server
        .mock("POST", format!("/bot{}/setWebhook", TOKEN).as_str())
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok": false, "error_code": 500, "description": "Internal Server Error"}"#)
        .expect(3)
        .create_async()
        .await;

    let bot = BotConfig::new("unlucky", TOKEN);
    let store = store_with(&bot).await;
    let registrar = WebhookRegistrar::new(
        store.clone(),
        TelegramGateway::new(server.url()),
        None,
    );

    let started = Instant::now();
    let err = registrar
        .register(&bot, Some("https://example.com/hook"))
        .await
        .expect_err("registration should fail");

    assert!(matches!(err, DispatchError::WebhookRegistrationFailed(_)));
    assert!(started.elapsed() >= Duration::from_secs(3));
    set_mock.assert_async().await;

    // Nothing persisted on failure.
    let saved = store
        .find_by_id(&bot.id)
        .await
        .expect("lookup")
        .expect("bot present");
    assert_eq!(saved.settings.webhook_url, None);
}

/// **Test: No custom URL and no base URL is a configuration error, not a retry.**
#[tokio::test]
async fn test_register_without_any_url_is_config_error() {
    let mut server = mockito::Server::new_async().await;
    let set_mock = server
        .mock("POST", mockito::Matcher::Regex(r"^/bot.*".to_string()))
        .expect(0)
        .create_async()
        .await;

    let bot = BotConfig::new("bare", TOKEN);
    let store = store_with(&bot).await;
    let registrar = WebhookRegistrar::new(store, TelegramGateway::new(server.url()), None);

    let err = registrar
        .register(&bot, None)
        .await
        .expect_err("registration should fail");
    assert!(matches!(err, DispatchError::Config(_)));
    set_mock.assert_async().await;
}

/// **Test: Deregistration deletes the webhook and clears the persisted URL.**
#[tokio::test]
async fn test_deregister_clears_url() {
    let mut server = mockito::Server::new_async().await;
    let delete_mock = server
        .mock("POST", format!("/bot{}/deleteWebhook", TOKEN).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok": true, "result": true}"#)
        .expect(1)
        .create_async()
        .await;

    let mut bot = BotConfig::new("retired", TOKEN);
    bot.settings.webhook_url = Some("https://example.com/hook".to_string());
    let store = store_with(&bot).await;
    let registrar = WebhookRegistrar::new(
        store.clone(),
        TelegramGateway::new(server.url()),
        None,
    );

    registrar
        .deregister(&bot)
        .await
        .expect("deregistration should succeed");
    delete_mock.assert_async().await;

    let saved = store
        .find_by_id(&bot.id)
        .await
        .expect("lookup")
        .expect("bot present");
    assert_eq!(saved.settings.webhook_url, None);
}
