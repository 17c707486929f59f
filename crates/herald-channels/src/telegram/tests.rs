//! Tests for telegram module

use super::*;
use crate::error::Error;
use crate::message::{BroadcastChannel, RecipientTarget};
use std::path::Path;
use teloxide::types::{ChatId, Recipient};

#[test]
fn test_telegram_config() {
    let config = TelegramConfig::new("123456:test_token");
    assert_eq!(config.bot_token, "123456:test_token");
    assert!(config.is_configured());
}

#[test]
fn test_placeholder_token_is_not_configured() {
    assert!(!TelegramConfig::new(PLACEHOLDER_TOKEN).is_configured());
    assert!(!TelegramConfig::new("   ").is_configured());
    assert!(!TelegramConfig::default().is_configured());
}

// The only test touching TELEGRAM_BOT_TOKEN; keep it that way so tests
// running in parallel never observe each other's value.
#[test]
fn test_env_token_fallback() {
    std::env::remove_var("TELEGRAM_BOT_TOKEN");
    assert!(!TelegramConfig::default().with_env_fallback().is_configured());

    std::env::set_var("TELEGRAM_BOT_TOKEN", "999:from_env");
    let from_env = TelegramConfig::default().with_env_fallback();
    let blank = TelegramConfig::new("  ").with_env_fallback();
    let configured = TelegramConfig::new("123:from_config").with_env_fallback();
    std::env::remove_var("TELEGRAM_BOT_TOKEN");

    assert_eq!(from_env.bot_token, "999:from_env");
    assert!(from_env.is_configured());
    assert_eq!(blank.bot_token, "999:from_env");
    assert_eq!(configured.bot_token, "123:from_config");
}

#[test]
fn test_adapter_requires_token() {
    let err = TelegramAdapter::new(&TelegramConfig::default()).err();
    assert!(matches!(err, Some(Error::Telegram(_))));
}

#[test]
fn test_parse_recipient() {
    assert_eq!(
        TelegramAdapter::parse_recipient("-1001234567890").unwrap(),
        Recipient::Id(ChatId(-1001234567890))
    );
    assert_eq!(
        TelegramAdapter::parse_recipient("@herald_news").unwrap(),
        Recipient::ChannelUsername("@herald_news".to_string())
    );
    assert!(TelegramAdapter::parse_recipient(" ").is_err());
}

#[tokio::test]
async fn test_rejects_whatsapp_recipient() {
    let adapter = TelegramAdapter::new(&TelegramConfig::new("123456:token")).unwrap();
    let target = RecipientTarget::whatsapp("Family", "1203@g.us");

    let result = adapter
        .send_to_recipient(&target, Path::new("e.jpg"), "caption")
        .await;
    assert!(matches!(result, Err(Error::Parse(_))));
}

#[tokio::test]
async fn test_status_is_unsupported() {
    let adapter = TelegramAdapter::new(&TelegramConfig::new("123456:token")).unwrap();

    let result = adapter.send_to_status(Path::new("e.jpg")).await;
    assert!(matches!(result, Err(Error::Unsupported { .. })));
    tokio_test::assert_err!(adapter.list_groups().await);
}
