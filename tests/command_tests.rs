//! Prefix Command Integration Tests
//!
//! Run with: `cargo test --test command_tests`

mod common;

use common::*;
use dushman::{Command, Configuration};

async fn run(h: &Harness, author: u64, text: &str) -> Option<Command> {
    h.commands
        .handle(&h.shared(), &message(1, author, text))
        .await
        .unwrap()
}

// ============================================================================
// Trigger List Mutation
// ============================================================================

/// Unauthorized addword: denial only, nothing persisted or logged
#[tokio::test]
async fn test_unauthorized_addword_is_denied() {
    let h = Harness::new().await;
    let before = std::fs::read_to_string(h.config_path()).unwrap();

    let command = run(&h, USER, "!addword test").await;

    assert_eq!(command, Some(Command::AddWord("test".to_string())));
    assert_eq!(
        h.dispatcher.sent_texts(),
        vec!["Only privileged users can use `!addword`!".to_string()]
    );
    assert_eq!(std::fs::read_to_string(h.config_path()).unwrap(), before);
    assert_eq!(h.config().await.trigger_phrases, vec!["gm".to_string()]);
    assert!(h.log_lines().is_empty());
}

#[tokio::test]
async fn test_exempt_user_cannot_mutate() {
    let h = Harness::new().await;

    run(&h, EXEMPT, "!removeword gm").await;

    assert_eq!(
        h.dispatcher.sent_texts(),
        vec!["Only privileged users can use `!removeword`!".to_string()]
    );
    assert!(h.config().await.has_trigger("gm"));
}

#[tokio::test]
async fn test_addword_normalizes_and_persists() {
    let h = Harness::new().await;

    run(&h, BOSS, "!addword Good Night").await;

    assert_eq!(
        h.dispatcher.sent_texts(),
        vec!["Word 'good night' added to trigger list ✅".to_string()]
    );
    assert_eq!(
        h.config().await.trigger_phrases,
        vec!["gm".to_string(), "good night".to_string()]
    );

    let log = h.log_lines();
    assert_eq!(log.len(), 1);
    assert!(log[0].ends_with("user10 added trigger phrase: good night"));
}

/// Adding an existing phrase (any case) changes nothing
#[tokio::test]
async fn test_addword_is_idempotent() {
    let h = Harness::new().await;

    run(&h, BOSS, "!addword GM").await;

    assert_eq!(
        h.dispatcher.sent_texts(),
        vec!["Word 'gm' already in trigger list!".to_string()]
    );
    assert_eq!(h.config().await.trigger_phrases, vec!["gm".to_string()]);
    assert!(h.log_lines().is_empty());
}

/// Removing a missing phrase: "not found" and no write
#[tokio::test]
async fn test_removeword_not_found_skips_write() {
    let h = Harness::new().await;
    // Compact formatting would be replaced by pretty output on any save
    let compact = serde_json::to_string(&test_config()).unwrap();
    std::fs::write(h.config_path(), &compact).unwrap();

    run(&h, BOSS, "!removeword nope").await;

    assert_eq!(
        h.dispatcher.sent_texts(),
        vec!["Word 'nope' not found in trigger list!".to_string()]
    );
    assert_eq!(std::fs::read_to_string(h.config_path()).unwrap(), compact);
    assert!(h.log_lines().is_empty());
}

#[tokio::test]
async fn test_removeword_removes_and_logs() {
    let h = Harness::new().await;

    run(&h, BOSS, "!removeword GM").await;

    assert_eq!(
        h.dispatcher.sent_texts(),
        vec!["Word 'gm' removed from trigger list ✅".to_string()]
    );
    assert!(h.config().await.trigger_phrases.is_empty());
    assert_eq!(h.log_lines().len(), 1);
}

#[tokio::test]
async fn test_missing_argument_shows_usage() {
    let h = Harness::new().await;

    run(&h, BOSS, "!addword   ").await;

    assert_eq!(
        h.dispatcher.sent_texts(),
        vec!["Usage: `!addword <word>`".to_string()]
    );
    assert_eq!(h.config().await.trigger_phrases.len(), 1);
}

// ============================================================================
// Status & Reporting
// ============================================================================

#[tokio::test]
async fn test_listwords_is_open_to_everyone() {
    let mut config = test_config();
    config.trigger_phrases.push("good morning".to_string());
    let h = Harness::with_config(config).await;

    run(&h, USER, "!listwords").await;

    assert_eq!(
        h.dispatcher.sent_texts(),
        vec!["**Trigger phrases:** gm, good morning".to_string()]
    );
}

#[tokio::test]
async fn test_setstatus_changes_presence_only() {
    let h = Harness::new().await;
    let before = std::fs::read_to_string(h.config_path()).unwrap();

    run(&h, USER, "!setstatus hacked").await;
    assert_eq!(h.dispatcher.presence(), None);

    run(&h, BOSS, "!setstatus the morning crowd").await;
    assert_eq!(
        h.dispatcher.presence(),
        Some("the morning crowd".to_string())
    );
    assert_eq!(
        h.dispatcher.sent_texts()[1],
        "Status changed to: the morning crowd ✅"
    );
    assert_eq!(std::fs::read_to_string(h.config_path()).unwrap(), before);
}

#[tokio::test]
async fn test_stats_reports_platform_and_config_counts() {
    let h = Harness::new().await;

    run(&h, USER, "!stats").await;

    let sent = h.dispatcher.sent();
    let embed = sent[0].embed();
    let value = |name: &str| {
        embed
            .fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.clone())
            .unwrap()
    };

    assert_eq!(value("Servers"), "3");
    assert_eq!(value("Users"), "42");
    assert_eq!(value("Trigger Phrases"), "1");
    assert_eq!(value("Privileged Users"), "1");
    assert_eq!(value("Exempt Users"), "1");
    assert_eq!(value("Ping"), "87ms");
}

#[tokio::test]
async fn test_showlog_empty() {
    let h = Harness::new().await;

    run(&h, USER, "!showlog").await;

    assert_eq!(
        h.dispatcher.sent_texts(),
        vec!["The action log is empty.".to_string()]
    );
}

#[tokio::test]
async fn test_showlog_returns_last_fifteen_lines() {
    let h = Harness::new().await;
    for i in 0..20 {
        h.app.actions.record(format!("entry {i:02}")).await;
    }

    run(&h, USER, "!showlog").await;

    let text = h.dispatcher.sent_texts().remove(0);
    assert!(text.starts_with("```\n"));
    assert!(text.ends_with("\n```"));
    assert!(!text.contains("entry 04"));
    assert!(text.contains("entry 05"));
    assert!(text.contains("entry 19"));
}

#[tokio::test]
async fn test_showlog_truncates_keeping_newest() {
    let h = Harness::new().await;
    for i in 0..15 {
        h.app
            .actions
            .record(format!("entry {i:02} {}", "x".repeat(200)))
            .await;
    }

    run(&h, USER, "!showlog").await;

    let text = h.dispatcher.sent_texts().remove(0);
    let body = text
        .strip_prefix("```\n")
        .and_then(|t| t.strip_suffix("\n```"))
        .unwrap();
    assert_eq!(body.chars().count(), 1900);
    assert!(body.contains("entry 14"));
    assert!(!body.contains("entry 00"));
}

#[tokio::test]
async fn test_help_lists_commands() {
    let h = Harness::new().await;

    run(&h, USER, "!help").await;

    let sent = h.dispatcher.sent();
    let embed = sent[0].embed();
    for name in ["!showlog", "!stats", "!listwords", "!addword <word>"] {
        assert!(embed.fields.iter().any(|f| f.name == name), "missing {name}");
    }
}

#[tokio::test]
async fn test_unknown_command_reply() {
    let h = Harness::new().await;

    let command = run(&h, USER, "!dance").await;

    assert_eq!(command, Some(Command::Unknown("dance".to_string())));
    assert_eq!(
        h.dispatcher.sent_texts(),
        vec!["Command not found! Use `!help` for available commands.".to_string()]
    );
}

#[tokio::test]
async fn test_plain_chat_is_ignored() {
    let h = Harness::new().await;

    assert_eq!(run(&h, USER, "good evening").await, None);
    assert!(h.dispatcher.sent().is_empty());
}

#[tokio::test]
async fn test_corrupt_config_surfaces_error() {
    let h = Harness::new().await;
    std::fs::write(h.config_path(), "[]").unwrap();

    let result = h
        .commands
        .handle(&h.shared(), &message(1, USER, "!listwords"))
        .await;

    assert!(result.is_err());
    assert!(h.dispatcher.sent().is_empty());
}

// ============================================================================
// Moderation Then Commands
// ============================================================================

/// A command hidden in a blocked message is still answered
#[tokio::test]
async fn test_command_runs_after_moderation() {
    let mut config: Configuration = test_config();
    config.self_cleanup_delay_secs = 0;
    let h = Harness::with_config(config).await;
    let msg = message(77, USER, "!listwords gm");

    h.engine.handle(h.shared(), &msg).await.unwrap();
    h.commands.handle(&h.shared(), &msg).await.unwrap();

    assert_eq!(h.dispatcher.delete_attempts().len(), 1);
    assert_eq!(
        h.dispatcher.sent_texts(),
        vec![
            "<@30> no morning wishes here".to_string(),
            "**Trigger phrases:** gm".to_string(),
        ]
    );
}
