// SPDX-FileCopyrightText: 2026 Ombuds Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end integration tests for the complete Ombuds pipeline.
//!
//! Each test creates an isolated TestHarness with a temp SQLite report store,
//! a mock channel, and in-memory sessions. Tests are independent and
//! order-insensitive.

use ombuds_core::ReportStore;
use ombuds_test_utils::TestHarness;

// ---- Test 1: Full questionnaire over real storage ----

#[tokio::test]
async fn test_full_submission_persists_and_notifies_admin() {
    let harness = TestHarness::builder().build().await.unwrap();
    let user = 42;

    harness.send_command(user, "start").await.unwrap();
    harness.press_button(user, "Korrupsiya").await.unwrap();
    harness.send_text(user, "Ali Valiyev").await.unwrap();
    harness
        .share_contact(user, Some("ali"), "+998901234567")
        .await
        .unwrap();
    harness.send_text(user, "Pora so'raldi").await.unwrap();
    harness.press_button(user, "secret_yes").await.unwrap();

    // One record in SQLite with the answers as given.
    let records = harness.stored_records().await.unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.category.as_deref(), Some("Korrupsiya"));
    assert_eq!(record.name.as_deref(), Some("Ali Valiyev"));
    assert_eq!(record.contact.as_deref(), Some("+998901234567"));
    assert_eq!(record.message.as_deref(), Some("Pora so'raldi"));
    assert_eq!(record.is_secret, Some(true));
    assert_eq!(record.user_id, 42);
    assert_eq!(record.username.as_deref(), Some("ali"));

    // One admin notification with the fixed field order.
    let notifications = harness.admin_notifications().await;
    assert_eq!(notifications.len(), 1);
    assert!(notifications[0].text.starts_with("Toifa: Korrupsiya"));
    assert!(notifications[0].text.contains("Chat ID: 42"));

    // The user saw the success confirmation.
    let reply = harness.last_reply(user).await.unwrap();
    assert!(reply.starts_with("Xabar muvaffaqiyatli yuborildi!"));
}

#[tokio::test]
async fn test_submission_survives_under_admin_show() {
    let harness = TestHarness::builder().build().await.unwrap();

    harness.send_command(7, "start").await.unwrap();
    harness.press_button(7, "Diniy").await.unwrap();
    harness.send_text(7, "Vali").await.unwrap();
    harness.send_text(7, "+998111111111").await.unwrap();
    harness.send_text(7, "masjid muammosi").await.unwrap();
    harness.press_button(7, "secret_no").await.unwrap();

    // Authenticate and list.
    let admin = 9;
    harness.send_command(admin, "admin").await.unwrap();
    harness
        .send_text(admin, "test-parol")
        .await
        .unwrap();
    harness.send_command(admin, "show").await.unwrap();

    let listing = harness.last_reply(admin).await.unwrap();
    assert!(listing.contains("1. Toifa: Diniy"));
    assert!(listing.contains("Ismi: Vali"));
    assert!(listing.contains("Vaziyat: masjid muammosi"));
    assert!(listing.contains("Sir saqlansinmi: Yo'q"));
}

// ---- Test 2: Admin authentication ----

#[tokio::test]
async fn test_wrong_then_right_password() {
    let harness = TestHarness::builder()
        .with_admin_password("juda-sir")
        .build()
        .await
        .unwrap();
    let admin = 9;

    harness.send_command(admin, "admin").await.unwrap();
    harness.send_text(admin, "xxxx").await.unwrap();
    assert_eq!(
        harness.last_reply(admin).await.as_deref(),
        Some("Noto'g'ri parol. Qaytadan urinib ko'ring.")
    );

    harness.send_text(admin, "juda-sir").await.unwrap();
    let reply = harness.last_reply(admin).await.unwrap();
    assert!(reply.starts_with("Admin menyusi:"));
}

#[tokio::test]
async fn test_admin_commands_rejected_without_auth() {
    let harness = TestHarness::builder().build().await.unwrap();

    harness.send_command(5, "show").await.unwrap();
    assert_eq!(
        harness.last_reply(5).await.as_deref(),
        Some("Siz admin emassiz.")
    );
}

// ---- Test 3: Clear ----

#[tokio::test]
async fn test_clear_empties_the_report_log() {
    let harness = TestHarness::builder().build().await.unwrap();

    harness.send_command(1, "start").await.unwrap();
    harness.press_button(1, "Migratsiya").await.unwrap();
    harness.send_text(1, "Vali").await.unwrap();
    harness.send_text(1, "+998").await.unwrap();
    harness.send_text(1, "hujjat muammosi").await.unwrap();
    harness.press_button(1, "secret_yes").await.unwrap();
    assert_eq!(harness.stored_records().await.unwrap().len(), 1);

    let admin = 9;
    harness.send_command(admin, "admin").await.unwrap();
    harness
        .send_text(admin, "test-parol")
        .await
        .unwrap();
    harness.send_command(admin, "clear").await.unwrap();
    assert_eq!(
        harness.last_reply(admin).await.as_deref(),
        Some("Barcha xabarlar tozalandi.")
    );
    assert!(harness.stored_records().await.unwrap().is_empty());

    harness.send_command(admin, "show").await.unwrap();
    assert_eq!(
        harness.last_reply(admin).await.as_deref(),
        Some("Hozirda hech qanday xabar yuborilmagan.")
    );
}

// ---- Test 4: Directory and admin-to-user relay ----

#[tokio::test]
async fn test_send_directory_and_relay() {
    let harness = TestHarness::builder().build().await.unwrap();

    // Two submissions from the same user, the later one with a real name.
    for (name, message) in [("Noma'lum", "birinchi"), ("Vali", "ikkinchi")] {
        harness.send_command(42, "start").await.unwrap();
        harness.press_button(42, "Yer oldi-sotdi").await.unwrap();
        harness.send_text(42, name).await.unwrap();
        harness.send_text(42, "+998901234567").await.unwrap();
        harness.send_text(42, message).await.unwrap();
        harness.press_button(42, "secret_no").await.unwrap();
    }

    let admin = 9;
    harness.send_command(admin, "admin").await.unwrap();
    harness
        .send_text(admin, "test-parol")
        .await
        .unwrap();
    harness.send_command(admin, "send").await.unwrap();

    // One directory entry, carrying the real name.
    let listing = harness.last_reply(admin).await.unwrap();
    assert!(listing.contains("1. Vali"));
    assert!(!listing.contains("2. "));

    harness.send_text(admin, "1").await.unwrap();
    harness.send_text(admin, "Muammoingiz hal qilindi").await.unwrap();

    // The user received the relayed message verbatim.
    assert_eq!(
        harness.last_reply(42).await.as_deref(),
        Some("Muammoingiz hal qilindi")
    );
    let confirmation = harness.last_reply(admin).await.unwrap();
    assert!(confirmation.contains("Foydalanuvchi: Vali"));
    assert!(confirmation.contains("Chat ID: 42"));
}

#[tokio::test]
async fn test_relay_failure_is_reported_to_admin() {
    let harness = TestHarness::builder().build().await.unwrap();

    harness.send_command(42, "start").await.unwrap();
    harness.press_button(42, "Boshqa mavzu").await.unwrap();
    harness.send_text(42, "Vali").await.unwrap();
    harness.send_text(42, "+998").await.unwrap();
    harness.send_text(42, "boshqa muammo").await.unwrap();
    harness.press_button(42, "secret_yes").await.unwrap();

    // The recipient becomes unreachable after submitting.
    harness.channel.fail_sends_to(42).await;

    let admin = 9;
    harness.send_command(admin, "admin").await.unwrap();
    harness
        .send_text(admin, "test-parol")
        .await
        .unwrap();
    harness.send_command(admin, "send").await.unwrap();
    harness.send_text(admin, "1").await.unwrap();
    harness.send_text(admin, "salom").await.unwrap();

    let reply = harness.last_reply(admin).await.unwrap();
    assert!(reply.starts_with("❌ Xabarni yuborishda xatolik yuz berdi."));
}

// ---- Test 5: Records survive a store reopen ----

#[tokio::test]
async fn test_records_survive_restart_sessions_do_not() {
    let harness = TestHarness::builder().build().await.unwrap();

    harness.send_command(1, "start").await.unwrap();
    harness.press_button(1, "Diniy").await.unwrap();
    harness.send_text(1, "Vali").await.unwrap();
    harness.send_text(1, "+998").await.unwrap();
    harness.send_text(1, "muammo").await.unwrap();
    harness.press_button(1, "secret_yes").await.unwrap();

    // Leave a second user mid-flow.
    harness.send_command(2, "start").await.unwrap();

    // Reopen the same database file.
    harness.reports.close().await.unwrap();
    let reopened = ombuds_storage::SqliteReportStore::new(
        ombuds_config::model::StorageConfig {
            database_path: harness.database_path(),
            wal_mode: true,
        },
    );
    reopened.initialize().await.unwrap();
    let records = reopened.load_all().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name.as_deref(), Some("Vali"));
}
