mod helpers;

use actix_web::rt::time::sleep;
use helpers::setup::{spawn_app, TestApp};
use lull_sdk::{
    APIErrorVariant, EventStatus, Feedback, LullSDK, Reminder, SubmitFeedbackInput,
    TriggerBucket, ID,
};
use std::time::Duration;

/// Reminders are planned in the background, so poll until `count` show up
async fn wait_for_reminders(sdk: &LullSDK, count: usize) -> Vec<Reminder> {
    for _ in 0..100 {
        let reminders = sdk
            .reminder
            .list(Some(50))
            .await
            .expect("Expected to list reminders")
            .reminders;
        if reminders.len() >= count {
            return reminders;
        }
        sleep(Duration::from_millis(20)).await;
    }
    panic!("Expected {} reminders to be planned", count);
}

async fn wait_for_status(app: &TestApp, reminder_id: &ID, status: EventStatus) {
    for _ in 0..400 {
        let event = app.ctx.repos.events.find(reminder_id).await.unwrap();
        if event.map(|e| e.status) == Some(status) {
            return;
        }
        sleep(Duration::from_millis(25)).await;
    }
    panic!("Expected reminder {} to become {}", reminder_id, status);
}

#[actix_web::main]
#[test]
async fn test_status_ok() {
    let (_, sdk, _) = spawn_app().await;
    let res = sdk.status.check_health().await.expect("Expected health");
    assert_eq!(res.armed_timers, 0);
}

#[actix_web::main]
#[test]
async fn test_requests_without_owner_are_unauthorized() {
    let (_, _, address) = spawn_app().await;
    let anonymous = LullSDK::new(address, "");
    let res = anonymous.reminder.list(None).await;
    assert_eq!(res.unwrap_err().variant, APIErrorVariant::Unauthorized);
}

#[actix_web::main]
#[test]
async fn test_create_reminder() {
    let (app, sdk, _) = spawn_app().await;
    app.llm.reply_to(
        "交报告",
        r#"{"valid": true, "eventTime": "2026-02-10 09:00:00", "intent": "CUSHION", "complexity": "HIGH"}"#,
    );

    assert!(sdk.reminder.create("下下周二交报告").await.is_ok());
    let reminders = wait_for_reminders(&sdk, 1).await;
    let reminder = &reminders[0];
    assert_eq!(reminder.owner_ref, "ann@example.com");
    assert_eq!(reminder.status, EventStatus::Silent);
    assert_eq!(reminder.bucket, TriggerBucket::D7);
    assert_eq!(reminder.event_ts - reminder.trigger_ts, 7 * 24 * 60 * 60 * 1000);

    let health = sdk.status.check_health().await.unwrap();
    assert_eq!(health.armed_timers, 1);
}

#[actix_web::main]
#[test]
async fn test_empty_input_is_rejected() {
    let (_, sdk, _) = spawn_app().await;
    let res = sdk.reminder.create("   ").await;
    assert_eq!(res.unwrap_err().variant, APIErrorVariant::BadClientData);
}

#[actix_web::main]
#[test]
async fn test_reminder_is_delivered() {
    let (app, sdk, _) = spawn_app().await;
    app.llm
        .reply_to("安抚", "Water first, then back to work.")
        .reply_to(
            "喝水",
            r#"{"valid": true, "eventTime": "2026-01-31 10:00:02", "intent": "AT_TIME"}"#,
        );

    sdk.reminder.create("马上喝水").await.unwrap();
    let reminders = wait_for_reminders(&sdk, 1).await;
    wait_for_status(&app, &reminders[0].id, EventStatus::Delivered).await;

    let delivered = app.notifier.delivered();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].owner_ref, "ann@example.com");
    assert_eq!(delivered[0].body, "Water first, then back to work.");

    // Delivered reminders cannot be canceled but do take feedback
    let res = sdk.reminder.cancel(reminders[0].id).await;
    assert_eq!(res.unwrap_err().variant, APIErrorVariant::Conflict);
    let res = sdk
        .reminder
        .submit_feedback(SubmitFeedbackInput {
            reminder_id: reminders[0].id,
            feedback: Feedback::Late,
        })
        .await
        .expect("Expected to submit feedback");
    assert_eq!(res.reminder.feedback, Some(Feedback::Late));
}

#[actix_web::main]
#[test]
async fn test_cancel_reminder() {
    let (app, sdk, address) = spawn_app().await;
    app.llm.reply_to(
        "开会",
        r#"{"valid": true, "eventTime": "2026-01-31 21:00:00", "intent": "AT_TIME"}"#,
    );

    sdk.reminder.create("今晚9点开会").await.unwrap();
    let reminders = wait_for_reminders(&sdk, 1).await;
    let reminder_id = reminders[0].id;

    let other_owner = LullSDK::new(address, "bob@example.com");
    let res = other_owner.reminder.cancel(reminder_id).await;
    assert_eq!(res.unwrap_err().variant, APIErrorVariant::Forbidden);

    let res = sdk
        .reminder
        .cancel(reminder_id)
        .await
        .expect("Expected to cancel reminder");
    assert_eq!(res.reminder.status, EventStatus::Canceled);
    assert!(!app.ctx.timers.is_armed(&reminder_id));

    // Feedback needs a delivered reminder
    let res = sdk
        .reminder
        .submit_feedback(SubmitFeedbackInput {
            reminder_id,
            feedback: Feedback::Early,
        })
        .await;
    assert_eq!(res.unwrap_err().variant, APIErrorVariant::Conflict);

    let res = sdk.reminder.cancel(ID::new(999)).await;
    assert_eq!(res.unwrap_err().variant, APIErrorVariant::NotFound);
}

#[actix_web::main]
#[test]
async fn test_refresh_config_needs_admin_key() {
    let (app, sdk, address) = spawn_app().await;
    let res = sdk.config.refresh().await;
    assert_eq!(res.unwrap_err().variant, APIErrorVariant::Unauthorized);

    let admin = LullSDK::new_admin(address, "ops", app.config.admin_secret_key.clone());
    let res = admin
        .config
        .refresh()
        .await
        .expect("Expected to refresh config");
    assert_eq!(res.entries, 0);
}
