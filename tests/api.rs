mod helpers;

use chrono::{Duration, Utc};
use duesoon_domain::{DueSoonTask, TaskPriority, User};
use duesoon_sdk::{
    APIError, PreferencesInput, ReminderCadence, RunReminderPassInput, SubscribePublicInput,
    SubscribeUserInput, UpdateSubscriptionInput, ID,
};
use helpers::setup::{admin_sdk, spawn_app, TestApp};

fn public_input(email: &str, reminder_hours: Option<i64>) -> SubscribePublicInput {
    SubscribePublicInput {
        email: email.into(),
        name: Some("Ann".into()),
        preferences: PreferencesInput {
            reminder_hours,
            ..Default::default()
        },
    }
}

async fn seed_user_with_task(app: &TestApp, email: &str, due_in: Duration) -> User {
    let user = User::new(email, "Ann");
    app.ctx.repos.users.insert(&user).await.unwrap();
    let task = DueSoonTask {
        id: Default::default(),
        user_id: user.id.clone(),
        title: "Finish slides".into(),
        description: Some("For monday".into()),
        due_at: Utc::now() + due_in,
        priority: Some(TaskPriority::High),
        completed: false,
    };
    app.ctx.repos.tasks.insert(&task).await.unwrap();
    user
}

#[actix_web::main]
#[test]
async fn test_status_ok() {
    let (_, sdk, _) = spawn_app().await;
    let res = sdk.status.check_health().await.expect("Expected healthy service");
    assert!(!res.reminder_jobs_enabled);
}

#[actix_web::main]
#[test]
async fn test_public_subscribe() {
    let (app, sdk, _) = spawn_app().await;
    let res = sdk
        .subscription
        .subscribe_public(public_input("Ann@X.com", None))
        .await
        .expect("Expected to subscribe");

    let sub = res.subscription;
    assert_eq!(sub.email, "ann@x.com");
    assert!(sub.user_id.is_none());
    assert!(sub.is_active);
    assert!(sub.task_reminders);
    assert!(!sub.daily_summary);
    assert_eq!(sub.reminder_hours, 24);
    assert_eq!(app.emails.recipients(), vec!["ann@x.com".to_string()]);
}

#[actix_web::main]
#[test]
async fn test_public_subscribe_validation() {
    let (_, sdk, _) = spawn_app().await;
    for hours in [0, 169] {
        let res = sdk
            .subscription
            .subscribe_public(public_input("a@x.com", Some(hours)))
            .await;
        assert!(matches!(res, Err(APIError::BadClientData)));
    }
    let res = sdk
        .subscription
        .subscribe_public(public_input("not an email", None))
        .await;
    assert!(matches!(res, Err(APIError::BadClientData)));
}

#[actix_web::main]
#[test]
async fn test_resubscribe_and_unsubscribe() {
    let (app, sdk, _) = spawn_app().await;
    let first = sdk
        .subscription
        .subscribe_public(public_input("a@x.com", None))
        .await
        .unwrap()
        .subscription;
    let first_token = app.emails.last_unsubscribe_token("a@x.com").unwrap();

    let second = sdk
        .subscription
        .subscribe_public(public_input("a@x.com", Some(12)))
        .await
        .unwrap()
        .subscription;
    let second_token = app.emails.last_unsubscribe_token("a@x.com").unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(second.reminder_hours, 12);
    assert_ne!(first_token, second_token);

    // The old token was replaced
    assert!(matches!(
        sdk.subscription.unsubscribe(first_token).await,
        Err(APIError::NotFound)
    ));
    assert!(sdk.subscription.unsubscribe(second_token).await.is_ok());
    let stored = app.ctx.repos.subscriptions.find(&second.id).await.unwrap().unwrap();
    assert!(!stored.is_active);
}

#[actix_web::main]
#[test]
async fn test_admin_routes_require_api_key() {
    let (_, sdk, _) = spawn_app().await;
    let res = sdk.subscription.get_by_user(ID::new()).await;
    assert!(matches!(res, Err(APIError::Unauthorized)));
    let res = sdk.reminder.run_cadence(ReminderCadence::Routine).await;
    assert!(matches!(res, Err(APIError::Unauthorized)));
}

#[actix_web::main]
#[test]
async fn test_user_subscription_lifecycle() {
    let (app, _, address) = spawn_app().await;
    let admin = admin_sdk(&address);
    let user = User::new("bob@x.com", "Bob");
    app.ctx.repos.users.insert(&user).await.unwrap();

    let sub = admin
        .subscription
        .subscribe_user(SubscribeUserInput {
            user_id: user.id.clone(),
            email: "bob@x.com".into(),
            preferences: Default::default(),
        })
        .await
        .expect("Expected to subscribe user")
        .subscription;
    assert_eq!(sub.user_id, Some(user.id.clone()));

    let list = admin.subscription.get_by_user(user.id.clone()).await.unwrap();
    assert_eq!(list.subscriptions.len(), 1);

    let updated = admin
        .subscription
        .update(UpdateSubscriptionInput {
            user_id: user.id.clone(),
            subscription_id: sub.id.clone(),
            is_active: None,
            preferences: PreferencesInput {
                weekly_report: Some(true),
                reminder_hours: Some(48),
                ..Default::default()
            },
        })
        .await
        .unwrap()
        .subscription;
    assert!(updated.weekly_report);
    assert_eq!(updated.reminder_hours, 48);

    let res = admin
        .subscription
        .update(UpdateSubscriptionInput {
            user_id: user.id.clone(),
            subscription_id: sub.id.clone(),
            is_active: None,
            preferences: PreferencesInput {
                reminder_hours: Some(500),
                ..Default::default()
            },
        })
        .await;
    assert!(matches!(res, Err(APIError::BadClientData)));

    assert!(admin
        .subscription
        .delete(user.id.clone(), sub.id.clone())
        .await
        .is_ok());
    assert!(matches!(
        admin.subscription.delete(user.id.clone(), sub.id.clone()).await,
        Err(APIError::NotFound)
    ));
    let list = admin.subscription.get_by_user(user.id.clone()).await.unwrap();
    assert!(list.subscriptions.is_empty());

    let res = admin.subscription.get_by_user(ID::new()).await;
    assert!(matches!(res, Err(APIError::NotFound)));
}

#[actix_web::main]
#[test]
async fn test_manual_reminder_pass() {
    let (app, sdk, address) = spawn_app().await;
    let admin = admin_sdk(&address);
    seed_user_with_task(&app, "a@x.com", Duration::hours(3)).await;
    let sub = sdk
        .subscription
        .subscribe_public(public_input("a@x.com", None))
        .await
        .unwrap()
        .subscription;

    let res = admin
        .reminder
        .run_cadence(ReminderCadence::Urgent)
        .await
        .expect("Expected pass to run");
    assert_eq!((res.sent, res.failed, res.total), (1, 0, 1));
    let reminders = app
        .emails
        .sent
        .lock()
        .unwrap()
        .iter()
        .filter(|m| m.subject == "Duesoon - Reminder: 1 task(s) due soon")
        .count();
    assert_eq!(reminders, 1);
    let stored = app.ctx.repos.subscriptions.find(&sub.id).await.unwrap().unwrap();
    assert!(stored.last_notification_sent_at.is_some());

    // Still cooling down
    let res = admin.reminder.run_cadence(ReminderCadence::Routine).await.unwrap();
    assert_eq!((res.sent, res.failed, res.total), (0, 0, 1));

    // Without cooldown the reminder goes out again
    let res = admin
        .reminder
        .run(RunReminderPassInput {
            horizon_hours: Some(4),
            cooldown_hours: 0,
        })
        .await
        .unwrap();
    assert_eq!((res.sent, res.failed, res.total), (1, 0, 1));

    let res = admin
        .reminder
        .run(RunReminderPassInput {
            horizon_hours: Some(1000),
            cooldown_hours: 0,
        })
        .await;
    assert!(matches!(res, Err(APIError::BadClientData)));

    let res = admin
        .reminder
        .run(RunReminderPassInput {
            horizon_hours: None,
            cooldown_hours: 10_000_000_000_000,
        })
        .await;
    assert!(matches!(res, Err(APIError::BadClientData)));
}
