mod delete_subscription;
mod get_user_subscriptions;
mod subscribe_public;
mod subscribe_user;
mod subscribers;
mod unsubscribe;
mod update_subscription;

use actix_web::web;
use delete_subscription::delete_subscription_controller;
use duesoon_domain::{InvalidReminderHours, ReminderHours, SubscriptionPreferences};
use get_user_subscriptions::get_user_subscriptions_controller;
use subscribe_public::subscribe_public_controller;
use subscribe_user::subscribe_user_controller;
use unsubscribe::unsubscribe_controller;
use update_subscription::update_subscription_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/subscriptions/public",
        web::post().to(subscribe_public_controller),
    );
    cfg.route(
        "/subscriptions/unsubscribe",
        web::post().to(unsubscribe_controller),
    );
    cfg.route(
        "/user/{user_id}/subscriptions",
        web::post().to(subscribe_user_controller),
    );
    cfg.route(
        "/user/{user_id}/subscriptions",
        web::get().to(get_user_subscriptions_controller),
    );
    cfg.route(
        "/user/{user_id}/subscriptions/{subscription_id}",
        web::put().to(update_subscription_controller),
    );
    cfg.route(
        "/user/{user_id}/subscriptions/{subscription_id}",
        web::delete().to(delete_subscription_controller),
    );
}

/// Preference values as they arrive in a request, before validation
#[derive(Debug, Clone, Default)]
pub struct RawPreferences {
    pub task_reminders: Option<bool>,
    pub daily_summary: Option<bool>,
    pub weekly_report: Option<bool>,
    pub reminder_hours: Option<i64>,
}

impl RawPreferences {
    pub fn validate(&self) -> Result<SubscriptionPreferences, InvalidReminderHours> {
        let reminder_hours = match self.reminder_hours {
            Some(hours) => Some(ReminderHours::new(hours)?),
            None => None,
        };
        Ok(SubscriptionPreferences {
            task_reminders: self.task_reminders,
            daily_summary: self.daily_summary,
            weekly_report: self.weekly_report,
            reminder_hours,
        })
    }
}

/// Emails are matched case insensitively
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
