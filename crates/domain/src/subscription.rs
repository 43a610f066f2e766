use crate::shared::entity::{Entity, ID};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use thiserror::Error;

/// Smallest allowed reminder horizon in hours
pub const MIN_REMINDER_HOURS: i64 = 1;
/// Largest allowed reminder horizon in hours (7 days)
pub const MAX_REMINDER_HOURS: i64 = 168;
/// Reminder horizon used when the subscriber does not pick one
pub const DEFAULT_REMINDER_HOURS: i64 = 24;

#[derive(Error, Debug, PartialEq)]
#[error("Reminder hours must be between 1 and 168, got: {0}")]
pub struct InvalidReminderHours(pub i64);

/// How many hours ahead of a task's due time the subscriber wants to be
/// reminded. Always within `[MIN_REMINDER_HOURS, MAX_REMINDER_HOURS]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct ReminderHours(i64);

impl ReminderHours {
    pub const fn new(hours: i64) -> Result<Self, InvalidReminderHours> {
        if hours >= MIN_REMINDER_HOURS && hours <= MAX_REMINDER_HOURS {
            Ok(Self(hours))
        } else {
            Err(InvalidReminderHours(hours))
        }
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl Default for ReminderHours {
    fn default() -> Self {
        Self(DEFAULT_REMINDER_HOURS)
    }
}

impl TryFrom<i64> for ReminderHours {
    type Error = InvalidReminderHours;

    fn try_from(hours: i64) -> Result<Self, Self::Error> {
        Self::new(hours)
    }
}

impl From<ReminderHours> for i64 {
    fn from(hours: ReminderHours) -> Self {
        hours.0
    }
}

/// Optional preference values provided when subscribing or updating a
/// `Subscription`. `None` leaves the current value untouched.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionPreferences {
    pub task_reminders: Option<bool>,
    pub daily_summary: Option<bool>,
    pub weekly_report: Option<bool>,
    pub reminder_hours: Option<ReminderHours>,
}

/// A recipient's reminder preferences together with the send state
/// needed to enforce the cooldown between reminders.
#[derive(Debug, Clone)]
pub struct Subscription {
    pub id: ID,
    pub email: String,
    /// The `User` this subscription was created by. Public subscriptions
    /// have no owner and are matched to a `User` by email.
    pub owner: Option<ID>,
    pub name: Option<String>,
    pub is_active: bool,
    pub task_reminders: bool,
    pub daily_summary: bool,
    pub weekly_report: bool,
    pub reminder_hours: ReminderHours,
    /// When the last reminder was successfully dispatched. This is the only
    /// dedup state, every cooldown decision is made against it.
    pub last_notification_sent_at: Option<DateTime<Utc>>,
    pub unsubscribe_token: String,
    pub email_verified: bool,
    pub verification_token: Option<String>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Subscription {
    fn new(
        email: String,
        owner: Option<ID>,
        name: Option<String>,
        prefs: &SubscriptionPreferences,
        now: DateTime<Utc>,
    ) -> Self {
        let verification_token = if owner.is_none() {
            Some(create_token())
        } else {
            None
        };
        let mut subscription = Self {
            id: Default::default(),
            email,
            owner,
            name,
            is_active: true,
            task_reminders: true,
            daily_summary: false,
            weekly_report: false,
            reminder_hours: Default::default(),
            last_notification_sent_at: None,
            unsubscribe_token: create_token(),
            email_verified: false,
            verification_token,
            created: now,
            updated: now,
        };
        subscription.apply_preferences(prefs, now);
        subscription
    }

    /// Creates a subscription that anyone can register without an account
    pub fn new_public(
        email: impl Into<String>,
        name: Option<String>,
        prefs: &SubscriptionPreferences,
        now: DateTime<Utc>,
    ) -> Self {
        Self::new(email.into(), None, name, prefs, now)
    }

    /// Creates a subscription linked to the given `User`
    pub fn new_for_user(
        user_id: ID,
        email: impl Into<String>,
        prefs: &SubscriptionPreferences,
        now: DateTime<Utc>,
    ) -> Self {
        Self::new(email.into(), Some(user_id), None, prefs, now)
    }

    pub fn is_public(&self) -> bool {
        self.owner.is_none()
    }

    /// Whether the reminder engine should consider this subscription at all
    pub fn wants_task_reminders(&self) -> bool {
        self.is_active && self.task_reminders
    }

    pub fn apply_preferences(&mut self, prefs: &SubscriptionPreferences, now: DateTime<Utc>) {
        if let Some(task_reminders) = prefs.task_reminders {
            self.task_reminders = task_reminders;
        }
        if let Some(daily_summary) = prefs.daily_summary {
            self.daily_summary = daily_summary;
        }
        if let Some(weekly_report) = prefs.weekly_report {
            self.weekly_report = weekly_report;
        }
        if let Some(reminder_hours) = prefs.reminder_hours {
            self.reminder_hours = reminder_hours;
        }
        self.updated = now;
    }

    /// Subscribing again with an existing email reactivates the subscription
    /// and hands out a fresh unsubscribe token.
    pub fn resubscribe(&mut self, prefs: &SubscriptionPreferences, now: DateTime<Utc>) {
        self.apply_preferences(prefs, now);
        self.is_active = true;
        self.unsubscribe_token = create_token();
        if self.is_public() {
            self.verification_token = Some(create_token());
        }
    }

    pub fn unsubscribe(&mut self, now: DateTime<Utc>) {
        self.is_active = false;
        self.updated = now;
    }

    pub fn mark_notified(&mut self, now: DateTime<Utc>) {
        self.last_notification_sent_at = Some(now);
        self.updated = now;
    }

    /// Name used to greet the recipient
    pub fn display_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => fallback,
        }
    }
}

impl Entity for Subscription {
    fn id(&self) -> &ID {
        &self.id
    }
}

fn create_token() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Very small sanity check of an email address. Full validation happens
/// when the provider accepts or bounces the message.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = match parts.next() {
        Some(domain) => domain,
        None => return false,
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}
