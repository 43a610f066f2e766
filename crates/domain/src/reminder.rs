use crate::subscription::{ReminderHours, Subscription};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cooldown between two routine reminders to the same subscription
pub const ROUTINE_COOLDOWN_HOURS: i64 = 12;
/// Cooldown between two urgent reminders to the same subscription
pub const URGENT_COOLDOWN_HOURS: i64 = 2;
/// Urgent reminders only look at tasks due within this many hours
pub const URGENT_HORIZON_HOURS: i64 = 4;
/// How often the urgent reminder pass runs
pub const URGENT_INTERVAL_HOURS: i64 = 2;
/// Longest cooldown a manual reminder pass accepts (one year)
pub const MAX_COOLDOWN_HOURS: i64 = 24 * 365;

const URGENT_HORIZON: ReminderHours = match ReminderHours::new(URGENT_HORIZON_HOURS) {
    Ok(hours) => hours,
    Err(_) => panic!("URGENT_HORIZON_HOURS is not a valid reminder horizon"),
};

const MILLIS_PER_HOUR: i64 = 1000 * 60 * 60;

/// Decides whether a subscription that was last notified at `last_sent`
/// may be notified again at `now`. A cooldown too long to represent is
/// never over.
pub fn should_send_reminder(
    last_sent: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    cooldown_hours: i64,
) -> bool {
    match last_sent {
        None => true,
        Some(last_sent) => match cooldown_hours.checked_mul(MILLIS_PER_HOUR) {
            Some(cooldown) => (now - last_sent).num_milliseconds() >= cooldown,
            None => false,
        },
    }
}

/// Which due-soon horizon a reminder pass uses for each `Subscription`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HorizonPolicy {
    /// Use the `reminder_hours` the subscriber picked
    SubscriptionPreference,
    /// Same horizon for every subscription
    Fixed(ReminderHours),
}

impl HorizonPolicy {
    pub fn hours_for(&self, subscription: &Subscription) -> i64 {
        match self {
            Self::SubscriptionPreference => subscription.reminder_hours.get(),
            Self::Fixed(hours) => hours.get(),
        }
    }
}

/// The two schedules reminders are sent on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderCadence {
    /// Once a day at a fixed local time
    Routine,
    /// Every couple of hours, catching tasks that are about to be due
    Urgent,
}

impl ReminderCadence {
    pub fn horizon(&self) -> HorizonPolicy {
        match self {
            Self::Routine => HorizonPolicy::SubscriptionPreference,
            Self::Urgent => HorizonPolicy::Fixed(URGENT_HORIZON),
        }
    }

    pub fn cooldown_hours(&self) -> i64 {
        match self {
            Self::Routine => ROUTINE_COOLDOWN_HOURS,
            Self::Urgent => URGENT_COOLDOWN_HOURS,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Routine => "routine",
            Self::Urgent => "urgent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No `User` could be found for the subscription
    Orphaned,
    /// The user has no incomplete tasks due within the horizon
    NoDueTasks,
    /// A reminder was sent too recently
    CoolingDown,
    /// Unsubscribed or deleted while the pass was running
    NoLongerActive,
}

/// What happened to a single `Subscription` during a reminder pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionOutcome {
    Sent { task_count: usize },
    Skipped(SkipReason),
}

/// Tally of a reminder pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderPassSummary {
    pub sent: usize,
    pub failed: usize,
    /// Number of candidate subscriptions loaded at the start of the pass
    pub total: usize,
}

impl ReminderPassSummary {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    pub fn record<E>(&mut self, outcome: &Result<SubscriptionOutcome, E>) {
        match outcome {
            Ok(SubscriptionOutcome::Sent { .. }) => self.sent += 1,
            Ok(SubscriptionOutcome::Skipped(_)) => {}
            Err(_) => self.failed += 1,
        }
    }

    pub fn skipped(&self) -> usize {
        self.total.saturating_sub(self.sent + self.failed)
    }
}
