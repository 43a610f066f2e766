mod reminder;
mod shared;
mod subscription;
mod task;
mod user;

pub use reminder::{
    should_send_reminder, HorizonPolicy, ReminderCadence, ReminderPassSummary, SkipReason,
    SubscriptionOutcome, ROUTINE_COOLDOWN_HOURS, URGENT_COOLDOWN_HOURS, URGENT_HORIZON_HOURS,
    URGENT_INTERVAL_HOURS, MAX_COOLDOWN_HOURS,
};
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use subscription::{
    is_valid_email, InvalidReminderHours, ReminderHours, Subscription, SubscriptionPreferences,
    DEFAULT_REMINDER_HOURS, MAX_REMINDER_HOURS, MIN_REMINDER_HOURS,
};
pub use task::{DueSoonTask, TaskPriority};
pub use user::User;
