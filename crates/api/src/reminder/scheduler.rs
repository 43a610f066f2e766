use duesoon_domain::{
    should_send_reminder, HorizonPolicy, ReminderCadence, ReminderPassSummary, SkipReason,
    Subscription, SubscriptionOutcome, User,
};
use duesoon_infra::{DuesoonContext, EmailService, ISubscriptionRepo, ISys, ITaskRepo, IUserRepo};
use futures::{stream, StreamExt};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, error, info};

/// Why a single subscription could not be reminded. The subscription is
/// counted as failed and picked up again on the next pass.
#[derive(Error, Debug)]
pub enum ReminderError {
    #[error("Failed to look up the user: {0}")]
    UserLookup(anyhow::Error),
    #[error("Failed to look up due tasks: {0}")]
    TaskLookup(anyhow::Error),
    #[error("Failed to reload the subscription: {0}")]
    SubscriptionLookup(anyhow::Error),
    #[error("Timed out while {operation}")]
    Timeout { operation: &'static str },
    #[error("The email provider did not accept the reminder")]
    DispatchRejected,
    #[error("Reminder was sent but storing the send time failed: {0}")]
    Save(anyhow::Error),
}

#[derive(Error, Debug)]
pub enum ReminderPassError {
    #[error("Unable to load subscriptions: {0}")]
    LoadSubscriptions(anyhow::Error),
}

async fn within<T>(
    limit: Duration,
    operation: &'static str,
    fut: impl Future<Output = T>,
) -> Result<T, ReminderError> {
    timeout(limit, fut)
        .await
        .map_err(|_| ReminderError::Timeout { operation })
}

/// Finds subscriptions with tasks due soon and emails them a reminder,
/// at most once per cooldown window.
pub struct ReminderScheduler {
    subscriptions: Arc<dyn ISubscriptionRepo>,
    users: Arc<dyn IUserRepo>,
    tasks: Arc<dyn ITaskRepo>,
    email: Arc<EmailService>,
    sys: Arc<dyn ISys>,
    fallback_display_name: String,
    lookup_timeout: Duration,
    dispatch_timeout: Duration,
    max_concurrency: usize,
}

impl ReminderScheduler {
    pub fn new(ctx: &DuesoonContext) -> Self {
        Self {
            subscriptions: ctx.repos.subscriptions.clone(),
            users: ctx.repos.users.clone(),
            tasks: ctx.repos.tasks.clone(),
            email: ctx.email.clone(),
            sys: ctx.sys.clone(),
            fallback_display_name: ctx.config.fallback_display_name.clone(),
            lookup_timeout: ctx.config.reminders.lookup_timeout,
            dispatch_timeout: ctx.config.reminders.dispatch_timeout,
            max_concurrency: ctx.config.reminders.max_concurrency.max(1),
        }
    }

    pub async fn run_cadence(
        &self,
        cadence: ReminderCadence,
    ) -> Result<ReminderPassSummary, ReminderPassError> {
        self.run_reminder_pass(cadence.horizon(), cadence.cooldown_hours())
            .await
    }

    /// Runs one reminder pass over every active subscription that wants task
    /// reminders. Only failing to load the subscriptions fails the pass,
    /// every other problem is counted per subscription.
    #[tracing::instrument(name = "Reminder pass", skip(self))]
    pub async fn run_reminder_pass(
        &self,
        horizon: HorizonPolicy,
        cooldown_hours: i64,
    ) -> Result<ReminderPassSummary, ReminderPassError> {
        let candidates = self
            .subscriptions
            .find_active_reminder_subscriptions()
            .await
            .map_err(|e| {
                error!("Unable to load subscriptions for reminders. Error: {:?}", e);
                ReminderPassError::LoadSubscriptions(e)
            })?;

        let mut summary = ReminderPassSummary::new(candidates.len());
        let outcomes = stream::iter(candidates)
            .map(|subscription| self.process(subscription, horizon, cooldown_hours))
            .buffer_unordered(self.max_concurrency)
            .collect::<Vec<_>>()
            .await;
        for outcome in &outcomes {
            summary.record(outcome);
        }

        info!(
            sent = summary.sent,
            failed = summary.failed,
            skipped = summary.skipped(),
            total = summary.total,
            "Reminder pass completed"
        );
        Ok(summary)
    }

    async fn process(
        &self,
        subscription: Subscription,
        horizon: HorizonPolicy,
        cooldown_hours: i64,
    ) -> Result<SubscriptionOutcome, ReminderError> {
        let subscription_id = subscription.id.clone();
        let email = subscription.email.clone();
        let res = self.remind(subscription, horizon, cooldown_hours).await;
        match &res {
            Ok(SubscriptionOutcome::Sent { task_count }) => info!(
                "Sent reminder about {} task(s) to {} (subscription {})",
                task_count, email, subscription_id
            ),
            Ok(SubscriptionOutcome::Skipped(reason)) => debug!(
                "Skipped reminder to {} (subscription {}): {:?}",
                email, subscription_id, reason
            ),
            Err(e) => error!(
                "Failed to remind {} (subscription {}). Error: {}",
                email, subscription_id, e
            ),
        }
        res
    }

    async fn remind(
        &self,
        subscription: Subscription,
        horizon: HorizonPolicy,
        cooldown_hours: i64,
    ) -> Result<SubscriptionOutcome, ReminderError> {
        let now = self.sys.now();

        let user = match self.resolve_user(&subscription).await? {
            Some(user) => user,
            None => return Ok(SubscriptionOutcome::Skipped(SkipReason::Orphaned)),
        };

        let tasks = within(
            self.lookup_timeout,
            "looking up due tasks",
            self.tasks
                .find_due_soon(&user.id, now, horizon.hours_for(&subscription)),
        )
        .await?
        .map_err(ReminderError::TaskLookup)?;
        if tasks.is_empty() {
            return Ok(SubscriptionOutcome::Skipped(SkipReason::NoDueTasks));
        }

        // Another pass may have notified or the subscriber may have left
        // since the candidates were loaded
        let fresh = within(
            self.lookup_timeout,
            "reloading the subscription",
            self.subscriptions.find(&subscription.id),
        )
        .await?
        .map_err(ReminderError::SubscriptionLookup)?;
        let fresh = match fresh {
            Some(fresh) if fresh.wants_task_reminders() => fresh,
            _ => return Ok(SubscriptionOutcome::Skipped(SkipReason::NoLongerActive)),
        };
        if !should_send_reminder(fresh.last_notification_sent_at, now, cooldown_hours) {
            return Ok(SubscriptionOutcome::Skipped(SkipReason::CoolingDown));
        }

        let fallback = if user.name.trim().is_empty() {
            self.fallback_display_name.as_str()
        } else {
            user.name.as_str()
        };
        let sent = within(
            self.dispatch_timeout,
            "sending the reminder",
            self.email.send_task_reminder(
                &fresh.email,
                fresh.display_name(fallback),
                &tasks,
                &fresh.unsubscribe_token,
                now,
            ),
        )
        .await?;
        if !sent {
            return Err(ReminderError::DispatchRejected);
        }

        // Only the send time is written, changes made while sending survive
        self.subscriptions
            .mark_notified(&fresh.id, now)
            .await
            .map_err(ReminderError::Save)?;

        Ok(SubscriptionOutcome::Sent {
            task_count: tasks.len(),
        })
    }

    async fn resolve_user(&self, subscription: &Subscription) -> Result<Option<User>, ReminderError> {
        let lookup = match &subscription.owner {
            Some(user_id) => {
                within(
                    self.lookup_timeout,
                    "looking up the user",
                    self.users.find(user_id),
                )
                .await?
            }
            None => {
                within(
                    self.lookup_timeout,
                    "looking up the user",
                    self.users.find_by_email(&subscription.email),
                )
                .await?
            }
        };
        lookup.map_err(ReminderError::UserLookup)
    }
}
