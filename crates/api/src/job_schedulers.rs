use crate::reminder::ReminderScheduler;
use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use duesoon_domain::{ReminderCadence, URGENT_INTERVAL_HOURS};
use duesoon_infra::DuesoonContext;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};
use tracing::{error, info};

/// How long to wait from `now` until `next`. Zero when `next` has passed.
pub fn get_start_delay(now: DateTime<Utc>, next: DateTime<Utc>) -> Duration {
    (next - now).to_std().unwrap_or(Duration::ZERO)
}

fn local_to_utc(tz: Tz, date: NaiveDate, hour: u32) -> Option<DateTime<Utc>> {
    let time = NaiveTime::from_hms_opt(hour, 0, 0)?;
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// First local `daily_hour` o'clock in `tz` strictly after `now`
pub fn next_routine_run(now: DateTime<Utc>, tz: Tz, daily_hour: u32) -> DateTime<Utc> {
    let mut date = now.with_timezone(&tz).date_naive();
    // A week is plenty to get past any timezone transition
    for _ in 0..7 {
        if let Some(run) = local_to_utc(tz, date, daily_hour) {
            if run > now {
                return run;
            }
        }
        date = date.succ_opt().unwrap_or(date);
    }
    now + ChronoDuration::days(1)
}

/// First even o'clock wall-clock hour in `tz` strictly after `now`
pub fn next_urgent_run(now: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
    let local = now.with_timezone(&tz);
    let mut date = local.date_naive();
    let mut hour = local.hour();
    for _ in 0..(24 * 3) {
        hour += 1;
        if hour == 24 {
            hour = 0;
            date = date.succ_opt().unwrap_or(date);
        }
        if hour as i64 % URGENT_INTERVAL_HOURS != 0 {
            continue;
        }
        if let Some(run) = local_to_utc(tz, date, hour) {
            if run > now {
                return run;
            }
        }
    }
    now + ChronoDuration::hours(URGENT_INTERVAL_HOURS)
}

/// A running reminder job. Dropping the handle leaves the job running,
/// use `stop` to end it.
pub struct ReminderJobHandle {
    cadence: ReminderCadence,
    handle: JoinHandle<()>,
}

impl ReminderJobHandle {
    pub fn cadence(&self) -> ReminderCadence {
        self.cadence
    }

    pub async fn stop(self) {
        self.handle.abort();
        let _ = self.handle.await;
        info!("Stopped the {} reminders job", self.cadence.name());
    }
}

async fn run_pass(scheduler: &ReminderScheduler, cadence: ReminderCadence) {
    if let Err(e) = scheduler.run_cadence(cadence).await {
        error!("The {} reminder pass failed: {}", cadence.name(), e);
    }
}

/// Runs the routine reminder pass once a day at the configured local hour
pub fn start_routine_reminders_job(ctx: DuesoonContext) -> ReminderJobHandle {
    let cadence = ReminderCadence::Routine;
    let handle = actix_web::rt::spawn(async move {
        let scheduler = ReminderScheduler::new(&ctx);
        let tz = ctx.config.reminders.timezone;
        let daily_hour = ctx.config.reminders.daily_hour;
        let mut last_run: Option<DateTime<Utc>> = None;
        loop {
            let now = ctx.sys.now();
            // Never fire twice for the same slot when the timer wakes up early
            let after = match last_run {
                Some(last_run) if last_run > now => last_run,
                _ => now,
            };
            let next = next_routine_run(after, tz, daily_hour);
            info!("Next routine reminder pass at {}", next);
            sleep(get_start_delay(now, next)).await;

            run_pass(&scheduler, cadence).await;
            last_run = Some(next);
        }
    });

    ReminderJobHandle { cadence, handle }
}

/// Runs the urgent reminder pass every other hour, aligned to even hours.
/// Late ticks are skipped so passes never pile up.
pub fn start_urgent_reminders_job(ctx: DuesoonContext) -> ReminderJobHandle {
    let cadence = ReminderCadence::Urgent;
    let handle = actix_web::rt::spawn(async move {
        let scheduler = ReminderScheduler::new(&ctx);
        let now = ctx.sys.now();
        let first = next_urgent_run(now, ctx.config.reminders.timezone);
        info!("First urgent reminder pass at {}", first);

        let period = Duration::from_secs(URGENT_INTERVAL_HOURS as u64 * 60 * 60);
        let mut ticks = interval_at(Instant::now() + get_start_delay(now, first), period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticks.tick().await;
            run_pass(&scheduler, cadence).await;
        }
    });

    ReminderJobHandle { cadence, handle }
}
