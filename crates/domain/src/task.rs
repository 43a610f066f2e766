use crate::shared::entity::{Entity, ID};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for TaskPriority {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(()),
        }
    }
}

/// A task owned by a `User` as seen by the reminder engine.
///
/// Tasks are read-only values here. Each lookup returns a fresh snapshot
/// from the task backend.
#[derive(Debug, Clone)]
pub struct DueSoonTask {
    pub id: ID,
    pub user_id: ID,
    pub title: String,
    pub description: Option<String>,
    pub due_at: DateTime<Utc>,
    pub priority: Option<TaskPriority>,
    pub completed: bool,
}

impl DueSoonTask {
    /// Whether the task is incomplete and due within `[from, to]`
    pub fn is_due_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> bool {
        !self.completed && self.due_at >= from && self.due_at <= to
    }

    /// Whole hours left until the task is due, rounded up. Zero or negative
    /// when the task is overdue.
    pub fn hours_left(&self, now: DateTime<Utc>) -> i64 {
        let millis = (self.due_at - now).num_milliseconds();
        let hour = 1000 * 60 * 60;
        if millis > 0 {
            (millis + hour - 1) / hour
        } else {
            millis / hour
        }
    }
}

impl Entity for DueSoonTask {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn task_due_at(due_at: DateTime<Utc>) -> DueSoonTask {
        DueSoonTask {
            id: Default::default(),
            user_id: Default::default(),
            title: "Write report".into(),
            description: None,
            due_at,
            priority: None,
            completed: false,
        }
    }

    #[test]
    fn due_window_is_inclusive() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let to = now + Duration::hours(4);

        assert!(task_due_at(now).is_due_between(now, to));
        assert!(task_due_at(to).is_due_between(now, to));
        assert!(!task_due_at(to + Duration::seconds(1)).is_due_between(now, to));
        assert!(!task_due_at(now - Duration::seconds(1)).is_due_between(now, to));

        let mut done = task_due_at(now + Duration::hours(1));
        done.completed = true;
        assert!(!done.is_due_between(now, to));
    }

    #[test]
    fn hours_left_rounds_up() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        assert_eq!(task_due_at(now + Duration::minutes(61)).hours_left(now), 2);
        assert_eq!(task_due_at(now + Duration::hours(10)).hours_left(now), 10);
        assert_eq!(task_due_at(now).hours_left(now), 0);
        assert_eq!(task_due_at(now - Duration::hours(3)).hours_left(now), -3);
    }

    #[test]
    fn parses_priorities() {
        assert_eq!("HIGH".parse::<TaskPriority>(), Ok(TaskPriority::High));
        assert_eq!("medium".parse::<TaskPriority>(), Ok(TaskPriority::Medium));
        assert!("urgent".parse::<TaskPriority>().is_err());
    }
}
