use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use duesoon_domain::{DueSoonTask, TaskPriority};

const DUE_FORMAT: &str = "%d/%m/%Y %H:%M";

pub(super) fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Border colour of a task in the reminder, red when due within 4 hours,
/// amber within a day and green otherwise
fn urgency_color(hours_left: i64) -> &'static str {
    if hours_left <= 4 {
        "#ef4444"
    } else if hours_left <= 24 {
        "#f59e0b"
    } else {
        "#10b981"
    }
}

fn priority_badge(priority: TaskPriority) -> String {
    let (background, color, label) = match priority {
        TaskPriority::High => ("#fecaca", "#dc2626", "High"),
        TaskPriority::Medium => ("#fed7aa", "#ea580c", "Medium"),
        TaskPriority::Low => ("#d1fae5", "#059669", "Low"),
    };
    format!(
        r#"<span style="background: {}; color: {}; padding: 2px 8px; border-radius: 12px; font-size: 12px;">{}</span>"#,
        background, color, label
    )
}

fn time_left(hours_left: i64) -> String {
    if hours_left > 0 {
        format!("({} hours left)", hours_left)
    } else {
        "OVERDUE".to_string()
    }
}

fn footer(frontend_url: &str, unsubscribe_token: &str) -> String {
    format!(
        r#"<hr style="margin: 30px 0; border: none; border-top: 1px solid #e5e7eb;">
<p style="font-size: 12px; color: #9ca3af; text-align: center;">
  This email was sent by Duesoon.
  <a href="{}/unsubscribe?token={}" style="color: #6b7280;">Unsubscribe</a>
</p>"#,
        frontend_url,
        escape_html(unsubscribe_token)
    )
}

pub(super) struct ReminderTemplate<'a> {
    pub display_name: &'a str,
    pub tasks: &'a [DueSoonTask],
    pub unsubscribe_token: &'a str,
    pub now: DateTime<Utc>,
    pub frontend_url: &'a str,
    pub timezone: Tz,
}

impl<'a> ReminderTemplate<'a> {
    pub fn subject(&self) -> String {
        format!("Duesoon - Reminder: {} task(s) due soon", self.tasks.len())
    }

    fn due(&self, task: &DueSoonTask) -> String {
        task.due_at
            .with_timezone(&self.timezone)
            .format(DUE_FORMAT)
            .to_string()
    }

    fn task_html(&self, task: &DueSoonTask) -> String {
        let hours_left = task.hours_left(self.now);
        let description = task
            .description
            .as_deref()
            .map(|d| {
                format!(
                    r#"<p style="margin: 8px 0 0 0; color: #6b7280; font-size: 13px;">{}</p>"#,
                    escape_html(d)
                )
            })
            .unwrap_or_default();
        let badge = task.priority.map(priority_badge).unwrap_or_default();
        format!(
            r#"<div style="border-left: 4px solid {}; padding: 15px; margin: 15px 0; background: white; border-radius: 4px;">
  <h3 style="margin: 0 0 8px 0; color: #1f2937;">{}</h3>
  <p style="margin: 5px 0; color: #6b7280; font-size: 14px;">Due: {} {}</p>
  {}
  {}
</div>"#,
            urgency_color(hours_left),
            escape_html(&task.title),
            self.due(task),
            time_left(hours_left),
            description,
            badge
        )
    }

    pub fn html(&self) -> String {
        let tasks = self
            .tasks
            .iter()
            .map(|t| self.task_html(t))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
<h2 style="color: #2563eb;">Reminder from Duesoon</h2>
<p>Hi <strong>{}</strong>,</p>
<p>You have <strong>{}</strong> task(s) due soon:</p>
<div style="background: #f8fafc; padding: 20px; border-radius: 8px; margin: 20px 0;">
{}
</div>
<p style="text-align: center;">
  <a href="{}/tasks" style="background: #2563eb; color: white; padding: 12px 24px; text-decoration: none; border-radius: 6px; display: inline-block;">View all tasks</a>
</p>
{}
</div>"#,
            escape_html(self.display_name),
            self.tasks.len(),
            tasks,
            self.frontend_url,
            footer(self.frontend_url, self.unsubscribe_token)
        )
    }

    pub fn text(&self) -> String {
        let tasks = self
            .tasks
            .iter()
            .map(|t| {
                format!(
                    "- {}\n  Due: {} {}",
                    t.title,
                    self.due(t),
                    time_left(t.hours_left(self.now))
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        format!(
            "{}\n\nHi {},\n\nYou have {} task(s) due soon:\n\n{}\n\nVisit {}/tasks for details.\n\nUnsubscribe: {}/unsubscribe?token={}",
            self.subject(),
            self.display_name,
            self.tasks.len(),
            tasks,
            self.frontend_url,
            self.frontend_url,
            self.unsubscribe_token
        )
    }
}

pub(super) struct WelcomeTemplate<'a> {
    pub display_name: &'a str,
    pub unsubscribe_token: &'a str,
    pub frontend_url: &'a str,
}

impl<'a> WelcomeTemplate<'a> {
    pub fn subject(&self) -> &'static str {
        "Welcome to Duesoon!"
    }

    pub fn html(&self) -> String {
        format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
<h2 style="color: #2563eb;">Welcome {}!</h2>
<p>Thanks for subscribing to notifications from Duesoon.</p>
<div style="background: #f0f9ff; padding: 20px; border-radius: 8px; margin: 20px 0;">
  <h3 style="margin: 0 0 10px 0; color: #1e40af;">You will be notified about:</h3>
  <ul style="margin: 0; padding-left: 20px; color: #1f2937;">
    <li>Tasks that are due soon</li>
    <li>Important reminders</li>
  </ul>
</div>
<p style="text-align: center;">
  <a href="{}" style="background: #2563eb; color: white; padding: 12px 24px; text-decoration: none; border-radius: 6px; display: inline-block;">Open Duesoon</a>
</p>
{}
</div>"#,
            escape_html(self.display_name),
            self.frontend_url,
            footer(self.frontend_url, self.unsubscribe_token)
        )
    }

    pub fn text(&self) -> String {
        format!(
            "Welcome {} to Duesoon! You are now subscribed to notifications. Visit {} to get started.\n\nUnsubscribe: {}/unsubscribe?token={}",
            self.display_name, self.frontend_url, self.frontend_url, self.unsubscribe_token
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn task(title: &str, due_in: Duration, now: DateTime<Utc>) -> DueSoonTask {
        DueSoonTask {
            id: Default::default(),
            user_id: Default::default(),
            title: title.into(),
            description: None,
            due_at: now + due_in,
            priority: None,
            completed: false,
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn urgency_colors() {
        assert_eq!(urgency_color(-2), "#ef4444");
        assert_eq!(urgency_color(4), "#ef4444");
        assert_eq!(urgency_color(5), "#f59e0b");
        assert_eq!(urgency_color(24), "#f59e0b");
        assert_eq!(urgency_color(25), "#10b981");
    }

    #[test]
    fn renders_every_task() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let mut urgent = task("Pay rent", Duration::hours(2), now);
        urgent.priority = Some(TaskPriority::High);
        let relaxed = task("Plan trip", Duration::hours(30), now);
        let tasks = vec![urgent, relaxed];
        let template = ReminderTemplate {
            display_name: "Ann",
            tasks: &tasks,
            unsubscribe_token: "tok",
            now,
            frontend_url: "http://localhost:3000",
            timezone: chrono_tz::UTC,
        };

        assert_eq!(template.subject(), "Duesoon - Reminder: 2 task(s) due soon");
        let html = template.html();
        assert!(html.contains("Pay rent"));
        assert!(html.contains("(2 hours left)"));
        assert!(html.contains("#ef4444"));
        assert!(html.contains(">High</span>"));
        assert!(html.contains("Plan trip"));
        assert!(html.contains("#10b981"));
        assert!(html.contains("http://localhost:3000/tasks"));

        let text = template.text();
        assert!(text.contains("- Pay rent\n  Due: 01/03/2024 02:00 (2 hours left)"));
        assert!(text.contains("http://localhost:3000/unsubscribe?token=tok"));
    }

    #[test]
    fn overdue_tasks_are_marked() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let tasks = vec![task("Late", Duration::hours(-1), now)];
        let template = ReminderTemplate {
            display_name: "Ann",
            tasks: &tasks,
            unsubscribe_token: "tok",
            now,
            frontend_url: "http://localhost:3000",
            timezone: chrono_tz::UTC,
        };
        assert!(template.text().contains("OVERDUE"));
    }
}
