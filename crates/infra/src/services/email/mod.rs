mod http;
mod log;
mod template;

pub use self::http::HttpEmailSender;
pub use self::log::LogEmailSender;

use crate::Config;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use duesoon_domain::DueSoonTask;
use std::sync::Arc;
use template::{ReminderTemplate, WelcomeTemplate};

#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

/// Hands a rendered email to a delivery channel.
///
/// Returns whether the message was accepted. Implementations never panic or
/// error on delivery problems, they log them and return `false`.
#[async_trait::async_trait]
pub trait IEmailSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> bool;
}

/// Renders the emails this service sends and hands them to an `IEmailSender`
pub struct EmailService {
    sender: Arc<dyn IEmailSender>,
    frontend_url: String,
    timezone: Tz,
}

impl EmailService {
    pub fn new(sender: Arc<dyn IEmailSender>, config: &Config) -> Self {
        Self {
            sender,
            frontend_url: config.frontend_url.clone(),
            timezone: config.reminders.timezone,
        }
    }

    /// Picks the http sender when provider credentials are configured and
    /// the log-only sender otherwise
    pub fn from_config(config: &Config) -> Self {
        let sender: Arc<dyn IEmailSender> = match &config.email_api {
            Some(api) => Arc::new(HttpEmailSender::new(api.clone(), config.email_from.clone())),
            None => Arc::new(LogEmailSender {}),
        };
        Self::new(sender, config)
    }

    pub async fn send(&self, to: &str, subject: &str, html: &str, text: &str) -> bool {
        let message = EmailMessage {
            to: to.to_string(),
            subject: subject.to_string(),
            html_body: html.to_string(),
            text_body: text.to_string(),
        };
        self.sender.send(&message).await
    }

    pub async fn send_task_reminder(
        &self,
        to: &str,
        display_name: &str,
        tasks: &[DueSoonTask],
        unsubscribe_token: &str,
        now: DateTime<Utc>,
    ) -> bool {
        let template = ReminderTemplate {
            display_name,
            tasks,
            unsubscribe_token,
            now,
            frontend_url: &self.frontend_url,
            timezone: self.timezone,
        };
        self.send(to, &template.subject(), &template.html(), &template.text())
            .await
    }

    pub async fn send_welcome(
        &self,
        to: &str,
        display_name: &str,
        unsubscribe_token: &str,
    ) -> bool {
        let template = WelcomeTemplate {
            display_name,
            unsubscribe_token,
            frontend_url: &self.frontend_url,
        };
        self.send(to, template.subject(), &template.html(), &template.text())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSender {
        sent: Mutex<Vec<EmailMessage>>,
    }

    #[async_trait::async_trait]
    impl IEmailSender for RecordingSender {
        async fn send(&self, message: &EmailMessage) -> bool {
            self.sent.lock().unwrap().push(message.clone());
            true
        }
    }

    fn config() -> Config {
        let mut config = Config::new();
        config.frontend_url = "https://app.duesoon.test".into();
        config.reminders.timezone = chrono_tz::Asia::Ho_Chi_Minh;
        config
    }

    #[tokio::test]
    async fn reminder_is_rendered_and_handed_to_sender() {
        let sender = Arc::new(RecordingSender::default());
        let service = EmailService::new(sender.clone(), &config());
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 1, 0, 0).unwrap();
        let task = DueSoonTask {
            id: Default::default(),
            user_id: Default::default(),
            title: "Ship <release>".into(),
            description: Some("notes & more".into()),
            due_at: now + Duration::hours(3),
            priority: None,
            completed: false,
        };

        assert!(
            service
                .send_task_reminder("a@x.com", "Ann", &[task], "tok-1", now)
                .await
        );

        let sent = sender.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "a@x.com");
        assert_eq!(sent[0].subject, "Duesoon - Reminder: 1 task(s) due soon");
        assert!(sent[0].html_body.contains("Ship &lt;release&gt;"));
        assert!(sent[0].html_body.contains("notes &amp; more"));
        assert!(sent[0]
            .html_body
            .contains("https://app.duesoon.test/unsubscribe?token=tok-1"));
        // 04:00 UTC is 11:00 in Ho Chi Minh City
        assert!(sent[0].text_body.contains("01/03/2024 11:00"));
    }

    #[tokio::test]
    async fn welcome_links_unsubscribe() {
        let sender = Arc::new(RecordingSender::default());
        let service = EmailService::new(sender.clone(), &config());

        assert!(service.send_welcome("a@x.com", "Ann", "tok-2").await);

        let sent = sender.sent.lock().unwrap();
        assert_eq!(sent[0].subject, "Welcome to Duesoon!");
        assert!(sent[0].html_body.contains("Welcome Ann!"));
        assert!(sent[0]
            .text_body
            .contains("https://app.duesoon.test/unsubscribe?token=tok-2"));
    }
}
