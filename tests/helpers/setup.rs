use duesoon_api::Application;
use duesoon_infra::{DuesoonContext, EmailMessage, IEmailSender};
use duesoon_sdk::DuesoonSDK;
use std::sync::{Arc, Mutex};

pub const ADMIN_API_KEY: &str = "integration-test-admin-key";

#[derive(Default)]
pub struct RecordingSender {
    pub sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingSender {
    pub fn recipients(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|m| m.to.clone()).collect()
    }

    /// Extracts the unsubscribe token from the last email sent to `to`
    pub fn last_unsubscribe_token(&self, to: &str) -> Option<String> {
        let sent = self.sent.lock().unwrap();
        let message = sent.iter().rev().find(|m| m.to == to)?;
        let (_, rest) = message.text_body.split_once("unsubscribe?token=")?;
        Some(rest.split_whitespace().next()?.to_string())
    }
}

#[async_trait::async_trait]
impl IEmailSender for RecordingSender {
    async fn send(&self, message: &EmailMessage) -> bool {
        self.sent.lock().unwrap().push(message.clone());
        true
    }
}

pub struct TestApp {
    /// Shares repositories with the running application
    pub ctx: DuesoonContext,
    pub emails: Arc<RecordingSender>,
}

// Launch the application as a background task
pub async fn spawn_app() -> (TestApp, DuesoonSDK, String) {
    let mut ctx = DuesoonContext::create_inmemory();
    ctx.config.port = 0; // Random port
    ctx.config.admin_api_key = ADMIN_API_KEY.into();
    ctx.config.reminders.jobs_enabled = false;
    let emails = Arc::new(RecordingSender::default());
    ctx.set_email_sender(emails.clone());

    let application = Application::new(ctx.clone())
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}/api/v1", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    let app = TestApp { ctx, emails };
    let sdk = DuesoonSDK::new(address.clone(), "");
    (app, sdk, address)
}

pub fn admin_sdk(address: &str) -> DuesoonSDK {
    DuesoonSDK::new(address.to_string(), ADMIN_API_KEY)
}
