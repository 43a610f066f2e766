use super::{EmailMessage, IEmailSender};
use tracing::info;

const PREVIEW_LEN: usize = 100;

/// Used when no email provider is configured. Every message is logged
/// and reported as sent.
pub struct LogEmailSender {}

#[async_trait::async_trait]
impl IEmailSender for LogEmailSender {
    async fn send(&self, message: &EmailMessage) -> bool {
        let preview = message.text_body.chars().take(PREVIEW_LEN).collect::<String>();
        info!(
            to = %message.to,
            subject = %message.subject,
            "[TEST MODE] Email would be sent. Content: {}...",
            preview
        );
        true
    }
}
