use super::{EmailMessage, IEmailSender};
use crate::config::EmailApiConfig;
use reqwest::Client;
use serde::Serialize;
use tracing::{error, info};

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

/// Delivers emails through a json http api authenticated with a bearer token
pub struct HttpEmailSender {
    client: Client,
    config: EmailApiConfig,
    from: String,
}

impl HttpEmailSender {
    pub fn new(config: EmailApiConfig, from: String) -> Self {
        Self {
            client: Client::new(),
            config,
            from,
        }
    }
}

#[async_trait::async_trait]
impl IEmailSender for HttpEmailSender {
    async fn send(&self, message: &EmailMessage) -> bool {
        let body = SendEmailRequest {
            from: &self.from,
            to: &message.to,
            subject: &message.subject,
            html: &message.html_body,
            text: &message.text_body,
        };
        match self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_token)
            .json(&body)
            .send()
            .await
        {
            Ok(res) if res.status().is_success() => {
                info!("Email sent successfully to {}", message.to);
                true
            }
            Ok(res) => {
                error!(
                    "Email provider rejected email to {} with status: {}",
                    message.to,
                    res.status()
                );
                false
            }
            Err(e) => {
                error!("Failed to send email to {}. Error: {:?}", message.to, e);
                false
            }
        }
    }
}
