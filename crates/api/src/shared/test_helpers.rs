use duesoon_infra::{EmailMessage, IEmailSender};
use std::sync::{Arc, Mutex};

/// Keeps every email instead of delivering it
pub struct RecordingSender {
    accept: bool,
    pub sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingSender {
    pub fn new(accept: bool) -> Arc<Self> {
        Arc::new(Self {
            accept,
            sent: Mutex::new(vec![]),
        })
    }

    pub fn recipients(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|m| m.to.clone()).collect()
    }

    pub fn subjects(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|m| m.subject.clone())
            .collect()
    }
}

#[async_trait::async_trait]
impl IEmailSender for RecordingSender {
    async fn send(&self, message: &EmailMessage) -> bool {
        self.sent.lock().unwrap().push(message.clone());
        self.accept
    }
}
