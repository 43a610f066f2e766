mod email;

pub use email::{EmailMessage, EmailService, HttpEmailSender, IEmailSender, LogEmailSender};
