use super::{normalize_email, subscribers::*, RawPreferences};
use crate::{
    error::DuesoonError,
    shared::usecase::{execute, Subscriber, UseCase},
};
use actix_web::{web, HttpResponse};
use duesoon_api_structs::subscribe_public::*;
use duesoon_domain::{is_valid_email, Subscription};
use duesoon_infra::DuesoonContext;

pub async fn subscribe_public_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<DuesoonContext>,
) -> Result<HttpResponse, DuesoonError> {
    let body = body.0;
    let usecase = SubscribePublicUseCase {
        email: body.email,
        name: body.name,
        preferences: RawPreferences {
            task_reminders: body.task_reminders,
            daily_summary: body.daily_summary,
            weekly_report: body.weekly_report,
            reminder_hours: body.reminder_hours,
        },
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Created().json(APIResponse::new(res.subscription)))
        .map_err(DuesoonError::from)
}

/// Anyone can subscribe an email address without an account. Subscribing
/// an address again reactivates it.
#[derive(Debug)]
pub struct SubscribePublicUseCase {
    pub email: String,
    pub name: Option<String>,
    pub preferences: RawPreferences,
}

#[derive(Debug)]
pub struct UseCaseRes {
    pub subscription: Subscription,
}

impl Subscribed for UseCaseRes {
    fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    fn greeting_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.subscription.display_name(fallback)
    }
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidEmail(String),
    InvalidReminderHours(i64),
    StorageError,
}

impl From<UseCaseError> for DuesoonError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidEmail(email) => {
                Self::BadClientData(format!("Invalid email address: {}", email))
            }
            UseCaseError::InvalidReminderHours(hours) => Self::BadClientData(format!(
                "Reminder hours must be between 1 and 168, got: {}",
                hours
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SubscribePublicUseCase {
    type Response = UseCaseRes;
    type Error = UseCaseError;

    const NAME: &'static str = "SubscribePublic";

    async fn execute(&mut self, ctx: &DuesoonContext) -> Result<Self::Response, Self::Error> {
        let email = normalize_email(&self.email);
        if !is_valid_email(&email) {
            return Err(UseCaseError::InvalidEmail(self.email.clone()));
        }
        let prefs = self
            .preferences
            .validate()
            .map_err(|e| UseCaseError::InvalidReminderHours(e.0))?;
        let name = self
            .name
            .as_ref()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        let now = ctx.sys.now();

        let existing = ctx
            .repos
            .subscriptions
            .find_public_by_email(&email)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let subscription = match existing {
            Some(mut subscription) => {
                subscription.resubscribe(&prefs, now);
                if name.is_some() {
                    subscription.name = name;
                }
                ctx.repos
                    .subscriptions
                    .save(&subscription)
                    .await
                    .map_err(|_| UseCaseError::StorageError)?;
                subscription
            }
            None => {
                let subscription = Subscription::new_public(email, name, &prefs, now);
                ctx.repos
                    .subscriptions
                    .insert(&subscription)
                    .await
                    .map_err(|_| UseCaseError::StorageError)?;
                subscription
            }
        };

        Ok(UseCaseRes { subscription })
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(SendWelcomeEmail)]
    }
}
