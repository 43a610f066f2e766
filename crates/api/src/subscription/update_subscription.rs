use super::RawPreferences;
use crate::{
    error::DuesoonError,
    shared::{
        auth::protect_admin_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use duesoon_api_structs::update_subscription::*;
use duesoon_domain::{Subscription, ID};
use duesoon_infra::DuesoonContext;

pub async fn update_subscription_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<DuesoonContext>,
) -> Result<HttpResponse, DuesoonError> {
    protect_admin_route(&http_req, &ctx)?;

    let body = body.0;
    let usecase = UpdateSubscriptionUseCase {
        user_id: path.user_id.clone(),
        subscription_id: path.subscription_id.clone(),
        is_active: body.is_active,
        preferences: RawPreferences {
            task_reminders: body.task_reminders,
            daily_summary: body.daily_summary,
            weekly_report: body.weekly_report,
            reminder_hours: body.reminder_hours,
        },
    };

    execute(usecase, &ctx)
        .await
        .map(|subscription| HttpResponse::Ok().json(APIResponse::new(subscription)))
        .map_err(DuesoonError::from)
}

#[derive(Debug)]
pub struct UpdateSubscriptionUseCase {
    pub user_id: ID,
    pub subscription_id: ID,
    pub is_active: Option<bool>,
    pub preferences: RawPreferences,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    InvalidReminderHours(i64),
    StorageError,
}

impl From<UseCaseError> for DuesoonError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(subscription_id) => Self::NotFound(format!(
                "A subscription with id: {}, was not found.",
                subscription_id
            )),
            UseCaseError::InvalidReminderHours(hours) => Self::BadClientData(format!(
                "Reminder hours must be between 1 and 168, got: {}",
                hours
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateSubscriptionUseCase {
    type Response = Subscription;
    type Error = UseCaseError;

    const NAME: &'static str = "UpdateSubscription";

    async fn execute(&mut self, ctx: &DuesoonContext) -> Result<Self::Response, Self::Error> {
        let prefs = self
            .preferences
            .validate()
            .map_err(|e| UseCaseError::InvalidReminderHours(e.0))?;

        let mut subscription = match ctx.repos.subscriptions.find(&self.subscription_id).await {
            Ok(Some(sub)) if sub.owner.as_ref() == Some(&self.user_id) => sub,
            Ok(_) => return Err(UseCaseError::NotFound(self.subscription_id.clone())),
            Err(_) => return Err(UseCaseError::StorageError),
        };

        let now = ctx.sys.now();
        subscription.apply_preferences(&prefs, now);
        match self.is_active {
            Some(true) => subscription.is_active = true,
            Some(false) => subscription.unsubscribe(now),
            None => (),
        }

        ctx.repos
            .subscriptions
            .save(&subscription)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        Ok(subscription)
    }
}
