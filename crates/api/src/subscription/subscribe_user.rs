use super::{normalize_email, subscribers::*, RawPreferences};
use crate::{
    error::DuesoonError,
    shared::{
        auth::protect_admin_route,
        usecase::{execute, Subscriber, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use duesoon_api_structs::subscribe_user::*;
use duesoon_domain::{is_valid_email, Subscription, User, ID};
use duesoon_infra::DuesoonContext;

pub async fn subscribe_user_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<DuesoonContext>,
) -> Result<HttpResponse, DuesoonError> {
    protect_admin_route(&http_req, &ctx)?;

    let body = body.0;
    let usecase = SubscribeUserUseCase {
        user_id: path.user_id.clone(),
        email: body.email,
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

#[derive(Debug)]
pub struct SubscribeUserUseCase {
    pub user_id: ID,
    pub email: String,
    pub preferences: RawPreferences,
}

#[derive(Debug)]
pub struct UseCaseRes {
    pub subscription: Subscription,
    pub user: User,
}

impl Subscribed for UseCaseRes {
    fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    fn greeting_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.user.name.trim().is_empty() {
            fallback
        } else {
            &self.user.name
        }
    }
}

#[derive(Debug)]
pub enum UseCaseError {
    UserNotFound(ID),
    InvalidEmail(String),
    InvalidReminderHours(i64),
    StorageError,
}

impl From<UseCaseError> for DuesoonError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::UserNotFound(user_id) => {
                Self::NotFound(format!("A user with id: {}, was not found.", user_id))
            }
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
impl UseCase for SubscribeUserUseCase {
    type Response = UseCaseRes;
    type Error = UseCaseError;

    const NAME: &'static str = "SubscribeUser";

    async fn execute(&mut self, ctx: &DuesoonContext) -> Result<Self::Response, Self::Error> {
        let email = normalize_email(&self.email);
        if !is_valid_email(&email) {
            return Err(UseCaseError::InvalidEmail(self.email.clone()));
        }
        let prefs = self
            .preferences
            .validate()
            .map_err(|e| UseCaseError::InvalidReminderHours(e.0))?;

        let user = match ctx.repos.users.find(&self.user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => return Err(UseCaseError::UserNotFound(self.user_id.clone())),
            Err(_) => return Err(UseCaseError::StorageError),
        };
        let now = ctx.sys.now();

        let existing = ctx
            .repos
            .subscriptions
            .find_by_user_and_email(&user.id, &email)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let subscription = match existing {
            Some(mut subscription) => {
                subscription.resubscribe(&prefs, now);
                ctx.repos
                    .subscriptions
                    .save(&subscription)
                    .await
                    .map_err(|_| UseCaseError::StorageError)?;
                subscription
            }
            None => {
                let subscription = Subscription::new_for_user(user.id.clone(), email, &prefs, now);
                ctx.repos
                    .subscriptions
                    .insert(&subscription)
                    .await
                    .map_err(|_| UseCaseError::StorageError)?;
                subscription
            }
        };

        Ok(UseCaseRes { subscription, user })
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(SendWelcomeEmail)]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::test_helpers::RecordingSender;
    use duesoon_domain::Entity;

    fn usecase(user_id: &ID, email: &str) -> SubscribeUserUseCase {
        SubscribeUserUseCase {
            user_id: user_id.clone(),
            email: email.into(),
            preferences: Default::default(),
        }
    }

    #[actix_web::test]
    async fn links_subscription_to_user() {
        let mut ctx = DuesoonContext::create_inmemory();
        let sender = RecordingSender::new(true);
        ctx.set_email_sender(sender.clone());
        let user = User::new("ann@x.com", "Ann");
        ctx.repos.users.insert(&user).await.unwrap();

        let res = execute(usecase(&user.id, "ann@x.com"), &ctx).await.unwrap();
        assert_eq!(res.subscription.owner, Some(user.id.clone()));
        assert!(res.subscription.verification_token.is_none());
        assert_eq!(sender.recipients(), vec!["ann@x.com".to_string()]);
        assert!(sender.sent.lock().unwrap()[0].html_body.contains("Welcome Ann!"));

        let again = execute(usecase(&user.id, "ann@x.com"), &ctx).await.unwrap();
        assert!(again.subscription.eq(&res.subscription));
        assert_eq!(
            ctx.repos.subscriptions.find_by_user(&user.id).await.unwrap().len(),
            1
        );
    }

    #[actix_web::test]
    async fn unknown_user_is_not_found() {
        let ctx = DuesoonContext::create_inmemory();
        let user_id = ID::new();
        assert!(matches!(
            execute(usecase(&user_id, "ann@x.com"), &ctx).await,
            Err(UseCaseError::UserNotFound(_))
        ));
    }
}
