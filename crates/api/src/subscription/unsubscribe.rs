use crate::{
    error::DuesoonError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use duesoon_api_structs::unsubscribe::*;
use duesoon_infra::DuesoonContext;

pub async fn unsubscribe_controller(
    query: web::Query<QueryParams>,
    ctx: web::Data<DuesoonContext>,
) -> Result<HttpResponse, DuesoonError> {
    let usecase = UnsubscribeUseCase {
        token: query.0.token,
    };

    execute(usecase, &ctx)
        .await
        .map(|_| {
            HttpResponse::Ok().json(APIResponse {
                message: "Successfully unsubscribed".into(),
            })
        })
        .map_err(DuesoonError::from)
}

/// Deactivates the subscription the token in an email footer belongs to
#[derive(Debug)]
pub struct UnsubscribeUseCase {
    pub token: String,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidToken,
    StorageError,
}

impl From<UseCaseError> for DuesoonError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidToken => Self::NotFound("Invalid unsubscribe token".into()),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UnsubscribeUseCase {
    type Response = ();
    type Error = UseCaseError;

    const NAME: &'static str = "Unsubscribe";

    async fn execute(&mut self, ctx: &DuesoonContext) -> Result<Self::Response, Self::Error> {
        let mut subscription = match ctx
            .repos
            .subscriptions
            .find_by_unsubscribe_token(&self.token)
            .await
        {
            Ok(Some(sub)) => sub,
            Ok(None) => return Err(UseCaseError::InvalidToken),
            Err(_) => return Err(UseCaseError::StorageError),
        };

        subscription.unsubscribe(ctx.sys.now());
        ctx.repos
            .subscriptions
            .save(&subscription)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use duesoon_domain::Subscription;

    #[actix_web::test]
    async fn unsubscribes_by_token() {
        let ctx = DuesoonContext::create_inmemory();
        let sub = Subscription::new_public("a@x.com", None, &Default::default(), ctx.sys.now());
        ctx.repos.subscriptions.insert(&sub).await.unwrap();

        let usecase = UnsubscribeUseCase {
            token: sub.unsubscribe_token.clone(),
        };
        execute(usecase, &ctx).await.unwrap();

        let stored = ctx.repos.subscriptions.find(&sub.id).await.unwrap().unwrap();
        assert!(!stored.is_active);
        assert!(ctx
            .repos
            .subscriptions
            .find_active_reminder_subscriptions()
            .await
            .unwrap()
            .is_empty());
    }

    #[actix_web::test]
    async fn unknown_token_is_rejected() {
        let ctx = DuesoonContext::create_inmemory();
        let usecase = UnsubscribeUseCase {
            token: "nope".into(),
        };
        assert!(matches!(
            execute(usecase, &ctx).await,
            Err(UseCaseError::InvalidToken)
        ));
    }
}
