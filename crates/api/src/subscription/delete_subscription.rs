use crate::{
    error::DuesoonError,
    shared::{
        auth::protect_admin_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use duesoon_api_structs::delete_subscription::*;
use duesoon_domain::{Subscription, ID};
use duesoon_infra::DuesoonContext;

pub async fn delete_subscription_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    ctx: web::Data<DuesoonContext>,
) -> Result<HttpResponse, DuesoonError> {
    protect_admin_route(&http_req, &ctx)?;

    let usecase = DeleteSubscriptionUseCase {
        user_id: path.user_id.clone(),
        subscription_id: path.subscription_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|subscription| HttpResponse::Ok().json(APIResponse::new(subscription)))
        .map_err(DuesoonError::from)
}

#[derive(Debug)]
pub struct DeleteSubscriptionUseCase {
    pub user_id: ID,
    pub subscription_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

impl From<UseCaseError> for DuesoonError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(subscription_id) => Self::NotFound(format!(
                "A subscription with id: {}, was not found.",
                subscription_id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteSubscriptionUseCase {
    type Response = Subscription;
    type Error = UseCaseError;

    const NAME: &'static str = "DeleteSubscription";

    async fn execute(&mut self, ctx: &DuesoonContext) -> Result<Self::Response, Self::Error> {
        match ctx.repos.subscriptions.find(&self.subscription_id).await {
            Ok(Some(sub)) if sub.owner.as_ref() == Some(&self.user_id) => (),
            Ok(_) => return Err(UseCaseError::NotFound(self.subscription_id.clone())),
            Err(_) => return Err(UseCaseError::StorageError),
        }

        match ctx.repos.subscriptions.delete(&self.subscription_id).await {
            Ok(Some(sub)) => Ok(sub),
            Ok(None) => Err(UseCaseError::NotFound(self.subscription_id.clone())),
            Err(_) => Err(UseCaseError::StorageError),
        }
    }
}
