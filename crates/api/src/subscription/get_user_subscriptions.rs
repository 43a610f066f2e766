use crate::{
    error::DuesoonError,
    shared::{
        auth::protect_admin_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use duesoon_api_structs::get_user_subscriptions::*;
use duesoon_domain::{Subscription, ID};
use duesoon_infra::DuesoonContext;

pub async fn get_user_subscriptions_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    ctx: web::Data<DuesoonContext>,
) -> Result<HttpResponse, DuesoonError> {
    protect_admin_route(&http_req, &ctx)?;

    let usecase = GetUserSubscriptionsUseCase {
        user_id: path.user_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|subscriptions| HttpResponse::Ok().json(APIResponse::new(subscriptions)))
        .map_err(DuesoonError::from)
}

#[derive(Debug)]
pub struct GetUserSubscriptionsUseCase {
    pub user_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    UserNotFound(ID),
    StorageError,
}

impl From<UseCaseError> for DuesoonError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::UserNotFound(user_id) => {
                Self::NotFound(format!("A user with id: {}, was not found.", user_id))
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetUserSubscriptionsUseCase {
    type Response = Vec<Subscription>;
    type Error = UseCaseError;

    const NAME: &'static str = "GetUserSubscriptions";

    async fn execute(&mut self, ctx: &DuesoonContext) -> Result<Self::Response, Self::Error> {
        match ctx.repos.users.find(&self.user_id).await {
            Ok(Some(_)) => (),
            Ok(None) => return Err(UseCaseError::UserNotFound(self.user_id.clone())),
            Err(_) => return Err(UseCaseError::StorageError),
        }

        ctx.repos
            .subscriptions
            .find_by_user(&self.user_id)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}
