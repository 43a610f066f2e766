use super::{subscribe_public::SubscribePublicUseCase, subscribe_user::SubscribeUserUseCase};
use crate::shared::usecase::{Subscriber, UseCase};
use duesoon_domain::Subscription;
use duesoon_infra::DuesoonContext;
use tracing::warn;

/// What a subscribe use case hands over to the welcome email
pub trait Subscribed {
    fn subscription(&self) -> &Subscription;
    fn greeting_name<'a>(&'a self, fallback: &'a str) -> &'a str;
}

/// Greets new and returning subscribers. A failed welcome email does not
/// undo the subscription.
pub struct SendWelcomeEmail;

async fn send_welcome(res: &impl Subscribed, ctx: &DuesoonContext) {
    let subscription = res.subscription();
    let sent = ctx
        .email
        .send_welcome(
            &subscription.email,
            res.greeting_name(&ctx.config.fallback_display_name),
            &subscription.unsubscribe_token,
        )
        .await;
    if !sent {
        warn!("Unable to send welcome email to {}", subscription.email);
    }
}

#[async_trait::async_trait(?Send)]
impl Subscriber<SubscribePublicUseCase> for SendWelcomeEmail {
    async fn notify(&self, res: &<SubscribePublicUseCase as UseCase>::Response, ctx: &DuesoonContext) {
        send_welcome(res, ctx).await
    }
}

#[async_trait::async_trait(?Send)]
impl Subscriber<SubscribeUserUseCase> for SendWelcomeEmail {
    async fn notify(&self, res: &<SubscribeUserUseCase as UseCase>::Response, ctx: &DuesoonContext) {
        send_welcome(res, ctx).await
    }
}
