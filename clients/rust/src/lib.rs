mod base;
mod reminder;
mod status;
mod subscription;

pub(crate) use base::BaseClient;
pub use base::{APIError, APIResponse};
use reminder::ReminderClient;
pub use reminder::RunReminderPassInput;
use status::StatusClient;
use std::sync::Arc;
use subscription::SubscriptionClient;
pub use subscription::{
    PreferencesInput, SubscribePublicInput, SubscribeUserInput, UpdateSubscriptionInput,
};

pub use duesoon_api_structs::dtos::SubscriptionDTO as Subscription;
pub use duesoon_domain::{ReminderCadence, ID};

/// Duesoon Server SDK
///
/// The SDK contains methods for interacting with the Duesoon server API.
#[derive(Clone)]
pub struct DuesoonSDK {
    pub reminder: ReminderClient,
    pub status: StatusClient,
    pub subscription: SubscriptionClient,
}

impl DuesoonSDK {
    pub fn new<T: Into<String>>(address: String, api_key: T) -> Self {
        let mut base = BaseClient::new(address);
        base.set_api_key(api_key.into());
        let base = Arc::new(base);

        Self {
            reminder: ReminderClient::new(base.clone()),
            status: StatusClient::new(base.clone()),
            subscription: SubscriptionClient::new(base),
        }
    }
}
