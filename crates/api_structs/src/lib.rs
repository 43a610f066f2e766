mod reminder;
mod status;
mod subscription;

pub mod dtos {
    pub use crate::subscription::dtos::*;
}

pub use crate::reminder::api::*;
pub use crate::status::api::*;
pub use crate::subscription::api::*;
