mod base;
mod config;
mod reminder;
mod status;

pub(crate) use base::BaseClient;
pub use base::{APIError, APIErrorVariant, APIResponse};
use config::ConfigClient;
pub use lull_api_structs::dtos::*;
pub use lull_domain::{
    Complexity, EventStatus, Feedback, TriggerBucket, TriggerIntent, ID,
};
use reminder::ReminderClient;
pub use reminder::SubmitFeedbackInput;
use status::StatusClient;
use std::sync::Arc;

// Domain
pub use lull_api_structs::dtos::ReminderDTO as Reminder;

/// Lull Server SDK
///
/// The SDK contains methods for interacting with the Lull server API
/// on behalf of a single owner.
#[derive(Clone)]
pub struct LullSDK {
    pub config: ConfigClient,
    pub reminder: ReminderClient,
    pub status: StatusClient,
}

impl LullSDK {
    pub fn new<T: Into<String>>(address: String, owner_ref: T) -> Self {
        let mut base = BaseClient::new(address);
        base.set_owner_ref(owner_ref.into());
        Self::from_base(base)
    }

    /// Same as `new` but also authorized for the admin routes
    pub fn new_admin<T: Into<String>, K: Into<String>>(
        address: String,
        owner_ref: T,
        admin_key: K,
    ) -> Self {
        let mut base = BaseClient::new(address);
        base.set_owner_ref(owner_ref.into());
        base.set_admin_key(admin_key.into());
        Self::from_base(base)
    }

    fn from_base(base: BaseClient) -> Self {
        let base = Arc::new(base);
        let config = ConfigClient::new(base.clone());
        let reminder = ReminderClient::new(base.clone());
        let status = StatusClient::new(base);

        Self {
            config,
            reminder,
            status,
        }
    }
}
