use crate::base::{APIResponse, BaseClient};
use lull_api_structs::*;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct ConfigClient {
    base: Arc<BaseClient>,
}

impl ConfigClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    /// Requires the admin key
    pub async fn refresh(&self) -> APIResponse<refresh_config::APIResponse> {
        self.base
            .post((), "admin/config/refresh".into(), StatusCode::OK)
            .await
    }
}
