use crate::base::{APIResponse, BaseClient};
use lull_api_structs::*;
use lull_domain::{Feedback, ID};
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct ReminderClient {
    base: Arc<BaseClient>,
}

pub struct SubmitFeedbackInput {
    pub reminder_id: ID,
    pub feedback: Feedback,
}

impl ReminderClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    /// Hands the utterance to the planner. The reminder shows up in `list`
    /// once it has been planned.
    pub async fn create<T: Into<String>>(
        &self,
        raw_input: T,
    ) -> APIResponse<create_reminder::APIResponse> {
        let body = create_reminder::RequestBody {
            raw_input: raw_input.into(),
        };
        self.base
            .post(body, "reminders".into(), StatusCode::ACCEPTED)
            .await
    }

    pub async fn list(&self, limit: Option<i64>) -> APIResponse<get_reminders::APIResponse> {
        let path = match limit {
            Some(limit) => format!("reminders?limit={}", limit),
            None => "reminders".into(),
        };
        self.base.get(path, StatusCode::OK).await
    }

    pub async fn cancel(&self, reminder_id: ID) -> APIResponse<cancel_reminder::APIResponse> {
        self.base
            .post(
                (),
                format!("reminders/{}/cancel", reminder_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn submit_feedback(
        &self,
        input: SubmitFeedbackInput,
    ) -> APIResponse<submit_feedback::APIResponse> {
        let body = submit_feedback::RequestBody {
            feedback: input.feedback,
        };
        self.base
            .post(
                body,
                format!("reminders/{}/feedback", input.reminder_id),
                StatusCode::OK,
            )
            .await
    }
}
