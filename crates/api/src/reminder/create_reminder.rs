use super::{bias::owner_bias_steps, subscribers::ArmTimerOnReminderCreated};
use crate::{
    error::LullError,
    intake::{IntakeError, IntakeQueue, IntakeTask},
    language::parse_utterance,
    shared::{
        auth::protect_owner_route,
        usecase::{Subscriber, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use lull_api_structs::create_reminder::*;
use lull_domain::{
    date::{local_to_millis, millis_to_local},
    normalize_event_time, ReminderEvent, TriggerPolicy,
};
use lull_infra::LullContext;
use tracing::info;

pub async fn create_reminder_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    intake: web::Data<IntakeQueue>,
) -> Result<HttpResponse, LullError> {
    let owner_ref = protect_owner_route(&http_req)?;
    let raw_input = body.raw_input.trim();
    if raw_input.is_empty() {
        return Err(LullError::BadClientData(
            "rawInput must not be empty".into(),
        ));
    }

    intake
        .submit(IntakeTask {
            owner_ref,
            raw_input: raw_input.to_string(),
        })
        .map_err(|e| match e {
            IntakeError::QueueFull => LullError::ServiceUnavailable(
                "Too many reminders are being planned right now, please try again later".into(),
            ),
            IntakeError::Closed => LullError::InternalError,
        })?;

    Ok(HttpResponse::Accepted().json(APIResponse {
        message: "Got it. I will remind you at the right moment.".into(),
    }))
}

/// Turns an utterance into a planned SILENT reminder
#[derive(Debug)]
pub struct CreateReminderUseCase {
    pub owner_ref: String,
    pub raw_input: String,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidInput(String),
    /// The model did not recognise a plan, or was unavailable
    Rejected,
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateReminderUseCase {
    type Response = ReminderEvent;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateReminder";

    async fn execute(&mut self, ctx: &LullContext) -> Result<Self::Response, Self::Error> {
        let raw_input = self.raw_input.trim();
        if raw_input.is_empty() {
            return Err(UseCaseError::InvalidInput("rawInput is empty".into()));
        }
        if self.owner_ref.trim().is_empty() {
            return Err(UseCaseError::InvalidInput("ownerRef is empty".into()));
        }

        let now = ctx.sys.get_timestamp_millis();
        let record = parse_utterance(raw_input, now, ctx).await;
        if !record.valid {
            return Err(UseCaseError::Rejected);
        }

        let tz = ctx.config.timezone;
        let normalized = normalize_event_time(
            record.event_time_text.as_deref(),
            raw_input,
            millis_to_local(now, &tz),
        );
        let event_ts = local_to_millis(normalized.local, &tz);

        let bias_steps = owner_bias_steps(&self.owner_ref, ctx).await;
        let plan = TriggerPolicy::plan(&record, event_ts, now, bias_steps);
        info!(
            owner_ref = %self.owner_ref,
            bias_steps,
            bucket = %plan.bucket,
            fallback = plan.fallback,
            "Planned reminder"
        );

        let event = ReminderEvent::planned(
            &self.owner_ref,
            raw_input,
            &plan,
            record.prep_required,
            record.dependencies.clone(),
            &normalized.reason,
            now,
        );
        ctx.repos
            .events
            .insert(&event)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(ArmTimerOnReminderCreated)]
    }
}
