use crate::{
    error::LullError,
    shared::{
        auth::protect_owner_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use lull_api_structs::submit_feedback::*;
use lull_domain::{EventStatus, Feedback, ReminderEvent, ID};
use lull_infra::LullContext;
use tracing::{error, info};

fn handle_error(e: UseCaseError) -> LullError {
    match e {
        UseCaseError::NotFound(event_id) => LullError::NotFound(format!(
            "The reminder with id: {}, was not found.",
            event_id
        )),
        UseCaseError::Forbidden(event_id) => LullError::Forbidden(format!(
            "The reminder with id: {}, belongs to someone else.",
            event_id
        )),
        UseCaseError::NotDelivered(event_id, status) => LullError::Conflict(format!(
            "The reminder with id: {}, is {} and only delivered reminders take feedback.",
            event_id, status
        )),
        UseCaseError::StorageError => LullError::InternalError,
    }
}

pub async fn submit_feedback_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<LullContext>,
) -> Result<HttpResponse, LullError> {
    let owner_ref = protect_owner_route(&http_req)?;

    let usecase = SubmitFeedbackUseCase {
        owner_ref,
        event_id: path_params.reminder_id,
        feedback: body.feedback,
    };

    execute(usecase, &ctx)
        .await
        .map(|event| HttpResponse::Ok().json(APIResponse::new(event)))
        .map_err(handle_error)
}

/// Records whether a delivered reminder came too early, on time or too late.
/// Later submissions overwrite earlier ones.
#[derive(Debug)]
pub struct SubmitFeedbackUseCase {
    pub owner_ref: String,
    pub event_id: ID,
    pub feedback: Feedback,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    Forbidden(ID),
    NotDelivered(ID, EventStatus),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for SubmitFeedbackUseCase {
    type Response = ReminderEvent;

    type Error = UseCaseError;

    const NAME: &'static str = "SubmitFeedback";

    async fn execute(&mut self, ctx: &LullContext) -> Result<Self::Response, Self::Error> {
        let event = match ctx.repos.events.find(&self.event_id).await {
            Ok(Some(event)) if event.is_owned_by(&self.owner_ref) => event,
            Ok(Some(_)) => return Err(UseCaseError::Forbidden(self.event_id)),
            Ok(None) => return Err(UseCaseError::NotFound(self.event_id)),
            Err(e) => {
                error!("Unable to load reminder {}. Error: {:?}", self.event_id, e);
                return Err(UseCaseError::StorageError);
            }
        };

        let updated = ctx
            .repos
            .events
            .set_feedback(&event.id, self.feedback)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        if !updated {
            return Err(UseCaseError::NotDelivered(event.id, event.status));
        }

        info!(
            owner_ref = %self.owner_ref,
            bucket = %event.bucket,
            feedback = %self.feedback,
            "Feedback recorded"
        );
        ctx.repos
            .events
            .find(&event.id)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .ok_or(UseCaseError::NotFound(event.id))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::faulty_repo::{Fault, FaultyEventRepo};
    use lull_domain::{Complexity, TriggerBucket, TriggerIntent};
    use std::sync::Arc;

    async fn setup(status: EventStatus) -> (LullContext, ReminderEvent) {
        let ctx = LullContext::create_inmemory();
        let event = ReminderEvent {
            id: ID::unassigned(),
            owner_ref: "ann@example.com".into(),
            raw_input: "下午去医院".into(),
            event_ts: 2_000,
            trigger_ts: 1_000,
            status: EventStatus::Silent,
            bucket: TriggerBucket::H4,
            intent: TriggerIntent::Cushion,
            complexity: Complexity::Medium,
            prep_required: false,
            dependencies: Vec::new(),
            reason: String::new(),
            feedback: None,
            created: 0,
        };
        let event = ctx.repos.events.insert(&event).await.unwrap();
        match status {
            EventStatus::Delivered => {
                ctx.repos.events.mark_delivered(&event.id).await.unwrap();
            }
            EventStatus::Canceled => {
                ctx.repos.events.mark_canceled(&event.id).await.unwrap();
            }
            EventStatus::Silent => {}
        }
        (ctx, event)
    }

    fn feedback(owner_ref: &str, event_id: ID, feedback: Feedback) -> SubmitFeedbackUseCase {
        SubmitFeedbackUseCase {
            owner_ref: owner_ref.into(),
            event_id,
            feedback,
        }
    }

    #[actix_web::main]
    #[test]
    async fn records_and_overwrites_feedback() {
        let (ctx, event) = setup(EventStatus::Delivered).await;

        let res = execute(feedback("ann@example.com", event.id, Feedback::Early), &ctx)
            .await
            .unwrap();
        assert_eq!(res.feedback, Some(Feedback::Early));

        let res = execute(feedback("ann@example.com", event.id, Feedback::OnTime), &ctx)
            .await
            .unwrap();
        assert_eq!(res.feedback, Some(Feedback::OnTime));
    }

    #[actix_web::main]
    #[test]
    async fn only_delivered_reminders_take_feedback() {
        for status in [EventStatus::Silent, EventStatus::Canceled] {
            let (ctx, event) = setup(status).await;
            let res = execute(feedback("ann@example.com", event.id, Feedback::Late), &ctx).await;
            assert!(matches!(res, Err(UseCaseError::NotDelivered(_, s)) if s == status));
        }
    }

    #[actix_web::main]
    #[test]
    async fn rejects_other_owners_and_unknown_ids() {
        let (ctx, event) = setup(EventStatus::Delivered).await;

        let res = execute(feedback("bob@example.com", event.id, Feedback::Late), &ctx).await;
        assert!(matches!(res, Err(UseCaseError::Forbidden(_))));
        let res = execute(feedback("ann@example.com", ID::new(999), Feedback::Late), &ctx).await;
        assert!(matches!(res, Err(UseCaseError::NotFound(_))));

        let stored = ctx.repos.events.find(&event.id).await.unwrap().unwrap();
        assert_eq!(stored.feedback, None);
    }

    #[actix_web::main]
    #[test]
    async fn failed_read_is_a_storage_error() {
        let (mut ctx, event) = setup(EventStatus::Delivered).await;
        let inner = ctx.repos.events.clone();
        ctx.repos.events = Arc::new(FaultyEventRepo::new(inner.clone(), Fault::FailingReads));

        let res = execute(feedback("ann@example.com", event.id, Feedback::Late), &ctx).await;
        assert!(matches!(res, Err(UseCaseError::StorageError)));
        let stored = inner.find(&event.id).await.unwrap().unwrap();
        assert_eq!(stored.feedback, None);
    }
}
