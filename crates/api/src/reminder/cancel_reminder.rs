use super::subscribers::DisarmTimerOnReminderCanceled;
use crate::{
    error::LullError,
    shared::{
        auth::protect_owner_route,
        usecase::{execute, Subscriber, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use lull_api_structs::cancel_reminder::*;
use lull_domain::{EventStatus, ReminderEvent, ID};
use lull_infra::LullContext;
use tracing::error;

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
        UseCaseError::AlreadyDelivered(event_id) => LullError::Conflict(format!(
            "The reminder with id: {}, has already been delivered.",
            event_id
        )),
        UseCaseError::StorageError => LullError::InternalError,
    }
}

pub async fn cancel_reminder_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<LullContext>,
) -> Result<HttpResponse, LullError> {
    let owner_ref = protect_owner_route(&http_req)?;

    let usecase = CancelReminderUseCase {
        owner_ref,
        event_id: path_params.reminder_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|event| HttpResponse::Ok().json(APIResponse::new(event)))
        .map_err(handle_error)
}

#[derive(Debug)]
pub struct CancelReminderUseCase {
    pub owner_ref: String,
    pub event_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    Forbidden(ID),
    AlreadyDelivered(ID),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for CancelReminderUseCase {
    type Response = ReminderEvent;

    type Error = UseCaseError;

    const NAME: &'static str = "CancelReminder";

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

        match event.status {
            EventStatus::Canceled => return Ok(event),
            EventStatus::Delivered => return Err(UseCaseError::AlreadyDelivered(event.id)),
            EventStatus::Silent => {}
        }

        let canceled = ctx
            .repos
            .events
            .mark_canceled(&event.id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        // Lost the race against the timer or a concurrent cancel
        let current = ctx
            .repos
            .events
            .find(&event.id)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .ok_or(UseCaseError::NotFound(event.id))?;
        if !canceled && current.status == EventStatus::Delivered {
            return Err(UseCaseError::AlreadyDelivered(current.id));
        }
        Ok(current)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(DisarmTimerOnReminderCanceled)]
    }
}
