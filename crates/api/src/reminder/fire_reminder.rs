use crate::{
    language::{soothe, REMINDER_SUBJECT},
    shared::usecase::UseCase,
};
use actix_web::rt::time::timeout;
use lull_domain::{EventStatus, ID};
use lull_infra::LullContext;
use std::time::Duration;
use tracing::{error, info, warn};

/// Fire path of an expired timer: re-read, guard on status, deliver, mark.
#[derive(Debug)]
pub struct FireReminderUseCase {
    pub event_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum FireOutcome {
    Delivered,
    /// Delivered, but the event was canceled while the message was in flight
    DeliveredAfterCancel,
    /// The event is gone or no longer SILENT
    Dropped(Option<EventStatus>),
}

#[derive(Debug)]
pub enum UseCaseError {
    /// The event stays SILENT and is not retried
    DeliveryFailed(ID),
    DeliveryTimedOut(ID),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for FireReminderUseCase {
    type Response = FireOutcome;

    type Error = UseCaseError;

    const NAME: &'static str = "FireReminder";

    async fn execute(&mut self, ctx: &LullContext) -> Result<Self::Response, Self::Error> {
        let event = match ctx.repos.events.find(&self.event_id).await {
            Ok(Some(event)) => event,
            Ok(None) => {
                info!("Reminder {} no longer exists, dropping", self.event_id);
                return Ok(FireOutcome::Dropped(None));
            }
            Err(e) => {
                error!("Unable to load reminder {}. Error: {:?}", self.event_id, e);
                return Err(UseCaseError::StorageError);
            }
        };
        if !event.is_silent() {
            info!("Reminder {} is {}, dropping", event.id, event.status);
            return Ok(FireOutcome::Dropped(Some(event.status)));
        }

        let body = soothe(&event.raw_input, ctx).await;
        let delivery = ctx
            .notifier
            .deliver(&event.owner_ref, REMINDER_SUBJECT, &body);
        match timeout(
            Duration::from_millis(ctx.config.delivery_timeout_millis),
            delivery,
        )
        .await
        {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                error!("Delivery of reminder {} failed. Error: {:?}", event.id, e);
                return Err(UseCaseError::DeliveryFailed(event.id));
            }
            Err(_) => {
                error!("Delivery of reminder {} timed out", event.id);
                return Err(UseCaseError::DeliveryTimedOut(event.id));
            }
        }

        match ctx.repos.events.mark_delivered(&event.id).await {
            Ok(true) => {
                info!("Reminder {} delivered", event.id);
                Ok(FireOutcome::Delivered)
            }
            Ok(false) => {
                warn!(
                    "Reminder {} was delivered but changed status in the meantime",
                    event.id
                );
                Ok(FireOutcome::DeliveredAfterCancel)
            }
            Err(e) => {
                error!("Unable to mark reminder {} delivered. Error: {:?}", event.id, e);
                Err(UseCaseError::StorageError)
            }
        }
    }
}
