use super::{
    cancel_reminder::CancelReminderUseCase, create_reminder::CreateReminderUseCase, scheduler,
};
use crate::shared::usecase::Subscriber;
use lull_domain::ReminderEvent;
use lull_infra::LullContext;

pub struct ArmTimerOnReminderCreated;

#[async_trait::async_trait(?Send)]
impl Subscriber<CreateReminderUseCase> for ArmTimerOnReminderCreated {
    async fn notify(&self, e: &ReminderEvent, ctx: &LullContext) {
        scheduler::arm(e, ctx);
    }
}

/// Runs after CANCELED is committed, so a timer that wakes up late
/// still sees the new status.
pub struct DisarmTimerOnReminderCanceled;

#[async_trait::async_trait(?Send)]
impl Subscriber<CancelReminderUseCase> for DisarmTimerOnReminderCanceled {
    async fn notify(&self, e: &ReminderEvent, ctx: &LullContext) {
        scheduler::disarm(&e.id, ctx);
    }
}
