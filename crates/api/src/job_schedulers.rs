use crate::{
    intake::IntakeTask,
    reminder::CreateReminderUseCase,
    shared::usecase::execute,
};
use lull_infra::LullContext;
use std::sync::Arc;
use tokio::sync::{mpsc::Receiver, Semaphore};
use tracing::{error, info};

/// Drains the intake queue with at most `workers` reminders being planned
/// at the same time.
pub fn start_intake_workers(ctx: LullContext, mut receiver: Receiver<IntakeTask>, workers: usize) {
    let permits = Arc::new(Semaphore::new(workers.max(1)));
    actix_web::rt::spawn(async move {
        while let Some(task) = receiver.recv().await {
            let permit = match permits.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    error!("Intake workers stopped. Error: {:?}", e);
                    return;
                }
            };
            let context = ctx.clone();
            actix_web::rt::spawn(async move {
                let usecase = CreateReminderUseCase {
                    owner_ref: task.owner_ref,
                    raw_input: task.raw_input,
                };
                // Failures are logged by the usecase
                if let Ok(event) = execute(usecase, &context).await {
                    info!("Reminder {} planned for {}", event.id, event.owner_ref);
                }
                drop(permit);
            });
        }
        info!("Intake queue closed");
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::IntakeQueue;
    use actix_web::rt::time::sleep;
    use lull_infra::ScriptedLlmClient;
    use std::time::Duration;

    #[actix_web::main]
    #[test]
    async fn workers_plan_queued_reminders() {
        let llm = Arc::new(ScriptedLlmClient::new());
        llm.reply_to("开会", r#"{"valid": true, "intent": "AT_TIME"}"#)
            .reply_to("随便", r#"{"valid": false}"#);
        let mut ctx = LullContext::create_inmemory();
        ctx.llm = llm;

        let (queue, receiver) = IntakeQueue::new(8);
        start_intake_workers(ctx.clone(), receiver, 2);
        for raw_input in ["明天下午开会", "随便说说", "晚上开会"] {
            queue
                .submit(IntakeTask {
                    owner_ref: "ann@example.com".into(),
                    raw_input: raw_input.into(),
                })
                .unwrap();
        }

        let mut planned = Vec::new();
        for _ in 0..50 {
            planned = ctx
                .repos
                .events
                .list_recent_by_owner("ann@example.com", 10)
                .await
                .unwrap();
            if planned.len() == 2 {
                break;
            }
            sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(planned.len(), 2);
        assert_eq!(ctx.timers.len(), 2);
    }
}
