use super::fire_reminder::FireReminderUseCase;
use crate::shared::usecase::execute;
use actix_web::rt::time::sleep;
use lull_domain::{ReminderEvent, ID};
use lull_infra::{LullContext, MissedReminderPolicy};
use std::time::Duration;
use tracing::{info, warn};

/// Appended to the reason of reminders fired after a restart
pub const LATE_RECOVERY_MARKER: &str = "|late_recovery";

/// Starts a one shot timer for the event unless one is already running.
/// Triggers in the past fire right away.
pub fn arm(event: &ReminderEvent, ctx: &LullContext) -> bool {
    let delay = (event.trigger_ts - ctx.sys.get_timestamp_millis()).max(0) as u64;
    let event_id = event.id;
    let context = ctx.clone();

    let armed = ctx.timers.arm_with(event_id, move || {
        actix_web::rt::spawn(async move {
            sleep(Duration::from_millis(delay)).await;
            if !context.timers.begin_firing(&event_id) {
                return;
            }
            let usecase = FireReminderUseCase { event_id };
            // Outcomes are logged by the usecase
            let _ = execute(usecase, &context).await;
            context.timers.release(&event_id);
        })
    });
    if armed {
        info!("Armed reminder {} to fire in {} ms", event_id, delay);
    }
    armed
}

/// Advisory: the fire path re-reads the status before delivering
pub fn disarm(event_id: &ID, ctx: &LullContext) -> bool {
    let disarmed = ctx.timers.disarm(event_id);
    if disarmed {
        info!("Disarmed reminder {}", event_id);
    }
    disarmed
}

#[derive(Debug, Default, PartialEq)]
pub struct RecoveryReport {
    /// Future reminders whose timers were re-established
    pub armed: usize,
    /// SILENT reminders whose trigger passed while the process was down
    pub missed: usize,
    /// Missed reminders that were fired because of the configured policy
    pub fired_late: usize,
}

/// Rebuilds the timer map from the store
pub async fn recover_on_start(ctx: &LullContext) -> anyhow::Result<RecoveryReport> {
    let now = ctx.sys.get_timestamp_millis();
    let mut report = RecoveryReport::default();

    for event in ctx.repos.events.list_pending_future(now).await? {
        if arm(&event, ctx) {
            report.armed += 1;
        }
    }

    let missed = ctx.repos.events.list_missed(now).await?;
    report.missed = missed.len();
    match ctx.config.missed_reminders {
        MissedReminderPolicy::Leave => {
            if !missed.is_empty() {
                warn!(
                    "{} reminders passed their trigger while the service was down. They are left SILENT: {:?}",
                    missed.len(),
                    missed.iter().map(|e| e.id.inner()).collect::<Vec<_>>()
                );
            }
        }
        MissedReminderPolicy::Fire => {
            for event in missed {
                ctx.repos
                    .events
                    .append_reason(&event.id, LATE_RECOVERY_MARKER)
                    .await?;
                if arm(&event, ctx) {
                    report.fired_late += 1;
                }
            }
        }
    }

    info!("Reminder recovery done: {:?}", report);
    Ok(report)
}
