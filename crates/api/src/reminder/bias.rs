use lull_domain::{compute_bias_steps, EventStatus};
use lull_infra::LullContext;
use tracing::warn;

/// Learned lead time offset for the owner. A store failure means no bias.
pub async fn owner_bias_steps(owner_ref: &str, ctx: &LullContext) -> i64 {
    let settings = ctx.config.bias;
    match ctx
        .repos
        .events
        .list_recent_by_owner_and_status(owner_ref, EventStatus::Delivered, settings.window as i64)
        .await
    {
        Ok(recent) => compute_bias_steps(&recent, &settings),
        Err(e) => {
            warn!("Unable to load feedback history for bias. Error: {:?}", e);
            0
        }
    }
}
