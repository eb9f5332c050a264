use lull_infra::{ChatRequest, LullContext};
use tracing::warn;

pub const REMINDER_SUBJECT: &str = "About the thing you mentioned earlier...";

pub fn fallback_body(raw_input: &str) -> String {
    format!("(system reminder) don't forget: {}", raw_input)
}

/// Writes a calm reminder body from the user's own words. Falls back to a
/// fixed template when the model fails or returns nothing.
pub async fn soothe(raw_input: &str, ctx: &LullContext) -> String {
    let request = ChatRequest {
        system_prompt: ctx.prompts.soother_prompt().replace("{raw_input}", raw_input),
        user_message: format!("用户的原话是：{}。请生成一段简短的安抚提醒。", raw_input),
        json_response: false,
    };

    match ctx.llm.complete(&request).await {
        Ok(body) if !body.trim().is_empty() => body.trim().to_string(),
        Ok(_) => {
            warn!("Soother returned an empty body, using the fallback template");
            fallback_body(raw_input)
        }
        Err(e) => {
            warn!("Soother failed, using the fallback template. Error: {:?}", e);
            fallback_body(raw_input)
        }
    }
}
