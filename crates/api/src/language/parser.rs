use lull_domain::{date::format_prompt_time, ParseRecord};
use lull_infra::{ChatRequest, LullContext};
use tracing::{info, warn};

/// Fills `{currentTime}` and pins the model to the present
pub fn build_parser_prompt(template: &str, current_time: &str) -> String {
    format!(
        "{}\n\n【系统最高指令：当前时间是 {}，你给出的时间绝不能早于这个时间！如果是5分钟后，必须在这个时间基础上加5分钟！】",
        template.replace("{currentTime}", current_time),
        current_time
    )
}

/// Asks the language model to read the utterance. Any failure, whether
/// transport, timeout or an unreadable reply, yields a rejected record.
pub async fn parse_utterance(raw_input: &str, now: i64, ctx: &LullContext) -> ParseRecord {
    let current_time = format_prompt_time(now, &ctx.config.timezone);
    let request = ChatRequest {
        system_prompt: build_parser_prompt(&ctx.prompts.parser_prompt(), &current_time),
        user_message: raw_input.to_string(),
        json_response: true,
    };

    let mut record = match ctx.llm.complete(&request).await {
        Ok(reply) => match ParseRecord::from_llm_reply(&reply) {
            Ok(record) => {
                info!("Parsed utterance. Reply: {}", reply.trim());
                record
            }
            Err(e) => {
                warn!("Unreadable parse reply: {}. Error: {:?}", reply.trim(), e);
                return ParseRecord::rejected();
            }
        },
        Err(e) => {
            warn!("Language model unavailable, rejecting utterance. Error: {:?}", e);
            return ParseRecord::rejected();
        }
    };

    record.enforce_urgent_language(raw_input);
    record
}
