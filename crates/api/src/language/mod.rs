mod parser;
mod soother;

pub use parser::{build_parser_prompt, parse_utterance};
pub use soother::{fallback_body, soothe, REMINDER_SUBJECT};
