use crate::repos::IAppConfigRepo;
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};
use tracing::info;

pub const PARSER_PROMPT_KEY: &str = "prompt.parser.system";
pub const SOOTHER_PROMPT_KEY: &str = "prompt.soother.system";

/// Used when `app_config` has no parser prompt. Kept in sync with the seed migration.
pub const DEFAULT_PARSER_PROMPT: &str = r#"你是一个严格的时间与意图提取器。
当前时间是：{currentTime}。
请从用户的输入中提取事件发生的时间，格式为 yyyy-MM-dd HH:mm:ss。
如果用户没有指定具体几点，eventTime 返回 null。
请只返回 JSON，格式如下：
{
  "eventTime": "2026-02-01 09:00:00",
  "summary": "交报告",
  "valid": true,
  "intent": "AT_TIME | CUSHION | PREPARE",
  "complexity": "LOW | MEDIUM | HIGH",
  "prepRequired": false,
  "dependencies": ["people", "tickets", "materials"],
  "urgentMinuteLevel": false
}
如果用户输入的不是一个时间相关的计划，返回 "valid": false。"#;

pub const DEFAULT_SOOTHER_PROMPT: &str = r#"你是一个隐形的辅助记忆体，你的主人责任重、容易焦虑。
现在要提醒他一件之前提到的事情。
1. 目的是安抚，不是催促。
2. 给出 2-3 个可以马上做的小选项。
3. 语气要像老朋友。
4. 复用他的原话 {raw_input}。"#;

/// Process wide cache of the `app_config` table. Reads are served from
/// memory; `refresh` swaps in the current table contents.
pub struct PromptCache {
    repo: Arc<dyn IAppConfigRepo>,
    entries: RwLock<HashMap<String, String>>,
}

impl PromptCache {
    pub fn new(repo: Arc<dyn IAppConfigRepo>) -> Self {
        Self {
            repo,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Reloads every entry. Keys deleted from the table disappear from the cache.
    /// Returns the number of loaded entries.
    pub async fn refresh(&self) -> anyhow::Result<usize> {
        info!("Refreshing app config cache ...");
        let loaded = self
            .repo
            .find_all()
            .await?
            .into_iter()
            .map(|entry| (entry.key, entry.value))
            .collect::<HashMap<_, _>>();
        let count = loaded.len();
        *self.entries.write().unwrap() = loaded;
        info!("Refreshing app config cache ... [done] entries: {}", count);
        Ok(count)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.read().unwrap().get(key).cloned()
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    pub fn parser_prompt(&self) -> String {
        self.get_or(PARSER_PROMPT_KEY, DEFAULT_PARSER_PROMPT)
    }

    pub fn soother_prompt(&self) -> String {
        self.get_or(SOOTHER_PROMPT_KEY, DEFAULT_SOOTHER_PROMPT)
    }

    pub fn snapshot(&self) -> HashMap<String, String> {
        self.entries.read().unwrap().clone()
    }
}
