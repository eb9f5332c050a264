use super::{AppConfigEntry, IAppConfigRepo};
use std::sync::Mutex;

pub struct InMemoryAppConfigRepo {
    entries: Mutex<Vec<AppConfigEntry>>,
}

impl InMemoryAppConfigRepo {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IAppConfigRepo for InMemoryAppConfigRepo {
    async fn find_all(&self) -> anyhow::Result<Vec<AppConfigEntry>> {
        Ok(self.entries.lock().unwrap().clone())
    }

    async fn upsert(&self, entry: &AppConfigEntry) -> anyhow::Result<()> {
        let mut entries = self.entries.lock().unwrap();
        match entries.iter_mut().find(|e| e.key == entry.key) {
            Some(existing) => *existing = entry.clone(),
            None => entries.push(entry.clone()),
        }
        Ok(())
    }
}
