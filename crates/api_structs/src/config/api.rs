use serde::{Deserialize, Serialize};

pub mod refresh_config {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        /// Number of entries loaded into the prompt cache
        pub entries: usize,
    }
}
