use std::collections::HashMap;

use crate::config::Settings;
use crate::db::test_pool;
use crate::InnerState;

pub struct TestStateOptions {
    pub youtube_url: String,
    pub webhook_url: Option<String>,
    pub admin_key: Option<String>,
    pub clip_offset_seconds: Option<u32>,
}

impl Default for TestStateOptions {
    fn default() -> Self {
        Self {
            youtube_url: "http://127.0.0.1:9".to_string(),
            webhook_url: None,
            admin_key: None,
            clip_offset_seconds: None,
        }
    }
}

pub async fn test_state(options: TestStateOptions) -> InnerState {
    let mut vars = HashMap::from([
        ("YT_API_KEY".to_string(), "test-key".to_string()),
        ("YT_API_BASE_URL".to_string(), options.youtube_url),
        ("HTTP_TIMEOUT_SECS".to_string(), "5".to_string()),
    ]);
    if let Some(url) = options.webhook_url {
        vars.insert("DISCORD_WEBHOOK".to_string(), url);
    }
    if let Some(key) = options.admin_key {
        vars.insert("ADMIN_KEY".to_string(), key);
    }
    if let Some(offset) = options.clip_offset_seconds {
        vars.insert("CLIP_OFFSET_SECONDS".to_string(), offset.to_string());
    }

    let settings = Settings::from_lookup(|key| vars.get(key).cloned()).unwrap();

    InnerState::new(settings, test_pool().await).unwrap()
}
