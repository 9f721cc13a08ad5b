use std::{path::PathBuf, time::Duration};

use relcache_core::{ToolDescriptor, DOT_RELCACHE_CACHE_DIR};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    /// Timeout of release feed requests. Asset downloads are never limited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed_timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub tools: Vec<ToolDescriptor>,
}

fn default_cache_dir() -> PathBuf {
    DOT_RELCACHE_CACHE_DIR.into()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            feed_timeout_secs: Some(30),
            user_agent: None,
            tools: vec![ToolDescriptor::builder()
                .name("example")
                .release_url("https://api.github.com/repos/owner/example/releases")
                .major_version(1)
                .build()],
        }
    }
}

impl Settings {
    pub fn find_tool(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.iter().find(|tool| tool.name.eq_ignore_ascii_case(name))
    }

    pub fn feed_timeout(&self) -> Option<Duration> {
        self.feed_timeout_secs.map(Duration::from_secs)
    }
}
