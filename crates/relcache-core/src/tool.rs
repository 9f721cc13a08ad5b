use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::error::FetchError;

/// Identifies a tool and the feed its releases are published to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
pub struct ToolDescriptor {
    #[builder(setter(into))]
    pub name: String,
    /// URL returning the JSON list of releases.
    #[builder(setter(into))]
    pub release_url: String,
    pub major_version: u64,
    #[builder(default = true)]
    #[serde(default = "default_include_prereleases")]
    pub include_prereleases: bool,
}

fn default_include_prereleases() -> bool {
    true
}

impl ToolDescriptor {
    pub fn validate(&self) -> Result<(), FetchError> {
        if self.name.trim().is_empty() {
            return Err(FetchError::InvalidTool("tool name is empty".into()));
        }

        if self.release_url.trim().is_empty() {
            return Err(FetchError::InvalidTool(format!(
                "release url of {} is empty",
                self.name
            )));
        }

        Ok(())
    }
}
