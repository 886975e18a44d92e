//! News headline type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A headline returned by a news provider, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsHeadline {
    /// Headline text
    pub title: String,
    /// Publisher name
    #[serde(default)]
    pub publisher: Option<String>,
    /// Article URL
    #[serde(default)]
    pub link: Option<String>,
    /// Publication time
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl NewsHeadline {
    /// Create a headline with only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            publisher: None,
            link: None,
            published_at: None,
        }
    }
}
