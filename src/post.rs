use fmt::Display;
use std::fmt;
use std::fmt::Formatter;

use serde::{Deserialize, Serialize};

/// Post as it appears in the feed collection. The API omits the image
/// field for posts without one.
#[derive(Debug, Clone, Deserialize)]
pub struct PostSummary {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Post as returned by the single-post endpoint. Superset of the summary
/// fields; the two shapes are never reconciled.
#[derive(Debug, Clone, Deserialize)]
pub struct PostDetail {
    pub id: u64,
    pub title: String,
    pub author: String,
    pub content: String,
}

/// Payload for creating a post, built from the form field values as-is.
#[derive(Debug, Clone, Serialize)]
pub struct NewPostDraft {
    pub title: String,
    pub content: String,
    pub author: String,
}

impl Display for PostDetail {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "id={}, author={}\ntitle={}\ncontent:\n{}",
               self.id,
               self.author,
               self.title,
               self.content
        )
    }
}
