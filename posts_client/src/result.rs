use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use chirp_util::{id_string, iso8601};

/// A post record as stored by the posts resource.
#[skip_serializing_none]
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct PostResult {
    #[serde(with = "id_string")]
    pub id: String,
    pub username: String,
    pub name: String,
    #[serde(default)]
    pub content: String,
    #[serde(with = "iso8601")]
    pub timestamp: DateTime<Utc>,
    pub likes: u32,
    pub reposts: u32,
    #[serde(default)]
    pub comments: Vec<CommentResult>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub images: Option<Vec<String>>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CommentResult {
    pub username: String,
    pub content: String,
    #[serde(with = "iso8601")]
    pub timestamp: DateTime<Utc>,
}

/// One page of posts plus the `X-Total-Count` the server reported, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostPage {
    pub posts: Vec<PostResult>,
    pub total_count: Option<u64>,
}

/// Query of a paged `GET /posts`, always sorted newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    pub page: u32,
    pub limit: u32,
    /// Free-text search, sent as `q` when not blank.
    pub text: Option<String>,
    pub username: Option<String>,
}

impl PostQuery {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            text: None,
            username: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }
}
