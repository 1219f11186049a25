use chrono::{DateTime, Utc};

use posts_client::{CommentResult, PostResult};

use crate::error::{Error, Result};

pub type PostId = String;

/// A single feed entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: PostId,
    pub username: String,
    pub name: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub likes: u32,
    pub reposts: u32,
    pub comments: Vec<Comment>,
    pub tags: Vec<String>,
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub username: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// The author shown on the own profile and used for composed posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub username: String,
    pub bio: Option<String>,
}

impl Post {
    /// Build a local post for `author`. The id is derived from the creation time in milliseconds.
    /// Blank drafts are rejected, anything else is kept as typed.
    pub fn compose(author: &Profile, content: &str, now: DateTime<Utc>) -> Result<Post> {
        if content.trim().is_empty() {
            return Err(Error::InvalidPost("content is empty".to_string()));
        }
        Ok(Post {
            id: now.timestamp_millis().to_string(),
            username: author.username.clone(),
            name: author.name.clone(),
            content: content.to_string(),
            timestamp: now,
            likes: 0,
            reposts: 0,
            comments: Vec::new(),
            tags: Vec::new(),
            images: None,
        })
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// A copy without comments, as kept in the bookmark collection.
    pub fn snapshot(&self) -> Post {
        Post {
            comments: Vec::new(),
            ..self.clone()
        }
    }
}

impl From<PostResult> for Post {
    fn from(post: PostResult) -> Self {
        Post {
            id: post.id,
            username: post.username,
            name: post.name,
            content: post.content,
            timestamp: post.timestamp,
            likes: post.likes,
            reposts: post.reposts,
            comments: post.comments.into_iter().map(Comment::from).collect(),
            tags: post.tags,
            images: post.images,
        }
    }
}

impl From<CommentResult> for Comment {
    fn from(comment: CommentResult) -> Self {
        Comment {
            username: comment.username,
            content: comment.content,
            timestamp: comment.timestamp,
        }
    }
}

impl From<&Post> for PostResult {
    fn from(post: &Post) -> Self {
        PostResult {
            id: post.id.clone(),
            username: post.username.clone(),
            name: post.name.clone(),
            content: post.content.clone(),
            timestamp: post.timestamp,
            likes: post.likes,
            reposts: post.reposts,
            comments: post
                .comments
                .iter()
                .map(|c| CommentResult {
                    username: c.username.clone(),
                    content: c.content.clone(),
                    timestamp: c.timestamp,
                })
                .collect(),
            tags: post.tags.clone(),
            images: post.images.clone(),
        }
    }
}

impl Profile {
    pub fn from_post(post: &Post) -> Profile {
        Profile {
            name: post.name.clone(),
            username: post.username.clone(),
            bio: None,
        }
    }
}
