use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};

use posts_client::PostQuery;

use crate::error::{Error, Result};
use crate::filter::page_window;
use crate::model::{Comment, Post};
use crate::source::{Page, PostSource};

/// A post by alice with one comment. Numeric ids get increasing timestamps.
pub fn post(id: &str) -> Post {
    let base = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
    let timestamp = base + Duration::minutes(id.parse::<i64>().unwrap_or(0));
    Post {
        id: id.to_string(),
        username: "alice".to_string(),
        name: "Alice".to_string(),
        content: format!("post {}", id),
        timestamp,
        likes: 0,
        reposts: 0,
        comments: vec![Comment {
            username: "bob".to_string(),
            content: "nice".to_string(),
            timestamp,
        }],
        tags: Vec::new(),
        images: None,
    }
}

pub fn post_with_likes(id: &str, likes: u32) -> Post {
    Post { likes, ..post(id) }
}

pub fn post_tagged(id: &str, tags: &[&str]) -> Post {
    Post {
        tags: tags.iter().map(|t| t.to_string()).collect(),
        ..post(id)
    }
}

pub fn post_by(id: &str, username: &str, name: &str) -> Post {
    Post {
        username: username.to_string(),
        name: name.to_string(),
        ..post(id)
    }
}

/// In-memory stand-in for the posts resource, filtering and paging like json-server.
#[derive(Debug, Default)]
pub struct MemorySource {
    posts: Mutex<Vec<Post>>,
    failing: AtomicBool,
    without_total: AtomicBool,
    page_calls: AtomicUsize,
    full_scans: AtomicUsize,
    queries: Mutex<Vec<PostQuery>>,
}

impl MemorySource {
    pub fn new(posts: Vec<Post>) -> Self {
        Self {
            posts: Mutex::new(posts),
            ..Default::default()
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn hide_total_count(&self) {
        self.without_total.store(true, Ordering::SeqCst);
    }

    pub fn page_calls(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }

    pub fn full_scans(&self) -> usize {
        self.full_scans.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<PostQuery> {
        self.queries.lock().unwrap().last().cloned()
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::Other(anyhow!("connection refused")));
        }
        Ok(())
    }
}

#[async_trait]
impl PostSource for MemorySource {
    async fn fetch_page(&self, query: &PostQuery) -> Result<Page> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.clone());
        self.check()?;

        let text = query
            .text
            .as_deref()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty());
        let mut posts: Vec<Post> = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| query.username.as_deref().map_or(true, |u| p.username == u))
            .filter(|p| {
                text.as_deref()
                    .map_or(true, |t| p.content.to_lowercase().contains(t) || p.username.contains(t))
            })
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let total = posts.len() as u64;
        let (window, _) = page_window(&posts, query.page, query.limit);
        let total_count = if self.without_total.load(Ordering::SeqCst) {
            None
        } else {
            Some(total)
        };
        Ok(Page {
            posts: window,
            total_count,
        })
    }

    async fn fetch_all(&self) -> Result<Vec<Post>> {
        self.full_scans.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.posts.lock().unwrap().clone())
    }

    async fn create_post(&self, post: &Post) -> Result<Post> {
        self.check()?;
        self.posts.lock().unwrap().push(post.clone());
        Ok(post.clone())
    }
}

/// `count` posts with ids `1..=count`.
pub fn posts(count: u32) -> Vec<Post> {
    (1..=count).map(|i| post(&i.to_string())).collect()
}
