use itertools::Itertools;

use crate::model::Post;

/// Tags selected on the Explore screen, in selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSelection {
    tags: Vec<String>,
}

impl TagSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Returns whether the tag is selected afterwards.
    pub fn toggle(&mut self, tag: &str) -> bool {
        if let Some(index) = self.tags.iter().position(|t| t == tag) {
            self.tags.remove(index);
            false
        } else {
            self.tags.push(tag.to_string());
            true
        }
    }

    pub fn clear(&mut self) {
        self.tags.clear();
    }

    /// A post matches when it carries every selected tag.
    pub fn matches(&self, post: &Post) -> bool {
        self.tags.iter().all(|tag| post.has_tag(tag))
    }

    pub fn filter(&self, posts: Vec<Post>) -> Vec<Post> {
        posts.into_iter().filter(|post| self.matches(post)).collect()
    }
}

/// All distinct tags of the collection, sorted.
pub fn available_tags(posts: &[Post]) -> Vec<String> {
    posts
        .iter()
        .flat_map(|post| post.tags.iter().cloned())
        .sorted()
        .dedup()
        .collect()
}

/// The window of a 1-based page. The second value tells whether more items follow it.
pub fn page_window<T: Clone>(items: &[T], page: u32, page_size: u32) -> (Vec<T>, bool) {
    let start = (page.saturating_sub(1) as usize).saturating_mul(page_size as usize);
    let end = start.saturating_add(page_size as usize);
    let window = items
        .get(start.min(items.len())..end.min(items.len()))
        .map(<[T]>::to_vec)
        .unwrap_or_default();
    (window, end < items.len())
}
