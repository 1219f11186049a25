use std::collections::HashSet;

use crate::model::Post;

/// Append posts whose id is not yet in `existing`, keeping the order of both sides.
/// Returns the number of appended posts.
pub fn merge_unique<I>(existing: &mut Vec<Post>, batch: I) -> usize
where
    I: IntoIterator<Item = Post>,
{
    let mut seen: HashSet<String> = existing.iter().map(|post| post.id.clone()).collect();
    let before = existing.len();
    for post in batch {
        if seen.insert(post.id.clone()) {
            existing.push(post);
        }
    }
    existing.len() - before
}

/// Replace `existing` on the first page, otherwise merge.
pub fn merge_page<I>(existing: &mut Vec<Post>, page: u32, batch: I) -> usize
where
    I: IntoIterator<Item = Post>,
{
    if page <= 1 {
        existing.clear();
    }
    merge_unique(existing, batch)
}
