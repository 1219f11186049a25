// Client state shared by all screens.
// Every reducer is synchronous and total. Failures belong to the fetch layer.

use std::collections::HashSet;

use crate::merge::merge_unique;
use crate::model::{Post, PostId};

/// Posts known to the client plus the ids the current user has liked.
#[derive(Debug, Clone, Default)]
pub struct PostsState {
    posts: Vec<Post>,
    liked: HashSet<PostId>,
}

impl PostsState {
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn get(&self, id: &str) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == id)
    }

    pub fn is_liked(&self, id: &str) -> bool {
        self.liked.contains(id)
    }

    /// Newest first, so new posts go to the front.
    pub fn add_post(&mut self, post: Post) {
        self.posts.insert(0, post);
    }

    /// Append the posts that are not present yet. Callers loading a first page reset first.
    pub fn set_posts(&mut self, batch: Vec<Post>) -> usize {
        merge_unique(&mut self.posts, batch)
    }

    pub fn reset_posts(&mut self) {
        self.posts.clear();
    }

    pub fn delete_post(&mut self, id: &str) {
        self.posts.retain(|post| post.id != id);
    }

    pub fn like_post(&mut self, id: &str) {
        if !self.liked.insert(id.to_string()) {
            return;
        }
        if let Some(post) = self.posts.iter_mut().find(|post| post.id == id) {
            post.likes = post.likes.saturating_add(1);
        }
    }

    pub fn unlike_post(&mut self, id: &str) {
        if !self.liked.remove(id) {
            return;
        }
        if let Some(post) = self.posts.iter_mut().find(|post| post.id == id) {
            post.likes = post.likes.saturating_sub(1);
        }
    }
}

/// Bookmarked post snapshots and their ids.
/// An id is in `ids` iff a post with that id is in `items`.
#[derive(Debug, Clone, Default)]
pub struct BookmarksState {
    items: Vec<Post>,
    ids: HashSet<PostId>,
}

impl BookmarksState {
    pub fn items(&self) -> &[Post] {
        &self.items
    }

    pub fn is_bookmarked(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn add_bookmark(&mut self, post: &Post) {
        if self.ids.insert(post.id.clone()) {
            self.items.push(post.snapshot());
        }
    }

    pub fn remove_bookmark(&mut self, id: &str) {
        if self.ids.remove(id) {
            self.items.retain(|item| item.id != id);
        }
    }

    /// Returns whether the post is bookmarked afterwards.
    pub fn toggle_bookmark(&mut self, post: &Post) -> bool {
        if self.is_bookmarked(&post.id) {
            self.remove_bookmark(&post.id);
            false
        } else {
            self.add_bookmark(post);
            true
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    AddPost(Post),
    SetPosts(Vec<Post>),
    ResetPosts,
    DeletePost(PostId),
    LikePost(PostId),
    UnlikePost(PostId),
    AddBookmark(Post),
    RemoveBookmark(PostId),
}

/// The client store. Constructed once and passed to screens by reference.
#[derive(Debug, Clone, Default)]
pub struct Store {
    pub posts: PostsState,
    pub bookmarks: BookmarksState,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch(&mut self, action: Action) {
        tracing::debug!("Dispatch {}", action.name());
        match action {
            Action::AddPost(post) => self.posts.add_post(post),
            Action::SetPosts(batch) => {
                let added = self.posts.set_posts(batch);
                tracing::debug!("Merged {} new posts, {} in store", added, self.posts.posts().len());
            }
            Action::ResetPosts => self.posts.reset_posts(),
            Action::DeletePost(id) => self.posts.delete_post(&id),
            Action::LikePost(id) => self.posts.like_post(&id),
            Action::UnlikePost(id) => self.posts.unlike_post(&id),
            Action::AddBookmark(post) => self.bookmarks.add_bookmark(&post),
            Action::RemoveBookmark(id) => self.bookmarks.remove_bookmark(&id),
        }
    }
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Action::AddPost(_) => "add_post",
            Action::SetPosts(_) => "set_posts",
            Action::ResetPosts => "reset_posts",
            Action::DeletePost(_) => "delete_post",
            Action::LikePost(_) => "like_post",
            Action::UnlikePost(_) => "unlike_post",
            Action::AddBookmark(_) => "add_bookmark",
            Action::RemoveBookmark(_) => "remove_bookmark",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{post, post_with_likes};

    fn ids(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_add_post_prepends() {
        let mut store = Store::new();
        store.dispatch(Action::AddPost(post("1")));
        assert_eq!(ids(store.posts.posts()), vec!["1"]);
        store.dispatch(Action::AddPost(post("2")));
        assert_eq!(ids(store.posts.posts()), vec!["2", "1"]);
    }

    #[test]
    fn test_set_posts_never_duplicates() {
        let mut store = Store::new();
        let batches = vec![
            vec![post("1"), post("2")],
            vec![post("2"), post("3")],
            vec![post("3"), post("3"), post("1"), post("4")],
            vec![],
        ];
        for batch in batches {
            store.dispatch(Action::SetPosts(batch));
            let mut seen = std::collections::HashSet::new();
            assert!(store.posts.posts().iter().all(|p| seen.insert(p.id.clone())));
        }
        assert_eq!(ids(store.posts.posts()), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_reset_and_delete() {
        let mut store = Store::new();
        store.dispatch(Action::SetPosts(vec![post("1"), post("2")]));
        store.dispatch(Action::DeletePost("1".to_string()));
        assert_eq!(ids(store.posts.posts()), vec!["2"]);
        store.dispatch(Action::DeletePost("missing".to_string()));
        assert_eq!(ids(store.posts.posts()), vec!["2"]);
        store.dispatch(Action::ResetPosts);
        assert!(store.posts.posts().is_empty());
    }

    #[test]
    fn test_like_then_unlike_round_trip() {
        let mut store = Store::new();
        store.dispatch(Action::SetPosts(vec![post_with_likes("1", 5)]));

        store.dispatch(Action::LikePost("1".to_string()));
        assert_eq!(store.posts.get("1").unwrap().likes, 6);
        assert!(store.posts.is_liked("1"));

        // Liking twice is a no-op
        store.dispatch(Action::LikePost("1".to_string()));
        assert_eq!(store.posts.get("1").unwrap().likes, 6);

        store.dispatch(Action::UnlikePost("1".to_string()));
        assert_eq!(store.posts.get("1").unwrap().likes, 5);
        assert!(!store.posts.is_liked("1"));
    }

    #[test]
    fn test_unlike_without_like_is_noop() {
        let mut store = Store::new();
        store.dispatch(Action::SetPosts(vec![post_with_likes("1", 2)]));
        store.dispatch(Action::UnlikePost("1".to_string()));
        assert_eq!(store.posts.get("1").unwrap().likes, 2);
    }

    #[test]
    fn test_unlike_clamps_at_zero() {
        for start in [0, 1, 2] {
            let mut store = Store::new();
            store.dispatch(Action::SetPosts(vec![post_with_likes("1", start)]));
            store.dispatch(Action::LikePost("1".to_string()));
            // The server copy arrives again with a lower count
            store.dispatch(Action::ResetPosts);
            store.dispatch(Action::SetPosts(vec![post_with_likes("1", 0)]));
            store.dispatch(Action::UnlikePost("1".to_string()));
            assert_eq!(store.posts.get("1").unwrap().likes, 0);
        }
    }

    #[test]
    fn test_like_unknown_post_records_id() {
        let mut store = Store::new();
        store.dispatch(Action::LikePost("42".to_string()));
        assert!(store.posts.is_liked("42"));
        assert!(store.posts.posts().is_empty());
    }

    #[test]
    fn test_add_bookmark_is_idempotent() {
        let mut store = Store::new();
        let p = post("1");
        assert!(!p.comments.is_empty());

        store.dispatch(Action::AddBookmark(p.clone()));
        store.dispatch(Action::AddBookmark(p));
        assert_eq!(store.bookmarks.items().len(), 1);
        assert!(store.bookmarks.is_bookmarked("1"));
        assert!(store.bookmarks.items()[0].comments.is_empty());
    }

    fn assert_bookmarks_consistent(bookmarks: &BookmarksState) {
        assert_eq!(bookmarks.items().len(), bookmarks.ids.len());
        assert!(bookmarks.items().iter().all(|p| bookmarks.is_bookmarked(&p.id)));
    }

    #[test]
    fn test_remove_bookmark() {
        let mut store = Store::new();
        store.dispatch(Action::AddBookmark(post("1")));
        assert_bookmarks_consistent(&store.bookmarks);
        store.dispatch(Action::AddBookmark(post("2")));
        assert_bookmarks_consistent(&store.bookmarks);

        // Unknown id leaves both the list and the id set alone
        store.dispatch(Action::RemoveBookmark("3".to_string()));
        assert_eq!(ids(store.bookmarks.items()), vec!["1", "2"]);
        assert!(store.bookmarks.is_bookmarked("1"));
        assert!(store.bookmarks.is_bookmarked("2"));
        assert!(!store.bookmarks.is_bookmarked("3"));
        assert_bookmarks_consistent(&store.bookmarks);

        store.dispatch(Action::RemoveBookmark("1".to_string()));
        assert_eq!(ids(store.bookmarks.items()), vec!["2"]);
        assert!(!store.bookmarks.is_bookmarked("1"));
        assert!(store.bookmarks.is_bookmarked("2"));
        assert_bookmarks_consistent(&store.bookmarks);

        store.dispatch(Action::RemoveBookmark("1".to_string()));
        assert_eq!(ids(store.bookmarks.items()), vec!["2"]);
        assert_bookmarks_consistent(&store.bookmarks);
    }

    #[test]
    fn test_toggle_bookmark() {
        let mut store = Store::new();
        let p = post("1");
        assert!(store.bookmarks.toggle_bookmark(&p));
        assert!(!store.bookmarks.toggle_bookmark(&p));
        assert!(store.bookmarks.items().is_empty());
    }
}
