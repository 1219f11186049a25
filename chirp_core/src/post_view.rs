use std::fmt::{Display, Formatter};

use crate::model::{Post, PostId};
use crate::store::{Action, Store};

/// The selected post of a screen. A selected post shows its comments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<PostId>,
}

impl Selection {
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_deref() == Some(id)
    }

    pub fn toggle(&mut self, id: &str) -> Option<&str> {
        if self.is_selected(id) {
            self.selected = None;
        } else {
            self.selected = Some(id.to_string());
        }
        self.selected()
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }
}

/// Where a click on a post landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Body,
    Like,
    Bookmark,
    Author,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemEffect {
    Selected(Option<PostId>),
    Liked(bool),
    Bookmarked(bool),
    OpenProfile(String),
}

/// Bookmark behaviour a screen supplies instead of the default store actions.
pub trait BookmarkHandler {
    /// Returns whether the post is bookmarked afterwards.
    fn toggle_bookmark(&self, post: &Post, store: &mut Store) -> bool;
}

/// Handle a click on `post`. Only body clicks reach the selection; the controls
/// and the author link stop there.
pub fn click(
    post: &Post,
    target: ClickTarget,
    store: &mut Store,
    selection: &mut Selection,
    handler: Option<&dyn BookmarkHandler>,
) -> ItemEffect {
    match target {
        ClickTarget::Body => ItemEffect::Selected(selection.toggle(&post.id).map(str::to_string)),
        ClickTarget::Like => {
            let liked = store.posts.is_liked(&post.id);
            if liked {
                store.dispatch(Action::UnlikePost(post.id.clone()));
            } else {
                store.dispatch(Action::LikePost(post.id.clone()));
            }
            ItemEffect::Liked(!liked)
        }
        ClickTarget::Bookmark => {
            let bookmarked = match handler {
                Some(handler) => handler.toggle_bookmark(post, store),
                None if store.bookmarks.is_bookmarked(&post.id) => {
                    store.dispatch(Action::RemoveBookmark(post.id.clone()));
                    false
                }
                None => {
                    store.dispatch(Action::AddBookmark(post.snapshot()));
                    true
                }
            };
            ItemEffect::Bookmarked(bookmarked)
        }
        ClickTarget::Author => ItemEffect::OpenProfile(post.username.clone()),
    }
}

/// One rendered post.
#[derive(Debug, Clone)]
pub struct PostItem<'a> {
    pub post: &'a Post,
    pub selected: bool,
    pub liked: bool,
    pub bookmarked: bool,
}

impl<'a> PostItem<'a> {
    pub fn new(post: &'a Post, store: &Store, selection: &Selection) -> Self {
        Self {
            post,
            selected: selection.is_selected(&post.id),
            liked: store.posts.is_liked(&post.id),
            bookmarked: store.bookmarks.is_bookmarked(&post.id),
        }
    }
}

impl Display for PostItem<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let post = self.post;
        let marker = if self.selected { ">" } else { " " };
        writeln!(
            f,
            "{} {} @{} · {}",
            marker,
            post.name,
            post.username,
            post.timestamp.format("%Y-%m-%d")
        )?;
        writeln!(f, "  {}", post.content)?;
        if !post.tags.is_empty() {
            writeln!(f, "  {}", post.tags.join(" "))?;
        }
        write!(
            f,
            "  {} {}   ↻ {}   💬 {}   {}",
            if self.liked { "♥" } else { "♡" },
            post.likes,
            post.reposts,
            post.comments.len(),
            if self.bookmarked { "[bookmarked]" } else { "[bookmark]" }
        )?;
        if self.selected {
            for comment in &post.comments {
                write!(f, "\n    ↳ @{}: {}", comment.username, comment.content)?;
            }
        }
        Ok(())
    }
}
