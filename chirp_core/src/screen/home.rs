use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::fetch::{FeedQuery, FetchOutcome, FetchTask};
use crate::model::{Post, Profile};
use crate::post_view::{BookmarkHandler, Selection};
use crate::schedule::Debouncer;
use crate::store::{Action, Store};

use super::{page_task, unexpected_outcome, FeedController, Screen, ScreenKind, Status, LOAD_FAILED_MESSAGE};

pub const CREATE_FAILED_MESSAGE: &str = "Failed to create post. Please try again.";

/// Delivered by the search debouncer once typing paused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettled {
    pub text: String,
}

/// Bookmark toggle of the home feed, checked against the stored bookmark list.
#[derive(Debug, Clone, Copy, Default)]
pub struct HomeBookmarks;

impl BookmarkHandler for HomeBookmarks {
    fn toggle_bookmark(&self, post: &Post, store: &mut Store) -> bool {
        let bookmarked = store.bookmarks.items().iter().any(|item| item.id == post.id);
        if bookmarked {
            store.dispatch(Action::RemoveBookmark(post.id.clone()));
        } else {
            store.dispatch(Action::AddBookmark(post.clone()));
        }
        !bookmarked
    }
}

/// The home feed: all posts newest first, with free-text search and post composition.
/// Its list is the store's post collection.
#[derive(Debug)]
pub struct HomeScreen {
    feed: FeedController,
    author: Profile,
    search_text: String,
    /// The search text the current pages were requested with.
    query_text: Option<String>,
    debouncer: Debouncer<SearchSettled>,
    bookmarks: HomeBookmarks,
    alert: Option<String>,
}

impl HomeScreen {
    pub fn new(page_size: u32, author: Profile, debouncer: Debouncer<SearchSettled>) -> Self {
        Self {
            feed: FeedController::new(page_size),
            author,
            search_text: String::new(),
            query_text: None,
            debouncer,
            bookmarks: HomeBookmarks,
            alert: None,
        }
    }

    pub fn feed(&self) -> &FeedController {
        &self.feed
    }

    /// The search box changed. A non-blank text is applied after the quiet period,
    /// clearing it reloads right away.
    pub fn set_search_text(&mut self, store: &mut Store, text: &str) -> Option<FetchTask> {
        self.search_text = text.to_string();
        if text.trim().is_empty() {
            self.debouncer.cancel();
            self.query_text = None;
            store.dispatch(Action::ResetPosts);
            return Some(self.reload());
        }
        self.debouncer.schedule(SearchSettled { text: text.to_string() });
        None
    }

    /// The debounced search text arrived. Ignored when the box changed since.
    pub fn on_search_settled(&mut self, settled: SearchSettled) -> Option<FetchTask> {
        if settled.text != self.search_text {
            return None;
        }
        tracing::info!("Searching posts for {:?}", settled.text.trim());
        self.query_text = Some(settled.text.trim().to_string());
        Some(self.reload())
    }

    /// Build a post from the draft. Blank drafts are rejected.
    pub fn compose(&self, content: &str, now: DateTime<Utc>) -> Result<FetchTask> {
        let post = Post::compose(&self.author, content, now)?;
        Ok(FetchTask::Create {
            screen: ScreenKind::Home,
            post,
        })
    }

    fn query(&self) -> FeedQuery {
        FeedQuery::Remote {
            text: self.query_text.clone(),
            username: None,
        }
    }

    fn reload(&mut self) -> FetchTask {
        let request = self.feed.pagination_mut().reset();
        page_task(ScreenKind::Home, request, self.query())
    }
}

impl Screen for HomeScreen {
    fn kind(&self) -> ScreenKind {
        ScreenKind::Home
    }

    fn title(&self) -> String {
        "Home".to_string()
    }

    fn header(&self) -> Vec<String> {
        if self.search_text.is_empty() {
            Vec::new()
        } else {
            vec![format!("Search: {}", self.search_text)]
        }
    }

    fn mount(&mut self, _store: &mut Store) -> Vec<FetchTask> {
        let query = self.query();
        self.feed
            .pagination_mut()
            .start()
            .map(|request| page_task(ScreenKind::Home, request, query))
            .into_iter()
            .collect()
    }

    fn on_item_visible(&mut self, id: &str) -> Option<FetchTask> {
        let request = self.feed.on_item_visible(id)?;
        Some(page_task(ScreenKind::Home, request, self.query()))
    }

    fn retry(&mut self) -> Option<FetchTask> {
        let request = self.feed.pagination_mut().retry()?;
        Some(page_task(ScreenKind::Home, request, self.query()))
    }

    fn apply(&mut self, store: &mut Store, outcome: FetchOutcome) -> bool {
        match outcome {
            FetchOutcome::Page { request, result, .. } => {
                let Some(page) = self.feed.settle(&request, result, LOAD_FAILED_MESSAGE) else {
                    return false;
                };
                tracing::info!("Home loaded page {} with {} posts", request.page, page.posts.len());
                if request.page == 1 {
                    store.dispatch(Action::ResetPosts);
                }
                store.dispatch(Action::SetPosts(page.posts));
                true
            }
            FetchOutcome::Created { result, .. } => match result {
                Ok(post) => {
                    tracing::info!("Published post {}", post.id);
                    store.dispatch(Action::AddPost(post));
                    true
                }
                Err(e) => {
                    tracing::error!("Error creating post: {}", e);
                    self.alert = Some(CREATE_FAILED_MESSAGE.to_string());
                    true
                }
            },
            outcome => unexpected_outcome(ScreenKind::Home, &outcome),
        }
    }

    fn posts<'a>(&'a self, store: &'a Store) -> &'a [Post] {
        store.posts.posts()
    }

    fn selection(&self) -> &Selection {
        self.feed.selection()
    }

    fn selection_mut(&mut self) -> &mut Selection {
        self.feed.selection_mut()
    }

    fn status(&self, store: &Store) -> Status {
        let empty_message = if self.search_text.is_empty() {
            "No posts available..."
        } else {
            "No posts found matching your search..."
        };
        self.feed.status(store.posts.posts().is_empty(), empty_message)
    }

    fn sync(&mut self, store: &Store) {
        let last = store.posts.posts().last().map(|post| post.id.as_str());
        self.feed.sync(last);
    }

    fn bookmark_handler(&self) -> Option<&dyn BookmarkHandler> {
        Some(&self.bookmarks)
    }

    fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }
}
