// Screens compose the store, a pagination controller and the post item view.
// They never perform I/O themselves: they hand out fetch tasks and take back outcomes.

pub mod bookmarks;
pub mod explore;
pub mod home;
pub mod profile;

use std::fmt::{Display, Formatter};

pub use bookmarks::BookmarksScreen;
pub use explore::ExploreScreen;
pub use home::{HomeScreen, SearchSettled};
pub use profile::ProfileScreen;

use crate::error::Result;
use crate::fetch::{FeedQuery, FetchOutcome, FetchTask};
use crate::model::Post;
use crate::pagination::{PageRequest, Pagination};
use crate::post_view::{click, BookmarkHandler, ClickTarget, ItemEffect, PostItem, Selection};
use crate::sensor::VisibilitySensor;
use crate::source::Page;
use crate::store::Store;

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load posts. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenKind {
    Home,
    Explore,
    Bookmarks,
    Profile,
}

impl Display for ScreenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ScreenKind::Home => "home",
            ScreenKind::Explore => "explore",
            ScreenKind::Bookmarks => "bookmarks",
            ScreenKind::Profile => "profile",
        };
        write!(f, "{}", s)
    }
}

/// What to show below the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Ready,
    Loading,
    Error(String),
    Empty(String),
}

pub trait Screen {
    fn kind(&self) -> ScreenKind;

    fn title(&self) -> String;

    /// Extra lines shown between the title and the list.
    fn header(&self) -> Vec<String> {
        Vec::new()
    }

    /// The screen became visible. Returns the fetches to run.
    fn mount(&mut self, store: &mut Store) -> Vec<FetchTask>;

    /// The item `id` scrolled into view.
    fn on_item_visible(&mut self, id: &str) -> Option<FetchTask>;

    fn retry(&mut self) -> Option<FetchTask>;

    /// Take back the outcome of a task this screen issued.
    /// Returns false when the outcome was stale and dropped.
    fn apply(&mut self, store: &mut Store, outcome: FetchOutcome) -> bool;

    fn posts<'a>(&'a self, store: &'a Store) -> &'a [Post];

    fn selection(&self) -> &Selection;

    fn selection_mut(&mut self) -> &mut Selection;

    fn status(&self, store: &Store) -> Status;

    /// Re-attach the visibility sensor to the current last item.
    fn sync(&mut self, store: &Store);

    fn bookmark_handler(&self) -> Option<&dyn BookmarkHandler> {
        None
    }

    /// A message that must be shown to the user before anything else.
    fn take_alert(&mut self) -> Option<String> {
        None
    }

    /// Click on the item at `index` of the rendered list.
    fn click(&mut self, store: &mut Store, index: usize, target: ClickTarget) -> Option<ItemEffect> {
        let post = self.posts(store).get(index)?.clone();
        let mut selection = self.selection().clone();
        let effect = click(&post, target, store, &mut selection, self.bookmark_handler());
        *self.selection_mut() = selection;
        Some(effect)
    }

    fn render<'a>(&'a self, store: &'a Store) -> ScreenView<'a> {
        ScreenView {
            title: self.title(),
            header: self.header(),
            items: self
                .posts(store)
                .iter()
                .map(|post| PostItem::new(post, store, self.selection()))
                .collect(),
            status: self.status(store),
        }
    }
}

pub struct ScreenView<'a> {
    pub title: String,
    pub header: Vec<String>,
    pub items: Vec<PostItem<'a>>,
    pub status: Status,
}

impl Display for ScreenView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "== {} ==", self.title)?;
        for line in &self.header {
            writeln!(f, "{}", line)?;
        }
        for (index, item) in self.items.iter().enumerate() {
            writeln!(f, "[{}]", index + 1)?;
            writeln!(f, "{}", item)?;
        }
        match &self.status {
            Status::Ready => Ok(()),
            Status::Loading => writeln!(f, "Loading..."),
            Status::Error(message) => writeln!(f, "{}", message),
            Status::Empty(message) => writeln!(f, "{}", message),
        }
    }
}

/// Pagination, visibility sensor and selection of a paged screen.
#[derive(Debug, Clone)]
pub struct FeedController {
    pagination: Pagination,
    sensor: VisibilitySensor,
    selection: Selection,
}

impl FeedController {
    pub fn new(page_size: u32) -> Self {
        Self {
            pagination: Pagination::new(page_size),
            sensor: VisibilitySensor::new(),
            selection: Selection::default(),
        }
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn pagination_mut(&mut self) -> &mut Pagination {
        &mut self.pagination
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    pub fn sync(&mut self, last: Option<&str>) {
        self.sensor
            .update(self.pagination.is_loading(), self.pagination.has_more());
        self.sensor.observe(last);
    }

    pub fn on_item_visible(&mut self, id: &str) -> Option<PageRequest> {
        if !self.sensor.notify_visible(id) {
            return None;
        }
        let request = self.pagination.advance()?;
        tracing::debug!("Last item {} visible, loading page {}", id, request.page);
        Some(request)
    }

    /// Record a page outcome. Returns the page to merge, or None when it failed or is stale.
    pub fn settle(&mut self, request: &PageRequest, result: Result<Page>, error_message: &str) -> Option<Page> {
        match result {
            Ok(page) => self
                .pagination
                .succeed(request, page.posts.len(), page.total_count)
                .then_some(page),
            Err(e) => {
                if self.pagination.fail(request, error_message) {
                    tracing::error!("Error fetching page {}: {}", request.page, e);
                }
                None
            }
        }
    }

    pub fn status(&self, is_empty: bool, empty_message: &str) -> Status {
        if self.pagination.is_loading() {
            Status::Loading
        } else if let Some(message) = self.pagination.error() {
            Status::Error(message.to_string())
        } else if is_empty {
            Status::Empty(empty_message.to_string())
        } else {
            Status::Ready
        }
    }
}

pub(crate) fn page_task(screen: ScreenKind, request: PageRequest, query: FeedQuery) -> FetchTask {
    FetchTask::Page { screen, request, query }
}

pub(crate) fn unexpected_outcome(screen: ScreenKind, outcome: &FetchOutcome) -> bool {
    tracing::warn!("Screen {} ignored an outcome for {}", screen, outcome.screen());
    false
}
