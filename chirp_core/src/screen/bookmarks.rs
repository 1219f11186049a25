use crate::fetch::{FetchOutcome, FetchTask};
use crate::model::Post;
use crate::post_view::Selection;
use crate::store::Store;

use super::{unexpected_outcome, Screen, ScreenKind, Status};

/// The saved post snapshots. Nothing is fetched.
#[derive(Debug, Clone, Default)]
pub struct BookmarksScreen {
    selection: Selection,
}

impl BookmarksScreen {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Screen for BookmarksScreen {
    fn kind(&self) -> ScreenKind {
        ScreenKind::Bookmarks
    }

    fn title(&self) -> String {
        "Bookmarks".to_string()
    }

    fn mount(&mut self, _store: &mut Store) -> Vec<FetchTask> {
        Vec::new()
    }

    fn on_item_visible(&mut self, _id: &str) -> Option<FetchTask> {
        None
    }

    fn retry(&mut self) -> Option<FetchTask> {
        None
    }

    fn apply(&mut self, _store: &mut Store, outcome: FetchOutcome) -> bool {
        unexpected_outcome(ScreenKind::Bookmarks, &outcome)
    }

    fn posts<'a>(&'a self, store: &'a Store) -> &'a [Post] {
        store.bookmarks.items()
    }

    fn selection(&self) -> &Selection {
        &self.selection
    }

    fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    fn status(&self, store: &Store) -> Status {
        if store.bookmarks.items().is_empty() {
            Status::Empty("No bookmarks yet".to_string())
        } else {
            Status::Ready
        }
    }

    fn sync(&mut self, store: &Store) {
        if let Some(selected) = self.selection.selected() {
            if !store.bookmarks.is_bookmarked(selected) {
                self.selection.clear();
            }
        }
    }
}
