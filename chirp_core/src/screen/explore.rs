use crate::fetch::{FeedQuery, FetchOutcome, FetchTask};
use crate::filter::TagSelection;
use crate::merge::merge_page;
use crate::model::Post;
use crate::post_view::Selection;
use crate::store::Store;

use super::{page_task, unexpected_outcome, FeedController, Screen, ScreenKind, Status, LOAD_FAILED_MESSAGE};

/// Posts filtered by tags. Without a selection the server pages the feed, with one the
/// whole collection is scanned and paged locally.
#[derive(Debug, Clone)]
pub struct ExploreScreen {
    feed: FeedController,
    selection: TagSelection,
    available_tags: Vec<String>,
    tags_requested: bool,
    posts: Vec<Post>,
}

impl ExploreScreen {
    pub fn new(page_size: u32) -> Self {
        Self {
            feed: FeedController::new(page_size),
            selection: TagSelection::new(),
            available_tags: Vec::new(),
            tags_requested: false,
            posts: Vec::new(),
        }
    }

    pub fn feed(&self) -> &FeedController {
        &self.feed
    }

    pub fn available_tags(&self) -> &[String] {
        &self.available_tags
    }

    pub fn selected_tags(&self) -> &[String] {
        self.selection.tags()
    }

    /// Select or deselect a tag and reload from page 1.
    pub fn toggle_tag(&mut self, tag: &str) -> FetchTask {
        let selected = self.selection.toggle(tag);
        tracing::info!("Tag {} {}", tag, if selected { "selected" } else { "deselected" });
        self.reload()
    }

    /// Drop every selected tag. Nothing happens when none is selected.
    pub fn clear_tags(&mut self) -> Option<FetchTask> {
        if self.selection.is_empty() {
            return None;
        }
        self.selection.clear();
        Some(self.reload())
    }

    fn query(&self) -> FeedQuery {
        if self.selection.is_empty() {
            FeedQuery::Remote {
                text: None,
                username: None,
            }
        } else {
            FeedQuery::Tagged {
                selection: self.selection.clone(),
            }
        }
    }

    fn reload(&mut self) -> FetchTask {
        self.posts.clear();
        self.feed.selection_mut().clear();
        let request = self.feed.pagination_mut().reset();
        page_task(ScreenKind::Explore, request, self.query())
    }
}

impl Screen for ExploreScreen {
    fn kind(&self) -> ScreenKind {
        ScreenKind::Explore
    }

    fn title(&self) -> String {
        "Explore".to_string()
    }

    fn header(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.available_tags.is_empty() {
            let tags = self
                .available_tags
                .iter()
                .map(|tag| {
                    let label = tag.trim_start_matches('#');
                    if self.selection.contains(tag) {
                        format!("[{} ✕]", label)
                    } else {
                        label.to_string()
                    }
                })
                .collect::<Vec<_>>();
            lines.push(format!("Tags: {}", tags.join("  ")));
        }
        let count = self.selection.tags().len();
        if count > 0 {
            lines.push(format!("Filtered by {} tag{}", count, if count > 1 { "s" } else { "" }));
        }
        lines
    }

    fn mount(&mut self, _store: &mut Store) -> Vec<FetchTask> {
        let mut tasks = Vec::new();
        if !self.tags_requested {
            self.tags_requested = true;
            tasks.push(FetchTask::Tags {
                screen: ScreenKind::Explore,
            });
        }
        let query = self.query();
        if let Some(request) = self.feed.pagination_mut().start() {
            tasks.push(page_task(ScreenKind::Explore, request, query));
        }
        tasks
    }

    fn on_item_visible(&mut self, id: &str) -> Option<FetchTask> {
        let request = self.feed.on_item_visible(id)?;
        Some(page_task(ScreenKind::Explore, request, self.query()))
    }

    fn retry(&mut self) -> Option<FetchTask> {
        let request = self.feed.pagination_mut().retry()?;
        Some(page_task(ScreenKind::Explore, request, self.query()))
    }

    fn apply(&mut self, _store: &mut Store, outcome: FetchOutcome) -> bool {
        match outcome {
            FetchOutcome::Page { request, result, .. } => {
                let Some(page) = self.feed.settle(&request, result, LOAD_FAILED_MESSAGE) else {
                    return false;
                };
                let added = merge_page(&mut self.posts, request.page, page.posts);
                tracing::info!("Explore loaded page {} with {} new posts", request.page, added);
                true
            }
            FetchOutcome::Tags { result, .. } => match result {
                Ok(tags) => {
                    self.available_tags = tags;
                    true
                }
                Err(e) => {
                    tracing::error!("Error fetching tags: {}", e);
                    self.tags_requested = false;
                    false
                }
            },
            outcome => unexpected_outcome(ScreenKind::Explore, &outcome),
        }
    }

    fn posts<'a>(&'a self, _store: &'a Store) -> &'a [Post] {
        &self.posts
    }

    fn selection(&self) -> &Selection {
        self.feed.selection()
    }

    fn selection_mut(&mut self) -> &mut Selection {
        self.feed.selection_mut()
    }

    fn status(&self, _store: &Store) -> Status {
        let empty_message = if self.selection.is_empty() {
            "No posts available..."
        } else {
            "No posts found with selected tags..."
        };
        self.feed.status(self.posts.is_empty(), empty_message)
    }

    fn sync(&mut self, _store: &Store) {
        let last = self.posts.last().map(|post| post.id.as_str());
        self.feed.sync(last);
    }
}
