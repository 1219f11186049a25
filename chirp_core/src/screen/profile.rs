use crate::fetch::{FeedQuery, FetchOutcome, FetchTask};
use crate::merge::merge_page;
use crate::model::{Post, Profile};
use crate::post_view::Selection;
use crate::store::Store;

use super::{page_task, unexpected_outcome, FeedController, Screen, ScreenKind, Status};

pub const PROFILE_FAILED_MESSAGE: &str = "Failed to load profile data. Please try again.";

/// Posts of one user. Without a username this is the own profile.
#[derive(Debug, Clone)]
pub struct ProfileScreen {
    feed: FeedController,
    username: Option<String>,
    own: Profile,
    profile: Option<Profile>,
    posts: Vec<Post>,
}

impl ProfileScreen {
    pub fn new(page_size: u32, own: Profile, username: Option<String>) -> Self {
        let profile = match username {
            None => Some(own.clone()),
            Some(_) => None,
        };
        Self {
            feed: FeedController::new(page_size),
            username,
            own,
            profile,
            posts: Vec::new(),
        }
    }

    pub fn feed(&self) -> &FeedController {
        &self.feed
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// The user whose posts are listed.
    pub fn target_username(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.own.username)
    }

    fn query(&self) -> FeedQuery {
        FeedQuery::Remote {
            text: None,
            username: Some(self.target_username().to_string()),
        }
    }
}

impl Screen for ProfileScreen {
    fn kind(&self) -> ScreenKind {
        ScreenKind::Profile
    }

    fn title(&self) -> String {
        self.profile
            .as_ref()
            .map(|profile| profile.username.clone())
            .unwrap_or_else(|| "Profile".to_string())
    }

    fn header(&self) -> Vec<String> {
        let Some(profile) = &self.profile else {
            return Vec::new();
        };
        let mut lines = vec![profile.name.clone(), format!("@{}", profile.username)];
        if let Some(bio) = &profile.bio {
            lines.push(bio.clone());
        }
        lines
    }

    fn mount(&mut self, _store: &mut Store) -> Vec<FetchTask> {
        let query = self.query();
        self.feed
            .pagination_mut()
            .start()
            .map(|request| page_task(ScreenKind::Profile, request, query))
            .into_iter()
            .collect()
    }

    fn on_item_visible(&mut self, id: &str) -> Option<FetchTask> {
        let request = self.feed.on_item_visible(id)?;
        Some(page_task(ScreenKind::Profile, request, self.query()))
    }

    fn retry(&mut self) -> Option<FetchTask> {
        let request = self.feed.pagination_mut().retry()?;
        Some(page_task(ScreenKind::Profile, request, self.query()))
    }

    fn apply(&mut self, _store: &mut Store, outcome: FetchOutcome) -> bool {
        match outcome {
            FetchOutcome::Page { request, result, .. } => {
                let Some(page) = self.feed.settle(&request, result, PROFILE_FAILED_MESSAGE) else {
                    return false;
                };
                if request.page == 1 && self.username.is_some() {
                    if let Some(first) = page.posts.first() {
                        self.profile = Some(Profile::from_post(first));
                    }
                }
                let added = merge_page(&mut self.posts, request.page, page.posts);
                tracing::info!(
                    "Profile {} loaded page {} with {} new posts",
                    self.target_username(),
                    request.page,
                    added
                );
                true
            }
            outcome => unexpected_outcome(ScreenKind::Profile, &outcome),
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
        self.feed.status(self.posts.is_empty(), "No posts yet")
    }

    fn sync(&mut self, _store: &Store) {
        let last = self.posts.last().map(|post| post.id.as_str());
        self.feed.sync(last);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{post, post_by, MemorySource};

    fn own() -> Profile {
        Profile {
            name: "Mert Çetin".to_string(),
            username: "mert_cetin".to_string(),
            bio: Some("Software Engineer".to_string()),
        }
    }

    async fn load(screen: &mut ProfileScreen, store: &mut Store, source: &MemorySource) {
        for task in screen.mount(store) {
            let outcome = task.run(source).await;
            screen.apply(store, outcome);
            screen.sync(store);
        }
    }

    #[tokio::test]
    async fn test_own_profile() {
        let source = MemorySource::new(vec![post_by("1", "mert_cetin", "Mert Çetin"), post("2")]);
        let mut store = Store::new();
        let mut screen = ProfileScreen::new(10, own(), None);
        assert_eq!(screen.title(), "mert_cetin");

        load(&mut screen, &mut store, &source).await;
        assert_eq!(source.last_query().unwrap().username.as_deref(), Some("mert_cetin"));
        assert_eq!(screen.posts(&store).len(), 1);
        assert_eq!(screen.header(), vec!["Mert Çetin", "@mert_cetin", "Software Engineer"]);
    }

    #[tokio::test]
    async fn test_other_profile_header_from_first_post() {
        let source = MemorySource::new(vec![post_by("1", "ayse", "Ayşe"), post_by("2", "ayse", "Ayşe")]);
        let mut store = Store::new();
        let mut screen = ProfileScreen::new(10, own(), Some("ayse".to_string()));
        assert_eq!(screen.title(), "Profile");

        load(&mut screen, &mut store, &source).await;
        assert_eq!(screen.title(), "ayse");
        assert_eq!(screen.profile().unwrap().name, "Ayşe");
        assert_eq!(screen.posts(&store)[0].id, "2");
    }

    #[tokio::test]
    async fn test_unknown_user_and_failure() {
        let source = MemorySource::new(vec![post("1")]);
        let mut store = Store::new();
        let mut screen = ProfileScreen::new(10, own(), Some("nobody".to_string()));
        load(&mut screen, &mut store, &source).await;
        assert!(screen.profile().is_none());
        assert_eq!(screen.status(&store), Status::Empty("No posts yet".to_string()));

        source.set_failing(true);
        let mut screen = ProfileScreen::new(10, own(), Some("alice".to_string()));
        load(&mut screen, &mut store, &source).await;
        assert_eq!(screen.status(&store), Status::Error(PROFILE_FAILED_MESSAGE.to_string()));
    }

    #[tokio::test]
    async fn test_pages_without_total_count() {
        let source = MemorySource::new((1..=10).map(|i| post(&i.to_string())).collect());
        source.hide_total_count();
        let mut store = Store::new();
        let mut screen = ProfileScreen::new(10, own(), Some("alice".to_string()));
        load(&mut screen, &mut store, &source).await;

        // A full page without a total count suggests more
        assert!(screen.feed().pagination().has_more());
        let task = screen.on_item_visible("1").unwrap();
        let outcome = task.run(&source).await;
        assert!(screen.apply(&mut store, outcome));
        assert!(!screen.feed().pagination().has_more());
        assert_eq!(screen.posts(&store).len(), 10);
    }
}
