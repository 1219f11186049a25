use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::mpsc;

use chirp_core::fetch::FeedQuery;
use chirp_core::screen::home::CREATE_FAILED_MESSAGE;
use chirp_core::source::{Page, PostSource};
use chirp_core::{Error, Post};
use posts_client::PostQuery;

use super::*;

struct TestSource {
    posts: Vec<Post>,
    failing_create: AtomicBool,
}

impl TestSource {
    fn new() -> Self {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let author = |username: &str| Profile {
            name: username.to_uppercase(),
            username: username.to_string(),
            bio: None,
        };
        let posts = vec![
            Post::compose(&author("alice"), "first", start).unwrap(),
            Post::compose(&author("bob"), "second", start + chrono::Duration::minutes(1)).unwrap(),
            Post::compose(&author("alice"), "third", start + chrono::Duration::minutes(2)).unwrap(),
        ];
        Self {
            posts,
            failing_create: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl PostSource for TestSource {
    async fn fetch_page(&self, query: &PostQuery) -> chirp_core::Result<Page> {
        let mut posts: Vec<Post> = self
            .posts
            .iter()
            .filter(|p| query.username.as_deref().map_or(true, |u| p.username == u))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        let total = posts.len() as u64;
        let start = ((query.page - 1) * query.limit) as usize;
        let posts = posts.into_iter().skip(start).take(query.limit as usize).collect();
        Ok(Page {
            posts,
            total_count: Some(total),
        })
    }

    async fn fetch_all(&self) -> chirp_core::Result<Vec<Post>> {
        Ok(self.posts.clone())
    }

    async fn create_post(&self, post: &Post) -> chirp_core::Result<Post> {
        if self.failing_create.load(Ordering::SeqCst) {
            return Err(Error::InvalidPost("rejected".to_string()));
        }
        Ok(post.clone())
    }
}

fn app() -> App {
    let config = Config {
        api_base_url: "http://localhost:3001".to_string(),
        page_size: 10,
        search_debounce: Duration::from_millis(1500),
        profile: Profile {
            name: "Mert Çetin".to_string(),
            username: "mert_cetin".to_string(),
            bio: Some("Software Engineer".to_string()),
        },
    };
    let (sender, _receiver) = mpsc::unbounded_channel();
    App::new(&config, Debouncer::new(config.search_debounce, sender))
}

async fn run_all(app: &mut App, source: &TestSource, tasks: Vec<FetchTask>) {
    for task in tasks {
        let outcome = task.run(source).await;
        app.apply(outcome);
    }
    app.sync();
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap()
}

#[tokio::test]
async fn test_start_renders_home() {
    let source = TestSource::new();
    let mut app = app();
    let tasks = app.start();
    assert_eq!(tasks.len(), 1);
    run_all(&mut app, &source, tasks).await;

    let view = app.render();
    assert!(view.starts_with("== Home =="));
    assert!(view.find("third").unwrap() < view.find("first").unwrap());
    assert!(view.contains("[3]"));
}

#[tokio::test]
async fn test_author_opens_profile() {
    let source = TestSource::new();
    let mut app = app();
    let tasks = app.start();
    run_all(&mut app, &source, tasks).await;

    let tasks = app.handle(Command::Author(2), now()).unwrap();
    assert_eq!(app.current(), ScreenKind::Profile);
    match &tasks[..] {
        [FetchTask::Page {
            query: FeedQuery::Remote { username, .. },
            ..
        }] => assert_eq!(username.as_deref(), Some("bob")),
        other => panic!("unexpected tasks {:?}", other),
    }
    run_all(&mut app, &source, tasks).await;
    let view = app.render();
    assert!(view.starts_with("== bob =="));
    assert!(view.contains("second"));
    assert!(!view.contains("first"));
}

#[tokio::test]
async fn test_replaced_profile_drops_late_page() {
    let source = TestSource::new();
    let mut app = app();
    let alice = app.handle(Command::Profile(Some("alice".to_string())), now()).unwrap();
    let bob = app.handle(Command::Profile(Some("bob".to_string())), now()).unwrap();

    let late = alice.into_iter().next().unwrap().run(&source).await;
    assert!(!app.apply(late));
    run_all(&mut app, &source, bob).await;
    assert!(app.render().starts_with("== bob =="));
}

#[tokio::test]
async fn test_bookmarks_and_delete() {
    let source = TestSource::new();
    let mut app = app();
    let tasks = app.start();
    run_all(&mut app, &source, tasks).await;

    app.handle(Command::Bookmark(1), now()).unwrap();
    assert!(app.handle(Command::Like(9), now()).is_err());
    app.handle(Command::Delete(1), now()).unwrap();
    assert!(!app.render().contains("third"));

    assert!(app.handle(Command::Bookmarks, now()).unwrap().is_empty());
    let view = app.render();
    assert!(view.contains("third"));
    assert!(view.contains("[bookmarked]"));
    assert!(app.handle(Command::Delete(1), now()).is_err());
}

#[tokio::test]
async fn test_post_failure_raises_alert() {
    let source = TestSource::new();
    source.failing_create.store(true, Ordering::SeqCst);
    let mut app = app();
    let tasks = app.start();
    run_all(&mut app, &source, tasks).await;

    assert!(app.handle(Command::Post("   ".to_string()), now()).is_err());
    let tasks = app.handle(Command::Post("hello".to_string()), now()).unwrap();
    run_all(&mut app, &source, tasks).await;
    assert_eq!(app.take_alert().as_deref(), Some(CREATE_FAILED_MESSAGE));
    assert!(!app.render().contains("hello"));
    assert_eq!(app.take_alert(), None);
}
