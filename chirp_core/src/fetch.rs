// Fetch tasks are plain data. Screens create them, the caller runs them wherever it
// likes (inline or spawned), and the outcome is handed back to the issuing screen.

use posts_client::PostQuery;

use crate::error::Result;
use crate::filter::{available_tags, page_window, TagSelection};
use crate::model::Post;
use crate::pagination::PageRequest;
use crate::screen::ScreenKind;
use crate::source::{Page, PostSource};

#[derive(Debug, Clone, PartialEq)]
pub enum FeedQuery {
    /// Paged by the server.
    Remote {
        text: Option<String>,
        username: Option<String>,
    },
    /// The whole collection filtered by tags, paged locally.
    Tagged { selection: TagSelection },
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchTask {
    Page {
        screen: ScreenKind,
        request: PageRequest,
        query: FeedQuery,
    },
    Tags {
        screen: ScreenKind,
    },
    /// Store a locally composed post.
    Create {
        screen: ScreenKind,
        post: Post,
    },
}

#[derive(Debug)]
pub enum FetchOutcome {
    Page {
        screen: ScreenKind,
        request: PageRequest,
        result: Result<Page>,
    },
    Tags {
        screen: ScreenKind,
        result: Result<Vec<String>>,
    },
    Created {
        screen: ScreenKind,
        result: Result<Post>,
    },
}

impl FetchTask {
    pub fn screen(&self) -> ScreenKind {
        match self {
            FetchTask::Page { screen, .. } | FetchTask::Tags { screen } | FetchTask::Create { screen, .. } => *screen,
        }
    }

    pub async fn run(self, source: &dyn PostSource) -> FetchOutcome {
        match self {
            FetchTask::Page { screen, request, query } => {
                let result = fetch_page(source, &request, query).await;
                FetchOutcome::Page { screen, request, result }
            }
            FetchTask::Tags { screen } => {
                let result = source.fetch_all().await.map(|posts| available_tags(&posts));
                FetchOutcome::Tags { screen, result }
            }
            FetchTask::Create { screen, post } => {
                let result = source.create_post(&post).await;
                FetchOutcome::Created { screen, result }
            }
        }
    }
}

impl FetchOutcome {
    pub fn screen(&self) -> ScreenKind {
        match self {
            FetchOutcome::Page { screen, .. }
            | FetchOutcome::Tags { screen, .. }
            | FetchOutcome::Created { screen, .. } => *screen,
        }
    }
}

async fn fetch_page(source: &dyn PostSource, request: &PageRequest, query: FeedQuery) -> Result<Page> {
    match query {
        FeedQuery::Remote { text, username } => {
            let query = PostQuery {
                page: request.page,
                limit: request.page_size,
                text,
                username,
            };
            source.fetch_page(&query).await
        }
        FeedQuery::Tagged { selection } => {
            let mut posts = selection.filter(source.fetch_all().await?);
            // Same order as the server-paged path
            posts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            let total = posts.len() as u64;
            let (window, _) = page_window(&posts, request.page, request.page_size);
            Ok(Page {
                posts: window,
                total_count: Some(total),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::Pagination;
    use crate::testing::{post, post_tagged, MemorySource};

    #[tokio::test]
    async fn test_tags_and_create_tasks() {
        let source = MemorySource::new(vec![post_tagged("1", &["#b", "#a"]), post_tagged("2", &["#a"])]);

        let outcome = FetchTask::Tags {
            screen: ScreenKind::Explore,
        }
        .run(&source)
        .await;
        assert_eq!(outcome.screen(), ScreenKind::Explore);
        match outcome {
            FetchOutcome::Tags { result, .. } => assert_eq!(result.unwrap(), vec!["#a", "#b"]),
            other => panic!("unexpected outcome {:?}", other),
        }

        let outcome = FetchTask::Create {
            screen: ScreenKind::Home,
            post: post("3"),
        }
        .run(&source)
        .await;
        match outcome {
            FetchOutcome::Created { result, .. } => assert_eq!(result.unwrap().id, "3"),
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(source.full_scans(), 1);
    }

    #[tokio::test]
    async fn test_tagged_page_reports_filtered_total() {
        let source = MemorySource::new(vec![
            post_tagged("1", &["#a"]),
            post_tagged("2", &["#b"]),
            post_tagged("3", &["#a"]),
        ]);
        let mut selection = TagSelection::new();
        selection.toggle("#a");
        let request = Pagination::new(1).reset();

        let page = fetch_page(&source, &request, FeedQuery::Tagged { selection })
            .await
            .unwrap();
        assert_eq!(page.total_count, Some(2));
        assert_eq!(page.posts.len(), 1);
        assert_eq!(page.posts[0].id, "3");
        assert_eq!(source.page_calls(), 0);
    }
}
