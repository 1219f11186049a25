use async_trait::async_trait;

use posts_client::{PostQuery, PostResult, PostsClient};

use crate::error::Result;
use crate::model::Post;

/// One fetched page of posts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub posts: Vec<Post>,
    /// Total number of matching posts, when the source reports it.
    pub total_count: Option<u64>,
}

/// Where screens get their posts from.
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Fetch a page of posts, newest first, filtered by `query`.
    async fn fetch_page(&self, query: &PostQuery) -> Result<Page>;

    /// Fetch the whole collection, used for client-side filtering.
    async fn fetch_all(&self) -> Result<Vec<Post>>;

    /// Store a new post and return what the source stored.
    async fn create_post(&self, post: &Post) -> Result<Post>;
}

#[async_trait]
impl PostSource for PostsClient {
    async fn fetch_page(&self, query: &PostQuery) -> Result<Page> {
        let page = self.fetch_posts(query).await?;
        Ok(Page {
            posts: page.posts.into_iter().map(Post::from).collect(),
            total_count: page.total_count,
        })
    }

    async fn fetch_all(&self) -> Result<Vec<Post>> {
        let posts = self.fetch_all_posts().await?;
        Ok(posts.into_iter().map(Post::from).collect())
    }

    async fn create_post(&self, post: &Post) -> Result<Post> {
        let saved = PostsClient::create_post(self, &PostResult::from(post)).await?;
        Ok(saved.into())
    }
}
