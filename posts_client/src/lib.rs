mod error;
mod result;

use reqwest::{header::HeaderMap, Client, Response, Url};
use serde::de::DeserializeOwned;

use chirp_util::{build_params, parse_total_count, resource_url};

pub use crate::error::Error;
pub use crate::error::Result;
pub use crate::result::*;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";
const POSTS: &str = "posts";
const TOTAL_COUNT_HEADER: &str = "X-Total-Count";

/// Client of a json-server style `/posts` resource.
#[derive(Debug, Clone)]
pub struct PostsClient {
    client: Client,
    base_url: Url,
}

impl PostsClient {
    pub fn new(base_url: &str) -> Result<PostsClient> {
        let base_url = Url::parse(base_url)?;
        let client = Client::builder().build()?;
        Ok(PostsClient { client, base_url })
    }

    /// Fetch one page of posts, newest first.
    pub async fn fetch_posts(&self, query: &PostQuery) -> Result<PostPage> {
        let params = build_params! {
            required _sort => "timestamp",
            required _order => "desc",
            required _page => query.page,
            required _limit => query.limit,
            text q => query.text,
            optional username => query.username,
        };
        let response = self.get(params).await?;
        let total_count = total_count(response.headers());
        let posts: Vec<PostResult> = decode("posts_page", response).await?;

        tracing::debug!(
            "Fetched page {} of posts: {} posts, total {:?}",
            query.page,
            posts.len(),
            total_count
        );
        Ok(PostPage { posts, total_count })
    }

    /// Fetch the whole collection without paging or sorting.
    pub async fn fetch_all_posts(&self) -> Result<Vec<PostResult>> {
        let response = self.get(Vec::new()).await?;
        let posts: Vec<PostResult> = decode("posts_all", response).await?;
        tracing::debug!("Fetched all posts: {}", posts.len());
        Ok(posts)
    }

    /// Store a new post and return the stored representation.
    pub async fn create_post(&self, post: &PostResult) -> Result<PostResult> {
        let url = resource_url(&self.base_url, POSTS)?;
        let response = self
            .client
            .post(url)
            .json(post)
            .send()
            .await?
            .error_for_status()?;
        let saved: PostResult = decode("posts_create", response).await?;
        tracing::info!("Created post {}", saved.id);
        Ok(saved)
    }
}

impl PostsClient {
    async fn get<I>(&self, query: I) -> Result<Response>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut url = resource_url(&self.base_url, POSTS)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.extend_pairs(query);
        }
        if url.query() == Some("") {
            url.set_query(None);
        }

        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response)
    }
}

fn total_count(headers: &HeaderMap) -> Option<u64> {
    let value = headers.get(TOTAL_COUNT_HEADER)?.to_str().ok()?;
    match parse_total_count(value) {
        Ok(count) => Some(count),
        Err(e) => {
            tracing::warn!("Ignoring total count header: {}", e);
            None
        }
    }
}

async fn decode<T: DeserializeOwned>(name: &str, response: Response) -> Result<T> {
    let content = response.text().await?;
    log(name, &content).await?;

    let deserializer = &mut serde_json::Deserializer::from_str(&content);
    let result = serde_path_to_error::deserialize(deserializer)?;
    Ok(result)
}

async fn log(name: &str, content: &str) -> Result<()> {
    use std::path::PathBuf;
    use tokio::{fs::File, io::AsyncWriteExt};

    if let Ok(dir) = std::env::var("CLIENT_LOG_DIR") {
        let time = chrono::Local::now().format("%Y%m%d_%H%M%S%.3f");
        let filepath = PathBuf::from(dir).join(format!("posts_{}_{}.json", name, time));
        let mut file = File::create(filepath).await?;
        file.write_all(content.as_bytes()).await?;
    }
    Ok(())
}
