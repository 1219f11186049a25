use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Client error: {0}")]
    ClientError(#[from] posts_client::Error),
    #[error("Invalid post: {0}")]
    InvalidPost(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
