use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[allow(clippy::enum_variant_names)]
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid payload at `{path}`: {source}")]
    PayloadError {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("IO Error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Network Error: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("Cannot parse URL: {0}")]
    UrlError(#[from] url::ParseError),
    #[error("Parsing error: {0}")]
    ParsingError(#[from] chirp_util::ParsingError),
}

impl From<serde_path_to_error::Error<serde_json::Error>> for Error {
    fn from(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let path = err.path().to_string();
        Error::PayloadError {
            path,
            source: err.into_inner(),
        }
    }
}
