use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("not an image file: {0}")]
    NotAnImage(String),

    #[error("invalid API base address: {0}")]
    BadBaseUrl(String),
}
