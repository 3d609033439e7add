//! Crate-wide error type, for callers that drive the whole pipeline and want
//! a single error to bubble up.

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Clip(#[from] crate::clip::Error),
    #[error(transparent)]
    Config(#[from] crate::config::Error),
    #[error(transparent)]
    Provider(#[from] crate::provider::Error),
    #[error(transparent)]
    Cache(#[from] crate::cache::Error),
}
