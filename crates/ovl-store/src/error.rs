/// Errors surfaced by a `DocumentStore`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid user id `{0}`")]
    InvalidUser(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),

    /// The backing service refused or failed the request.
    #[error("store backend error: {0}")]
    Backend(String),
}
