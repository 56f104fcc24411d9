use thiserror::Error;

#[derive(Error, Debug)]
pub enum KVError {
    /// The key belongs to the seeded file layer.
    #[error("key is read-only: {0}")]
    ReadOnly(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("seed file error: {0}")]
    Seed(String),
}
