use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Could not read catalog file: {0}")]
    ReadError(String),
    #[error("Could not deserialize catalog JSON: {0}")]
    JsonError(String),
}
