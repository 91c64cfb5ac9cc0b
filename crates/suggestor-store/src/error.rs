use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Duplicate suggestion id: {0}")]
    DuplicateId(String),
}
