use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("no player resource for id {id}")]
    NotFound { id: String },

    #[error("player resource {id} does not match the schema: {source}")]
    Decode {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, StoreError::Decode { .. })
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
