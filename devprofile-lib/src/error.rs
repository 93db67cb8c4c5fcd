#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Validation error")]
    Validation(Vec<String>),
    #[error("{0}")]
    BadRequest(String),
    #[error("Profile not found")]
    NotFound,
    #[error("{0}")]
    Conflict(String),
    #[error("Error in sled storage layer")]
    Storage {
        #[from]
        source: sled::Error,
    },
    #[error("Stored profile could not be encoded or decoded")]
    Encoding {
        #[from]
        source: bincode::Error,
    },
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ProfileError {
    pub fn already_exists() -> Self {
        ProfileError::Conflict("Profile already exists".to_string())
    }

    /// True for failures the caller did not cause.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            ProfileError::Storage { .. } | ProfileError::Encoding { .. } | ProfileError::Internal(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ProfileError>;
