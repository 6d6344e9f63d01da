use thiserror::Error;

/// Kinds of domain failure every storage adapter maps its backend errors onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    DuplicateKey,
    ForeignKey,
    Validation,
    Internal,
}

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Duplicate key: {message}")]
    DuplicateKey { message: String },

    #[error("Foreign key violation: {message}")]
    ForeignKey { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    /// Unknown username and wrong password are reported identically
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Operation deadline exceeded")]
    DeadlineExceeded,
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn duplicate_key(message: impl Into<String>) -> Self {
        Self::DuplicateKey {
            message: message.into(),
        }
    }

    pub fn foreign_key(message: impl Into<String>) -> Self {
        Self::ForeignKey {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Taxonomy kind, or `None` for credential and cancellation conditions
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::NotFound { .. } => Some(ErrorKind::NotFound),
            Self::DuplicateKey { .. } => Some(ErrorKind::DuplicateKey),
            Self::ForeignKey { .. } => Some(ErrorKind::ForeignKey),
            Self::Validation { .. } => Some(ErrorKind::Validation),
            Self::Internal { .. } => Some(ErrorKind::Internal),
            Self::InvalidCredentials | Self::Cancelled | Self::DeadlineExceeded => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::DuplicateKey { .. })
    }

    pub fn is_foreign_key(&self) -> bool {
        matches!(self, Self::ForeignKey { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// True for both explicit cancellation and an expired deadline
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }
}

pub fn is_not_found_error(err: &DomainError) -> bool {
    err.is_not_found()
}

pub fn is_duplicate_key_error(err: &DomainError) -> bool {
    err.is_duplicate_key()
}

pub fn is_foreign_key_error(err: &DomainError) -> bool {
    err.is_foreign_key()
}
