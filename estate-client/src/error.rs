use std::fmt;

/// Fallback text when the backend rejects a request without a message.
pub const GENERIC_FAILURE: &str = "Operation failed";
pub const SESSION_EXPIRED: &str = "Session expired, please log in again";
pub const FORBIDDEN: &str = "You do not have permission to do that";
pub const NETWORK_FAILURE: &str = "Network error, please try again";
pub const MISSING_HOUSE_NUMBER: &str = "Your account has no house number";
pub const STORAGE_FAILURE: &str = "Unable to save login state";

/// A field that failed local checks before anything was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(ValidationError),
    #[error("{0}")]
    Logical(String),
    #[error("session expired")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    /// Refused locally because the screen is reserved for administrators.
    #[error("forbidden")]
    NotPermitted,
    #[error("network error: {0}")]
    Transport(String),
    #[error("invalid response: {0}")]
    Decode(String),
    #[error("{0}")]
    Unsupported(&'static str),
    #[error("missing house number")]
    MissingHouseNumber,
    #[error("session store: {0}")]
    Storage(String),
}

impl ApiError {
    /// The text shown to the user for this failure.
    ///
    /// `None` means the failure was already surfaced where it happened
    /// (401 and 403 are reported by the client itself).
    pub fn notice(&self) -> Option<String> {
        match self {
            Self::Unauthorized | Self::Forbidden => None,
            Self::Validation(err) => Some(err.message.clone()),
            Self::Logical(msg) => Some(msg.clone()),
            Self::NotPermitted => Some(FORBIDDEN.into()),
            Self::Transport(_) => Some(NETWORK_FAILURE.into()),
            Self::Decode(_) => Some(GENERIC_FAILURE.into()),
            Self::Unsupported(what) => Some(format!("{what} is not supported yet")),
            Self::MissingHouseNumber => Some(MISSING_HOUSE_NUMBER.into()),
            Self::Storage(_) => Some(STORAGE_FAILURE.into()),
        }
    }
}

impl From<eyre::Report> for ApiError {
    fn from(value: eyre::Report) -> Self {
        Self::Storage(format!("{value:#}"))
    }
}

impl From<ValidationError> for ApiError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

pub type ClientResult<T> = std::result::Result<T, ApiError>;
