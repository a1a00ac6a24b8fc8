use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("unable to save form data - no id, name or index found")]
    UnresolvableForm,

    #[error("invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },

    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error("invalid options: {0}")]
    Options(#[from] serde_json::Error),
}

impl FormError {
    pub(crate) fn selector(selector: &str, reason: impl Into<String>) -> Self {
        FormError::Selector {
            selector: selector.to_string(),
            reason: reason.into(),
        }
    }
}

/// Failures reported by a [`Storage`](crate::services::storage::Storage) backend.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StorageError {
    #[error("storage is not available")]
    Unavailable,

    #[error("storage operation on `{key}` failed: {message}")]
    Operation { key: String, message: String },
}
