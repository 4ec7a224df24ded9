use thiserror::Error;

/// The user's feature vector cannot be scored.
///
/// Raised before any item is scored; a ranking pass never returns partial
/// results.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInput {
    #[error("missing value for feature '{0}'")]
    MissingFeature(String),

    #[error("value for feature '{key}' is not a finite number: {value}")]
    NonFinite { key: String, value: f64 },

    #[error("unknown feature '{0}'")]
    UnknownFeature(String),

    #[error("invalid assignment '{0}': expected key=value")]
    MalformedAssignment(String),
}

impl InvalidInput {
    /// Feature key the error refers to, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            InvalidInput::MissingFeature(key)
            | InvalidInput::UnknownFeature(key)
            | InvalidInput::NonFinite { key, .. } => Some(key),
            InvalidInput::MalformedAssignment(_) => None,
        }
    }
}
