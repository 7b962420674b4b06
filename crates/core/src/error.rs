use serde::Serialize;
use thiserror::Error;

/// Failures that reach a view. Each maps to a calm fallback state rather
/// than a crash.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "code", content = "message", rename_all = "snake_case")]
pub enum ViewError {
    #[error("loading failed: {0}")]
    LoadingFailed(String),

    #[error("content not found: {0}")]
    ContentNotFound(String),
}

impl ViewError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::LoadingFailed(_) => "loading_failed",
            Self::ContentNotFound(_) => "content_not_found",
        }
    }

    /// Heading shown in place of the view's content.
    pub fn headline(&self) -> &'static str {
        match self {
            Self::LoadingFailed(_) => "Something went wrong",
            Self::ContentNotFound(_) => "Content Not Found",
        }
    }
}

/// JSON envelope: `{ "error": { "code": "…", "message": "…", "details": {} } }`
#[derive(Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
}

impl From<&ViewError> for ErrorEnvelope {
    fn from(e: &ViewError) -> Self {
        Self {
            error: ErrorBody {
                code: e.code().to_string(),
                message: e.to_string(),
                details: serde_json::json!({ "headline": e.headline() }),
            },
        }
    }
}
