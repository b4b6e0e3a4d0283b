use super::envelope::{ApiError, ErrorKind};

/// Every way a backend call can fail.
///
/// The three variants map one-to-one onto the failure modes callers have to
/// handle: the request never completed, the body was not the JSON we
/// expected, or the backend answered with an error envelope.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("server returned {status}: {}", summarize(.errors))]
    Application { status: u16, errors: Vec<ApiError> },
}

impl FetchError {
    /// Errors reported by the backend, empty for transport/parse failures.
    pub fn errors(&self) -> &[ApiError] {
        match self {
            Self::Application { errors, .. } => errors,
            _ => &[],
        }
    }

    /// Status of an application failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Application { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn has_kind(&self, kind: ErrorKind) -> bool {
        self.errors().iter().any(|e| e.kind == kind)
    }
}

fn summarize(errors: &[ApiError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
