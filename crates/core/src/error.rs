use thiserror::Error;

#[derive(Error, Debug)]
pub enum Vid2DocError {
    #[error("Invalid argument {name}: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error("{provider} unavailable: {reason}")]
    ProviderUnavailable {
        provider: &'static str,
        reason: String,
    },

    #[error("Stage mismatch: {drafts} section drafts but {frame_lists} frame lists")]
    Mismatch { drafts: usize, frame_lists: usize },

    #[error("Background task failed: {0}")]
    TaskFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
}

impl Vid2DocError {
    pub fn provider(provider: &'static str, reason: impl Into<String>) -> Self {
        Vid2DocError::ProviderUnavailable {
            provider,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Vid2DocError>;

/// Reject zero, negative and NaN durations.
pub fn ensure_positive(name: &'static str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        return Ok(());
    }

    Err(Vid2DocError::InvalidArgument {
        name,
        reason: format!("must be a positive number of seconds, got {value}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_positive_accepts_positive() {
        assert!(ensure_positive("interval", 0.5).is_ok());
    }

    #[test]
    fn test_ensure_positive_rejects_zero_negative_nan() {
        for value in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = ensure_positive("interval", value).unwrap_err();
            assert!(matches!(
                err,
                Vid2DocError::InvalidArgument {
                    name: "interval",
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_provider_error_message_names_provider() {
        let err = Vid2DocError::provider("yt-dlp", "exit status 1");
        assert_eq!(err.to_string(), "yt-dlp unavailable: exit status 1");
    }
}
