pub mod fixture;
pub mod sheets;

pub use fixture::StaticSheetSource;
pub use sheets::HttpSheetSource;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::config::SourceSpec;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    #[error("{source_key}: request failed: {message}")]
    Transport { source_key: String, message: String },
    #[error("{source_key}: HTTP {status}")]
    Status { source_key: String, status: u16 },
    #[error("{source_key}: received HTML instead of CSV (check sharing settings)")]
    HtmlResponse { source_key: String },
    #[error("{source_key}: empty response")]
    Empty { source_key: String },
    #[error("{source_key}: no data configured")]
    Missing { source_key: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FaultKind {
    /// Network, permission or configuration failure.
    Transport,
    /// A response arrived but is not usable CSV.
    Shape,
}

impl FetchError {
    pub fn kind(&self) -> FaultKind {
        match self {
            FetchError::HtmlResponse { .. } | FetchError::Empty { .. } => FaultKind::Shape,
            _ => FaultKind::Transport,
        }
    }

    /// Short message for the affected view's "no data" state.
    pub fn user_message(&self) -> &'static str {
        match self.kind() {
            FaultKind::Transport => "データを取得できませんでした",
            FaultKind::Shape => "シートの公開設定を確認してください",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceFault {
    pub key: String,
    pub kind: FaultKind,
    pub message: String,
    pub user_message: &'static str,
}

impl SourceFault {
    pub fn from_error(key: &str, err: &FetchError) -> Self {
        Self {
            key: key.to_string(),
            kind: err.kind(),
            message: err.to_string(),
            user_message: err.user_message(),
        }
    }
}

/// Anything that can hand back raw CSV text for a configured source.
#[async_trait]
pub trait SheetSource: Send + Sync {
    async fn fetch_csv(&self, spec: &SourceSpec) -> Result<String, FetchError>;
}

/// Reject HTML error pages and blank bodies before they reach the parser.
pub fn validate_csv_body(source_key: &str, body: String) -> Result<String, FetchError> {
    let trimmed = body.trim_start_matches('\u{feff}').trim();
    if trimmed.is_empty() {
        return Err(FetchError::Empty {
            source_key: source_key.to_string(),
        });
    }
    if trimmed.starts_with('<') {
        return Err(FetchError::HtmlResponse {
            source_key: source_key.to_string(),
        });
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_body_is_a_shape_fault() {
        let err = validate_csv_body("Sectors", "  <!DOCTYPE html><html>".to_string()).unwrap_err();
        assert_eq!(
            err,
            FetchError::HtmlResponse {
                source_key: "Sectors".to_string()
            }
        );
        assert_eq!(err.kind(), FaultKind::Shape);
    }

    #[test]
    fn blank_body_is_empty() {
        let err = validate_csv_body("Indices", "\u{feff} \n".to_string()).unwrap_err();
        assert!(matches!(err, FetchError::Empty { .. }));
    }

    #[test]
    fn csv_passes_through_unchanged() {
        let body = "\u{feff}Ticker\n7203\n".to_string();
        assert_eq!(validate_csv_body("x", body.clone()).unwrap(), body);
    }

    #[test]
    fn transport_and_shape_messages_differ() {
        let t = FetchError::Status { source_key: "a".into(), status: 403 };
        let s = FetchError::Empty { source_key: "a".into() };
        assert_ne!(t.user_message(), s.user_message());
        assert_eq!(SourceFault::from_error("a", &t).message, "a: HTTP 403");
    }
}
