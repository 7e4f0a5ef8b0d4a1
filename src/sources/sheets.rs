use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::{Config, SourceSpec};
use crate::sources::{validate_csv_body, FetchError, SheetSource};

/// Fetches published spreadsheet tabs as CSV over HTTP.
pub struct HttpSheetSource {
    client: Client,
    cfg: Config,
}

impl HttpSheetSource {
    pub fn new(cfg: &Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                warn!("HTTP client build failed ({}); falling back to defaults without timeout", e);
                Client::new()
            });
        Self {
            client,
            cfg: cfg.clone(),
        }
    }
}

#[async_trait]
impl SheetSource for HttpSheetSource {
    async fn fetch_csv(&self, spec: &SourceSpec) -> Result<String, FetchError> {
        if spec.url.is_none() && self.cfg.sheet_base_url.is_empty() {
            return Err(FetchError::Missing {
                source_key: spec.key.clone(),
            });
        }
        let url = self.cfg.source_url(spec);
        debug!("Fetching {} from {}", spec.key, url);

        let transport = |e: reqwest::Error| FetchError::Transport {
            source_key: spec.key.clone(),
            message: e.to_string(),
        };

        let resp = self.client.get(&url).send().await.map_err(transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                source_key: spec.key.clone(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(transport)?;
        validate_csv_body(&spec.key, body)
    }
}
