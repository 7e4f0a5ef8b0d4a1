use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

use crate::config::SourceSpec;
use crate::sources::{validate_csv_body, FetchError, SheetSource};

/// A SheetSource that serves pre-loaded CSV bodies, for offline runs and
/// tests. Keys marked failing return a transport error.
#[derive(Debug, Clone, Default)]
pub struct StaticSheetSource {
    bodies: HashMap<String, String>,
    failing: HashSet<String>,
}

impl StaticSheetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, key: &str, body: &str) -> Self {
        self.bodies.insert(key.to_string(), body.to_string());
        self
    }

    pub fn failing(mut self, key: &str) -> Self {
        self.failing.insert(key.to_string());
        self
    }

    /// Load every `<key>.csv` file in `dir`.
    pub fn from_dir(dir: &std::path::Path) -> anyhow::Result<Self> {
        let mut source = Self::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            if let Some(key) = path.file_stem().and_then(|s| s.to_str()) {
                let body = std::fs::read_to_string(&path)?;
                source.bodies.insert(key.to_string(), body);
            }
        }
        Ok(source)
    }
}

#[async_trait]
impl SheetSource for StaticSheetSource {
    async fn fetch_csv(&self, spec: &SourceSpec) -> Result<String, FetchError> {
        if self.failing.contains(&spec.key) {
            return Err(FetchError::Transport {
                source_key: spec.key.clone(),
                message: "simulated failure".to_string(),
            });
        }
        match self.bodies.get(&spec.key) {
            Some(body) => validate_csv_body(&spec.key, body.clone()),
            None => Err(FetchError::Missing {
                source_key: spec.key.clone(),
            }),
        }
    }
}
