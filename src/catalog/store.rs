/// JSON file persistence for the exercise catalog
use super::Exercise;
use crate::error::{Result, UpdaterError};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Reads and rewrites the catalog document at a single path
#[derive(Debug, Clone)]
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every record of the catalog, in document order
    pub async fn load(&self) -> Result<Vec<Exercise>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(UpdaterError::malformed(&self.path, "file not found"));
            }
            Err(e) => return Err(UpdaterError::io(&self.path, e)),
        };

        let exercises = parse_catalog(&content).map_err(|reason| UpdaterError::malformed(&self.path, reason))?;

        info!("📚 Loaded {} exercises from {}", exercises.len(), self.path.display());
        Ok(exercises)
    }

    /// Overwrite the catalog with `exercises` as 2-space indented JSON.
    ///
    /// The file is written in place; an interrupted write can leave it truncated.
    pub async fn save(&self, exercises: &[Exercise]) -> Result<()> {
        let content = serde_json::to_string_pretty(exercises)
            .map_err(|e| UpdaterError::io(&self.path, std::io::Error::other(e)))?;

        fs::write(&self.path, content)
            .await
            .map_err(|e| UpdaterError::io(&self.path, e))?;

        info!("💾 Saved {} exercises to {}", exercises.len(), self.path.display());
        Ok(())
    }
}

fn parse_catalog(content: &str) -> std::result::Result<Vec<Exercise>, String> {
    let document: Value = serde_json::from_str(content).map_err(|e| format!("invalid JSON: {}", e))?;

    let Value::Array(items) = document else {
        return Err("expected a JSON array of exercise objects".to_string());
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(fields) => Ok(Exercise::from_fields(fields)),
            other => {
                debug!("Non-object catalog entry at {}: {}", index, other);
                Err(format!("entry {} is not a JSON object", index))
            }
        })
        .collect()
}
