/// Exercise catalog model and JSON persistence
///
/// Records are kept as raw JSON objects so that every field the catalog carries,
/// not just the ones this tool reads, is written back in its original order.

pub mod store;

pub use store::CatalogStore;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const NAME_FIELD: &str = "name";
const VIDEO_URL_FIELD: &str = "videoUrl";

/// A single exercise entry of the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Exercise {
    fields: Map<String, Value>,
}

impl Exercise {
    pub fn new(name: &str) -> Self {
        let mut fields = Map::new();
        fields.insert(NAME_FIELD.to_string(), Value::String(name.to_string()));
        Self { fields }
    }

    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn with_video_url(mut self, url: &str) -> Self {
        self.set_video_url(url);
        self
    }

    /// Exercise name, if present and textual
    pub fn name(&self) -> Option<&str> {
        self.fields.get(NAME_FIELD).and_then(Value::as_str)
    }

    /// Current video link; `null` and non-string values read as absent
    pub fn video_url(&self) -> Option<&str> {
        self.fields.get(VIDEO_URL_FIELD).and_then(Value::as_str)
    }

    pub fn set_video_url(&mut self, url: &str) {
        self.fields
            .insert(VIDEO_URL_FIELD.to_string(), Value::String(url.to_string()));
    }

    /// True when the link is missing, empty, or contains the placeholder marker
    pub fn needs_video(&self, placeholder_marker: &str) -> bool {
        match self.video_url() {
            None => true,
            Some(url) => url.is_empty() || url.contains(placeholder_marker),
        }
    }
}
