/// Video lookup for exercises
///
/// A resolver turns a free-text query into at most one video link by fetching a
/// search results page and pulling the first embedded video id out of the raw text.

pub mod extract;
pub mod fetch;
pub mod youtube;

pub use extract::VideoIdExtractor;
pub use fetch::{FetchedPage, HttpFetcher, PageFetcher};
pub use youtube::YouTubeSearchResolver;

use crate::error::LookupError;
use async_trait::async_trait;
use std::fmt;

/// Link to a presumed tutorial video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoReference(String);

impl VideoReference {
    /// Join a base such as `https://www.youtube.com/watch?v=` with an extracted id
    pub fn from_id(base_url: &str, video_id: &str) -> Self {
        Self(format!("{}{}", base_url, video_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for VideoReference {
    fn from(url: String) -> Self {
        Self(url)
    }
}

impl fmt::Display for VideoReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of a single lookup
#[derive(Debug, Clone)]
pub enum LookupOutcome {
    Found(VideoReference),
    NotFound,
    /// The lookup itself failed; says nothing about whether a video exists
    TransientError(LookupError),
}

impl LookupOutcome {
    /// Collapse to "link or nothing"; failures read the same as no match
    pub fn into_reference(self) -> Option<VideoReference> {
        match self {
            LookupOutcome::Found(reference) => Some(reference),
            LookupOutcome::NotFound | LookupOutcome::TransientError(_) => None,
        }
    }
}

/// Anything that can look up a tutorial video for a query
#[async_trait]
pub trait VideoResolver: Send + Sync {
    async fn search(&self, query: &str) -> LookupOutcome;
}
