/// Exercise Video Updater
///
/// Fills in missing tutorial video links in a JSON exercise catalog by searching
/// for each exercise and keeping the first video the results page mentions.

pub mod catalog;
pub mod config;
pub mod error;
pub mod pacing;
pub mod processing;
pub mod resolver;

// Re-export main types for easy access
pub use crate::catalog::{CatalogStore, Exercise};
pub use crate::config::{Config, ConfigBuilder, TransientErrorPolicy};
pub use crate::error::{LookupError, UpdaterError};
pub use crate::pacing::{NoDelay, Pacer, RandomDelay};
pub use crate::processing::{CatalogUpdater, UpdateReport};
pub use crate::resolver::{LookupOutcome, VideoReference, VideoResolver, YouTubeSearchResolver};
