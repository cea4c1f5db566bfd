use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::catalog::{CatalogStore, Exercise};
use crate::config::{Config, TransientErrorPolicy, UpdateConfig};
use crate::error::{LookupError, Result, UpdaterError};
use crate::pacing::{Pacer, RandomDelay};
use crate::resolver::{HttpFetcher, LookupOutcome, VideoResolver, YouTubeSearchResolver};

/// Outcome of one update pass over the catalog
#[derive(Debug, Clone)]
pub struct UpdateReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Records in the catalog
    pub total: usize,
    /// Records whose link was missing or a placeholder
    pub eligible: usize,
    /// Eligible records actually searched for
    pub looked_up: usize,
    pub updated: usize,
    pub not_found: usize,
    /// Lookups that failed rather than finding nothing
    pub failed: usize,
    pub skipped_without_name: usize,
    /// Eligible records left for a later run because of the lookup limit
    pub deferred: usize,
    /// Set when the pass stopped early under the `abort` policy
    pub aborted: Option<(String, LookupError)>,
    pub dry_run: bool,
}

impl UpdateReport {
    fn new(total: usize, dry_run: bool) -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            finished_at: now,
            total,
            eligible: 0,
            looked_up: 0,
            updated: 0,
            not_found: 0,
            failed: 0,
            skipped_without_name: 0,
            deferred: 0,
            aborted: None,
            dry_run,
        }
    }

    /// Turn an aborted pass into an error
    pub fn ensure_completed(&self) -> Result<()> {
        match &self.aborted {
            Some((name, cause)) => Err(UpdaterError::Aborted {
                name: name.clone(),
                cause: cause.clone(),
            }),
            None => Ok(()),
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} exercises, {} needed a video: {} updated, {} not found, {} failed, {} without a name, {} deferred ({:.1}s)",
            self.total,
            self.eligible,
            self.updated,
            self.not_found,
            self.failed,
            self.skipped_without_name,
            self.deferred,
            (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
        )
    }
}

/// Walks the catalog in order and fills in missing video links one lookup at a time
pub struct CatalogUpdater<R: VideoResolver, P: Pacer> {
    resolver: R,
    pacer: P,
    settings: UpdateConfig,
}

impl CatalogUpdater<YouTubeSearchResolver<HttpFetcher>, RandomDelay> {
    /// Updater wired to the real search endpoint
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let resolver = YouTubeSearchResolver::from_config(config.search.clone())
            .map_err(|e| UpdaterError::Config(e.to_string()))?;
        let (min, max) = config.update.delay_range()?;

        Ok(Self::new(resolver, RandomDelay::new(min, max), config.update.clone()))
    }
}

impl<R: VideoResolver, P: Pacer> CatalogUpdater<R, P> {
    pub fn new(resolver: R, pacer: P, settings: UpdateConfig) -> Self {
        Self {
            resolver,
            pacer,
            settings,
        }
    }

    pub fn is_eligible(&self, exercise: &Exercise) -> bool {
        exercise.needs_video(&self.settings.placeholder_marker)
    }

    pub fn query_for(&self, name: &str) -> String {
        let suffix = self.settings.query_suffix.trim();
        if suffix.is_empty() {
            name.to_string()
        } else {
            format!("{} {}", name, suffix)
        }
    }

    /// Load, update, and save the catalog behind `store`.
    ///
    /// The file is written once, after the whole pass. Nothing is written in dry-run mode.
    pub async fn run(&self, store: &CatalogStore) -> Result<UpdateReport> {
        let mut exercises = store.load().await?;
        let report = self.update_all(&mut exercises).await;

        if report.dry_run {
            info!("🧪 Dry run: {} not written", store.path().display());
        } else {
            store.save(&exercises).await?;
        }

        Ok(report)
    }

    /// One sequential pass over `exercises`, mutating eligible records in place
    pub async fn update_all(&self, exercises: &mut [Exercise]) -> UpdateReport {
        let mut report = UpdateReport::new(exercises.len(), self.settings.dry_run);

        for (index, exercise) in exercises.iter_mut().enumerate() {
            if !self.is_eligible(exercise) {
                debug!("Keeping existing video for #{}", index);
                continue;
            }
            report.eligible += 1;

            if report.aborted.is_some() {
                report.deferred += 1;
                continue;
            }

            let Some(name) = exercise.name().map(str::to_string) else {
                warn!("⚠️ Skipping exercise #{} without a name", index);
                report.skipped_without_name += 1;
                continue;
            };

            if self.settings.limit.is_some_and(|limit| report.looked_up >= limit) {
                report.deferred += 1;
                continue;
            }

            if report.looked_up > 0 {
                self.pacer.pause().await;
            }
            report.looked_up += 1;

            info!("🔍 Searching for video: {}", name);
            match self.lookup(&name).await {
                LookupOutcome::Found(reference) => {
                    exercise.set_video_url(reference.as_str());
                    report.updated += 1;
                    info!("✅ Updated: {} -> {}", name, reference);
                }
                LookupOutcome::NotFound => {
                    report.not_found += 1;
                    info!("❌ Could not find video for {}", name);
                }
                LookupOutcome::TransientError(cause) => {
                    report.failed += 1;
                    if self.settings.on_transient_error == TransientErrorPolicy::Abort {
                        warn!("🛑 Stopping update pass after failure for {}", name);
                        report.aborted = Some((name, cause));
                    } else {
                        info!("❌ Could not find video for {}", name);
                    }
                }
            }
        }

        report.finished_at = Utc::now();
        info!("🎉 Updated {} exercise videos", report.updated);
        report
    }

    /// Search for `name`, retrying transient failures when the policy asks for it
    async fn lookup(&self, name: &str) -> LookupOutcome {
        let query = self.query_for(name);
        let max_retries = match self.settings.on_transient_error {
            TransientErrorPolicy::Retry => self.settings.max_retries,
            TransientErrorPolicy::Skip | TransientErrorPolicy::Abort => 0,
        };

        let mut attempt = 0;
        loop {
            match self.resolver.search(&query).await {
                LookupOutcome::TransientError(ref e) if attempt < max_retries => {
                    attempt += 1;
                    warn!("🔁 Retrying search for {} ({}/{}): {}", name, attempt, max_retries, e);
                    self.pacer.pause().await;
                }
                outcome => return outcome,
            }
        }
    }
}
