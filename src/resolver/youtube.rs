/// Video lookup through the YouTube search results page
use super::{FetchedPage, HttpFetcher, LookupOutcome, PageFetcher, VideoIdExtractor, VideoReference, VideoResolver};
use crate::config::SearchConfig;
use crate::error::LookupError;
use async_trait::async_trait;
use tracing::{debug, warn};

/// Resolver that scrapes the first video id off a search results page
pub struct YouTubeSearchResolver<F: PageFetcher> {
    fetcher: F,
    extractor: VideoIdExtractor,
    config: SearchConfig,
}

impl YouTubeSearchResolver<HttpFetcher> {
    /// Resolver using the HTTP client described by `config`
    pub fn from_config(config: SearchConfig) -> Result<Self, LookupError> {
        let fetcher = HttpFetcher::new(config.request_timeout_seconds, &config.user_agent)?;
        Ok(Self::new(fetcher, config))
    }
}

impl<F: PageFetcher> YouTubeSearchResolver<F> {
    pub fn new(fetcher: F, config: SearchConfig) -> Self {
        Self {
            fetcher,
            extractor: VideoIdExtractor::new(),
            config,
        }
    }

    /// Search page URL for `query`, with the bias phrase appended
    pub fn search_url(&self, query: &str) -> String {
        let mut terms = encode_terms(query);
        let bias = encode_terms(&self.config.bias_phrase);
        if !bias.is_empty() {
            if !terms.is_empty() {
                terms.push('+');
            }
            terms.push_str(&bias);
        }

        let separator = if self.config.endpoint.contains('?') { '&' } else { '?' };
        format!(
            "{}{}{}={}",
            self.config.endpoint, separator, self.config.query_param, terms
        )
    }

    /// Turn a fetched page into an outcome
    fn interpret(&self, page: &FetchedPage) -> LookupOutcome {
        if !page.is_success() {
            return LookupOutcome::TransientError(LookupError::Status(page.status));
        }

        debug!(
            "{} candidate video ids on results page",
            self.extractor.all_ids(&page.body).len()
        );
        match self.extractor.first_id(&page.body) {
            Some(video_id) => {
                LookupOutcome::Found(VideoReference::from_id(&self.config.video_base_url, video_id))
            }
            None => LookupOutcome::NotFound,
        }
    }
}

#[async_trait]
impl<F: PageFetcher> VideoResolver for YouTubeSearchResolver<F> {
    async fn search(&self, query: &str) -> LookupOutcome {
        let url = self.search_url(query);
        debug!("Search URL: {}", url);

        let outcome = match self.fetcher.fetch(&url).await {
            Ok(page) => self.interpret(&page),
            Err(e) => LookupOutcome::TransientError(e),
        };

        if let LookupOutcome::TransientError(ref e) = outcome {
            warn!("Error searching for {}: {}", query, e);
        }
        outcome
    }
}

/// Spaces become `+`; everything else is percent-encoded
fn encode_terms(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }
    text.split(' ')
        .map(|word| urlencoding::encode(word).into_owned())
        .collect::<Vec<_>>()
        .join("+")
}
