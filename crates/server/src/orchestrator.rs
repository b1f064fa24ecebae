//! # Recommendation Orchestrator
//!
//! Coordinates one recommendation request end to end:
//! 1. Resolve the user's input to a known title (fuzzy)
//! 2. Rank the most similar titles from the shared index
//! 3. Enrich every result with provider metadata, concurrently
//! 4. Return the ranked, enriched results
//!
//! Steps 1 and 2 are CPU-bound and run on the blocking pool. Enrichment is
//! optional and can never fail a request: a failed fetch yields the
//! placeholder record.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use data_loader::RowIndex;
use metadata_client::{DisplayMetadata, MetadataClient};
use recommender::{Recommendation, RecommenderIndex, TitleMatch, TitleResolver};

/// Final recommendation returned to the user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieRecommendation {
    pub rank: usize,
    pub row: RowIndex,
    pub title: String,
    pub score: f32,
    /// `None` when enrichment is disabled
    pub metadata: Option<DisplayMetadata>,
}

impl MovieRecommendation {
    fn new(rec: Recommendation, metadata: Option<DisplayMetadata>) -> Self {
        Self {
            rank: rec.rank,
            row: rec.row,
            title: rec.title,
            score: rec.score,
            metadata,
        }
    }
}

/// Outcome of one request
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationReport {
    /// Raw user input
    pub query: String,
    /// Title the input resolved to
    pub matched: TitleMatch,
    pub recommendations: Vec<MovieRecommendation>,
    pub elapsed: Duration,
}

/// Main orchestrator that coordinates resolution, ranking and enrichment
#[derive(Debug, Clone)]
pub struct RecommendationOrchestrator {
    index: Arc<RecommenderIndex>,
    resolver: TitleResolver,
    metadata: Option<MetadataClient>,
}

impl RecommendationOrchestrator {
    /// Create an orchestrator without metadata enrichment
    pub fn new(index: Arc<RecommenderIndex>, resolver: TitleResolver) -> Self {
        Self {
            index,
            resolver,
            metadata: None,
        }
    }

    /// Enable enrichment through `client`
    pub fn with_metadata(mut self, client: MetadataClient) -> Self {
        self.metadata = Some(client);
        self
    }

    pub fn index(&self) -> &Arc<RecommenderIndex> {
        &self.index
    }

    pub fn resolver(&self) -> &TitleResolver {
        &self.resolver
    }

    pub fn metadata_enabled(&self) -> bool {
        self.metadata.is_some()
    }

    /// Resolve free-text input to a catalog title.
    ///
    /// A miss surfaces as [`recommender::RecommendError::NoMatch`] inside the
    /// returned error.
    #[instrument(skip(self))]
    pub async fn resolve(&self, input: &str) -> Result<TitleMatch> {
        let index = self.index.clone();
        let resolver = self.resolver.clone();
        let input = input.to_string();

        let found = tokio::task::spawn_blocking(move || index.resolve(&resolver, &input))
            .await
            .context("Resolve task panicked")??;
        Ok(found)
    }

    /// Main entry point: resolve `input`, rank `limit` similar titles and
    /// enrich them.
    #[instrument(skip(self))]
    pub async fn get_recommendations(&self, input: &str, limit: usize) -> Result<RecommendationReport> {
        let start_time = Instant::now();

        let (matched, ranked) = self.rank(input, limit).await?;
        info!(
            "Resolved '{}' to '{}' (score {}), ranked {} titles",
            input,
            matched.title,
            matched.score,
            ranked.len()
        );

        let recommendations = self.enrich(ranked).await;

        let elapsed = start_time.elapsed();
        info!("Total time to recommend for '{}': {:.2?}", input, elapsed);

        Ok(RecommendationReport {
            query: input.to_string(),
            matched,
            recommendations,
            elapsed,
        })
    }

    /// Resolve `input` and fetch display metadata for the match
    #[instrument(skip(self))]
    pub async fn details(&self, input: &str) -> Result<(TitleMatch, DisplayMetadata)> {
        let matched = self.resolve(input).await?;
        let metadata = match &self.metadata {
            Some(client) => client.fetch_or_placeholder(&matched.title).await,
            None => DisplayMetadata::placeholder(),
        };
        Ok((matched, metadata))
    }

    /// Resolution and ranking on the blocking pool
    async fn rank(&self, input: &str, limit: usize) -> Result<(TitleMatch, Vec<Recommendation>)> {
        let index = self.index.clone();
        let resolver = self.resolver.clone();
        let input = input.to_string();

        let (matched, ranked) = tokio::task::spawn_blocking(move || {
            let matched = index.resolve(&resolver, &input)?;
            let ranked = index.recommend(&matched.title, limit)?;
            Ok::<_, recommender::RecommendError>((matched, ranked))
        })
        .await
        .context("Ranking task panicked")??;

        Ok((matched, ranked))
    }

    /// Fetch metadata for every recommendation concurrently.
    ///
    /// Output order always matches input order. Outstanding fetches are
    /// aborted if this future is dropped.
    async fn enrich(&self, ranked: Vec<Recommendation>) -> Vec<MovieRecommendation> {
        let Some(client) = &self.metadata else {
            return ranked
                .into_iter()
                .map(|rec| MovieRecommendation::new(rec, None))
                .collect();
        };

        let mut fetches = JoinSet::new();
        for (slot, rec) in ranked.iter().enumerate() {
            let client = client.clone();
            let title = rec.title.clone();
            fetches.spawn(async move { (slot, client.fetch_or_placeholder(&title).await) });
        }

        let mut metadata = vec![DisplayMetadata::placeholder(); ranked.len()];
        while let Some(joined) = fetches.join_next().await {
            match joined {
                Ok((slot, record)) => metadata[slot] = record,
                Err(e) => warn!("Metadata task failed: {}", e),
            }
        }

        let placeholders = metadata.iter().filter(|m| m.is_placeholder()).count();
        debug!(
            "Enriched {} recommendations ({} placeholders)",
            ranked.len(),
            placeholders
        );

        ranked
            .into_iter()
            .zip(metadata)
            .map(|(rec, record)| MovieRecommendation::new(rec, Some(record)))
            .collect()
    }
}
