//! Bounded-concurrency series fetching.
//!
//! A listing failure aborts the whole operation; a detail failure only
//! drops that one series. Partial data still produces a useful report,
//! missing listings do not.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::models::{GameTitle, MatchRecord};

use super::{FetchError, SeriesSource};

/// Fetches recent series for a team with a cap on in-flight detail requests.
#[derive(Clone)]
pub struct MatchFetcher {
    source: Arc<dyn SeriesSource>,
    permits: Arc<Semaphore>,
}

impl MatchFetcher {
    pub fn new(source: Arc<dyn SeriesSource>, concurrency: usize) -> Self {
        Self {
            source,
            permits: Arc::new(Semaphore::new(concurrency.max(1))),
        }
    }

    /// List the team's most recent series and fetch their states.
    ///
    /// Returns decoded records in listing order. Series whose detail fetch
    /// fails are skipped with a warning; the listing itself failing is an
    /// error.
    pub async fn recent_matches(
        &self,
        team_id: &str,
        limit: usize,
        title: GameTitle,
    ) -> Result<Vec<MatchRecord>, FetchError> {
        let ids = self
            .source
            .list_series_by_team(team_id, limit, title)
            .await?;

        info!(team_id, count = ids.len(), "fetched series listing");
        Ok(self.fetch_series(&ids).await)
    }

    /// Fetch and decode a batch of series states concurrently.
    pub async fn fetch_series(&self, series_ids: &[String]) -> Vec<MatchRecord> {
        let mut tasks = JoinSet::new();

        for (index, series_id) in series_ids.iter().enumerate() {
            let source = Arc::clone(&self.source);
            let permits = Arc::clone(&self.permits);
            let series_id = series_id.clone();

            tasks.spawn(async move {
                // Closed only on runtime shutdown.
                let Ok(_permit) = permits.acquire().await else {
                    return (index, None);
                };

                match source.series_state(&series_id).await {
                    Ok(state) => (index, Some(MatchRecord::from_state(&series_id, &state))),
                    Err(err) => {
                        warn!(series_id = %series_id, error = %err, "skipping series, detail fetch failed");
                        (index, None)
                    }
                }
            });
        }

        let mut slots: Vec<Option<MatchRecord>> = vec![None; series_ids.len()];
        while let Some(joined) = tasks.join_next().await {
            if let Ok((index, record)) = joined {
                slots[index] = record;
            }
        }

        slots.into_iter().flatten().collect()
    }
}
