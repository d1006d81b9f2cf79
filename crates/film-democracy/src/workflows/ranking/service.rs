use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::config::{FilterWarning, RankingConfig, RankingFilters, DEFAULT_MAX_DURATION_MINUTES};
use super::engine::{RankingEngine, RankingResult};
use super::order::RankingOrder;
use super::scoring::{PointsTable, ScoringPolicy};
use crate::workflows::club::{ClubId, ClubRecords, Film, FilmId, Member, RepositoryError, UserId, Vote};

/// Record store queries the ranking needs on top of plain lookups.
pub trait RankingRepository: ClubRecords + Send + Sync {
    /// Films of the club not yet marked as seen.
    fn unseen_films(&self, club_id: &ClubId) -> Result<Vec<Film>, RepositoryError>;
    /// Every ballot cast on the given films, regardless of who cast it.
    fn votes_on(&self, films: &[FilmId]) -> Result<Vec<Vote>, RepositoryError>;
}

/// Ranking request assembled by the HTTP or CLI layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankingRequest {
    pub club_id: ClubId,
    pub participants: Vec<UserId>,
    #[serde(default)]
    pub filters: RankingFilters,
    #[serde(default)]
    pub order: RankingOrder,
}

/// Ranking results plus everything the caller needs to render them.
#[derive(Debug, Clone, Serialize)]
pub struct RankingReport {
    pub club_id: ClubId,
    pub points_table: PointsTable,
    pub config: RankingConfig,
    pub order: RankingOrder,
    pub participants: Vec<Member>,
    pub results: Vec<RankingResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filter_warnings: Vec<FilterWarning>,
}

/// Service composing the record store with the ranking engine.
pub struct RankingService<R> {
    repository: Arc<R>,
    engine: RankingEngine,
    default_max_duration: i32,
}

impl<R> RankingService<R>
where
    R: RankingRepository + 'static,
{
    pub fn new(repository: Arc<R>, table: PointsTable) -> Self {
        Self {
            repository,
            engine: RankingEngine::new(ScoringPolicy::new(table)),
            default_max_duration: DEFAULT_MAX_DURATION_MINUTES,
        }
    }

    pub fn with_default_max_duration(mut self, minutes: i32) -> Self {
        self.default_max_duration = minutes;
        self
    }

    pub fn rank(&self, request: RankingRequest) -> Result<RankingReport, RankingServiceError> {
        let RankingRequest {
            club_id,
            participants,
            filters,
            order,
        } = request;

        self.repository
            .club(&club_id)
            .ok_or_else(|| RepositoryError::not_found("club", club_id.0.clone()))?;

        let participants = participants
            .iter()
            .map(|id| {
                self.repository
                    .member(id)
                    .ok_or_else(|| RepositoryError::not_found("member", id.0.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let (config, filter_warnings) = filters.resolve(self.default_max_duration);
        let films = self.repository.unseen_films(&club_id)?;
        let film_ids: Vec<FilmId> = films.iter().map(|film| film.id.clone()).collect();
        let votes = self.repository.votes_on(&film_ids)?;

        let mut results = self.engine.compute(&films, &votes, &participants, &config);
        order.sort(&mut results);

        info!(
            club = %club_id,
            participants = participants.len(),
            candidates = films.len(),
            ranked = results.len(),
            "ranking generated"
        );

        Ok(RankingReport {
            club_id,
            points_table: self.engine.policy().table(),
            config,
            order,
            participants,
            results,
            filter_warnings,
        })
    }
}

/// Error raised by the ranking service.
#[derive(Debug, thiserror::Error)]
pub enum RankingServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
