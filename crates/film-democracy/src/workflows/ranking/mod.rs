//! Film ranking: scoring policy, eligibility filters, vote partitioning and warnings.
//!
//! The engine is a pure function of the films, ballots and participants handed to it; the
//! service wraps it with record store access and request parsing.

pub mod config;
pub mod engine;
pub mod export;
pub mod order;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use config::{FilterWarning, RankingConfig, RankingFilters, DEFAULT_MAX_DURATION_MINUTES};
pub use engine::{
    compute_ranking, RankingEngine, RankingResult, RankingWarning, RankingWarningKind,
};
pub use export::write_ranking_csv;
pub use order::{sort_ranking, RankingOrder};
pub use router::ranking_router;
pub use scoring::{ChoiceScore, Karma, PointsTable, ScoringPolicy};
pub use service::{
    RankingReport, RankingRepository, RankingRequest, RankingService, RankingServiceError,
};
