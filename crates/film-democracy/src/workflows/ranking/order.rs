use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use super::engine::RankingResult;

/// Presentation orders for a computed ranking.
///
/// Every order is a stable sort, so ties keep the engine's order (the order films were
/// supplied in).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingOrder {
    /// Highest points first; vetoed films end up last under the standard table.
    #[default]
    Points,
    Title,
    Duration,
}

impl RankingOrder {
    pub fn sort(self, results: &mut [RankingResult]) {
        match self {
            RankingOrder::Points => results.sort_by_key(|result| Reverse(result.points)),
            RankingOrder::Title => {
                results.sort_by_cached_key(|result| result.film.title.to_lowercase())
            }
            RankingOrder::Duration => results.sort_by_key(|result| result.film.duration_in_mins()),
        }
    }
}

pub fn sort_ranking(mut results: Vec<RankingResult>, order: RankingOrder) -> Vec<RankingResult> {
    order.sort(&mut results);
    results
}
