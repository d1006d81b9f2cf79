use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::fmt;

use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::json;

use super::config::RankingFilters;
use super::order::RankingOrder;
use super::service::{RankingRepository, RankingRequest, RankingService, RankingServiceError};
use crate::workflows::club::{ClubId, RepositoryError, UserId};

/// Query string accepted by the ranking endpoint.
///
/// `members` may be repeated (`members=ana&members=bo`) and each value may hold a comma
/// separated id list. Other keys keep their last value.
#[derive(Debug, Default)]
pub struct RankingQuery {
    pub members: Vec<String>,
    pub exclude_not_present: Option<String>,
    pub max_duration: Option<String>,
    pub order: Option<RankingOrder>,
}

impl<'de> Deserialize<'de> for RankingQuery {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RankingQueryVisitor)
    }
}

struct RankingQueryVisitor;

impl<'de> Visitor<'de> for RankingQueryVisitor {
    type Value = RankingQuery;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ranking query parameters")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut query = RankingQuery::default();
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "members" => query.members.push(map.next_value()?),
                "exclude_not_present" => query.exclude_not_present = Some(map.next_value()?),
                "max_duration" => query.max_duration = Some(map.next_value()?),
                "order" => query.order = Some(map.next_value()?),
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(query)
    }
}

impl RankingQuery {
    fn into_request(self, club_id: ClubId) -> RankingRequest {
        let participants = self
            .members
            .iter()
            .flat_map(|value| value.split(','))
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| UserId(id.to_string()))
            .collect();

        RankingRequest {
            club_id,
            participants,
            filters: RankingFilters {
                exclude_not_present: self.exclude_not_present,
                max_duration: self.max_duration,
            },
            order: self.order.unwrap_or_default(),
        }
    }
}

/// Router builder exposing the ranking endpoint.
pub fn ranking_router<R>(service: Arc<RankingService<R>>) -> Router
where
    R: RankingRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/clubs/:club_id/ranking",
            get(ranking_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn ranking_handler<R>(
    State(service): State<Arc<RankingService<R>>>,
    Path(club_id): Path<String>,
    Query(query): Query<RankingQuery>,
) -> Response
where
    R: RankingRepository + 'static,
{
    let request = query.into_request(ClubId(club_id));
    match service.rank(request) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(RankingServiceError::Repository(error @ RepositoryError::NotFound { .. })) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
