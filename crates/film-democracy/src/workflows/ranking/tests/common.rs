use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::club::{
    Club, ClubId, ClubRecords, ClubSnapshot, Film, FilmId, Invitation, Meeting, Member,
    RepositoryError, SharedSnapshot, UserId, Vote, VoteChoice,
};
use crate::workflows::ranking::{PointsTable, RankingRepository, RankingService};

pub(super) const CLUB: &str = "00042";

pub(super) fn club_id() -> ClubId {
    ClubId(CLUB.to_string())
}

pub(super) fn member(id: &str) -> Member {
    Member {
        id: UserId(id.to_string()),
        username: id.to_string(),
        profile_image: None,
    }
}

pub(super) fn members(ids: &[&str]) -> Vec<Member> {
    ids.iter().map(|id| member(id)).collect()
}

pub(super) fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 20, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn film(id: &str, title: &str, proposer: &str, duration: &str) -> Film {
    Film {
        id: FilmId(id.to_string()),
        public_id: format!("pub-{id}"),
        club_id: club_id(),
        title: title.to_string(),
        slug: title.to_lowercase().replace(' ', "-"),
        proposed_by: member(proposer),
        seen: false,
        duration: duration.to_string(),
        poster_url: None,
        created_at: created_at(),
    }
}

pub(super) fn vote(user: &str, film: &str, choice: VoteChoice) -> Vote {
    Vote {
        user: member(user),
        film_id: FilmId(film.to_string()),
        club_id: club_id(),
        choice,
    }
}

pub(super) fn candidate_films() -> Vec<Film> {
    vec![
        film("f1", "Alien", "ana", "117 min"),
        film("f2", "Heat", "bo", "170"),
        film("f3", "Paris, Texas", "cy", "145 min"),
    ]
}

pub(super) fn ballots() -> Vec<Vote> {
    vec![
        vote("ana", "f1", VoteChoice::Yes),
        vote("bo", "f1", VoteChoice::Omg),
        vote("ana", "f2", VoteChoice::Meh),
        vote("bo", "f2", VoteChoice::Veto),
        vote("cy", "f3", VoteChoice::Omg),
        vote("ana", "f3", VoteChoice::SeenOk),
    ]
}

pub(super) fn snapshot() -> ClubSnapshot {
    ClubSnapshot {
        clubs: vec![Club {
            id: club_id(),
            name: "Cine Forum".to_string(),
            logo_image: None,
        }],
        members: members(&["ana", "bo", "cy"]),
        films: candidate_films(),
        votes: ballots().into_iter().collect(),
        ..ClubSnapshot::default()
    }
}

pub(super) fn build_service() -> Arc<RankingService<SharedSnapshot>> {
    Arc::new(RankingService::new(
        Arc::new(SharedSnapshot::new(snapshot())),
        PointsTable::Standard,
    ))
}

/// Store whose queries always fail.
pub(super) struct UnavailableRepository;

impl ClubRecords for UnavailableRepository {
    fn club(&self, id: &ClubId) -> Option<Club> {
        Some(Club {
            id: id.clone(),
            name: "Offline".to_string(),
            logo_image: None,
        })
    }

    fn member(&self, id: &UserId) -> Option<Member> {
        Some(member(&id.0))
    }

    fn film(&self, _id: &FilmId) -> Option<Film> {
        None
    }

    fn meeting(&self, _id: &str) -> Option<Meeting> {
        None
    }

    fn invitation(&self, _id: &str) -> Option<Invitation> {
        None
    }
}

impl RankingRepository for UnavailableRepository {
    fn unseen_films(&self, _club_id: &ClubId) -> Result<Vec<Film>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn votes_on(&self, _films: &[FilmId]) -> Result<Vec<Vote>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("body is json")
}

pub(super) async fn assert_error_response(response: Response, status: StatusCode) {
    assert_eq!(response.status(), status);
    let body = json_body(response).await;
    assert!(body.get("error").and_then(Value::as_str).is_some());
}
