use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::club::{
    Club, ClubId, ClubSnapshot, Film, FilmId, Invitation, Meeting, Member, SharedSnapshot, UserId,
};
use crate::workflows::notifications::{
    Notification, NotificationId, NotificationKind, NotificationService,
};

pub(super) const CLUB: &str = "00042";
pub(super) const VIEWER: &str = "vic";

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 18, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn club_id() -> ClubId {
    ClubId(CLUB.to_string())
}

pub(super) fn viewer() -> UserId {
    UserId(VIEWER.to_string())
}

pub(super) fn member(id: &str) -> Member {
    Member {
        id: UserId(id.to_string()),
        username: id.to_string(),
        profile_image: Some(format!("/media/{id}.png")),
    }
}

pub(super) fn film(id: &str, title: &str) -> Film {
    Film {
        id: FilmId(id.to_string()),
        public_id: format!("0000{}", id.trim_start_matches('f')),
        club_id: club_id(),
        title: title.to_string(),
        slug: title.to_lowercase().replace(' ', "-"),
        proposed_by: member("ana"),
        seen: false,
        duration: "120".to_string(),
        poster_url: Some(format!("https://posters.example/{id}.jpg")),
        created_at: now() - Duration::days(30),
    }
}

pub(super) fn records() -> ClubSnapshot {
    ClubSnapshot {
        clubs: vec![Club {
            id: club_id(),
            name: "Cine Forum".to_string(),
            logo_image: Some("/media/club.png".to_string()),
        }],
        members: vec![member("ana"), member("bo"), member(VIEWER)],
        films: vec![
            film("f1", "Alien"),
            film("f2", "Heat"),
            film("f3", "Stalker"),
            film("f4", "Paris Texas"),
        ],
        meetings: vec![Meeting {
            id: "m1".to_string(),
            club_id: club_id(),
            name: "Friday screening".to_string(),
        }],
        invitations: vec![Invitation {
            id: "inv1".to_string(),
            club_id: club_id(),
        }],
        ..ClubSnapshot::default()
    }
}

/// Notification for the viewer, `minutes_ago` before [`now`].
pub(super) fn notification(
    id: &str,
    kind: NotificationKind,
    activator: &str,
    object_id: Option<&str>,
    minutes_ago: i64,
) -> Notification {
    Notification {
        id: NotificationId(id.to_string()),
        kind,
        activator: member(activator),
        club_id: Some(club_id()),
        object_id: object_id.map(str::to_string),
        recipient: viewer(),
        read: false,
        created_at: now() - Duration::minutes(minutes_ago),
    }
}

pub(super) fn read(mut notification: Notification) -> Notification {
    notification.read = true;
    notification
}

pub(super) fn ids(values: &[&str]) -> Vec<NotificationId> {
    values
        .iter()
        .map(|id| NotificationId(id.to_string()))
        .collect()
}

pub(super) fn stored_notifications() -> Vec<Notification> {
    vec![
        notification("n1", NotificationKind::AddedFilm, "ana", Some("f1"), 30),
        notification("n2", NotificationKind::AddedFilm, "ana", Some("f2"), 20),
        notification("n3", NotificationKind::SeenFilm, "bo", Some("f3"), 10),
        read(notification("n4", NotificationKind::Joined, "bo", Some("bo"), 60 * 25)),
    ]
}

pub(super) fn shared_store() -> Arc<SharedSnapshot> {
    let mut snapshot = records();
    snapshot.notifications = stored_notifications();
    Arc::new(SharedSnapshot::new(snapshot))
}

pub(super) fn build_service() -> (Arc<NotificationService<SharedSnapshot>>, Arc<SharedSnapshot>) {
    let store = shared_store();
    let service = Arc::new(NotificationService::new(store.clone(), 50));
    (service, store)
}

pub(super) async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("body is json")
}
