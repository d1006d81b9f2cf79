//! End-to-end notification scenarios over the sample club snapshot: grouping the inbox,
//! following a message and clearing the counter.

mod common {
    use std::sync::Arc;

    use chrono::{DateTime, TimeZone, Utc};
    use film_democracy::workflows::club::{ClubSnapshot, SharedSnapshot, UserId};
    use film_democracy::workflows::notifications::NotificationService;

    const SNAPSHOT: &str = include_str!("../../../fixtures/club_snapshot.json");

    pub(super) fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 18, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    pub(super) fn vic() -> UserId {
        UserId("vic".to_string())
    }

    pub(super) fn store() -> Arc<SharedSnapshot> {
        let snapshot = ClubSnapshot::from_reader(SNAPSHOT.as_bytes()).expect("fixture parses");
        Arc::new(SharedSnapshot::new(snapshot))
    }

    pub(super) fn service(
        store: Arc<SharedSnapshot>,
        max_messages: usize,
    ) -> Arc<NotificationService<SharedSnapshot>> {
        Arc::new(NotificationService::new(store, max_messages))
    }
}

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use film_democracy::workflows::club::ClubId;
use film_democracy::workflows::notifications::{
    notification_router, DispatchRequest, Locator, NotificationId,
};
use tower::ServiceExt;

use common::*;

#[test]
fn inbox_groups_the_club_activity() {
    let inbox = service(store(), 50)
        .inbox(&vic(), now())
        .expect("inbox builds");

    let summary: Vec<(String, usize, &str)> = inbox
        .messages
        .iter()
        .map(|message| {
            (
                message.kind.code(),
                message.counter,
                message.time_ago.as_str(),
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("meetorgan".to_string(), 0, "30 minutes"),
            ("commfilms".to_string(), 2, "40 minutes"),
            ("addedfilm".to_string(), 0, "1 hour"),
            ("addedfilms".to_string(), 2, "1 hour"),
            ("seenfilm".to_string(), 0, "4 days"),
            ("joined_self".to_string(), 0, "9 days"),
        ]
    );
    assert_eq!(inbox.unread_count, 6);
    assert_eq!(
        inbox.messages[1].image_url.as_deref(),
        Some("https://posters.example/alien.jpg")
    );
    assert_eq!(
        inbox.messages[5].image_url.as_deref(),
        Some("/media/clubs/00042/logo.png")
    );
}

#[test]
fn message_cap_keeps_the_newest() {
    let inbox = service(store(), 2)
        .inbox(&vic(), now())
        .expect("inbox builds");

    assert_eq!(inbox.messages.len(), 2);
    assert_eq!(inbox.messages[0].kind.code(), "meetorgan");
}

#[test]
fn following_a_message_marks_it_read() {
    let store = store();
    let service = service(store.clone(), 50);
    let inbox = service.inbox(&vic(), now()).expect("inbox builds");
    let merged = inbox
        .messages
        .iter()
        .find(|message| message.kind.code() == "addedfilms")
        .expect("merged message present");

    let outcome = service
        .dispatch(
            &vic(),
            DispatchRequest {
                kind: merged.kind,
                club_id: merged.club_id.clone(),
                object_id: merged.object_id.clone(),
                notification_ids: merged.notification_ids.clone(),
            },
        )
        .expect("dispatch succeeds");

    assert_eq!(
        outcome.locator,
        Locator::CandidateFilms {
            club_id: ClubId("00042".to_string())
        }
    );
    assert_eq!(outcome.marked, 2);

    let inbox = service.inbox(&vic(), now()).expect("inbox builds");
    assert_eq!(inbox.unread_count, 4);
}

#[test]
fn other_members_notifications_cannot_be_dispatched() {
    let service = service(store(), 50);

    let result = service.dispatch(
        &vic(),
        DispatchRequest {
            kind: "left".parse().expect("known type"),
            club_id: Some(ClubId("00042".to_string())),
            object_id: None,
            notification_ids: vec![NotificationId("n9".to_string())],
        },
    );

    assert!(result.is_err());
}

#[tokio::test]
async fn clearing_the_inbox_over_http() {
    let store = store();
    let router = notification_router(service(store.clone(), 50));

    let response = router
        .clone()
        .oneshot(
            Request::post("/api/v1/users/vic/notifications/read")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(
            Request::post("/api/v1/users/vic/notifications/dispatch")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"type":"seenfilm","club_id":"00042","object_id":"f4"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/club/00042/film/00004/stalker/"
    );

    let unread = store
        .snapshot()
        .notifications
        .iter()
        .filter(|ntf| ntf.recipient.0 == "vic" && !ntf.read)
        .count();
    assert_eq!(unread, 0);
}
