use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde_json::json;

use super::service::{
    DispatchRequest, NotificationRepository, NotificationService, NotificationServiceError,
};
use crate::workflows::club::{RepositoryError, UserId};

/// Router builder exposing the inbox, dispatch and clear endpoints.
pub fn notification_router<R>(service: Arc<NotificationService<R>>) -> Router
where
    R: NotificationRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/users/:user_id/notifications",
            get(inbox_handler::<R>),
        )
        .route(
            "/api/v1/users/:user_id/notifications/dispatch",
            post(dispatch_handler::<R>),
        )
        .route(
            "/api/v1/users/:user_id/notifications/read",
            post(mark_all_read_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn inbox_handler<R>(
    State(service): State<Arc<NotificationService<R>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: NotificationRepository + 'static,
{
    match service.inbox(&UserId(user_id), Utc::now()) {
        Ok(inbox) => (StatusCode::OK, axum::Json(inbox)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn dispatch_handler<R>(
    State(service): State<Arc<NotificationService<R>>>,
    Path(user_id): Path<String>,
    axum::Json(request): axum::Json<DispatchRequest>,
) -> Response
where
    R: NotificationRepository + 'static,
{
    match service.dispatch(&UserId(user_id), request) {
        Ok(outcome) => {
            let location = outcome.path.clone();
            (
                StatusCode::SEE_OTHER,
                [(header::LOCATION, location)],
                axum::Json(outcome),
            )
                .into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn mark_all_read_handler<R>(
    State(service): State<Arc<NotificationService<R>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: NotificationRepository + 'static,
{
    match service.mark_all_read(&UserId(user_id)) {
        Ok(marked) => (StatusCode::OK, axum::Json(json!({ "marked": marked }))).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: NotificationServiceError) -> Response {
    let status = match &error {
        NotificationServiceError::Repository(RepositoryError::NotFound { .. }) => {
            StatusCode::NOT_FOUND
        }
        NotificationServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
