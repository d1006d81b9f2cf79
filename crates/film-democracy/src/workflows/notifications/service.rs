use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::dispatch::{resolve_dispatch_target, Locator};
use super::domain::{Inbox, MessageKind, Notification, NotificationId};
use super::grouping::NotificationGrouper;
use crate::workflows::club::{ClubId, ClubRecords, RepositoryError, UserId};

/// Notification storage on top of plain club lookups.
pub trait NotificationRepository: ClubRecords + Send + Sync {
    /// Every notification addressed to the recipient, read or not.
    fn notifications_for(&self, recipient: &UserId) -> Result<Vec<Notification>, RepositoryError>;
    /// Flags the listed notifications as read, returning how many changed state.
    fn mark_read(&self, recipient: &UserId, ids: &[NotificationId])
        -> Result<usize, RepositoryError>;
    /// Flags every notification of the recipient as read, returning how many changed state.
    fn mark_all_read(&self, recipient: &UserId) -> Result<usize, RepositoryError>;
}

/// Message the viewer acted on, as echoed back by the inbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchRequest {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(default)]
    pub club_id: Option<ClubId>,
    #[serde(default)]
    pub object_id: Option<String>,
    #[serde(default)]
    pub notification_ids: Vec<NotificationId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchOutcome {
    pub locator: Locator,
    pub path: String,
    pub marked: usize,
}

/// Service composing the notification store with grouping and dispatch.
pub struct NotificationService<R> {
    repository: Arc<R>,
    grouper: NotificationGrouper,
}

impl<R> NotificationService<R>
where
    R: NotificationRepository + 'static,
{
    pub fn new(repository: Arc<R>, max_messages: usize) -> Self {
        Self {
            repository,
            grouper: NotificationGrouper::new(max_messages),
        }
    }

    pub fn max_messages(&self) -> usize {
        self.grouper.max_messages()
    }

    /// Grouped messages of the viewer plus the unread counter.
    pub fn inbox(
        &self,
        viewer: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Inbox, NotificationServiceError> {
        self.ensure_member(viewer)?;
        let notifications = self.repository.notifications_for(viewer)?;
        let inbox = self
            .grouper
            .group(&notifications, viewer, self.repository.as_ref(), now);

        debug!(
            viewer = %viewer,
            stored = notifications.len(),
            messages = inbox.messages.len(),
            unread = inbox.unread_count,
            "inbox grouped"
        );
        Ok(inbox)
    }

    /// Marks the message's notifications as read, then resolves where it links to.
    ///
    /// Every listed id must belong to the viewer; otherwise nothing is flipped.
    pub fn dispatch(
        &self,
        viewer: &UserId,
        request: DispatchRequest,
    ) -> Result<DispatchOutcome, NotificationServiceError> {
        self.ensure_member(viewer)?;

        let owned: HashSet<NotificationId> = self
            .repository
            .notifications_for(viewer)?
            .into_iter()
            .map(|ntf| ntf.id)
            .collect();
        if let Some(foreign) = request
            .notification_ids
            .iter()
            .find(|id| !owned.contains(*id))
        {
            return Err(RepositoryError::not_found("notification", foreign.0.clone()).into());
        }

        let marked = self
            .repository
            .mark_read(viewer, &request.notification_ids)?;
        let locator = resolve_dispatch_target(
            request.kind,
            request.club_id.as_ref(),
            request.object_id.as_deref(),
            self.repository.as_ref(),
        );
        let path = locator.path();

        info!(viewer = %viewer, kind = %request.kind, marked, target = %path, "notification dispatched");
        Ok(DispatchOutcome {
            locator,
            path,
            marked,
        })
    }

    pub fn mark_all_read(&self, viewer: &UserId) -> Result<usize, NotificationServiceError> {
        self.ensure_member(viewer)?;
        let marked = self.repository.mark_all_read(viewer)?;
        info!(viewer = %viewer, marked, "notifications cleared");
        Ok(marked)
    }

    fn ensure_member(&self, viewer: &UserId) -> Result<(), RepositoryError> {
        self.repository
            .member(viewer)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::not_found("member", viewer.0.clone()))
    }
}

/// Error raised by the notification service.
#[derive(Debug, thiserror::Error)]
pub enum NotificationServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
