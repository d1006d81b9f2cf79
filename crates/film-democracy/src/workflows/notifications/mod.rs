//! Member notifications: grouping stored events into inbox messages and resolving where a
//! message links to.

pub mod dispatch;
pub mod domain;
pub mod grouping;
pub mod images;
pub mod router;
pub mod service;
pub mod time_ago;

#[cfg(test)]
mod tests;

pub use dispatch::{resolve_dispatch_target, Locator};
pub use domain::{
    Inbox, MessageKind, MessageVariant, Notification, NotificationId, NotificationKind,
    NotificationMessage, UnknownMessageKind,
};
pub use grouping::{group_notifications, NotificationGrouper, DEFAULT_MAX_MESSAGES};
pub use router::notification_router;
pub use service::{
    DispatchOutcome, DispatchRequest, NotificationRepository, NotificationService,
    NotificationServiceError,
};
pub use time_ago::time_ago;
