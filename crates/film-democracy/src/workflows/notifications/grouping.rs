use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::domain::{
    Inbox, MessageKind, MessageVariant, Notification, NotificationKind, NotificationMessage,
};
use super::images::image_url;
use super::time_ago::time_ago;
use crate::workflows::club::{ClubRecords, FilmId, UserId};

pub const DEFAULT_MAX_MESSAGES: usize = 50;

/// Record a pass-through notification points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Nothing,
    Meeting,
    Film,
    Invitation,
}

/// How notifications of one kind turn into messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupingRule {
    PassThrough(Target),
    SelfAware,
    MergeByActivator,
    MergeByObject,
}

impl GroupingRule {
    const fn for_kind(kind: NotificationKind) -> Self {
        match kind {
            NotificationKind::Signup | NotificationKind::Left | NotificationKind::Abandoned => {
                GroupingRule::PassThrough(Target::Nothing)
            }
            NotificationKind::MeetOrgan | NotificationKind::MeetEdit | NotificationKind::MeetDel => {
                GroupingRule::PassThrough(Target::Meeting)
            }
            NotificationKind::SeenFilm => GroupingRule::PassThrough(Target::Film),
            NotificationKind::Invited => GroupingRule::PassThrough(Target::Invitation),
            NotificationKind::Joined | NotificationKind::Promoted | NotificationKind::Kicked => {
                GroupingRule::SelfAware
            }
            NotificationKind::AddedFilm => GroupingRule::MergeByActivator,
            NotificationKind::CommFilm | NotificationKind::CommComm => GroupingRule::MergeByObject,
        }
    }
}

/// Builds a viewer's inbox: groups notifications into messages, newest first, capped.
#[derive(Debug, Clone, Copy)]
pub struct NotificationGrouper {
    max_messages: usize,
}

impl Default for NotificationGrouper {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_MESSAGES)
    }
}

impl NotificationGrouper {
    pub fn new(max_messages: usize) -> Self {
        Self { max_messages }
    }

    pub fn max_messages(&self) -> usize {
        self.max_messages
    }

    pub fn group<R: ClubRecords>(
        &self,
        notifications: &[Notification],
        viewer: &UserId,
        records: &R,
        now: DateTime<Utc>,
    ) -> Inbox {
        let mut builder = InboxBuilder {
            records,
            viewer,
            now,
            messages: Vec::new(),
            unread_count: 0,
        };

        for kind in NotificationKind::ordered() {
            let of_kind: Vec<&Notification> = notifications
                .iter()
                .filter(|ntf| ntf.kind == kind && &ntf.recipient == viewer)
                .collect();
            if of_kind.is_empty() {
                continue;
            }

            match GroupingRule::for_kind(kind) {
                GroupingRule::PassThrough(target) => builder.pass_through(&of_kind, target),
                GroupingRule::SelfAware => builder.self_aware(&of_kind),
                GroupingRule::MergeByActivator => {
                    builder.merge(&of_kind, |ntf| Some(ntf.activator.id.0.clone()))
                }
                GroupingRule::MergeByObject => builder.merge(&of_kind, |ntf| ntf.object_id.clone()),
            }
        }

        let InboxBuilder {
            mut messages,
            unread_count,
            ..
        } = builder;
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        messages.truncate(self.max_messages);

        Inbox {
            messages,
            unread_count,
        }
    }
}

/// Groups a viewer's notifications with an explicit message cap.
pub fn group_notifications<R: ClubRecords>(
    notifications: &[Notification],
    viewer: &UserId,
    records: &R,
    max_messages: usize,
    now: DateTime<Utc>,
) -> Inbox {
    NotificationGrouper::new(max_messages).group(notifications, viewer, records, now)
}

struct InboxBuilder<'a, R> {
    records: &'a R,
    viewer: &'a UserId,
    now: DateTime<Utc>,
    messages: Vec<NotificationMessage>,
    unread_count: usize,
}

/// Object identity and display name attached to a message.
type ObjectRef = (Option<String>, Option<String>);

impl<R: ClubRecords> InboxBuilder<'_, R> {
    fn pass_through(&mut self, notifications: &[&Notification], target: Target) {
        for ntf in notifications {
            let Some(object) = self.resolve_target(ntf, target) else {
                debug!(notification = %ntf.id, kind = ntf.kind.code(), "dropping dangling notification");
                continue;
            };

            if !ntf.read {
                self.unread_count += 1;
            }
            self.push(ntf, MessageKind::single(ntf.kind), object, 0, vec![*ntf]);
        }
    }

    fn self_aware(&mut self, notifications: &[&Notification]) {
        for ntf in notifications {
            let member = ntf
                .object_id
                .as_ref()
                .and_then(|id| self.records.member(&UserId(id.clone())));
            let Some(member) = member else {
                debug!(notification = %ntf.id, kind = ntf.kind.code(), "dropping notification about a missing member");
                continue;
            };

            if !ntf.read {
                self.unread_count += 1;
            }
            let variant = if &member.id == self.viewer {
                MessageVariant::Own
            } else {
                MessageVariant::Single
            };
            let kind = MessageKind {
                kind: ntf.kind,
                variant,
            };
            self.push(
                ntf,
                kind,
                (Some(member.id.0), Some(member.username)),
                0,
                vec![*ntf],
            );
        }
    }

    /// Splits by read state first (read, then unread), then groups each subset by `key`.
    fn merge<F>(&mut self, notifications: &[&Notification], key: F)
    where
        F: Fn(&Notification) -> Option<String>,
    {
        for unread_subset in [false, true] {
            let mut groups: BTreeMap<String, Vec<&Notification>> = BTreeMap::new();
            for ntf in notifications
                .iter()
                .copied()
                .filter(|ntf| ntf.read != unread_subset)
            {
                match key(ntf) {
                    Some(group_key) => groups.entry(group_key).or_default().push(ntf),
                    None => {
                        debug!(notification = %ntf.id, "dropping notification without grouping key")
                    }
                }
            }

            for mut group in groups.into_values() {
                // Newest first; ties keep input order.
                group.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                let latest = group[0];

                let film = latest
                    .object_id
                    .as_ref()
                    .and_then(|id| self.records.film(&FilmId(id.clone())));
                let Some(film) = film else {
                    debug!(notification = %latest.id, kind = latest.kind.code(), "dropping group about a missing film");
                    continue;
                };

                let (variant, counter) = if group.len() > 1 {
                    (MessageVariant::Merged, group.len())
                } else {
                    (MessageVariant::Single, 0)
                };

                if unread_subset && !latest.read {
                    self.unread_count += group.len();
                }

                let kind = MessageKind {
                    kind: latest.kind,
                    variant,
                };
                self.push(
                    latest,
                    kind,
                    (Some(film.id.0), Some(film.title)),
                    counter,
                    group,
                );
            }
        }
    }

    fn resolve_target(&self, ntf: &Notification, target: Target) -> Option<ObjectRef> {
        let object_id = || ntf.object_id.as_deref();
        match target {
            Target::Nothing => Some((None, None)),
            Target::Meeting => self
                .records
                .meeting(object_id()?)
                .map(|meeting| (Some(meeting.id), Some(meeting.name))),
            Target::Film => self
                .records
                .film(&FilmId(object_id()?.to_string()))
                .map(|film| (Some(film.id.0), Some(film.title))),
            Target::Invitation => self
                .records
                .invitation(object_id()?)
                .map(|invitation| (Some(invitation.id), None)),
        }
    }

    fn push(
        &mut self,
        representative: &Notification,
        kind: MessageKind,
        (object_id, object_name): ObjectRef,
        counter: usize,
        merged: Vec<&Notification>,
    ) {
        let club = representative
            .club_id
            .as_ref()
            .and_then(|club_id| self.records.club(club_id));
        let image_url = image_url(kind, representative, object_id.as_deref(), self.records);

        self.messages.push(NotificationMessage {
            kind,
            image_url,
            activator: representative.activator.clone(),
            object_id,
            object_name,
            counter,
            club_id: representative.club_id.clone(),
            club_name: club.map(|club| club.name),
            created_at: representative.created_at,
            time_ago: time_ago(representative.created_at, self.now),
            read: representative.read,
            notification_ids: merged.iter().map(|ntf| ntf.id.clone()).collect(),
        });
    }
}
