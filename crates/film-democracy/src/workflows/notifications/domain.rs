use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::workflows::club::{ClubId, Member, UserId};

/// Identifier wrapper for stored notifications.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(pub String);

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Closed set of events a member can be notified about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
    #[serde(rename = "signup")]
    Signup,
    #[serde(rename = "joined")]
    Joined,
    #[serde(rename = "promoted")]
    Promoted,
    #[serde(rename = "left")]
    Left,
    #[serde(rename = "addedfilm")]
    AddedFilm,
    #[serde(rename = "seenfilm")]
    SeenFilm,
    #[serde(rename = "meetorgan")]
    MeetOrgan,
    #[serde(rename = "meetedit")]
    MeetEdit,
    #[serde(rename = "meetdel")]
    MeetDel,
    #[serde(rename = "commfilm")]
    CommFilm,
    #[serde(rename = "commcomm")]
    CommComm,
    #[serde(rename = "kicked")]
    Kicked,
    #[serde(rename = "abandoned")]
    Abandoned,
    #[serde(rename = "invited")]
    Invited,
}

impl NotificationKind {
    /// Processing order of the inbox builder. Messages are re-sorted by time afterwards, so
    /// this only decides the order of simultaneous events.
    pub const fn ordered() -> [NotificationKind; 14] {
        [
            NotificationKind::Signup,
            NotificationKind::Joined,
            NotificationKind::Left,
            NotificationKind::MeetOrgan,
            NotificationKind::MeetEdit,
            NotificationKind::MeetDel,
            NotificationKind::SeenFilm,
            NotificationKind::Promoted,
            NotificationKind::Kicked,
            NotificationKind::AddedFilm,
            NotificationKind::CommFilm,
            NotificationKind::CommComm,
            NotificationKind::Abandoned,
            NotificationKind::Invited,
        ]
    }

    pub const fn code(self) -> &'static str {
        match self {
            NotificationKind::Signup => "signup",
            NotificationKind::Joined => "joined",
            NotificationKind::Promoted => "promoted",
            NotificationKind::Left => "left",
            NotificationKind::AddedFilm => "addedfilm",
            NotificationKind::SeenFilm => "seenfilm",
            NotificationKind::MeetOrgan => "meetorgan",
            NotificationKind::MeetEdit => "meetedit",
            NotificationKind::MeetDel => "meetdel",
            NotificationKind::CommFilm => "commfilm",
            NotificationKind::CommComm => "commcomm",
            NotificationKind::Kicked => "kicked",
            NotificationKind::Abandoned => "abandoned",
            NotificationKind::Invited => "invited",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            NotificationKind::Signup => "User created account",
            NotificationKind::Joined => "Member joined the club",
            NotificationKind::Promoted => "Member promoted to admin",
            NotificationKind::Left => "Member left the club",
            NotificationKind::AddedFilm => "Member added new film",
            NotificationKind::SeenFilm => "Member marked film as seen by club",
            NotificationKind::MeetOrgan => "Member organized a new club meeting",
            NotificationKind::MeetEdit => "Member edited a club meeting",
            NotificationKind::MeetDel => "Member deleted a club meeting",
            NotificationKind::CommFilm => "Member commented in film proposed by user",
            NotificationKind::CommComm => "Member commented in film commented by user",
            NotificationKind::Kicked => "Member kicked other member from club",
            NotificationKind::Abandoned => "Club admin deleted account",
            NotificationKind::Invited => "User invited to join club",
        }
    }

    /// Whether a message of this kind can be about the viewer themself.
    pub const fn is_self_aware(self) -> bool {
        matches!(
            self,
            NotificationKind::Joined | NotificationKind::Promoted | NotificationKind::Kicked
        )
    }

    /// Whether several events of this kind collapse into a single counted message.
    pub const fn is_mergeable(self) -> bool {
        matches!(
            self,
            NotificationKind::AddedFilm | NotificationKind::CommFilm | NotificationKind::CommComm
        )
    }
}

/// Stored notification record addressed to a single recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub activator: Member,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club_id: Option<ClubId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    pub recipient: UserId,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Suffix variant of a rendered message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageVariant {
    Single,
    /// The affected member is the viewer (`_self`).
    Own,
    /// Several events merged into one (`s`).
    Merged,
}

/// Type of a rendered message: the notification kind plus its suffix variant.
///
/// Serialized as the suffixed code, e.g. `kicked_self` or `addedfilms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageKind {
    pub kind: NotificationKind,
    pub variant: MessageVariant,
}

impl MessageKind {
    pub const fn single(kind: NotificationKind) -> Self {
        Self {
            kind,
            variant: MessageVariant::Single,
        }
    }

    /// Builds a variant, rejecting suffixes the kind never carries.
    pub fn new(kind: NotificationKind, variant: MessageVariant) -> Option<Self> {
        let allowed = match variant {
            MessageVariant::Single => true,
            MessageVariant::Own => kind.is_self_aware(),
            MessageVariant::Merged => kind.is_mergeable(),
        };
        allowed.then_some(Self { kind, variant })
    }

    pub fn code(&self) -> String {
        match self.variant {
            MessageVariant::Single => self.kind.code().to_string(),
            MessageVariant::Own => format!("{}_self", self.kind.code()),
            MessageVariant::Merged => format!("{}s", self.kind.code()),
        }
    }
}

impl From<NotificationKind> for MessageKind {
    fn from(kind: NotificationKind) -> Self {
        Self::single(kind)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown notification type '{0}'")]
pub struct UnknownMessageKind(pub String);

impl FromStr for MessageKind {
    type Err = UnknownMessageKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parse_kind = |code: &str| {
            NotificationKind::ordered()
                .into_iter()
                .find(|kind| kind.code() == code)
        };

        if let Some(kind) = parse_kind(value) {
            return Ok(Self::single(kind));
        }

        let suffixed = value
            .strip_suffix("_self")
            .and_then(parse_kind)
            .and_then(|kind| Self::new(kind, MessageVariant::Own))
            .or_else(|| {
                value
                    .strip_suffix('s')
                    .and_then(parse_kind)
                    .and_then(|kind| Self::new(kind, MessageVariant::Merged))
            });

        suffixed.ok_or_else(|| UnknownMessageKind(value.to_string()))
    }
}

impl Serialize for MessageKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.code())
    }
}

impl<'de> Deserialize<'de> for MessageKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Display-ready message built from one or more notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationMessage {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub image_url: Option<String>,
    pub activator: Member,
    pub object_id: Option<String>,
    pub object_name: Option<String>,
    pub counter: usize,
    pub club_id: Option<ClubId>,
    pub club_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub time_ago: String,
    pub read: bool,
    pub notification_ids: Vec<NotificationId>,
}

/// Grouped messages for one viewer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Inbox {
    pub messages: Vec<NotificationMessage>,
    pub unread_count: usize,
}
