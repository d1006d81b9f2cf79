use serde::Serialize;
use tracing::warn;

use super::domain::{MessageKind, MessageVariant, NotificationKind};
use crate::workflows::club::{ClubId, ClubRecords, FilmId};

/// Navigable resource a message links to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Locator {
    Home,
    Tour,
    Club {
        club_id: ClubId,
    },
    Member {
        club_id: ClubId,
        member_id: String,
    },
    Film {
        club_id: ClubId,
        film_public_id: String,
        film_slug: String,
    },
    CandidateFilms {
        club_id: ClubId,
    },
    InvitationConfirm {
        invitation_id: String,
    },
}

impl Locator {
    /// Site-relative path of the page.
    pub fn path(&self) -> String {
        match self {
            Locator::Home => "/".to_string(),
            Locator::Tour => "/tour/".to_string(),
            Locator::Club { club_id } => format!("/club/{club_id}/"),
            Locator::Member { club_id, member_id } => {
                format!("/club/{club_id}/member/{member_id}/")
            }
            Locator::Film {
                club_id,
                film_public_id,
                film_slug,
            } => format!("/club/{club_id}/film/{film_public_id}/{film_slug}/"),
            Locator::CandidateFilms { club_id } => format!("/club/{club_id}/candidate_films/"),
            Locator::InvitationConfirm { invitation_id } => {
                format!("/invitation_link/{invitation_id}/")
            }
        }
    }
}

/// Destination page of each message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Destination {
    Home,
    Tour,
    Club,
    Member,
    Film,
    CandidateFilms,
    Invitation,
}

const fn destination(kind: MessageKind) -> Destination {
    match (kind.kind, kind.variant) {
        (NotificationKind::Signup, _) => Destination::Tour,
        (NotificationKind::Joined, MessageVariant::Own) => Destination::Club,
        (NotificationKind::Joined, _) => Destination::Member,
        (NotificationKind::Promoted, _) => Destination::Member,
        (NotificationKind::Kicked, MessageVariant::Own) => Destination::Home,
        (NotificationKind::Kicked, _) => Destination::Club,
        (NotificationKind::AddedFilm, MessageVariant::Merged) => Destination::CandidateFilms,
        (
            NotificationKind::AddedFilm
            | NotificationKind::SeenFilm
            | NotificationKind::CommFilm
            | NotificationKind::CommComm,
            _,
        ) => Destination::Film,
        (
            NotificationKind::Left
            | NotificationKind::MeetOrgan
            | NotificationKind::MeetEdit
            | NotificationKind::MeetDel
            | NotificationKind::Abandoned,
            _,
        ) => Destination::Club,
        (NotificationKind::Invited, _) => Destination::Invitation,
    }
}

/// Resolves where acting on a message navigates to.
///
/// Never fails: a missing club or object id, or a film that no longer exists, resolves to
/// [`Locator::Home`].
pub fn resolve_dispatch_target(
    kind: MessageKind,
    club_id: Option<&ClubId>,
    object_id: Option<&str>,
    records: &impl ClubRecords,
) -> Locator {
    let resolved = match destination(kind) {
        Destination::Home => Some(Locator::Home),
        Destination::Tour => Some(Locator::Tour),
        Destination::Club => club_id.map(|club_id| Locator::Club {
            club_id: club_id.clone(),
        }),
        Destination::Member => club_id.zip(object_id).map(|(club_id, member_id)| {
            Locator::Member {
                club_id: club_id.clone(),
                member_id: member_id.to_string(),
            }
        }),
        Destination::Film => club_id.zip(object_id).and_then(|(club_id, film_id)| {
            records
                .club_film(club_id, &FilmId(film_id.to_string()))
                .map(|film| Locator::Film {
                    club_id: club_id.clone(),
                    film_public_id: film.public_id,
                    film_slug: film.slug,
                })
        }),
        Destination::CandidateFilms => club_id.map(|club_id| Locator::CandidateFilms {
            club_id: club_id.clone(),
        }),
        Destination::Invitation => object_id.map(|invitation_id| Locator::InvitationConfirm {
            invitation_id: invitation_id.to_string(),
        }),
    };

    resolved.unwrap_or_else(|| {
        warn!(
            kind = %kind,
            club = ?club_id,
            object = ?object_id,
            "dispatch target unavailable, falling back to home"
        );
        Locator::Home
    })
}
