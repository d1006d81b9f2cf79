use super::domain::{MessageKind, MessageVariant, Notification, NotificationKind};
use crate::workflows::club::{ClubRecords, FilmId, UserId};

pub const WEBSITE_IMAGE: &str = "/static/core/svg/web_letters.svg";
pub const NO_PROFILE_IMAGE: &str = "/static/registration/svg/user_no_profile_image.svg";
pub const NO_CLUB_LOGO: &str = "/static/democracy/images/club_no_logo.png";

/// Which picture a message is illustrated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    Website,
    Activator,
    Member,
    Club,
    FilmPoster,
}

impl ImageSource {
    pub const fn for_message(kind: MessageKind) -> Self {
        match (kind.kind, kind.variant) {
            (NotificationKind::Signup, _) => ImageSource::Website,
            (NotificationKind::Joined, MessageVariant::Own) => ImageSource::Club,
            (NotificationKind::Promoted | NotificationKind::Kicked, MessageVariant::Own) => {
                ImageSource::Activator
            }
            (NotificationKind::Promoted | NotificationKind::Kicked, _) => ImageSource::Member,
            (NotificationKind::CommFilm | NotificationKind::CommComm, MessageVariant::Merged) => {
                ImageSource::FilmPoster
            }
            (NotificationKind::Abandoned | NotificationKind::Invited, _) => ImageSource::Club,
            (
                NotificationKind::Joined
                | NotificationKind::Left
                | NotificationKind::MeetOrgan
                | NotificationKind::MeetEdit
                | NotificationKind::MeetDel
                | NotificationKind::SeenFilm
                | NotificationKind::AddedFilm
                | NotificationKind::CommFilm
                | NotificationKind::CommComm,
                _,
            ) => ImageSource::Activator,
        }
    }
}

/// Resolves the image url of a message; only a film without poster yields `None`.
pub fn image_url(
    kind: MessageKind,
    notification: &Notification,
    object_id: Option<&str>,
    records: &impl ClubRecords,
) -> Option<String> {
    match ImageSource::for_message(kind) {
        ImageSource::Website => Some(WEBSITE_IMAGE.to_string()),
        ImageSource::Activator => Some(
            notification
                .activator
                .profile_image
                .clone()
                .unwrap_or_else(|| NO_PROFILE_IMAGE.to_string()),
        ),
        ImageSource::Member => Some(
            object_id
                .and_then(|id| records.member(&UserId(id.to_string())))
                .and_then(|member| member.profile_image)
                .unwrap_or_else(|| NO_PROFILE_IMAGE.to_string()),
        ),
        ImageSource::Club => Some(
            notification
                .club_id
                .as_ref()
                .and_then(|club_id| records.club(club_id))
                .and_then(|club| club.logo_image)
                .unwrap_or_else(|| NO_CLUB_LOGO.to_string()),
        ),
        ImageSource::FilmPoster => object_id
            .and_then(|id| records.film(&FilmId(id.to_string())))
            .and_then(|film| film.poster_url),
    }
}
