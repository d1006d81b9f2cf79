use super::domain::{Club, ClubId, Film, FilmId, Invitation, Meeting, Member, UserId};

/// Read-only lookups over already fetched club records.
///
/// Lookups return `None` when the record no longer exists; callers treat that as a dangling
/// reference rather than a failure.
pub trait ClubRecords {
    fn club(&self, id: &ClubId) -> Option<Club>;
    fn member(&self, id: &UserId) -> Option<Member>;
    fn film(&self, id: &FilmId) -> Option<Film>;
    fn meeting(&self, id: &str) -> Option<Meeting>;
    fn invitation(&self, id: &str) -> Option<Invitation>;

    /// Film lookup scoped to a club, so a stale link cannot leak another club's film.
    fn club_film(&self, club_id: &ClubId, id: &FilmId) -> Option<Film> {
        self.film(id).filter(|film| &film.club_id == club_id)
    }
}

impl<T: ClubRecords + ?Sized> ClubRecords for &T {
    fn club(&self, id: &ClubId) -> Option<Club> {
        (**self).club(id)
    }

    fn member(&self, id: &UserId) -> Option<Member> {
        (**self).member(id)
    }

    fn film(&self, id: &FilmId) -> Option<Film> {
        (**self).film(id)
    }

    fn meeting(&self, id: &str) -> Option<Meeting> {
        (**self).meeting(id)
    }

    fn invitation(&self, id: &str) -> Option<Invitation> {
        (**self).invitation(id)
    }
}

/// Error enumeration for record store failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
