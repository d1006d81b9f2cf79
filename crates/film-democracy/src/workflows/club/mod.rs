//! Club records shared by the ranking and notification workflows.

pub mod domain;
pub mod repository;
pub mod snapshot;

pub use domain::{
    parse_duration_minutes, Club, ClubId, Film, FilmId, Invitation, Meeting, Member, UserId, Vote,
    VoteBook, VoteChoice,
};
pub use repository::{ClubRecords, RepositoryError};
pub use snapshot::{ClubSnapshot, SharedSnapshot, SnapshotError};
