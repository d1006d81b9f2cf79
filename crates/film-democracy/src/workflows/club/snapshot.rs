use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use super::domain::{Club, ClubId, Film, FilmId, Invitation, Meeting, Member, UserId, Vote, VoteBook};
use super::repository::{ClubRecords, RepositoryError};
use crate::workflows::notifications::{Notification, NotificationId, NotificationRepository};
use crate::workflows::ranking::RankingRepository;

/// Point-in-time export of club records, loaded from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClubSnapshot {
    #[serde(default)]
    pub clubs: Vec<Club>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub films: Vec<Film>,
    #[serde(default)]
    pub votes: VoteBook,
    #[serde(default)]
    pub meetings: Vec<Meeting>,
    #[serde(default)]
    pub invitations: Vec<Invitation>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
}

impl ClubSnapshot {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SnapshotError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Unseen films of a club, in stored order.
    pub fn unseen_films(&self, club_id: &ClubId) -> Vec<Film> {
        self.films
            .iter()
            .filter(|film| &film.club_id == club_id && !film.seen)
            .cloned()
            .collect()
    }

    pub fn votes_on(&self, films: &[FilmId]) -> Vec<Vote> {
        let wanted: HashSet<&FilmId> = films.iter().collect();
        self.votes
            .votes()
            .iter()
            .filter(|vote| wanted.contains(&vote.film_id))
            .cloned()
            .collect()
    }

    pub fn notifications_for(&self, recipient: &UserId) -> Vec<Notification> {
        self.notifications
            .iter()
            .filter(|ntf| &ntf.recipient == recipient)
            .cloned()
            .collect()
    }

    /// Flags matching unread notifications of the recipient as read.
    fn mark_read_where<F>(&mut self, recipient: &UserId, matches: F) -> usize
    where
        F: Fn(&Notification) -> bool,
    {
        let mut marked = 0;
        for ntf in self
            .notifications
            .iter_mut()
            .filter(|ntf| &ntf.recipient == recipient && !ntf.read)
        {
            if matches(ntf) {
                ntf.read = true;
                marked += 1;
            }
        }
        marked
    }
}

impl ClubRecords for ClubSnapshot {
    fn club(&self, id: &ClubId) -> Option<Club> {
        self.clubs.iter().find(|club| &club.id == id).cloned()
    }

    fn member(&self, id: &UserId) -> Option<Member> {
        self.members.iter().find(|member| &member.id == id).cloned()
    }

    fn film(&self, id: &FilmId) -> Option<Film> {
        self.films.iter().find(|film| &film.id == id).cloned()
    }

    fn meeting(&self, id: &str) -> Option<Meeting> {
        self.meetings.iter().find(|meeting| meeting.id == id).cloned()
    }

    fn invitation(&self, id: &str) -> Option<Invitation> {
        self.invitations
            .iter()
            .find(|invitation| invitation.id == id)
            .cloned()
    }
}

/// Snapshot shared between request handlers.
#[derive(Debug, Clone, Default)]
pub struct SharedSnapshot {
    inner: Arc<Mutex<ClubSnapshot>>,
}

impl SharedSnapshot {
    pub fn new(snapshot: ClubSnapshot) -> Self {
        Self {
            inner: Arc::new(Mutex::new(snapshot)),
        }
    }

    /// Copy of the current records.
    pub fn snapshot(&self) -> ClubSnapshot {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, ClubSnapshot> {
        // Every mutation is a single flag flip, so a poisoned lock still holds whole records.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<ClubSnapshot> for SharedSnapshot {
    fn from(snapshot: ClubSnapshot) -> Self {
        Self::new(snapshot)
    }
}

impl ClubRecords for SharedSnapshot {
    fn club(&self, id: &ClubId) -> Option<Club> {
        self.lock().club(id)
    }

    fn member(&self, id: &UserId) -> Option<Member> {
        self.lock().member(id)
    }

    fn film(&self, id: &FilmId) -> Option<Film> {
        self.lock().film(id)
    }

    fn meeting(&self, id: &str) -> Option<Meeting> {
        self.lock().meeting(id)
    }

    fn invitation(&self, id: &str) -> Option<Invitation> {
        self.lock().invitation(id)
    }
}

impl RankingRepository for SharedSnapshot {
    fn unseen_films(&self, club_id: &ClubId) -> Result<Vec<Film>, RepositoryError> {
        Ok(self.lock().unseen_films(club_id))
    }

    fn votes_on(&self, films: &[FilmId]) -> Result<Vec<Vote>, RepositoryError> {
        Ok(self.lock().votes_on(films))
    }
}

impl NotificationRepository for SharedSnapshot {
    fn notifications_for(&self, recipient: &UserId) -> Result<Vec<Notification>, RepositoryError> {
        Ok(self.lock().notifications_for(recipient))
    }

    fn mark_read(
        &self,
        recipient: &UserId,
        ids: &[NotificationId],
    ) -> Result<usize, RepositoryError> {
        let ids: HashSet<&NotificationId> = ids.iter().collect();
        Ok(self
            .lock()
            .mark_read_where(recipient, |ntf| ids.contains(&ntf.id)))
    }

    fn mark_all_read(&self, recipient: &UserId) -> Result<usize, RepositoryError> {
        Ok(self.lock().mark_read_where(recipient, |_| true))
    }
}

/// Error raised while loading a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::club::VoteChoice;
    use crate::workflows::notifications::NotificationKind;
    use chrono::{TimeZone, Utc};

    const SNAPSHOT: &str = r#"{
        "clubs": [{ "id": "00042", "name": "Cine Forum" }],
        "members": [
            { "id": "ana", "username": "ana" },
            { "id": "bo", "username": "bo" }
        ],
        "films": [
            {
                "id": "f1", "public_id": "00001", "club_id": "00042", "title": "Alien",
                "slug": "alien", "proposed_by": { "id": "ana", "username": "ana" },
                "duration": "117 min", "created_at": "2024-03-01T20:00:00Z"
            },
            {
                "id": "f2", "public_id": "00002", "club_id": "00042", "title": "Heat",
                "slug": "heat", "proposed_by": { "id": "bo", "username": "bo" },
                "seen": true, "duration": "170", "created_at": "2024-03-02T20:00:00Z"
            }
        ],
        "votes": [
            { "user": { "id": "ana", "username": "ana" }, "film_id": "f1", "club_id": "00042", "choice": "yes" },
            { "user": { "id": "bo", "username": "bo" }, "film_id": "f2", "club_id": "00042", "choice": "omg" }
        ],
        "notifications": [
            {
                "id": "n1", "type": "addedfilm", "activator": { "id": "ana", "username": "ana" },
                "club_id": "00042", "object_id": "f1", "recipient": "bo",
                "created_at": "2024-03-01T20:00:00Z"
            },
            {
                "id": "n2", "type": "joined", "activator": { "id": "bo", "username": "bo" },
                "club_id": "00042", "object_id": "bo", "recipient": "ana",
                "created_at": "2024-02-01T20:00:00Z"
            }
        ]
    }"#;

    fn shared() -> SharedSnapshot {
        ClubSnapshot::from_reader(SNAPSHOT.as_bytes())
            .expect("snapshot parses")
            .into()
    }

    #[test]
    fn snapshot_parses_with_optional_sections_missing() {
        let snapshot = ClubSnapshot::from_reader(SNAPSHOT.as_bytes()).expect("snapshot parses");
        assert!(snapshot.meetings.is_empty());
        assert_eq!(snapshot.votes.len(), 2);
        assert_eq!(snapshot.notifications[0].kind, NotificationKind::AddedFilm);
        assert_eq!(
            snapshot.notifications[0].created_at,
            Utc.with_ymd_and_hms(2024, 3, 1, 20, 0, 0).unwrap()
        );
    }

    #[test]
    fn numeric_and_missing_durations_load_as_runtime_text() {
        let film = |id: &str, duration: &str| {
            format!(
                r#"{{ "id": "{id}", "public_id": "{id}", "club_id": "00042", "title": "{id}",
                    "slug": "{id}", "proposed_by": {{ "id": "ana", "username": "ana" }},
                    {duration} "created_at": "2024-03-01T20:00:00Z" }}"#
            )
        };
        let raw = format!(
            r#"{{ "films": [{}, {}, {}, {}] }}"#,
            film("numeric", r#""duration": 104,"#),
            film("null", r#""duration": null,"#),
            film("unknown", r#""duration": "N/A","#),
            film("absent", ""),
        );

        let snapshot = ClubSnapshot::from_reader(raw.as_bytes()).expect("snapshot parses");
        let minutes: Vec<i32> = snapshot
            .films
            .iter()
            .map(|film| film.duration_in_mins())
            .collect();
        assert_eq!(minutes, vec![104, 0, 0, 0]);
        assert_eq!(snapshot.films[0].duration, "104");
        assert_eq!(snapshot.films[1].duration, "");
    }

    #[test]
    fn malformed_snapshot_is_a_parse_error() {
        let error = ClubSnapshot::from_reader("{ \"clubs\": 3 }".as_bytes()).unwrap_err();
        assert!(matches!(error, SnapshotError::Parse(_)));
    }

    #[test]
    fn missing_snapshot_file_reports_path() {
        let error = ClubSnapshot::from_path("/nonexistent/club-snapshot.json").unwrap_err();
        assert!(error.to_string().contains("club-snapshot.json"));
    }

    #[test]
    fn ranking_queries_skip_seen_films() {
        let store = shared();
        let club = ClubId("00042".to_string());

        let films = store.unseen_films(&club).expect("films load");
        assert_eq!(films.len(), 1);
        assert_eq!(films[0].title, "Alien");

        let votes = store
            .votes_on(&[FilmId("f1".to_string())])
            .expect("votes load");
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].choice, VoteChoice::Yes);
    }

    #[test]
    fn marking_read_is_scoped_to_the_recipient() {
        let store = shared();
        let ana = UserId("ana".to_string());
        let bo = UserId("bo".to_string());

        let marked = store
            .mark_read(&ana, &[NotificationId("n1".to_string())])
            .expect("mark read");
        assert_eq!(marked, 0);

        let marked = store
            .mark_read(&bo, &[NotificationId("n1".to_string())])
            .expect("mark read");
        assert_eq!(marked, 1);
        assert_eq!(store.mark_all_read(&bo).expect("mark all"), 0);
        assert_eq!(store.mark_all_read(&ana).expect("mark all"), 1);

        assert!(store.snapshot().notifications.iter().all(|ntf| ntf.read));
    }
}
