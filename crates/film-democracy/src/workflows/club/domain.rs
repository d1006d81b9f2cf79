use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for registered users.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

/// Identifier wrapper for clubs.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClubId(pub String);

/// Identifier wrapper for candidate films.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilmId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ClubId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for FilmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Public view of a user as seen by the club features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: UserId,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Club {
    pub id: ClubId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_image: Option<String>,
}

/// Candidate film proposed to a club.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Film {
    pub id: FilmId,
    pub public_id: String,
    pub club_id: ClubId,
    pub title: String,
    pub slug: String,
    pub proposed_by: Member,
    #[serde(default)]
    pub seen: bool,
    /// Raw runtime text as delivered by the film database (`"104"`, `"104 min"`, `"N/A"`).
    #[serde(default, deserialize_with = "deserialize_duration")]
    pub duration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Film {
    pub fn duration_in_mins(&self) -> i32 {
        parse_duration_minutes(&self.duration)
    }
}

/// Parses runtime text into whole minutes, falling back to zero.
///
/// Accepts a bare integer or an integer followed by a `min` suffix (with or without a
/// separating space). Anything else yields `0` so an unreadable runtime never filters a
/// film out.
pub fn parse_duration_minutes(raw: &str) -> i32 {
    let trimmed = raw.trim();
    if let Ok(minutes) = trimmed.parse::<i32>() {
        return minutes;
    }

    trimmed
        .strip_suffix("min")
        .and_then(|value| value.trim_end().parse::<i32>().ok())
        .unwrap_or(0)
}

/// Runtime as stored by the film database: text, a bare number, or missing.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDuration {
    Text(String),
    Minutes(i64),
    Other(serde::de::IgnoredAny),
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<RawDuration>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawDuration::Text(text)) => text,
        Some(RawDuration::Minutes(minutes)) => minutes.to_string(),
        Some(RawDuration::Other(_)) | None => String::new(),
    })
}

/// Closed set of ballot choices, ordered from most negative to most positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteChoice {
    Veto,
    SeenNo,
    No,
    Meh,
    SeenOk,
    Yes,
    Omg,
}

impl VoteChoice {
    pub const fn ordered() -> [VoteChoice; 7] {
        [
            VoteChoice::Veto,
            VoteChoice::SeenNo,
            VoteChoice::No,
            VoteChoice::Meh,
            VoteChoice::SeenOk,
            VoteChoice::Yes,
            VoteChoice::Omg,
        ]
    }

    pub const fn code(self) -> &'static str {
        match self {
            VoteChoice::Veto => "veto",
            VoteChoice::SeenNo => "seenno",
            VoteChoice::No => "no",
            VoteChoice::Meh => "meh",
            VoteChoice::SeenOk => "seenok",
            VoteChoice::Yes => "yes",
            VoteChoice::Omg => "omg",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            VoteChoice::Veto => "Veto!",
            VoteChoice::SeenNo => "I've seen it and I don't want to see it again.",
            VoteChoice::No => "I don't want to see it.",
            VoteChoice::Meh => "Meh...",
            VoteChoice::SeenOk => "I've seen it and I wouldn't mind seeing it again.",
            VoteChoice::Yes => "I want to see it.",
            VoteChoice::Omg => "I really want to see it.",
        }
    }
}

/// A member's ballot on a single film.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub user: Member,
    pub film_id: FilmId,
    pub club_id: ClubId,
    pub choice: VoteChoice,
}

/// Ordered vote collection holding at most one ballot per (user, film).
///
/// Deserializing replays every ballot through [`VoteBook::cast`], so duplicated ballots in
/// stored data collapse onto the last one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Vote>", into = "Vec<Vote>")]
pub struct VoteBook {
    votes: Vec<Vote>,
}

impl VoteBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a ballot, overwriting the choice of an earlier ballot by the same user on the
    /// same film. Returns the replaced choice, if any.
    pub fn cast(&mut self, vote: Vote) -> Option<VoteChoice> {
        match self
            .votes
            .iter_mut()
            .find(|existing| existing.user.id == vote.user.id && existing.film_id == vote.film_id)
        {
            Some(existing) => {
                let previous = existing.choice;
                existing.choice = vote.choice;
                Some(previous)
            }
            None => {
                self.votes.push(vote);
                None
            }
        }
    }

    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }
}

impl From<Vec<Vote>> for VoteBook {
    fn from(votes: Vec<Vote>) -> Self {
        votes.into_iter().collect()
    }
}

impl From<VoteBook> for Vec<Vote> {
    fn from(book: VoteBook) -> Self {
        book.votes
    }
}

impl FromIterator<Vote> for VoteBook {
    fn from_iter<I: IntoIterator<Item = Vote>>(iter: I) -> Self {
        let mut book = VoteBook::new();
        for vote in iter {
            book.cast(vote);
        }
        book
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: String,
    pub club_id: ClubId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
    pub id: String,
    pub club_id: ClubId,
}
