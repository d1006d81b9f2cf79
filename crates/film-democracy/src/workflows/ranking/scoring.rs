use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::workflows::club::VoteChoice;

/// Coarse sentiment bucket of a ballot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Karma {
    Positive,
    Neutral,
    Negative,
}

impl Karma {
    pub const fn label(self) -> &'static str {
        match self {
            Karma::Positive => "positive",
            Karma::Neutral => "neutral",
            Karma::Negative => "negative",
        }
    }
}

/// Points tables shipped with the service. One table applies per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointsTable {
    /// A veto outweighs any realistic sum of positive ballots.
    #[default]
    Standard,
    /// Softer scale where enough enthusiasm can still lift a vetoed film.
    Lenient,
}

impl PointsTable {
    pub const fn label(self) -> &'static str {
        match self {
            PointsTable::Standard => "standard",
            PointsTable::Lenient => "lenient",
        }
    }
}

impl FromStr for PointsTable {
    type Err = UnknownPointsTable;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "lenient" => Ok(Self::Lenient),
            other => Err(UnknownPointsTable(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown points table '{0}' (expected 'standard' or 'lenient')")]
pub struct UnknownPointsTable(pub String);

/// Scoring attributes of a single ballot choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChoiceScore {
    pub points: i32,
    pub karma: Karma,
    pub rank: u8,
}

/// Explicit lookup from ballot choice to points, karma and ordinal rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoringPolicy {
    table: PointsTable,
}

impl ScoringPolicy {
    pub const fn new(table: PointsTable) -> Self {
        Self { table }
    }

    pub const fn table(&self) -> PointsTable {
        self.table
    }

    pub fn score(&self, choice: VoteChoice) -> ChoiceScore {
        ChoiceScore {
            points: self.points(choice),
            karma: karma(choice),
            rank: rank(choice),
        }
    }

    pub const fn points(&self, choice: VoteChoice) -> i32 {
        match (self.table, choice) {
            (PointsTable::Standard, VoteChoice::Veto) => -10_000,
            (PointsTable::Standard, VoteChoice::SeenNo) => -50,
            (PointsTable::Standard, VoteChoice::No) => -25,
            (PointsTable::Lenient, VoteChoice::Veto) => -100,
            (PointsTable::Lenient, VoteChoice::SeenNo) => -30,
            (PointsTable::Lenient, VoteChoice::No) => -15,
            (_, VoteChoice::Meh) => 0,
            (_, VoteChoice::SeenOk) => 5,
            (_, VoteChoice::Yes) => 10,
            (_, VoteChoice::Omg) => 20,
        }
    }

    pub const fn veto_points(&self) -> i32 {
        self.points(VoteChoice::Veto)
    }
}

pub const fn karma(choice: VoteChoice) -> Karma {
    match choice {
        VoteChoice::Veto | VoteChoice::SeenNo | VoteChoice::No => Karma::Negative,
        VoteChoice::Meh => Karma::Neutral,
        VoteChoice::SeenOk | VoteChoice::Yes | VoteChoice::Omg => Karma::Positive,
    }
}

pub const fn rank(choice: VoteChoice) -> u8 {
    match choice {
        VoteChoice::Veto => 0,
        VoteChoice::SeenNo => 1,
        VoteChoice::No => 2,
        VoteChoice::Meh => 3,
        VoteChoice::SeenOk => 4,
        VoteChoice::Yes => 5,
        VoteChoice::Omg => 6,
    }
}
