use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::debug;

use super::config::RankingConfig;
use super::scoring::{Karma, ScoringPolicy};
use crate::workflows::club::{Film, FilmId, Member, UserId, Vote, VoteChoice};

/// Why a film deserves a second look before the club commits to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RankingWarningKind {
    #[serde(rename = "veto")]
    Veto,
    #[serde(rename = "omg")]
    AbsentOmg,
    #[serde(rename = "proposer missing")]
    ProposerMissing,
}

impl RankingWarningKind {
    pub const fn label(self) -> &'static str {
        match self {
            RankingWarningKind::Veto => "veto",
            RankingWarningKind::AbsentOmg => "omg",
            RankingWarningKind::ProposerMissing => "proposer missing",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingWarning {
    #[serde(rename = "type")]
    pub kind: RankingWarningKind,
    pub film: String,
    pub voter: String,
}

/// Scored, annotated entry for one eligible film.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingResult {
    pub film: Film,
    pub duration: String,
    pub positive_votes: Vec<Vote>,
    pub neutral_votes: Vec<Vote>,
    pub negative_votes: Vec<Vote>,
    pub abstentionists: Vec<Member>,
    pub points: i32,
    pub veto: bool,
    pub warnings: Vec<RankingWarning>,
}

/// Stateless ranking generator applying a scoring policy to a club's candidate films.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankingEngine {
    policy: ScoringPolicy,
}

impl RankingEngine {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ScoringPolicy {
        self.policy
    }

    /// Scores every eligible film in input order. Results are not sorted.
    pub fn compute(
        &self,
        films: &[Film],
        votes: &[Vote],
        participants: &[Member],
        config: &RankingConfig,
    ) -> Vec<RankingResult> {
        let present: BTreeSet<&UserId> = participants.iter().map(|member| &member.id).collect();
        let ballots = ballots_by_film(votes);

        films
            .iter()
            .filter(|film| self.is_eligible(film, &present, config))
            .map(|film| {
                let film_votes = ballots.get(&film.id).map(Vec::as_slice).unwrap_or(&[]);
                self.rank_film(film, film_votes, participants, &present)
            })
            .collect()
    }

    fn is_eligible(&self, film: &Film, present: &BTreeSet<&UserId>, config: &RankingConfig) -> bool {
        if film.seen {
            debug!(film = %film.id, "skipping film already seen by the club");
            return false;
        }

        if config.exclude_not_present && !present.contains(&film.proposed_by.id) {
            debug!(film = %film.id, proposer = %film.proposed_by.id, "proposer not present");
            return false;
        }

        let duration = film.duration_in_mins();
        if duration > config.max_duration_minutes {
            debug!(
                film = %film.id,
                duration,
                max = config.max_duration_minutes,
                "film longer than allowed"
            );
            return false;
        }

        true
    }

    fn rank_film(
        &self,
        film: &Film,
        film_votes: &[&Vote],
        participants: &[Member],
        present: &BTreeSet<&UserId>,
    ) -> RankingResult {
        let mut positive_votes = Vec::new();
        let mut neutral_votes = Vec::new();
        let mut negative_votes = Vec::new();
        let mut points: i32 = 0;
        let mut veto = false;
        let mut veto_warnings = Vec::new();
        let mut omg_warnings = Vec::new();

        for vote in film_votes {
            if !present.contains(&vote.user.id) {
                if vote.choice == VoteChoice::Omg {
                    omg_warnings.push(warning(RankingWarningKind::AbsentOmg, film, &vote.user));
                }
                continue;
            }

            points = self.policy.points(vote.choice).saturating_add(points);
            if vote.choice == VoteChoice::Veto {
                veto = true;
                veto_warnings.push(warning(RankingWarningKind::Veto, film, &vote.user));
            }

            let bucket = match super::scoring::karma(vote.choice) {
                Karma::Positive => &mut positive_votes,
                Karma::Neutral => &mut neutral_votes,
                Karma::Negative => &mut negative_votes,
            };
            bucket.push((*vote).clone());
        }

        let voters: BTreeSet<&UserId> = film_votes.iter().map(|vote| &vote.user.id).collect();
        let abstentionists = participants
            .iter()
            .filter(|member| !voters.contains(&member.id))
            .cloned()
            .collect();

        let mut warnings = veto_warnings;
        warnings.extend(omg_warnings);
        if !present.contains(&film.proposed_by.id) {
            warnings.push(warning(
                RankingWarningKind::ProposerMissing,
                film,
                &film.proposed_by,
            ));
        }

        RankingResult {
            film: film.clone(),
            duration: film.duration_in_mins().to_string(),
            positive_votes,
            neutral_votes,
            negative_votes,
            abstentionists,
            points,
            veto,
            warnings,
        }
    }
}

/// Convenience entry point using the given scoring policy.
pub fn compute_ranking(
    films: &[Film],
    votes: &[Vote],
    participants: &[Member],
    config: &RankingConfig,
    policy: ScoringPolicy,
) -> Vec<RankingResult> {
    RankingEngine::new(policy).compute(films, votes, participants, config)
}

/// Groups ballots per film, keeping only the latest ballot of each user.
fn ballots_by_film(votes: &[Vote]) -> BTreeMap<&FilmId, Vec<&Vote>> {
    let mut ballots: BTreeMap<&FilmId, Vec<&Vote>> = BTreeMap::new();
    for vote in votes {
        let film_votes = ballots.entry(&vote.film_id).or_default();
        match film_votes
            .iter_mut()
            .find(|existing| existing.user.id == vote.user.id)
        {
            Some(existing) => *existing = vote,
            None => film_votes.push(vote),
        }
    }
    ballots
}

fn warning(kind: RankingWarningKind, film: &Film, voter: &Member) -> RankingWarning {
    RankingWarning {
        kind,
        film: film.title.clone(),
        voter: voter.username.clone(),
    }
}
