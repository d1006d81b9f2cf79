use crate::infra::load_snapshot;
use chrono::Utc;
use clap::Args;
use film_democracy::config::AppConfig;
use film_democracy::error::AppError;
use film_democracy::workflows::club::{ClubId, ClubRecords, UserId};
use film_democracy::workflows::notifications::{
    resolve_dispatch_target, Inbox, NotificationMessage, NotificationService,
};
use film_democracy::workflows::ranking::{
    write_ranking_csv, RankingFilters, RankingOrder, RankingReport, RankingRequest,
    RankingResult, RankingService,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// Club snapshot (JSON) holding films, members and votes
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
    /// Club to rank
    #[arg(long)]
    pub(crate) club: String,
    /// Participating member id (repeat for each member present)
    #[arg(long = "member", required = true)]
    pub(crate) members: Vec<String>,
    /// Drop films proposed by members who are not participating
    #[arg(long)]
    pub(crate) exclude_not_present: bool,
    /// Maximum film duration in minutes
    #[arg(long)]
    pub(crate) max_duration: Option<String>,
    /// Result order: points, title or duration
    #[arg(long, default_value = "points", value_parser = parse_order)]
    pub(crate) order: RankingOrder,
    /// Emit CSV instead of the text listing
    #[arg(long)]
    pub(crate) csv: bool,
}

#[derive(Args, Debug)]
pub(crate) struct InboxArgs {
    /// Club snapshot (JSON) holding the stored notifications
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
    /// Member whose inbox is shown
    #[arg(long)]
    pub(crate) user: String,
    /// Maximum number of messages (defaults to NOTIFICATIONS_MAX_MESSAGES)
    #[arg(long)]
    pub(crate) limit: Option<usize>,
}

fn parse_order(raw: &str) -> Result<RankingOrder, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "points" => Ok(RankingOrder::Points),
        "title" => Ok(RankingOrder::Title),
        "duration" => Ok(RankingOrder::Duration),
        other => Err(format!(
            "unknown order '{other}' (expected points, title or duration)"
        )),
    }
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let RankArgs {
        snapshot,
        club,
        members,
        exclude_not_present,
        max_duration,
        order,
        csv,
    } = args;

    let config = AppConfig::load()?;
    let store = Arc::new(load_snapshot(Some(snapshot.as_path()))?);
    let service = RankingService::new(store.clone(), config.ranking.points_table)
        .with_default_max_duration(config.ranking.max_duration_minutes);

    let report = service.rank(RankingRequest {
        club_id: ClubId(club),
        participants: members.into_iter().map(UserId).collect(),
        filters: RankingFilters {
            exclude_not_present: exclude_not_present.then(|| "on".to_string()),
            max_duration,
        },
        order,
    })?;

    if csv {
        write_ranking_csv(io::stdout().lock(), &report.results)?;
        return Ok(());
    }

    let club_name = store
        .club(&report.club_id)
        .map(|club| club.name)
        .unwrap_or_else(|| report.club_id.to_string());
    render_ranking(&club_name, &report);
    Ok(())
}

fn render_ranking(club_name: &str, report: &RankingReport) {
    let participants: Vec<&str> = report
        .participants
        .iter()
        .map(|member| member.username.as_str())
        .collect();

    println!("Ranking for {club_name}");
    println!(
        "Participants: {} | points table: {} | max duration: {} min{}",
        participants.join(", "),
        report.points_table.label(),
        report.config.max_duration_minutes,
        if report.config.exclude_not_present {
            " | absent proposers excluded"
        } else {
            ""
        }
    );
    for warning in &report.filter_warnings {
        println!("! {}", warning.message());
    }

    if report.results.is_empty() {
        println!("\nNo candidate films match the filters.");
        return;
    }

    println!();
    for (index, result) in report.results.iter().enumerate() {
        render_result(index + 1, result);
    }
}

fn render_result(position: usize, result: &RankingResult) {
    println!(
        "{:>2}. {} ({} min) {} pts{}",
        position,
        result.film.title,
        result.duration,
        result.points,
        if result.veto { " [VETO]" } else { "" }
    );
    println!(
        "    +{} ~{} -{} | abstained: {}",
        result.positive_votes.len(),
        result.neutral_votes.len(),
        result.negative_votes.len(),
        if result.abstentionists.is_empty() {
            "none".to_string()
        } else {
            result
                .abstentionists
                .iter()
                .map(|member| member.username.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        }
    );
    for warning in &result.warnings {
        println!("    ! {}: {}", warning.kind.label(), warning.voter);
    }
}

pub(crate) fn run_inbox(args: InboxArgs) -> Result<(), AppError> {
    let InboxArgs {
        snapshot,
        user,
        limit,
    } = args;

    let config = AppConfig::load()?;
    let store = Arc::new(load_snapshot(Some(snapshot.as_path()))?);
    let service = NotificationService::new(
        store.clone(),
        limit.unwrap_or(config.notifications.max_messages),
    );

    let viewer = UserId(user);
    let inbox = service.inbox(&viewer, Utc::now())?;
    render_inbox(&viewer, &inbox, store.as_ref());
    Ok(())
}

fn render_inbox(viewer: &UserId, inbox: &Inbox, records: &impl ClubRecords) {
    println!(
        "Inbox for {viewer}: {} messages, {} unread",
        inbox.messages.len(),
        inbox.unread_count
    );
    for message in &inbox.messages {
        render_message(message, records);
    }
}

fn render_message(message: &NotificationMessage, records: &impl ClubRecords) {
    let target = resolve_dispatch_target(
        message.kind,
        message.club_id.as_ref(),
        message.object_id.as_deref(),
        records,
    );
    let counter = if message.counter > 0 {
        format!(" x{}", message.counter)
    } else {
        String::new()
    };

    let age = if message.time_ago == "just now" {
        message.time_ago.clone()
    } else {
        format!("{} ago", message.time_ago)
    };

    println!(
        "{} {}{} by {}{}{} ({}) -> {}",
        if message.read { "   " } else { "[*]" },
        message.kind,
        counter,
        message.activator.username,
        message
            .object_name
            .as_deref()
            .map(|name| format!(" on \"{name}\""))
            .unwrap_or_default(),
        message
            .club_name
            .as_deref()
            .map(|name| format!(" in {name}"))
            .unwrap_or_default(),
        age,
        target.path()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_parsing_is_case_insensitive() {
        assert_eq!(parse_order("Title"), Ok(RankingOrder::Title));
        assert_eq!(parse_order(" duration "), Ok(RankingOrder::Duration));
        assert!(parse_order("random").is_err());
    }
}
