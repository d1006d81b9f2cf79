use crate::commands::{run_inbox, run_rank, InboxArgs, RankArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use film_democracy::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Film Democracy",
    about = "Rank a club's candidate films and browse member notifications",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the ranking of a club's unseen films for the given participants
    Rank(RankArgs),
    /// Print the grouped notification inbox of a member
    Inbox(InboxArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Club snapshot (JSON) to serve; the service starts empty without one
    #[arg(long)]
    pub(crate) snapshot: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Rank(args) => run_rank(args),
        Command::Inbox(args) => run_inbox(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve_without_subcommand() {
        let cli = Cli::try_parse_from(["film-democracy"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn rank_accepts_repeated_members() {
        let cli = Cli::try_parse_from([
            "film-democracy",
            "rank",
            "--snapshot",
            "club.json",
            "--club",
            "00042",
            "--member",
            "ana",
            "--member",
            "bo",
            "--max-duration",
            "120",
            "--order",
            "title",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Rank(args)) => {
                assert_eq!(args.members, vec!["ana", "bo"]);
                assert_eq!(args.max_duration.as_deref(), Some("120"));
                assert!(!args.csv);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rank_requires_a_member() {
        let parsed = Cli::try_parse_from([
            "film-democracy",
            "rank",
            "--snapshot",
            "club.json",
            "--club",
            "00042",
        ]);
        assert!(parsed.is_err());
    }
}
