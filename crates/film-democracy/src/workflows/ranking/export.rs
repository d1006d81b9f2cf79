use std::io::Write;

use serde::Serialize;

use super::engine::RankingResult;

#[derive(Debug, Serialize)]
struct RankingRow<'a> {
    position: usize,
    film: &'a str,
    duration: &'a str,
    points: i32,
    veto: bool,
    positive: usize,
    neutral: usize,
    negative: usize,
    abstentions: usize,
    warnings: String,
}

/// Writes a ranking as CSV, one row per film in the given order.
pub fn write_ranking_csv<W: Write>(writer: W, results: &[RankingResult]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for (index, result) in results.iter().enumerate() {
        let warnings = result
            .warnings
            .iter()
            .map(|warning| format!("{}:{}", warning.kind.label(), warning.voter))
            .collect::<Vec<_>>()
            .join("; ");

        csv_writer.serialize(RankingRow {
            position: index + 1,
            film: &result.film.title,
            duration: &result.duration,
            points: result.points,
            veto: result.veto,
            positive: result.positive_votes.len(),
            neutral: result.neutral_votes.len(),
            negative: result.negative_votes.len(),
            abstentions: result.abstentionists.len(),
            warnings,
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}
