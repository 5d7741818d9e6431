//! Pure aggregation functions over the flat score list. Everything in here is
//! deliberately free of database and UI concerns: the views fetch all records,
//! hand them to these functions, and render whatever comes back. That keeps
//! the derivations trivially testable and mirrors how small the data set is
//! expected to stay (a community league, not a warehouse).

mod completion;
mod standings;

pub use completion::{completion_rates, CompletionRate};
pub use standings::{league_standings, PlayerStanding, SortDirection, SortKey, StandingsTable};

use std::collections::HashSet;

use crate::models::ScoreRecord;

/// Collect distinct values in first-seen order. The ordering matters: circuit
/// columns and league selectors are laid out in the order results were
/// entered, which is what league organizers expect (race one first).
pub(crate) fn first_seen<'a, I>(values: I) -> Vec<String>
where
    I: Iterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut ordered = Vec::new();
    for value in values {
        if seen.insert(value.to_string()) {
            ordered.push(value.to_string());
        }
    }
    ordered
}

/// Distinct league names across all records, first-seen order.
pub fn distinct_leagues(records: &[ScoreRecord]) -> Vec<String> {
    first_seen(records.iter().map(|record| record.league.as_str()))
}

/// Distinct circuit names across all records, first-seen order.
pub fn distinct_circuits(records: &[ScoreRecord]) -> Vec<String> {
    first_seen(records.iter().map(|record| record.circuit.as_str()))
}

/// Distinct player names across all records, first-seen order.
pub fn distinct_players(records: &[ScoreRecord]) -> Vec<String> {
    first_seen(records.iter().map(|record| record.player.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScoreRecord;

    fn record(league: &str, circuit: &str, player: &str) -> ScoreRecord {
        ScoreRecord {
            id: 0,
            league: league.to_string(),
            circuit: circuit.to_string(),
            player: player.to_string(),
            score: 0.0,
            completed: false,
            upload_id: None,
        }
    }

    #[test]
    fn distinct_sets_keep_first_seen_order() {
        let records = vec![
            record("S2", "Spa", "Bob"),
            record("S1", "Monza", "Alice"),
            record("S2", "Spa", "Alice"),
            record("S1", "Imola", "Bob"),
        ];

        assert_eq!(distinct_leagues(&records), vec!["S2", "S1"]);
        assert_eq!(distinct_circuits(&records), vec!["Spa", "Monza", "Imola"]);
        assert_eq!(distinct_players(&records), vec!["Bob", "Alice"]);
    }
}
