use std::cmp::Ordering;

use crate::models::ScoreRecord;

use super::first_seen;

/// Per-player completion tally over the selected leagues.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRate {
    pub player: String,
    /// Races the player finished.
    pub completions: usize,
    /// Races the player entered.
    pub total: usize,
}

impl CompletionRate {
    /// Completion percentage in the 0-100 range.
    pub fn rate(&self) -> f64 {
        self.completions as f64 / self.total as f64 * 100.0
    }

    /// Percentage formatted with two decimals, the way the rate table shows
    /// it (`66.67`).
    pub fn formatted_rate(&self) -> String {
        format!("{:.2}", self.rate())
    }
}

/// Compute completion rates for every player with at least one record in the
/// selected leagues. An empty selection yields an empty result, not "all
/// leagues": the checklist starts blank and the table fills in as leagues are
/// ticked. Rows sort by rate descending; equal rates fall back to player name
/// ascending so the ordering never depends on record order.
pub fn completion_rates(records: &[ScoreRecord], leagues: &[String]) -> Vec<CompletionRate> {
    if leagues.is_empty() {
        return Vec::new();
    }

    let filtered: Vec<&ScoreRecord> = records
        .iter()
        .filter(|record| leagues.iter().any(|league| *league == record.league))
        .collect();

    let players = first_seen(filtered.iter().map(|record| record.player.as_str()));

    let mut rates: Vec<CompletionRate> = players
        .into_iter()
        .map(|player| {
            let mut total = 0;
            let mut completions = 0;
            for record in filtered.iter().filter(|record| record.player == player) {
                total += 1;
                if record.completed {
                    completions += 1;
                }
            }
            CompletionRate {
                player,
                completions,
                total,
            }
        })
        .collect();

    rates.sort_by(|a, b| match b.rate().total_cmp(&a.rate()) {
        Ordering::Equal => a.player.cmp(&b.player),
        ordering => ordering,
    });

    rates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(league: &str, player: &str, completed: bool) -> ScoreRecord {
        ScoreRecord {
            id: 0,
            league: league.to_string(),
            circuit: "C1".to_string(),
            player: player.to_string(),
            score: 1.0,
            completed,
            upload_id: None,
        }
    }

    #[test]
    fn rate_is_formatted_to_two_decimals() {
        let records = vec![
            record("S1", "P1", true),
            record("S1", "P1", false),
            record("S1", "P1", true),
        ];

        let rates = completion_rates(&records, &["S1".to_string()]);
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].completions, 2);
        assert_eq!(rates[0].total, 3);
        assert_eq!(rates[0].formatted_rate(), "66.67");
    }

    #[test]
    fn empty_selection_yields_empty_result() {
        let records = vec![record("S1", "P1", true)];
        assert!(completion_rates(&records, &[]).is_empty());
    }

    #[test]
    fn only_selected_leagues_count() {
        let records = vec![
            record("S1", "P1", true),
            record("S2", "P1", false),
            record("S2", "P2", true),
        ];

        let rates = completion_rates(&records, &["S1".to_string()]);
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].player, "P1");
        assert_eq!(rates[0].formatted_rate(), "100.00");

        let both = completion_rates(&records, &["S1".to_string(), "S2".to_string()]);
        assert_eq!(both.len(), 2);
        let p1 = both.iter().find(|rate| rate.player == "P1").unwrap();
        assert_eq!(p1.total, 2);
        assert_eq!(p1.completions, 1);
    }

    #[test]
    fn equal_rates_break_ties_by_player_name() {
        let records = vec![
            record("S1", "Zoe", true),
            record("S1", "Amy", true),
            record("S1", "Mia", false),
        ];

        let rates = completion_rates(&records, &["S1".to_string()]);
        let players: Vec<&str> = rates.iter().map(|rate| rate.player.as_str()).collect();
        assert_eq!(players, vec!["Amy", "Zoe", "Mia"]);
    }
}
