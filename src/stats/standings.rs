use std::cmp::Ordering;

use crate::models::ScoreRecord;

use super::first_seen;

/// One player's row in the standings: the summed total plus one cell per
/// circuit. Cells hold `None` when the player never posted a result on that
/// circuit, which is distinct from a recorded score of zero and sorts after
/// every real value.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStanding {
    pub player: String,
    pub total_score: f64,
    /// Parallel to [`StandingsTable::circuits`]; index `i` is the player's
    /// score on circuit `i`.
    pub circuit_scores: Vec<Option<f64>>,
}

/// Column the standings are sorted on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SortKey {
    Player,
    TotalScore,
    /// Index into [`StandingsTable::circuits`].
    Circuit(usize),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Aggregated standings for one league: the circuit columns in first-seen
/// order and one row per player.
#[derive(Debug, Clone)]
pub struct StandingsTable {
    pub circuits: Vec<String>,
    pub rows: Vec<PlayerStanding>,
}

/// Build the standings for a single league. Records outside the league are
/// ignored; circuits and players keep the order they first appeared in. Each
/// record adds its score to the player's total and overwrites the per-circuit
/// cell, so when a player has several records for the same circuit the last
/// one entered wins.
pub fn league_standings(records: &[ScoreRecord], league: &str) -> StandingsTable {
    let filtered: Vec<&ScoreRecord> = records
        .iter()
        .filter(|record| record.league == league)
        .collect();

    let circuits = first_seen(filtered.iter().map(|record| record.circuit.as_str()));
    let players = first_seen(filtered.iter().map(|record| record.player.as_str()));

    let mut rows: Vec<PlayerStanding> = players
        .into_iter()
        .map(|player| PlayerStanding {
            player,
            total_score: 0.0,
            circuit_scores: vec![None; circuits.len()],
        })
        .collect();

    for record in filtered {
        if let Some(row) = rows.iter_mut().find(|row| row.player == record.player) {
            row.total_score += record.score;
            if let Some(idx) = circuits
                .iter()
                .position(|circuit| *circuit == record.circuit)
            {
                row.circuit_scores[idx] = Some(record.score);
            }
        }
    }

    StandingsTable { circuits, rows }
}

impl StandingsTable {
    /// Re-order the rows in place. Player names compare lexicographically and
    /// totals numerically, in the requested direction. Circuit columns compare
    /// numerically too, but rows without a value for that circuit always land
    /// at the bottom, no matter the direction; flipping the sort should
    /// reorder real results, not surface the players who skipped the race.
    /// The sort is stable, so equal rows keep their aggregation order.
    pub fn sort_by(&mut self, key: SortKey, direction: SortDirection) {
        let descending = direction == SortDirection::Descending;
        match key {
            SortKey::Player => self.rows.sort_by(|a, b| {
                let ordering = a.player.cmp(&b.player);
                if descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            }),
            SortKey::TotalScore => self.rows.sort_by(|a, b| {
                let ordering = a.total_score.total_cmp(&b.total_score);
                if descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            }),
            SortKey::Circuit(idx) => self.rows.sort_by(|a, b| {
                let a_value = a.circuit_scores.get(idx).copied().flatten();
                let b_value = b.circuit_scores.get(idx).copied().flatten();
                match (a_value, b_value) {
                    (None, None) => Ordering::Equal,
                    (None, Some(_)) => Ordering::Greater,
                    (Some(_), None) => Ordering::Less,
                    (Some(a_score), Some(b_score)) => {
                        let ordering = a_score.total_cmp(&b_score);
                        if descending {
                            ordering.reverse()
                        } else {
                            ordering
                        }
                    }
                }
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(league: &str, circuit: &str, player: &str, score: f64) -> ScoreRecord {
        ScoreRecord {
            id: 0,
            league: league.to_string(),
            circuit: circuit.to_string(),
            player: player.to_string(),
            score,
            completed: true,
            upload_id: None,
        }
    }

    fn sample_table() -> StandingsTable {
        let records = vec![
            record("S1", "C1", "P1", 10.0),
            record("S1", "C2", "P1", 20.0),
            record("S1", "C1", "P2", 5.0),
            record("S2", "C9", "P9", 99.0),
        ];
        league_standings(&records, "S1")
    }

    #[test]
    fn totals_and_cells_follow_the_record_list() {
        let table = sample_table();

        assert_eq!(table.circuits, vec!["C1", "C2"]);
        assert_eq!(table.rows.len(), 2);

        let p1 = &table.rows[0];
        assert_eq!(p1.player, "P1");
        assert_eq!(p1.total_score, 30.0);
        assert_eq!(p1.circuit_scores, vec![Some(10.0), Some(20.0)]);

        let p2 = &table.rows[1];
        assert_eq!(p2.player, "P2");
        assert_eq!(p2.total_score, 5.0);
        assert_eq!(p2.circuit_scores, vec![Some(5.0), None]);
    }

    #[test]
    fn later_records_for_the_same_circuit_overwrite_the_cell() {
        let records = vec![
            record("S1", "C1", "P1", 10.0),
            record("S1", "C1", "P1", 25.0),
        ];
        let table = league_standings(&records, "S1");

        let p1 = &table.rows[0];
        assert_eq!(p1.circuit_scores, vec![Some(25.0)]);
        // The total still counts both records.
        assert_eq!(p1.total_score, 35.0);
    }

    #[test]
    fn sorting_by_total_descending() {
        let mut table = sample_table();
        table.sort_by(SortKey::TotalScore, SortDirection::Descending);
        let players: Vec<&str> = table.rows.iter().map(|row| row.player.as_str()).collect();
        assert_eq!(players, vec!["P1", "P2"]);

        table.sort_by(SortKey::TotalScore, SortDirection::Ascending);
        let players: Vec<&str> = table.rows.iter().map(|row| row.player.as_str()).collect();
        assert_eq!(players, vec!["P2", "P1"]);
    }

    #[test]
    fn missing_circuit_values_sort_last_in_both_directions() {
        let records = vec![
            record("S1", "C1", "P1", 10.0),
            record("S1", "C2", "P2", 7.0),
            record("S1", "C2", "P3", 3.0),
        ];

        let mut table = league_standings(&records, "S1");
        table.sort_by(SortKey::Circuit(1), SortDirection::Ascending);
        let players: Vec<&str> = table.rows.iter().map(|row| row.player.as_str()).collect();
        assert_eq!(players, vec!["P3", "P2", "P1"]);

        table.sort_by(SortKey::Circuit(1), SortDirection::Descending);
        let players: Vec<&str> = table.rows.iter().map(|row| row.player.as_str()).collect();
        assert_eq!(players, vec!["P2", "P3", "P1"]);
    }

    #[test]
    fn sorting_by_player_name() {
        let mut table = sample_table();
        table.sort_by(SortKey::Player, SortDirection::Descending);
        let players: Vec<&str> = table.rows.iter().map(|row| row.player.as_str()).collect();
        assert_eq!(players, vec!["P2", "P1"]);
    }
}
