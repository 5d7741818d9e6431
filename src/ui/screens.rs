use std::cmp::min;
use std::collections::HashSet;

use crate::models::ScoreRecord;
use crate::stats::{
    completion_rates, distinct_leagues, league_standings, CompletionRate, SortDirection, SortKey,
    StandingsTable,
};

use super::forms::UploadForm;

/// Backing state for the standings view: the league selector, the aggregated
/// table, and the active sort. The table is rebuilt from the full record list
/// whenever the data or the selected league changes.
pub(crate) struct StandingsScreen {
    pub(crate) leagues: Vec<String>,
    pub(crate) league_index: usize,
    pub(crate) table: StandingsTable,
    pub(crate) sort_key: SortKey,
    pub(crate) sort_direction: SortDirection,
    /// Column the cursor sits on: 0 = player, 1 = total, 2.. = circuits.
    pub(crate) active_column: usize,
    pub(crate) scroll: u16,
}

impl StandingsScreen {
    pub(crate) fn new(records: &[ScoreRecord]) -> Self {
        let mut screen = Self {
            leagues: Vec::new(),
            league_index: 0,
            table: StandingsTable {
                circuits: Vec::new(),
                rows: Vec::new(),
            },
            sort_key: SortKey::TotalScore,
            sort_direction: SortDirection::Descending,
            active_column: 1,
            scroll: 0,
        };
        screen.rebuild(records);
        screen
    }

    /// Recompute leagues and the aggregated table from a fresh record list.
    /// The selected league is tracked by name so inserts that reorder the
    /// league list do not silently switch the view.
    pub(crate) fn rebuild(&mut self, records: &[ScoreRecord]) {
        let current = self.current_league().map(str::to_string);
        self.leagues = distinct_leagues(records);

        self.league_index = current
            .and_then(|name| self.leagues.iter().position(|league| *league == name))
            .unwrap_or(0);

        match self.leagues.get(self.league_index) {
            Some(league) => {
                self.table = league_standings(records, league);
            }
            None => {
                self.table = StandingsTable {
                    circuits: Vec::new(),
                    rows: Vec::new(),
                };
            }
        }

        // A circuit sort can outlive its column when the league changes.
        if let SortKey::Circuit(idx) = self.sort_key {
            if idx >= self.table.circuits.len() {
                self.sort_key = SortKey::TotalScore;
                self.sort_direction = SortDirection::Descending;
            }
        }
        if self.active_column >= self.column_count() {
            self.active_column = self.column_count() - 1;
        }

        self.table.sort_by(self.sort_key, self.sort_direction);
        self.clamp_scroll();
    }

    pub(crate) fn current_league(&self) -> Option<&str> {
        self.leagues.get(self.league_index).map(String::as_str)
    }

    /// Jump to the next or previous league; the modulo arithmetic keeps the
    /// navigation circular.
    pub(crate) fn cycle_league(&mut self, offset: isize, records: &[ScoreRecord]) {
        if self.leagues.is_empty() {
            return;
        }
        let len = self.leagues.len() as isize;
        self.league_index = ((self.league_index as isize + offset).rem_euclid(len)) as usize;
        self.scroll = 0;
        self.rebuild(records);
    }

    /// Fixed columns plus one per circuit.
    pub(crate) fn column_count(&self) -> usize {
        2 + self.table.circuits.len()
    }

    pub(crate) fn move_column(&mut self, offset: isize) {
        let count = self.column_count() as isize;
        let new_index = self.active_column as isize + offset;
        if (0..count).contains(&new_index) {
            self.active_column = new_index as usize;
        }
    }

    pub(crate) fn key_for_column(&self, column: usize) -> SortKey {
        match column {
            0 => SortKey::Player,
            1 => SortKey::TotalScore,
            n => SortKey::Circuit(n - 2),
        }
    }

    /// Sort on the active column. The first request sorts ascending; asking
    /// again flips to descending, the way clickable column headers usually
    /// behave.
    pub(crate) fn request_sort(&mut self) {
        let key = self.key_for_column(self.active_column);
        if self.sort_key == key && self.sort_direction == SortDirection::Ascending {
            self.sort_direction = SortDirection::Descending;
        } else {
            self.sort_key = key;
            self.sort_direction = SortDirection::Ascending;
        }
        self.table.sort_by(self.sort_key, self.sort_direction);
    }

    pub(crate) fn scroll_rows(&mut self, delta: isize) {
        let max = self.table.rows.len().saturating_sub(1) as isize;
        let mut new = self.scroll as isize + delta;
        if new < 0 {
            new = 0;
        }
        if new > max {
            new = max;
        }
        self.scroll = new as u16;
    }

    fn clamp_scroll(&mut self) {
        let max = self.table.rows.len().saturating_sub(1) as u16;
        self.scroll = min(self.scroll, max);
    }
}

/// Backing state for the completion-rate view: a league checklist and the
/// rates computed over whichever leagues are ticked. Nothing is selected at
/// first, so the table starts empty rather than showing all leagues.
pub(crate) struct CompletionScreen {
    pub(crate) leagues: Vec<String>,
    pub(crate) selected: HashSet<String>,
    pub(crate) cursor: usize,
    pub(crate) rates: Vec<CompletionRate>,
}

impl CompletionScreen {
    pub(crate) fn new(records: &[ScoreRecord]) -> Self {
        Self {
            leagues: distinct_leagues(records),
            selected: HashSet::new(),
            cursor: 0,
            rates: Vec::new(),
        }
    }

    /// Refresh the league list and drop selections that no longer exist.
    pub(crate) fn rebuild(&mut self, records: &[ScoreRecord]) {
        self.leagues = distinct_leagues(records);
        self.selected
            .retain(|league| self.leagues.contains(league));
        if !self.leagues.is_empty() && self.cursor >= self.leagues.len() {
            self.cursor = self.leagues.len() - 1;
        }
        self.recompute_rates(records);
    }

    pub(crate) fn move_cursor(&mut self, offset: isize) {
        if self.leagues.is_empty() {
            return;
        }
        let len = self.leagues.len() as isize;
        let mut new = self.cursor as isize + offset;
        if new < 0 {
            new = 0;
        }
        if new >= len {
            new = len - 1;
        }
        self.cursor = new as usize;
    }

    pub(crate) fn is_selected(&self, league: &str) -> bool {
        self.selected.contains(league)
    }

    /// Tick or untick the league under the cursor and recompute the rates.
    pub(crate) fn toggle_current(&mut self, records: &[ScoreRecord]) {
        if let Some(league) = self.leagues.get(self.cursor) {
            if !self.selected.remove(league) {
                self.selected.insert(league.clone());
            }
        }
        self.recompute_rates(records);
    }

    fn recompute_rates(&mut self, records: &[ScoreRecord]) {
        // Pass the selection in checklist order so the aggregation sees a
        // stable list, not HashSet iteration order.
        let chosen: Vec<String> = self
            .leagues
            .iter()
            .filter(|league| self.selected.contains(*league))
            .cloned()
            .collect();
        self.rates = completion_rates(records, &chosen);
    }
}

/// Backing state for the CSV upload view. The remembered last upload lives on
/// the `App` rather than here because it must survive leaving and re-entering
/// this screen within one session.
pub(crate) struct UploadScreen {
    pub(crate) form: UploadForm,
}

impl UploadScreen {
    pub(crate) fn new() -> Self {
        Self {
            form: UploadForm::default(),
        }
    }
}
