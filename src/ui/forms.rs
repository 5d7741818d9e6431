use anyhow::{anyhow, Context, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::NewScore;

/// Enumerates the fields within the score entry form to drive focus
/// management.
#[derive(Copy, Clone, PartialEq, Eq)]
pub(crate) enum ScoreField {
    League,
    Circuit,
    Player,
    Score,
    Completed,
}

impl Default for ScoreField {
    fn default() -> Self {
        ScoreField::League
    }
}

impl ScoreField {
    /// Whether the field holds free text (and therefore participates in
    /// autocomplete).
    fn is_text(self) -> bool {
        matches!(
            self,
            ScoreField::League | ScoreField::Circuit | ScoreField::Player
        )
    }
}

/// Form state for manual score entry, including autocomplete tracking for the
/// three free-text fields. The form survives a successful save so several
/// results for the same race can be entered back to back.
#[derive(Default, Clone)]
pub(crate) struct ScoreForm {
    pub(crate) league: String,
    pub(crate) circuit: String,
    pub(crate) player: String,
    pub(crate) score: String,
    pub(crate) completed: bool,
    pub(crate) active: ScoreField,
    pub(crate) error: Option<String>,
    pub(crate) suggestion: Option<String>,
    pub(crate) autocomplete_disabled: bool,
}

impl ScoreForm {
    /// Seed the form with the league currently shown in the standings, since
    /// that is almost always the league the next result belongs to.
    pub(crate) fn with_league(league: Option<&str>) -> Self {
        let mut form = Self::default();
        if let Some(league) = league {
            form.league = league.to_string();
        }
        form
    }

    /// Cycle focus across the five fields.
    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            ScoreField::League => ScoreField::Circuit,
            ScoreField::Circuit => ScoreField::Player,
            ScoreField::Player => ScoreField::Score,
            ScoreField::Score => ScoreField::Completed,
            ScoreField::Completed => ScoreField::League,
        };
        if !self.active.is_text() {
            self.clear_suggestion();
        }
    }

    /// Insert a character into the active field. The score field only accepts
    /// numeric input, and typing a score marks the record completed (the
    /// checkbox stays editable afterwards).
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            ScoreField::League => {
                self.autocomplete_disabled = false;
                self.league.push(ch);
            }
            ScoreField::Circuit => {
                self.autocomplete_disabled = false;
                self.circuit.push(ch);
            }
            ScoreField::Player => {
                self.autocomplete_disabled = false;
                self.player.push(ch);
            }
            ScoreField::Score => {
                if !(ch.is_ascii_digit() || ch == '.' || ch == '-') {
                    return false;
                }
                self.score.push(ch);
                self.completed = true;
            }
            ScoreField::Completed => return false,
        }
        true
    }

    /// Remove a character from the active field.
    pub(crate) fn backspace(&mut self) {
        match self.active {
            ScoreField::League => {
                self.league.pop();
                self.autocomplete_disabled = false;
            }
            ScoreField::Circuit => {
                self.circuit.pop();
                self.autocomplete_disabled = false;
            }
            ScoreField::Player => {
                self.player.pop();
                self.autocomplete_disabled = false;
            }
            ScoreField::Score => {
                self.score.pop();
                self.completed = !self.score.is_empty();
            }
            ScoreField::Completed => {}
        }
    }

    /// Flip the completed checkbox.
    pub(crate) fn toggle_completed(&mut self) {
        self.completed = !self.completed;
    }

    /// Validate the inputs and return a record ready for persistence. All
    /// four value fields are required; the store itself does not check.
    pub(crate) fn parse_inputs(&self) -> Result<NewScore> {
        let league = self.league.trim();
        if league.is_empty() {
            return Err(anyhow!("League name is required."));
        }
        let circuit = self.circuit.trim();
        if circuit.is_empty() {
            return Err(anyhow!("Circuit name is required."));
        }
        let player = self.player.trim();
        if player.is_empty() {
            return Err(anyhow!("Player name is required."));
        }
        let score_raw = self.score.trim();
        if score_raw.is_empty() {
            return Err(anyhow!("Score is required."));
        }
        let score = score_raw
            .parse::<f64>()
            .context("Score must be a number.")?;

        Ok(NewScore::manual(
            league,
            circuit,
            player,
            score,
            self.completed,
        ))
    }

    /// Clear the per-result fields after a save while keeping league and
    /// circuit, so the next player's result can be typed immediately.
    pub(crate) fn reset_for_next(&mut self) {
        self.player.clear();
        self.score.clear();
        self.completed = false;
        self.active = ScoreField::Player;
        self.error = None;
        self.suggestion = None;
        self.autocomplete_disabled = false;
    }

    /// Borrow the text of the active field, when it is a text field.
    fn active_text(&self) -> Option<&String> {
        match self.active {
            ScoreField::League => Some(&self.league),
            ScoreField::Circuit => Some(&self.circuit),
            ScoreField::Player => Some(&self.player),
            _ => None,
        }
    }

    /// Update the autocomplete suggestion for the active text field. The
    /// candidate list depends on which field has focus.
    pub(crate) fn update_suggestion(
        &mut self,
        leagues: &[String],
        circuits: &[String],
        players: &[String],
    ) {
        let candidates = match self.active {
            ScoreField::League => leagues,
            ScoreField::Circuit => circuits,
            ScoreField::Player => players,
            _ => {
                self.clear_suggestion();
                return;
            }
        };

        let current = match self.active_text() {
            Some(text) => text,
            None => {
                self.clear_suggestion();
                return;
            }
        };

        if self.autocomplete_disabled || current.chars().count() < 2 {
            self.clear_suggestion();
            return;
        }

        let current_lower = current.to_lowercase();
        let maybe_match = candidates
            .iter()
            .find(|candidate| candidate.to_lowercase().starts_with(&current_lower));

        if let Some(candidate) = maybe_match {
            if candidate.chars().count() == current.chars().count()
                && candidate.to_lowercase() == current_lower
            {
                self.suggestion = None;
            } else {
                self.suggestion = Some(candidate.clone());
            }
        } else {
            self.suggestion = None;
        }
    }

    /// Apply the suggested value, marking autocomplete as satisfied.
    pub(crate) fn accept_suggestion(&mut self) -> bool {
        if self.suggestion_suffix().is_some() {
            if let Some(candidate) = self.suggestion.clone() {
                match self.active {
                    ScoreField::League => self.league = candidate,
                    ScoreField::Circuit => self.circuit = candidate,
                    ScoreField::Player => self.player = candidate,
                    _ => return false,
                }
                self.autocomplete_disabled = true;
                self.suggestion = None;
                return true;
            }
        }
        false
    }

    /// Explicitly disable autocomplete for the rest of this interaction.
    pub(crate) fn cancel_autocomplete(&mut self) -> bool {
        if self.active.is_text() && self.suggestion.is_some() {
            self.autocomplete_disabled = true;
            self.suggestion = None;
            return true;
        }
        false
    }

    /// Drop the current suggestion.
    fn clear_suggestion(&mut self) {
        self.suggestion = None;
    }

    /// Return the remaining characters to display as a ghosted autocomplete
    /// hint.
    pub(crate) fn suggestion_suffix(&self) -> Option<String> {
        let candidate = self.suggestion.as_ref()?;
        let current_len = self.active_text()?.chars().count();
        let mut chars = candidate.chars();
        for _ in 0..current_len {
            chars.next()?;
        }
        let suffix: String = chars.collect();
        if suffix.is_empty() {
            None
        } else {
            Some(suffix)
        }
    }

    /// Whether we currently have a suggestion to show for the active field.
    pub(crate) fn has_active_suggestion(&self) -> bool {
        self.active.is_text() && self.suggestion.is_some()
    }

    /// Render a styled line for the modal form, optionally appending the
    /// autocomplete suffix.
    pub(crate) fn build_line(&self, field_name: &str, field: ScoreField) -> Line<'static> {
        let is_active = self.active == field;

        if field == ScoreField::Completed {
            let checkbox = if self.completed { "[x]" } else { "[ ]" };
            let style = if is_active {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            return Line::from(vec![
                Span::raw(format!("{field_name}: ")),
                Span::styled(format!("{checkbox} finished"), style),
            ]);
        }

        let value = match field {
            ScoreField::League => &self.league,
            ScoreField::Circuit => &self.circuit,
            ScoreField::Player => &self.player,
            ScoreField::Score => &self.score,
            ScoreField::Completed => unreachable!(),
        };

        let display = if value.is_empty() {
            "<required>".to_string()
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        let mut spans = vec![Span::raw(format!("{field_name}: "))];

        if field.is_text() && is_active && !value.is_empty() {
            spans.push(Span::styled(value.clone(), style));
            if let Some(suffix) = self.suggestion_suffix() {
                spans.push(Span::styled(suffix, Style::default().fg(Color::DarkGray)));
            }
        } else {
            spans.push(Span::styled(display, style));
        }

        Line::from(spans)
    }

    /// Character length of the requested field, used for cursor placement.
    pub(crate) fn value_len(&self, field: ScoreField) -> usize {
        match field {
            ScoreField::League => self.league.chars().count(),
            ScoreField::Circuit => self.circuit.chars().count(),
            ScoreField::Player => self.player.chars().count(),
            ScoreField::Score => self.score.chars().count(),
            ScoreField::Completed => 0,
        }
    }
}

/// Fields available within the CSV upload form.
#[derive(Copy, Clone, PartialEq, Eq)]
pub(crate) enum UploadField {
    League,
    Circuit,
    Path,
}

impl Default for UploadField {
    fn default() -> Self {
        UploadField::League
    }
}

/// Internal representation of the CSV upload form. League and circuit apply
/// to every row of the file; the path is read at submit time.
#[derive(Default, Clone)]
pub(crate) struct UploadForm {
    pub(crate) league: String,
    pub(crate) circuit: String,
    pub(crate) path: String,
    pub(crate) active: UploadField,
    pub(crate) error: Option<String>,
}

impl UploadForm {
    /// Cycle focus across the three fields.
    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            UploadField::League => UploadField::Circuit,
            UploadField::Circuit => UploadField::Path,
            UploadField::Path => UploadField::League,
        };
    }

    /// Append a character to the active field.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            UploadField::League => self.league.push(ch),
            UploadField::Circuit => self.circuit.push(ch),
            UploadField::Path => self.path.push(ch),
        }
        true
    }

    /// Remove the last character from the active field.
    pub(crate) fn backspace(&mut self) {
        match self.active {
            UploadField::League => {
                self.league.pop();
            }
            UploadField::Circuit => {
                self.circuit.pop();
            }
            UploadField::Path => {
                self.path.pop();
            }
        }
    }

    /// Validate that the file, league, and circuit are all present before an
    /// import is attempted. The import itself performs no such checks.
    pub(crate) fn parse_inputs(&self) -> Result<(String, String, String)> {
        let league = self.league.trim();
        if league.is_empty() {
            return Err(anyhow!("League name is required."));
        }
        let circuit = self.circuit.trim();
        if circuit.is_empty() {
            return Err(anyhow!("Circuit name is required."));
        }
        let path = self.path.trim();
        if path.is_empty() {
            return Err(anyhow!("CSV file path is required."));
        }
        Ok((league.to_string(), circuit.to_string(), path.to_string()))
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field_name: &str, field: UploadField) -> Line<'static> {
        let (value, is_active) = match field {
            UploadField::League => (&self.league, self.active == UploadField::League),
            UploadField::Circuit => (&self.circuit, self.active == UploadField::Circuit),
            UploadField::Path => (&self.path, self.active == UploadField::Path),
        };

        let display = if value.is_empty() {
            "<required>".to_string()
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{field_name}: ")),
            Span::styled(display, style),
        ])
    }

    /// Return the character count for the requested field.
    pub(crate) fn value_len(&self, field: UploadField) -> usize {
        match field {
            UploadField::League => self.league.chars().count(),
            UploadField::Circuit => self.circuit.chars().count(),
            UploadField::Path => self.path.chars().count(),
        }
    }
}

/// State for confirming the removal of the most recent CSV upload.
#[derive(Clone)]
pub(crate) struct ConfirmUndoUpload {
    pub(crate) upload_id: String,
    pub(crate) inserted: usize,
    pub(crate) league: String,
    pub(crate) circuit: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_form_requires_every_value_field() {
        let mut form = ScoreForm::default();
        form.league = "S1".to_string();
        form.circuit = "Monza".to_string();
        assert!(form.parse_inputs().is_err());

        form.player = "Alice".to_string();
        form.score = "12.5".to_string();
        let record = form.parse_inputs().unwrap();
        assert_eq!(record.player, "Alice");
        assert_eq!(record.score, 12.5);
    }

    #[test]
    fn typing_a_score_marks_the_record_completed() {
        let mut form = ScoreForm::default();
        form.active = ScoreField::Score;

        assert!(form.push_char('7'));
        assert!(form.completed);

        form.backspace();
        assert!(!form.completed);
    }

    #[test]
    fn score_field_rejects_non_numeric_input() {
        let mut form = ScoreForm::default();
        form.active = ScoreField::Score;

        assert!(!form.push_char('x'));
        assert!(form.push_char('1'));
        assert!(form.push_char('.'));
        assert!(form.push_char('5'));
        assert_eq!(form.score, "1.5");
    }

    #[test]
    fn suggestions_complete_the_active_text_field() {
        let leagues = vec!["Season One".to_string()];
        let circuits = vec!["Monza".to_string()];
        let players = Vec::new();

        let mut form = ScoreForm::default();
        form.active = ScoreField::Circuit;
        form.circuit = "Mo".to_string();
        form.update_suggestion(&leagues, &circuits, &players);
        assert_eq!(form.suggestion_suffix().as_deref(), Some("nza"));

        assert!(form.accept_suggestion());
        assert_eq!(form.circuit, "Monza");
        assert!(form.suggestion.is_none());
    }

    #[test]
    fn upload_form_blocks_missing_fields() {
        let mut form = UploadForm::default();
        form.league = "S1".to_string();
        form.circuit = "Spa".to_string();
        assert!(form.parse_inputs().is_err());

        form.path = "results.csv".to_string();
        let (league, circuit, path) = form.parse_inputs().unwrap();
        assert_eq!(league, "S1");
        assert_eq!(circuit, "Spa");
        assert_eq!(path, "results.csv");
    }
}
