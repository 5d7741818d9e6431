use std::cmp::min;
use std::fs;
use std::mem;

use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use rusqlite::Connection;

use crate::db::{add_score, fetch_scores, remove_scores_batch};
use crate::import::import_scores;
use crate::models::ScoreRecord;
use crate::stats::{distinct_circuits, distinct_leagues, distinct_players, SortDirection};

use super::forms::{ConfirmUndoUpload, ScoreField, ScoreForm, UploadField};
use super::helpers::{centered_rect, display_score, fit_cell, rate_bar, surface_error};
use super::screens::{CompletionScreen, StandingsScreen, UploadScreen};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Width of the rank column in both tables.
const RANK_WIDTH: usize = 5;
/// Width of the player column in both tables.
const PLAYER_WIDTH: usize = 18;
/// Width of the total column in the standings.
const TOTAL_WIDTH: usize = 9;
/// Width of each per-circuit column in the standings.
const CIRCUIT_WIDTH: usize = 12;
/// Width of the finished-count column in the rate table.
const FINISHED_WIDTH: usize = 10;
/// Width of the textual progress bar in the rate table.
const RATE_BAR_WIDTH: usize = 20;

/// High-level navigation states. Keeping this explicit makes it easy to reason
/// about which rendering path runs and what keyboard shortcuts should do.
enum Screen {
    Standings(StandingsScreen),
    Completion(CompletionScreen),
    Upload(UploadScreen),
}

/// Fine-grained modes layered over the current screen. Interactions borrow
/// from Vim-style modal flows (Normal vs. form entry vs. confirmation) so the
/// keyboard model stays predictable.
enum Mode {
    Normal,
    AddingScore(ScoreForm),
    ConfirmUndo(ConfirmUndoUpload),
}

/// Footer status line content with a severity that picks the color.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

#[derive(Copy, Clone)]
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Details of the most recent CSV import. This lives only for the lifetime of
/// the process: restarting the app makes the batch permanent, and importing
/// again supersedes it.
struct LastUpload {
    upload_id: String,
    inserted: usize,
    league: String,
    circuit: String,
}

/// Central application state shared across the TUI. The struct combines the
/// persistent connection, the in-memory record cache, and the active mode.
pub struct App {
    /// Long-lived SQLite connection. We keep it on the struct so every handler
    /// can synchronously issue queries without extra plumbing.
    conn: Connection,
    /// Copy of every score record, refreshed after each write so the derived
    /// tables always reflect the store.
    records: Vec<ScoreRecord>,
    /// Distinct league names cached for autocomplete.
    leagues: Vec<String>,
    /// Distinct circuit names cached for autocomplete.
    circuits: Vec<String>,
    /// Distinct player names cached for autocomplete.
    players: Vec<String>,
    /// Active high-level screen.
    screen: Screen,
    /// Current interaction mode for that screen.
    mode: Mode,
    /// Optional status line surfaced in the footer.
    status: Option<StatusMessage>,
    /// Remembered most recent CSV import, if any, backing the undo shortcut.
    last_upload: Option<LastUpload>,
}

impl App {
    /// Construct a new `App` from the preloaded record list. We store the
    /// provided connection directly so subsequent actions can hit the
    /// database without re-establishing a connection.
    pub fn new(conn: Connection, records: Vec<ScoreRecord>) -> Self {
        let leagues = distinct_leagues(&records);
        let circuits = distinct_circuits(&records);
        let players = distinct_players(&records);
        let screen = Screen::Standings(StandingsScreen::new(&records));

        Self {
            conn,
            records,
            leagues,
            circuits,
            players,
            screen,
            mode: Mode::Normal,
            status: None,
            last_upload: None,
        }
    }

    /// Top-level key dispatcher. The design funnels every key through the
    /// active `Mode`, which returns the next mode to run. The boolean result
    /// tells the outer loop whether the user requested an exit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mut mode = mem::replace(&mut self.mode, Mode::Normal);

        mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::AddingScore(form) => self.handle_add_score(code, form)?,
            Mode::ConfirmUndo(confirm) => self.handle_confirm_undo(code, confirm)?,
        };

        self.mode = mode;
        Ok(exit)
    }

    /// Handle keys while in `Mode::Normal`. This branch performs most of the
    /// navigation work (cycling leagues, moving the sort column, switching
    /// screens) and returns the next mode the application should switch to.
    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match self.screen {
            Screen::Standings(ref mut standings) => {
                let mut open_completion = false;
                let mut open_upload = false;
                let mut reload = false;
                let mut score_form: Option<ScoreForm> = None;

                match code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        *exit = true;
                    }
                    KeyCode::Left => standings.move_column(-1),
                    KeyCode::Right => standings.move_column(1),
                    KeyCode::Up => standings.scroll_rows(-1),
                    KeyCode::Down => standings.scroll_rows(1),
                    KeyCode::PageUp => standings.scroll_rows(-5),
                    KeyCode::PageDown => standings.scroll_rows(5),
                    KeyCode::Tab => standings.cycle_league(1, &self.records),
                    KeyCode::BackTab => standings.cycle_league(-1, &self.records),
                    KeyCode::Enter => standings.request_sort(),
                    KeyCode::Char('+') | KeyCode::Char('a') | KeyCode::Char('A') => {
                        score_form = Some(ScoreForm::with_league(standings.current_league()));
                    }
                    KeyCode::Char('c') | KeyCode::Char('C') => open_completion = true,
                    KeyCode::Char('u') | KeyCode::Char('U') => open_upload = true,
                    KeyCode::Char('r') | KeyCode::Char('R') => reload = true,
                    _ => {}
                }

                if let Some(form) = score_form {
                    self.clear_status();
                    return Ok(Mode::AddingScore(form));
                }
                if open_completion {
                    self.clear_status();
                    self.open_completion()?;
                } else if open_upload {
                    self.clear_status();
                    self.open_upload()?;
                } else if reload {
                    self.reload_data()?;
                    self.set_status(
                        format!("Reloaded {} records.", self.records.len()),
                        StatusKind::Info,
                    );
                }
                Ok(Mode::Normal)
            }
            Screen::Completion(ref mut completion) => {
                let mut back = false;

                match code {
                    KeyCode::Char('q') => {
                        *exit = true;
                    }
                    KeyCode::Esc => back = true,
                    KeyCode::Up => completion.move_cursor(-1),
                    KeyCode::Down => completion.move_cursor(1),
                    KeyCode::PageUp => completion.move_cursor(-5),
                    KeyCode::PageDown => completion.move_cursor(5),
                    KeyCode::Char(' ') | KeyCode::Enter => {
                        completion.toggle_current(&self.records)
                    }
                    _ => {}
                }

                if back {
                    self.clear_status();
                    self.open_standings()?;
                }
                Ok(Mode::Normal)
            }
            Screen::Upload(ref mut upload) => {
                let mut back = false;
                let mut submit = false;

                match code {
                    KeyCode::Esc => back = true,
                    KeyCode::Tab | KeyCode::BackTab => upload.form.toggle_field(),
                    KeyCode::Backspace => upload.form.backspace(),
                    KeyCode::Enter => submit = true,
                    KeyCode::Char(ch) => {
                        if upload.form.push_char(ch) {
                            upload.form.error = None;
                        }
                    }
                    _ => {}
                }

                if back {
                    self.clear_status();
                    self.open_standings()?;
                } else if submit {
                    self.submit_upload()?;
                }
                Ok(Mode::Normal)
            }
        }
    }

    /// Process key presses while the score entry form is active. A successful
    /// save keeps the form open with league and circuit retained so the next
    /// result for the same race can be typed immediately.
    fn handle_add_score(&mut self, code: KeyCode, mut form: ScoreForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                if !form.cancel_autocomplete() {
                    self.set_status("Score entry closed.", StatusKind::Info);
                    keep_open = false;
                }
            }
            KeyCode::Tab => {
                let consumed = form.has_active_suggestion() && form.accept_suggestion();
                if !consumed {
                    form.toggle_field();
                }
                form.update_suggestion(&self.leagues, &self.circuits, &self.players);
            }
            KeyCode::BackTab => {
                form.toggle_field();
                form.update_suggestion(&self.leagues, &self.circuits, &self.players);
            }
            KeyCode::Backspace => {
                form.backspace();
                form.update_suggestion(&self.leagues, &self.circuits, &self.players);
            }
            KeyCode::Enter => match form.parse_inputs() {
                Ok(new_score) => match add_score(&self.conn, &new_score) {
                    Ok(record) => {
                        self.reload_data()?;
                        self.set_status(
                            format!("Saved result for {}.", record.player),
                            StatusKind::Info,
                        );
                        form.reset_for_next();
                    }
                    Err(err) => {
                        let message = surface_error(&err);
                        form.error = Some(message.clone());
                        self.set_status(message, StatusKind::Error);
                    }
                },
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if ch == ' ' && form.active == ScoreField::Completed {
                    form.toggle_completed();
                } else if form.push_char(ch) {
                    form.error = None;
                    form.update_suggestion(&self.leagues, &self.circuits, &self.players);
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::AddingScore(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    /// Confirmation dialog for undoing the last CSV import. Escape cancels,
    /// enter confirms.
    fn handle_confirm_undo(&mut self, code: KeyCode, confirm: ConfirmUndoUpload) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Undo cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match remove_scores_batch(&self.conn, &confirm.upload_id) {
                    Ok(removed) => {
                        self.last_upload = None;
                        self.reload_data()?;
                        let plural = if removed == 1 { "" } else { "s" };
                        self.set_status(
                            format!("Removed {removed} imported result{plural}."),
                            StatusKind::Info,
                        );
                        Ok(Mode::Normal)
                    }
                    Err(err) => {
                        let message = surface_error(&err);
                        self.set_status(message, StatusKind::Error);
                        Ok(Mode::ConfirmUndo(confirm))
                    }
                }
            }
            _ => Ok(Mode::ConfirmUndo(confirm)),
        }
    }

    /// Called from the event loop when Ctrl+U is pressed. Opens the undo
    /// confirmation when an import from this session is still undoable;
    /// otherwise reports that there is nothing to undo instead of erroring.
    pub(crate) fn handle_ctrl_u(&mut self) -> Result<()> {
        if !matches!(self.mode, Mode::Normal) {
            return Ok(());
        }

        match &self.last_upload {
            Some(last) => {
                self.mode = Mode::ConfirmUndo(ConfirmUndoUpload {
                    upload_id: last.upload_id.clone(),
                    inserted: last.inserted,
                    league: last.league.clone(),
                    circuit: last.circuit.clone(),
                });
            }
            None => self.set_status("Nothing to undo.", StatusKind::Info),
        }
        Ok(())
    }

    /// Validate the upload form, read the CSV file, and run the import. All
    /// failures land in the status footer; the remembered upload is only
    /// replaced once a batch actually made it into the store.
    fn submit_upload(&mut self) -> Result<()> {
        let parsed = match &self.screen {
            Screen::Upload(upload) => upload.form.parse_inputs(),
            _ => return Ok(()),
        };

        let (league, circuit, path) = match parsed {
            Ok(values) => values,
            Err(err) => {
                let message = surface_error(&err);
                self.set_upload_error(message.clone());
                self.set_status(message, StatusKind::Error);
                return Ok(());
            }
        };

        let text = match fs::read_to_string(&path)
            .with_context(|| format!("Could not read {path}."))
        {
            Ok(text) => text,
            Err(err) => {
                let message = surface_error(&err);
                self.set_upload_error(message.clone());
                self.set_status(message, StatusKind::Error);
                return Ok(());
            }
        };

        match import_scores(&self.conn, &text, &league, &circuit) {
            Ok(batch) => {
                if batch.inserted == 0 {
                    let message = "No result rows found in the CSV file.".to_string();
                    self.set_upload_error(message.clone());
                    self.set_status(message, StatusKind::Error);
                    return Ok(());
                }

                let inserted = batch.inserted;
                self.last_upload = Some(LastUpload {
                    upload_id: batch.upload_id,
                    inserted,
                    league: league.clone(),
                    circuit: circuit.clone(),
                });
                self.reload_data()?;

                if let Screen::Upload(upload) = &mut self.screen {
                    upload.form.path.clear();
                    upload.form.error = None;
                }

                let plural = if inserted == 1 { "" } else { "s" };
                self.set_status(
                    format!("Imported {inserted} result{plural} into {league} / {circuit}."),
                    StatusKind::Info,
                );
            }
            Err(err) => {
                let message = surface_error(&err);
                self.set_upload_error(message.clone());
                self.set_status(message, StatusKind::Error);
            }
        }

        Ok(())
    }

    /// Stash an error message on the upload form, if that screen is active.
    fn set_upload_error(&mut self, message: String) {
        if let Screen::Upload(upload) = &mut self.screen {
            upload.form.error = Some(message);
        }
    }

    /// Re-fetch every record from the store, refresh the autocomplete caches,
    /// and rebuild whatever screen is showing. Every write funnels through
    /// here so the derived tables never go stale.
    fn reload_data(&mut self) -> Result<()> {
        self.records = fetch_scores(&self.conn)?;
        self.refresh_caches();

        match &mut self.screen {
            Screen::Standings(standings) => standings.rebuild(&self.records),
            Screen::Completion(completion) => completion.rebuild(&self.records),
            Screen::Upload(_) => {}
        }
        Ok(())
    }

    /// Recompute the distinct-value caches backing autocomplete.
    fn refresh_caches(&mut self) {
        self.leagues = distinct_leagues(&self.records);
        self.circuits = distinct_circuits(&self.records);
        self.players = distinct_players(&self.records);
    }

    /// Switch to the standings view with freshly fetched records.
    fn open_standings(&mut self) -> Result<()> {
        self.records = fetch_scores(&self.conn)?;
        self.refresh_caches();
        self.screen = Screen::Standings(StandingsScreen::new(&self.records));
        Ok(())
    }

    /// Switch to the completion-rate view with freshly fetched records.
    fn open_completion(&mut self) -> Result<()> {
        self.records = fetch_scores(&self.conn)?;
        self.refresh_caches();
        self.screen = Screen::Completion(CompletionScreen::new(&self.records));
        Ok(())
    }

    /// Switch to the CSV upload view.
    fn open_upload(&mut self) -> Result<()> {
        self.screen = Screen::Upload(UploadScreen::new());
        Ok(())
    }

    fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    /// Main render routine invoked each tick by Ratatui. Splits the frame into
    /// content and footer regions and dispatches to the active screen.
    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.screen {
            Screen::Standings(standings) => self.draw_standings(frame, content_area, standings),
            Screen::Completion(completion) => {
                self.draw_completion(frame, content_area, completion)
            }
            Screen::Upload(upload) => self.draw_upload(frame, content_area, upload),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::AddingScore(form) => self.draw_score_form(frame, area, form),
            Mode::ConfirmUndo(confirm) => self.draw_confirm_undo(frame, area, confirm),
            Mode::Normal => {}
        }
    }

    /// Render the standings: a league header plus the sortable score table.
    fn draw_standings(&self, frame: &mut Frame, area: Rect, standings: &StandingsScreen) {
        if standings.leagues.is_empty() {
            let message = Paragraph::new("No scores yet. Press '+' to add one.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Standings"));
            frame.render_widget(message, area);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(area);

        let league = standings.current_league().unwrap_or("").to_string();
        let header = Paragraph::new(vec![
            Line::from(vec![
                Span::styled(league, Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(format!(
                    "  •  league {}/{}",
                    standings.league_index + 1,
                    standings.leagues.len()
                )),
            ]),
            Line::from(Span::raw(format!(
                "{} players across {} circuits",
                standings.table.rows.len(),
                standings.table.circuits.len()
            ))),
        ])
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::ALL).title("Standings"));
        frame.render_widget(header, chunks[0]);

        let block = Block::default().borders(Borders::ALL).title("Scores");
        let inner = block.inner(chunks[1]);
        frame.render_widget(block, chunks[1]);
        if inner.height == 0 {
            return;
        }

        let table_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        frame.render_widget(
            Paragraph::new(self.standings_header_line(standings)),
            table_chunks[0],
        );

        let rows = standings_row_lines(standings).join("\n");
        let paragraph = Paragraph::new(rows).scroll((standings.scroll, 0));
        frame.render_widget(paragraph, table_chunks[1]);
    }

    /// Build the column header for the standings table. The active column is
    /// highlighted and the sorted column carries a direction arrow.
    fn standings_header_line(&self, standings: &StandingsScreen) -> Line<'static> {
        let mut spans = vec![Span::styled(
            fit_cell("#", RANK_WIDTH),
            Style::default().add_modifier(Modifier::BOLD),
        )];

        let mut columns: Vec<(String, usize)> = vec![
            ("Player".to_string(), PLAYER_WIDTH),
            ("Total".to_string(), TOTAL_WIDTH),
        ];
        for circuit in &standings.table.circuits {
            columns.push((circuit.clone(), CIRCUIT_WIDTH));
        }

        for (idx, (label, width)) in columns.into_iter().enumerate() {
            let mut text = label;
            if standings.sort_key == standings.key_for_column(idx) {
                text.push(' ');
                text.push(match standings.sort_direction {
                    SortDirection::Ascending => '▲',
                    SortDirection::Descending => '▼',
                });
            }

            let style = if idx == standings.active_column {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            spans.push(Span::styled(fit_cell(&text, width), style));
        }

        Line::from(spans)
    }

    /// Render the completion-rate view: the league checklist on top, the rate
    /// table underneath.
    fn draw_completion(&self, frame: &mut Frame, area: Rect, completion: &CompletionScreen) {
        if completion.leagues.is_empty() {
            let message = Paragraph::new("No scores yet. Add results before computing rates.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Completion"));
            frame.render_widget(message, area);
            return;
        }

        let checklist_height = min(completion.leagues.len() as u16 + 2, area.height / 2);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(checklist_height), Constraint::Min(1)])
            .split(area);

        let checklist_lines: Vec<Line> = completion
            .leagues
            .iter()
            .enumerate()
            .map(|(idx, league)| {
                let pointer = if idx == completion.cursor { "▶ " } else { "  " };
                let checkbox = if completion.is_selected(league) {
                    "[x]"
                } else {
                    "[ ]"
                };
                Line::from(format!("{pointer}{checkbox} {league}"))
            })
            .collect();

        let checklist = Paragraph::new(checklist_lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Leagues (Space to toggle)"),
        );
        frame.render_widget(checklist, chunks[0]);

        if completion.selected.is_empty() {
            let message = Paragraph::new("Tick at least one league to see completion rates.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Completion"));
            frame.render_widget(message, chunks[1]);
            return;
        }

        let mut lines = vec![Line::from(Span::styled(
            format!(
                "{}{}{}Rate",
                fit_cell("#", RANK_WIDTH),
                fit_cell("Player", PLAYER_WIDTH),
                fit_cell("Finished", FINISHED_WIDTH),
            ),
            Style::default().add_modifier(Modifier::BOLD),
        ))];

        for (idx, rate) in completion.rates.iter().enumerate() {
            let mut text = fit_cell(&(idx + 1).to_string(), RANK_WIDTH);
            text.push_str(&fit_cell(&rate.player, PLAYER_WIDTH));
            text.push_str(&fit_cell(
                &format!("{}/{}", rate.completions, rate.total),
                FINISHED_WIDTH,
            ));
            text.push_str(&rate_bar(rate.rate(), RATE_BAR_WIDTH));
            text.push_str(&format!(" {}%", rate.formatted_rate()));
            lines.push(Line::from(text));
        }

        let table = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Completion"));
        frame.render_widget(table, chunks[1]);
    }

    /// Render the CSV upload view: the inline form, the last-import summary,
    /// and a reminder of the expected file format.
    fn draw_upload(&self, frame: &mut Frame, area: Rect, upload: &UploadScreen) {
        let block = Block::default().borders(Borders::ALL).title("CSV Upload");
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height == 0 {
            return;
        }

        let form = &upload.form;
        let mut lines = vec![
            form.build_line("League", UploadField::League),
            form.build_line("Circuit", UploadField::Circuit),
            form.build_line("File", UploadField::Path),
            Line::from(""),
        ];

        match &self.last_upload {
            Some(last) => {
                let plural = if last.inserted == 1 { "" } else { "s" };
                lines.push(Line::from(format!(
                    "Last import: {} result{} into {} / {}  (Ctrl+U to undo)",
                    last.inserted, plural, last.league, last.circuit
                )));
            }
            None => lines.push(Line::from(Span::styled(
                "No imports this session.",
                Style::default().fg(Color::DarkGray),
            ))),
        }
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Rows are read as player,score (one per line).",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (prefix, row) = match form.active {
            UploadField::League => ("League: ", 0),
            UploadField::Circuit => ("Circuit: ", 1),
            UploadField::Path => ("File: ", 2),
        };
        let cursor_x = inner.x + prefix.len() as u16 + form.value_len(form.active) as u16;
        frame.set_cursor_position((cursor_x, inner.y + row));
    }

    /// Render the modal score entry form over whatever screen is showing.
    fn draw_score_form(&self, frame: &mut Frame, area: Rect, form: &ScoreForm) {
        let popup_area = centered_rect(70, 60, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Add Score").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line("League", ScoreField::League),
            form.build_line("Circuit", ScoreField::Circuit),
            form.build_line("Player", ScoreField::Player),
            form.build_line("Score", ScoreField::Score),
            form.build_line("Completed", ScoreField::Completed),
            Line::from(""),
        ];

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to accept/switch • Esc to close",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (prefix, row) = match form.active {
            ScoreField::League => ("League: ", 0),
            ScoreField::Circuit => ("Circuit: ", 1),
            ScoreField::Player => ("Player: ", 2),
            ScoreField::Score => ("Score: ", 3),
            ScoreField::Completed => ("Completed: ", 4),
        };
        let offset = match form.active {
            // Park the cursor on the checkbox itself.
            ScoreField::Completed => 1,
            field => form.value_len(field) as u16,
        };
        frame.set_cursor_position((inner.x + prefix.len() as u16 + offset, inner.y + row));
    }

    /// Render the undo confirmation dialog.
    fn draw_confirm_undo(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmUndoUpload) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Undo Last Upload")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let plural = if confirm.inserted == 1 { "" } else { "s" };
        let lines = vec![
            Line::from(format!(
                "Remove the {} result{} imported into {} / {}?",
                confirm.inserted, plural, confirm.league, confirm.circuit
            )),
            Line::from("Earlier imports are already permanent."),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match (&self.screen, &self.mode) {
            (_, Mode::AddingScore(_)) => Line::from(vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" Next field   "),
                Span::styled("[Space]", key_style),
                Span::raw(" Toggle finished   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Save   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Close"),
            ]),
            (_, Mode::ConfirmUndo(_)) => Line::from(vec![
                Span::styled("[Y]", key_style),
                Span::raw(" Confirm   "),
                Span::styled("[N/Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            (Screen::Standings(_), _) => Line::from(vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" League   "),
                Span::styled("[←→]", key_style),
                Span::raw(" Column   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Sort   "),
                Span::styled("[+]", key_style),
                Span::raw(" Add   "),
                Span::styled("[C]", key_style),
                Span::raw(" Completion   "),
                Span::styled("[U]", key_style),
                Span::raw(" Upload   "),
                Span::styled("[Q]", key_style),
                Span::raw(" Quit"),
            ]),
            (Screen::Completion(_), _) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Navigate   "),
                Span::styled("[Space]", key_style),
                Span::raw(" Toggle league   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Back   "),
                Span::styled("[Q]", key_style),
                Span::raw(" Quit"),
            ]),
            (Screen::Upload(_), _) => Line::from(vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" Field   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Import   "),
                Span::styled("[Ctrl+U]", key_style),
                Span::raw(" Undo last   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Back"),
            ]),
        }
    }
}

/// Format the standings rows as fixed-width text lines. Cells without a value
/// render as `N/A`, matching how the table distinguishes "did not race" from
/// a zero score.
fn standings_row_lines(standings: &StandingsScreen) -> Vec<String> {
    standings
        .table
        .rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let mut line = fit_cell(&(idx + 1).to_string(), RANK_WIDTH);
            line.push_str(&fit_cell(&row.player, PLAYER_WIDTH));
            line.push_str(&fit_cell(&display_score(row.total_score), TOTAL_WIDTH));
            for cell in &row.circuit_scores {
                let text = match cell {
                    Some(score) => display_score(*score),
                    None => "N/A".to_string(),
                };
                line.push_str(&fit_cell(&text, CIRCUIT_WIDTH));
            }
            line
        })
        .collect()
}
