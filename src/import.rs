//! CSV batch import. The accepted format is deliberately primitive:
//! newline-delimited `player,score` rows with no header, no quoting, and no
//! escaping. Parsing is best-effort: a score that fails to parse becomes a
//! zero with the completion flag cleared (the player entered but did not
//! finish), and only rows with a blank player name are dropped entirely.

use std::sync::atomic::{AtomicI64, Ordering};

use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;

use crate::db::add_score;
use crate::models::NewScore;

/// One parsed CSV line, before league/circuit and the batch id are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRow {
    pub player: String,
    pub score: f64,
    pub completed: bool,
}

/// Outcome of one import: the shared batch id (kept by the caller to support
/// undo) and how many rows made it into the store.
#[derive(Debug, Clone)]
pub struct BatchImport {
    pub upload_id: String,
    pub inserted: usize,
}

/// Parse raw CSV text into rows. Only the first two comma-separated fields of
/// each line are considered; anything after the second comma is ignored. A
/// score that does not parse as a number yields `score = 0.0` and
/// `completed = false`; a parseable score marks the row completed. Lines whose
/// player field is empty after trimming are skipped.
pub fn parse_rows(text: &str) -> Vec<CsvRow> {
    text.lines()
        .filter_map(|line| {
            let mut fields = line.split(',');
            let player = fields.next().unwrap_or("").trim().to_string();
            if player.is_empty() {
                return None;
            }

            let raw_score = fields.next().unwrap_or("").trim();
            let (score, completed) = match raw_score.parse::<f64>() {
                Ok(value) => (value, true),
                Err(_) => (0.0, false),
            };

            Some(CsvRow {
                player,
                score,
                completed,
            })
        })
        .collect()
}

/// Highest batch id issued so far, so two imports landing within the same
/// millisecond still get distinct ids.
static LAST_UPLOAD_MILLIS: AtomicI64 = AtomicI64::new(0);

/// Generate the batch identifier shared by every record of one import: the
/// current time in milliseconds, stringified. The generator never hands out
/// the same value twice within one process.
pub fn generate_upload_id() -> String {
    let now = Utc::now().timestamp_millis();
    let mut issued = now;
    let _ = LAST_UPLOAD_MILLIS.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
        issued = if now > last { now } else { last + 1 };
        Some(issued)
    });
    issued.to_string()
}

/// Parse the CSV text and insert every surviving row under the supplied
/// league and circuit, all sharing one freshly generated upload id. The
/// caller holds on to the returned [`BatchImport`] to offer undo. Presence
/// checks on `league`/`circuit` are the upload form's job, not ours.
pub fn import_scores(
    conn: &Connection,
    text: &str,
    league: &str,
    circuit: &str,
) -> Result<BatchImport> {
    let rows = parse_rows(text);
    let upload_id = generate_upload_id();

    let mut inserted = 0;
    for row in &rows {
        add_score(
            conn,
            &NewScore {
                league: league.to_string(),
                circuit: circuit.to_string(),
                player: row.player.clone(),
                score: row.score,
                completed: row.completed,
                upload_id: Some(upload_id.clone()),
            },
        )?;
        inserted += 1;
    }

    Ok(BatchImport {
        upload_id,
        inserted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{fetch_scores, open_in_memory, remove_scores_batch};

    #[test]
    fn parses_scores_and_coerces_malformed_ones() {
        let rows = parse_rows("Alice,12.5\nBob,\n,5\n");

        assert_eq!(
            rows,
            vec![
                CsvRow {
                    player: "Alice".to_string(),
                    score: 12.5,
                    completed: true,
                },
                CsvRow {
                    player: "Bob".to_string(),
                    score: 0.0,
                    completed: false,
                },
            ]
        );
    }

    #[test]
    fn extra_fields_and_padding_are_ignored() {
        let rows = parse_rows(" Alice , 7 , ignored , also ignored\r\nBob,DNF");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].player, "Alice");
        assert_eq!(rows[0].score, 7.0);
        assert!(rows[0].completed);
        assert_eq!(rows[1].score, 0.0);
        assert!(!rows[1].completed);
    }

    #[test]
    fn import_tags_every_row_with_one_upload_id() {
        let conn = open_in_memory().unwrap();

        let batch = import_scores(&conn, "Alice,10\nBob,8\n", "S1", "Monza").unwrap();
        assert_eq!(batch.inserted, 2);

        let records = fetch_scores(&conn).unwrap();
        assert_eq!(records.len(), 2);
        for record in &records {
            assert_eq!(record.upload_id.as_deref(), Some(batch.upload_id.as_str()));
            assert_eq!(record.league, "S1");
            assert_eq!(record.circuit, "Monza");
        }
    }

    #[test]
    fn undoing_an_import_removes_exactly_its_batch() {
        let conn = open_in_memory().unwrap();

        let first = import_scores(&conn, "Alice,10\n", "S1", "Monza").unwrap();
        let second = import_scores(&conn, "Bob,8\nCara,6\n", "S1", "Spa").unwrap();
        assert_ne!(first.upload_id, second.upload_id);

        assert_eq!(remove_scores_batch(&conn, &second.upload_id).unwrap(), 2);
        let remaining = fetch_scores(&conn).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].player, "Alice");
    }
}
