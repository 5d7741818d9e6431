use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::models::{NewScore, ScoreRecord};

/// Insert a single score row, returning the hydrated struct so the caller can
/// push it straight into the in-memory record cache. No validation happens
/// here on purpose: presence checks belong to the forms, and the store accepts
/// whatever the caller decided to persist.
pub fn add_score(conn: &Connection, score: &NewScore) -> Result<ScoreRecord> {
    conn.execute(
        "INSERT INTO scores (league, circuit, player, score, completed, upload_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            score.league,
            score.circuit,
            score.player,
            score.score,
            score.completed,
            score.upload_id,
        ],
    )
    .context("failed to insert score")?;

    let id = conn.last_insert_rowid();
    Ok(ScoreRecord {
        id,
        league: score.league.clone(),
        circuit: score.circuit.clone(),
        player: score.player.clone(),
        score: score.score,
        completed: score.completed,
        upload_id: score.upload_id.clone(),
    })
}

/// Retrieve every score in insertion order. Aggregation happens in memory, so
/// this is the single read path every view goes through.
pub fn fetch_scores(conn: &Connection) -> Result<Vec<ScoreRecord>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, league, circuit, player, score, completed, upload_id
             FROM scores
             ORDER BY id",
        )
        .context("failed to prepare score query")?;

    let scores = stmt
        .query_map([], |row| {
            Ok(ScoreRecord {
                id: row.get(0)?,
                league: row.get(1)?,
                circuit: row.get(2)?,
                player: row.get(3)?,
                score: row.get(4)?,
                completed: row.get(5)?,
                upload_id: row.get(6)?,
            })
        })
        .context("failed to iterate scores")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect scores")?;

    Ok(scores)
}

/// Delete every record that belongs to one CSV upload. The delete runs inside
/// a single transaction so a reader in the same process never observes a
/// half-removed batch. Returns the number of rows removed; zero means the
/// batch was already gone.
pub fn remove_scores_batch(conn: &Connection, upload_id: &str) -> Result<usize> {
    let tx = conn
        .unchecked_transaction()
        .context("failed to start batch delete transaction")?;

    let deleted = tx
        .execute(
            "DELETE FROM scores WHERE upload_id = ?1",
            params![upload_id],
        )
        .context("failed to delete upload batch")?;

    tx.commit().context("failed to commit batch delete")?;
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;
    use std::collections::HashSet;

    fn sample(player: &str, upload_id: Option<&str>) -> NewScore {
        NewScore {
            league: "Season 1".to_string(),
            circuit: "Monza".to_string(),
            player: player.to_string(),
            score: 10.0,
            completed: true,
            upload_id: upload_id.map(str::to_string),
        }
    }

    #[test]
    fn add_then_fetch_returns_every_record_with_unique_ids() {
        let conn = open_in_memory().unwrap();

        for name in ["Alice", "Bob", "Cara"] {
            add_score(&conn, &sample(name, None)).unwrap();
        }

        let records = fetch_scores(&conn).unwrap();
        assert_eq!(records.len(), 3);

        let ids: HashSet<i64> = records.iter().map(|record| record.id).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn add_score_echoes_hydrated_record() {
        let conn = open_in_memory().unwrap();

        let record = add_score(&conn, &sample("Alice", Some("1700000000000"))).unwrap();
        assert_eq!(record.player, "Alice");
        assert_eq!(record.upload_id.as_deref(), Some("1700000000000"));

        let fetched = fetch_scores(&conn).unwrap();
        assert_eq!(fetched, vec![record]);
    }

    #[test]
    fn batch_delete_removes_only_the_matching_upload() {
        let conn = open_in_memory().unwrap();

        add_score(&conn, &sample("Alice", Some("batch-a"))).unwrap();
        add_score(&conn, &sample("Bob", Some("batch-a"))).unwrap();
        add_score(&conn, &sample("Cara", Some("batch-b"))).unwrap();
        add_score(&conn, &sample("Dan", None)).unwrap();

        let deleted = remove_scores_batch(&conn, "batch-a").unwrap();
        assert_eq!(deleted, 2);

        let remaining: Vec<String> = fetch_scores(&conn)
            .unwrap()
            .into_iter()
            .map(|record| record.player)
            .collect();
        assert_eq!(remaining, vec!["Cara".to_string(), "Dan".to_string()]);
    }

    #[test]
    fn repeating_a_batch_delete_is_a_no_op() {
        let conn = open_in_memory().unwrap();

        add_score(&conn, &sample("Alice", Some("batch-a"))).unwrap();
        assert_eq!(remove_scores_batch(&conn, "batch-a").unwrap(), 1);
        assert_eq!(remove_scores_batch(&conn, "batch-a").unwrap(), 0);
        assert_eq!(fetch_scores(&conn).unwrap().len(), 0);
    }
}
