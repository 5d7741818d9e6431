//! Domain models that mirror the SQLite schema and get passed throughout the
//! TUI. The intent is that these types stay light-weight data holders so other
//! layers can focus on presentation and persistence logic. Keeping the
//! commentary here means later refactors can reconstruct the assumptions even
//! if other context is lost.

#[derive(Debug, Clone, PartialEq)]
/// A single race result as stored in the `scores` table. Records are written
/// once and never updated; the only delete path is the bulk removal of a CSV
/// batch via `upload_id`.
pub struct ScoreRecord {
    /// Primary key from the database. We keep this around even when the UI
    /// only needs display information because the batch-undo flow bubbles ids
    /// back to the persistence layer.
    pub id: i64,
    /// Free-text league name. Grouping happens by exact string equality, so
    /// "Season 3" and "season 3" are two different leagues on purpose.
    pub league: String,
    /// Free-text circuit name, meaningful within a league.
    pub circuit: String,
    /// Free-text player name.
    pub player: String,
    /// Result value. CSV import also derives the completion flag from whether
    /// this parsed as a number, so the field does double duty.
    pub score: f64,
    /// Whether the player finished the race.
    pub completed: bool,
    /// Shared batch identifier for records created by one CSV import
    /// (millisecond epoch timestamp, stringified). `None` for manual entries,
    /// which can therefore never be bulk-undone.
    pub upload_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
/// Caller-provided fields for an insert. The store assigns `id` and echoes a
/// hydrated [`ScoreRecord`] back so the UI can update its caches without
/// re-querying.
pub struct NewScore {
    pub league: String,
    pub circuit: String,
    pub player: String,
    pub score: f64,
    pub completed: bool,
    pub upload_id: Option<String>,
}

impl NewScore {
    /// Convenience constructor for a manually entered result (no batch id).
    pub fn manual(league: &str, circuit: &str, player: &str, score: f64, completed: bool) -> Self {
        Self {
            league: league.to_string(),
            circuit: circuit.to_string(),
            player: player.to_string(),
            score,
            completed,
            upload_id: None,
        }
    }
}
