//! Binary entry point that glues the SQLite-backed record store to the TUI.
//! Summarizing the bootstrapping pipeline here keeps the intent obvious when
//! revisiting the code: we bring up the database, hydrate the initial app
//! state, and drive the Ratatui event loop until the user exits.
use race_league_tracker::{ensure_schema, fetch_scores, run_app, App};

/// Initialize persistence, load cached data, and launch the Ratatui event loop.
///
/// Returning a `Result` bubbles up fatal initialization problems (for example
/// the user removing the writable data directory) to the terminal instead of
/// crashing silently.
fn main() -> anyhow::Result<()> {
    let conn = ensure_schema()?;
    let records = fetch_scores(&conn)?;

    let mut app = App::new(conn, records);
    run_app(&mut app)
}
