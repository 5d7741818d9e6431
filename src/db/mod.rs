//! Persistence module split across logical submodules.

mod connection;
mod scores;

pub use connection::{ensure_schema, open_in_memory};
pub use scores::{add_score, fetch_scores, remove_scores_batch};
