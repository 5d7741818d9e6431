//! Ratatui front-end split across logical submodules: the `App` state machine
//! and its renderers, per-screen state, form state, and the terminal driver.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
