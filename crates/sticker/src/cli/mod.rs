//! # CLI Behavior
//!
//! This is **one possible UI client** for stickerapp, not the application
//! itself. Only this module knows about terminal I/O, exit codes and output
//! formatting.
//!
//! ## Naked Execution
//!
//! Running `sticker` with no arguments lists stored stickers.
//!
//! ## Output
//!
//! Human-readable text by default. `--json` prints the command's
//! `CmdResult` as JSON instead, for scripting.
//!
//! ## Logging
//!
//! Diagnostics go to stderr through `tracing-subscriber`. The level comes
//! from `RUST_LOG` when set, otherwise from `-v` (info) / `-vv` (debug),
//! defaulting to warnings only.
//!
//! ## Module Structure
//!
//! - `setup`: Argument parsing via clap
//! - `commands`: Entry point, logging and context setup
//! - `handlers`: Maps parsed commands onto the API facade
//! - `render`: Text and JSON output
//! - `styles`: Terminal styling

mod commands;
mod handlers;
mod render;
pub mod setup;
mod styles;

pub use commands::run;
