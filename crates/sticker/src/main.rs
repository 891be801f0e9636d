//! # Sticker CLI
//!
//! The binary is intentionally thin: everything lives in `src/cli/`, and this
//! file only invokes `cli::run()` and turns an error into an exit code.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/sticker/src/cli/)                        │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - logging + context wiring (commands.rs)                   │
//! │  - dispatch to the API facade (handlers.rs)                 │
//! │  - terminal and JSON output (render.rs, styles.rs)          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  stickerapp: StickerApi → commands → store / limiter / ...  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Testing Approach
//!
//! - `cli::handlers` tests parse argument vectors with clap and dispatch them
//!   against an in-memory API.
//! - `cli::render` tests feed canned `CmdResult`s and check the text.
//! - `tests/cli_e2e.rs` runs the real binary on a temporary data directory.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
