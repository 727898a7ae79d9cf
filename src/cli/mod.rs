//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Project management | `init`, `status`, `clear`, `history` |
//! | Employee | Staff records | `employee add`, `employee list --name alex` |
//! | Schedule | Shifts per date | `schedule add`, `schedule list --sort date,id` |
//! | Claim | Expense claims | `claim add`, `claim approve` |
//! | Posting | Open positions | `posting add`, `posting list --department finance` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output; it also turns on debug-level
//! `tracing` events unless `RUST_LOG` is set:
//! ```bash
//! staffbook --verbose employee list
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod claim;
mod employee;
mod history;
mod logging;
mod output;
mod posting;
mod query;
mod schedule;
mod session;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
