//! CLI command handlers, one per file.

mod fetch;
mod verify;

pub use fetch::{run_fetch, FetchArgs};
pub use verify::run_verify;
