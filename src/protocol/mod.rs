//! Line protocol handling.
//!
//! Parsing of front-end commands and formatting of engine responses for the
//! stdin/stdout session loop.

pub mod format;
pub mod parser;

pub use format::{format_event, join_list, write_state};
pub use parser::{parse_command, Command};
