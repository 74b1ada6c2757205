//! Command-line front end for cache sound extraction.
//!
//! The binary parses a [`Cli`], hands it to [`run`] and maps the returned
//! [`Outcome`] to the process exit code. Reports go to the writer passed to
//! [`run`]; [`logging::init`] sends log lines to stderr.
//!
//! ```text
//! jagcache-extract extract --all --cache-dir ~/.runelite/jagexcache/oldschool/LIVE
//! jagcache-extract extract --index 14 --output sounds --format json
//! jagcache-extract compare ours/idx14_archive3_entry0.wav reference/3.wav
//! ```

#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod logging;
pub mod output;

pub use cli::{Cli, Commands, LogLevel, OutputFormat};
pub use commands::{Outcome, run};
