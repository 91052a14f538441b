//! Small terminal companion for keeping a log of what you worked on. Tasks are appended to a CSV
//! file, an optional reminder nudges you to log every so often, and daily and weekly reports
//! summarize the log.
//!

pub mod cli;
pub mod report;
pub mod shell;
pub mod storage;
pub mod timer;
pub mod utils;
