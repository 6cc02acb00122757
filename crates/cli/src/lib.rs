//! Command-line frontend for the wasend core crate.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod styles;
