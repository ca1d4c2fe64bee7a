//! CLI subcommand implementations

pub mod build;
