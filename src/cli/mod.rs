//! CLI module
//!
//! - `serve`: run the HTTP server
//! - `migrate`: apply PostgreSQL migrations and exit

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

/// zzinbros - users, sessions and friend requests over HTTP
#[derive(Parser)]
#[command(name = "zzinbros")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Apply pending PostgreSQL migrations
    Migrate,
}
