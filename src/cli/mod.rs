//! CLI module - Command-line interface for the content backend
//!
//! Without a subcommand the binary serves the HTTP API.

mod commands;

use clap::{Parser, Subcommand};

/// EduHub - multilingual course catalogue backend
#[derive(Parser)]
#[command(name = "eduhub")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the HTTP API (default)
    #[command(alias = "web")]
    Serve,

    /// Create an admin account, or reset its password if it exists
    CreateAdmin {
        /// Admin username
        username: String,
        /// Password; read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Enable or disable an admin account
    SetAdminActive {
        /// Admin username
        username: String,
        /// `true` to enable, `false` to disable
        #[arg(action = clap::ArgAction::Set)]
        active: bool,
    },

    /// Print an Argon2 hash for a password using the configured parameters
    HashPassword {
        /// Password; read from stdin when omitted
        password: Option<String>,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

pub use commands::*;
