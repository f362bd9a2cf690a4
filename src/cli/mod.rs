//! CLI module - Command-line interface for Kizuna
//!
//! This module provides a structured CLI using clap for argument parsing.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Kizuna - franchise relation graphs and watch-order planning
#[derive(Parser)]
#[command(name = "kizuna")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as background daemon refreshing stale franchise graphs
    #[command(alias = "-d", alias = "--daemon")]
    Daemon,

    /// Add a work to the local library
    #[command(alias = "a")]
    Add {
        /// Provider id of the work
        external_id: i32,
        /// Display title
        #[arg(required = true)]
        title: Vec<String>,
        /// Release year
        #[arg(long)]
        year: Option<i32>,
        /// Number of episodes to create
        #[arg(long, default_value = "0")]
        episodes: u32,
    },

    /// Link local works to the franchise described by a provider graph file
    Sync {
        /// Path to a provider graph JSON document
        graph: PathBuf,
        /// Franchise display name (defaults to the root node title)
        #[arg(long)]
        name: Option<String>,
        /// Expected franchise root; rejected unless it is the graph minimum
        #[arg(long)]
        root: Option<i32>,
    },

    /// Replace the stored graph of a franchise without touching membership
    Refresh {
        /// Franchise ID
        franchise_id: i32,
        /// Path to a provider graph JSON document
        graph: PathBuf,
    },

    /// Refresh every stale franchise graph from the configured provider
    RefreshStale,

    /// List franchises whose graph is missing or outdated
    Stale {
        /// Maximum number of franchises to show
        #[arg(default_value = "25")]
        limit: u64,
    },

    /// Show the works linked to a franchise
    #[command(alias = "m")]
    Members {
        /// Franchise ID
        franchise_id: i32,
    },

    /// Suggest what to watch after a work
    #[command(alias = "s")]
    Suggest {
        /// Anime ID
        id: i32,
    },

    /// Suggest what to watch next across recently completed works
    #[command(alias = "n")]
    Next,

    /// Set the watch status of a work
    Status {
        /// Anime ID
        id: i32,
        /// not_started, watching, completed, on_hold, dropped or planned
        status: String,
    },

    /// Show related works in watch order
    #[command(alias = "o")]
    Order {
        /// Anime ID
        id: i32,
    },

    /// Show related works grouped by release year
    Epochs {
        /// Anime ID
        id: i32,
    },
}
