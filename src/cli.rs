use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "cfb-review", version, about = "Fetch, analyze, and report college football play-by-play")]
pub struct Cli {
    /// Path to the TOML config file.
    #[arg(long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// Directory for cached JSON responses.
    #[arg(long, global = true, default_value = "data")]
    pub data_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch and cache all feeds for a game (ESPN summary/plays/drives, CFBD plays/win probability).
    Fetch {
        /// ESPN event id, e.g. 401752873.
        #[arg(long)]
        game: u64,
        /// Season year for the CFBD plays query.
        #[arg(long)]
        year: Option<u16>,
        /// Week number for the CFBD plays query.
        #[arg(long)]
        week: Option<u8>,
        /// Re-fetch even when cached files exist.
        #[arg(long)]
        force: bool,
    },
    /// Render the single-game review HTML from cached data.
    Report {
        #[arg(long)]
        game: u64,
        /// Output path (defaults to game_<id>_review.html).
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Render the aligned ESPN vs CFBD WPA comparison chart.
    Compare {
        #[arg(long)]
        game: u64,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Render season-level splits across all cached games for a team.
    Season {
        /// Team name as it appears in the play data, e.g. "Washington".
        #[arg(long)]
        team: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Validate the CFBD API key without fetching anything.
    Check,
}
