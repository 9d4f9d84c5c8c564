//! # Command-Line Interface Module
//!
//! Clap derive definitions for the `moodtrail` binary. The binary is a thin
//! presentation layer: it loads JSON inputs, calls into the library and prints
//! what comes back.
//!
//! ## Commands
//!
//! - `next`: pick the track to follow a given catalog track
//! - `play`: run a whole journey for a mood over a catalog
//! - `stats`: summary statistics over past journeys
//! - `insights`: weekly summaries, trends, habits and correlations
//! - `completion`: print a shell completion script
//!
//! ## Examples
//!
//! ```bash
//! moodtrail next --catalog demos/catalog.json --track song1
//! moodtrail play --catalog demos/catalog.json --mood calm --length 5 --seed 7
//! moodtrail stats --journeys demos/journeys.json --user user123
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

#[derive(Parser, Debug)]
#[command(name = "moodtrail")]
#[command(about = "Moodtrail: mood-driven listening journeys & journey analytics")]
#[command(version)]
pub struct Args {
    /// Config file to use instead of the platform default
    #[arg(long, global = true, env = "MOODTRAIL_CONFIG", value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Pick the next track after a catalog track
    ///
    /// The current track is looked up by id; every other catalog track is a
    /// candidate. Candidates sharing the current track's dominant emotion are
    /// chosen from at random, otherwise the first candidate is used.
    Next {
        /// JSON array of tracks
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        catalog: PathBuf,

        /// Id of the track that is playing now
        #[arg(long)]
        track: String,

        /// Seed for reproducible picks (overrides config)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run a full journey for a mood
    ///
    /// Starts a journey, opens with the first catalog track tagged with the
    /// mood, keeps appending selected tracks, then completes the journey.
    Play {
        /// JSON array of tracks
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        catalog: PathBuf,

        /// Mood the listener picked
        #[arg(long)]
        mood: String,

        /// Listener id recorded on the journey
        #[arg(long, default_value = "local")]
        user: String,

        /// Number of tracks to play (overrides config)
        #[arg(long)]
        length: Option<usize>,

        /// Seed for reproducible journeys (overrides config)
        #[arg(long)]
        seed: Option<u64>,

        /// Print the completed journey as JSON
        #[arg(long)]
        json: bool,
    },

    /// Summary statistics over past journeys
    Stats {
        /// JSON array of journeys
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        journeys: PathBuf,

        /// Only count journeys of this listener
        #[arg(long)]
        user: Option<String>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Listening insights over past journeys
    Insights {
        /// JSON array of journeys
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        journeys: PathBuf,

        /// Only count journeys of this listener
        #[arg(long)]
        user: Option<String>,

        /// Emotion trend window in days (overrides config)
        #[arg(long)]
        days: Option<u64>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    ///
    /// Usage: moodtrail completion bash > ~/.local/share/bash-completion/completions/moodtrail
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}
