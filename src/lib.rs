//! Mood-driven listening journeys.
//!
//! A listener picks a mood, a journey starts, tracks are appended one by one
//! (each next track chosen by emotion tag), and the journey is completed.
//! Completed journeys feed statistics and listening analytics.
//!
//! Core modules:
//! - [`engine`] - Journey lifecycle, next-track selection, favourites
//! - [`journey`] - Journey values, progression and emotion insights
//! - [`selection`] - The emotion-tag matching rule
//! - [`stats`] - Summary statistics over journeys
//! - [`analytics`] - Weekly summaries, trends, habits, correlations
//! - [`favorites`] - Favourite tracks and playlists
//!
//! ### Supporting Modules
//!
//! - [`track`] - Tracks and insertion-ordered emotion scores
//! - [`error`] - Engine error type
//! - [`config`] - Optional TOML configuration
//! - [`catalog`] - JSON input loading for the CLI
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation
//!
//! ## Quick Start Example
//!
//! ```
//! use moodtrail::engine::JourneyEngine;
//! use moodtrail::track::Track;
//!
//! let mut engine = JourneyEngine::seeded(42);
//! let catalog = vec![
//!     Track::new("song1", "Weightless", "Marconi Union", "Weightless", 480)
//!         .with_emotion("calm", 0.95)
//!         .with_emotion("peaceful", 0.85),
//!     Track::new("song2", "Clair de Lune", "Claude Debussy", "Classical Essentials", 330)
//!         .with_emotion("calm", 0.92)
//!         .with_emotion("serene", 0.85),
//!     Track::new("next1", "Starboy", "The Weeknd", "Starboy", 230)
//!         .with_emotion("energetic", 0.85),
//! ];
//!
//! let mut journey = engine.start_journey("calm", "user123");
//! engine.append_track(&mut journey, catalog[0].clone())?;
//!
//! let next = engine.select_next_track(&catalog[0], &catalog[1..])?;
//! assert_eq!(next.id, "song2");
//! engine.append_track(&mut journey, next.clone())?;
//! engine.complete_journey(&mut journey)?;
//!
//! assert_eq!(journey.duration_seconds(), 810);
//! let stats = engine.compute_stats(&[journey]);
//! assert_eq!(stats.favorite_mood, "calm");
//! # Ok::<(), moodtrail::error::EngineError>(())
//! ```
//!
//! ## Selection Rule
//!
//! The next track is drawn uniformly at random from the candidates that carry
//! the current track's dominant emotion as a tag. With no such candidate the
//! first candidate is used. This is tag membership only, not a similarity
//! score. Randomness comes from the engine's own generator, so a seeded engine
//! replays the same journey.
//!
//! ## Error Handling
//!
//! Library operations return [`error::Result`]. Errors are precondition
//! violations (acting on a completed journey, selecting from an empty pool,
//! naming an unknown playlist) and are never retried or logged by the library.
//! File loading in [`config`] and [`catalog`] returns `anyhow::Result` with
//! the offending path in the context.

pub mod analytics;
pub mod catalog;
pub mod cli;
pub mod completion;
pub mod config;
pub mod engine;
pub mod error;
pub mod favorites;
pub mod journey;
pub mod selection;
pub mod stats;
pub mod track;
