//! # Moodtrail
//!
//! Command-line front end for the moodtrail journey engine. It reads a track
//! catalog or a history of journeys from JSON, runs the engine over them and
//! prints the result.
//!
//! ## Usage
//!
//! ```bash
//! # What plays after "Weightless"?
//! moodtrail next --catalog demos/catalog.json --track song1
//!
//! # A reproducible 6-track calm journey, as JSON
//! moodtrail play --catalog demos/catalog.json --mood calm --length 6 --seed 7 --json
//!
//! # Statistics and insights for one listener
//! moodtrail stats --journeys demos/journeys.json --user user123
//! moodtrail insights --journeys demos/journeys.json --days 3650
//! ```

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{CommandFactory, Parser};
use log::{debug, info};
use serde::Serialize;

use moodtrail::analytics::{self, UserInsights};
use moodtrail::catalog;
use moodtrail::cli::{self, Command};
use moodtrail::completion;
use moodtrail::config::EngineConfig;
use moodtrail::engine::JourneyEngine;
use moodtrail::journey::Journey;
use moodtrail::stats::JourneyStats;
use moodtrail::track::Track;

/// Engine from config, with a command-line seed taking precedence.
fn build_engine(config: &EngineConfig, seed: Option<u64>) -> JourneyEngine {
    let config = EngineConfig {
        seed: seed.or(config.seed),
        ..config.clone()
    };
    JourneyEngine::from_config(&config)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{text}");
    Ok(())
}

fn format_duration(seconds: u64) -> String {
    format!("{}h {:02}m {:02}s", seconds / 3600, (seconds % 3600) / 60, seconds % 60)
}

fn describe(track: &Track) -> String {
    match track.emotion_scores.dominant() {
        Some(emotion) => format!("{} - {} [{emotion}]", track.artist, track.title),
        None => format!("{} - {}", track.artist, track.title),
    }
}

/// Plays `length` tracks of a `mood` journey over `catalog` and completes it.
fn run_journey(
    engine: &mut JourneyEngine,
    catalog_tracks: &[Track],
    mood: &str,
    user: &str,
    length: usize,
) -> Result<Journey> {
    let mut journey = engine.start_journey(mood, user);
    let Some(opening) = catalog::opening_track(catalog_tracks, mood) else {
        anyhow::bail!("Catalog is empty; nothing to play");
    };

    let mut current = opening.clone();
    for played in 0..length {
        engine.append_track(&mut journey, current.clone())?;
        if played + 1 == length {
            break;
        }

        let pool: Vec<Track> = catalog_tracks
            .iter()
            .filter(|t| t.id != current.id)
            .cloned()
            .collect();
        if pool.is_empty() {
            info!("Catalog has a single track; stopping after it");
            break;
        }
        current = engine.select_next_track(&current, &pool)?.clone();
    }

    engine.complete_journey(&mut journey)?;
    Ok(journey)
}

fn print_journey(journey: &Journey) {
    println!(
        "Journey {} ({}), {} tracks, {}",
        journey.id(),
        journey.mood(),
        journey.tracks().len(),
        format_duration(journey.duration_seconds())
    );
    for (i, track) in journey.tracks().iter().enumerate() {
        let progress = journey.progression(i);
        println!("  {:>3}% {}", progress.percentage, describe(track));
    }

    let insights = journey.emotion_insights();
    if !insights.is_empty() {
        let summary: Vec<String> = insights
            .iter()
            .map(|(label, score)| format!("{label} {score:.2}"))
            .collect();
        println!("Emotions: {}", summary.join(", "));
    }
}

fn print_stats(stats: &JourneyStats) {
    println!("Journeys:        {}", stats.total_journeys);
    println!("Listening time:  {}", format_duration(stats.total_time_seconds));
    println!("Favourite mood:  {}", stats.favorite_mood);
    println!("Most played:     {}", stats.most_played_track_title);
    if !stats.emotion_distribution.is_empty() {
        println!("Emotions:");
        let mut shares: Vec<_> = stats.emotion_distribution.iter().collect();
        shares.sort_by(|a, b| b.1.cmp(a.1));
        for (emotion, percent) in shares {
            println!("  {emotion:<16} {percent:>3}%");
        }
    }
}

fn print_insights(insights: &UserInsights) {
    let habits = &insights.listening_habits;
    println!("Songs played:    {}", habits.songs_played);
    println!("Listening time:  {}", format_duration(habits.total_time_seconds));
    if let Some(time) = habits.favorite_time_of_day {
        println!("Usually listens: {time:?}");
    }
    if let Some(day) = &habits.favorite_day_of_week {
        println!("Favourite day:   {day}");
    }

    println!("Moods:");
    for slice in analytics::mood_slices(habits) {
        println!("  {:<16} {:>3}%", slice.name, slice.value);
    }

    if !insights.favorite_artists.is_empty() {
        println!("Top artists:     {}", insights.favorite_artists.join(", "));
    }
    for correlation in &insights.mood_correlations {
        println!(
            "  {} feels {}",
            correlation.mood,
            correlation.correlated_emotions.join(", ")
        );
    }

    println!("Weeks:");
    for week in &insights.weekly_summary {
        println!(
            "  {:<24} {:>3} journeys {:>4}h",
            week.label, week.total_journeys, week.hours
        );
    }

    println!("Emotion trends:");
    for trend in &insights.emotion_trends {
        let top = trend
            .emotions
            .dominant()
            .map_or_else(|| "-".to_string(), str::to_string);
        println!("  {} {top}", trend.date);
    }
}

/// Main entry point.
///
/// Logging is controlled via `RUST_LOG`:
/// - `RUST_LOG=debug moodtrail play ...` - lifecycle transitions
/// - `RUST_LOG=moodtrail::selection=trace moodtrail next ...` - selection decisions
fn main() -> Result<()> {
    env_logger::init();

    let args = cli::Args::parse();
    if let Command::Completion { shell } = args.command {
        let mut cmd = cli::Args::command();
        completion::generate_completions(completion::shell_to_completion_shell(shell), &mut cmd);
        return Ok(());
    }

    let config = EngineConfig::load(args.config.as_deref())?;
    debug!("Using configuration {config:?}");

    match args.command {
        Command::Next { catalog: path, track, seed } => {
            let tracks = catalog::load_tracks(&path)?;
            let current = catalog::find_track(&tracks, &track)
                .with_context(|| format!("No track with id `{track}' in {}", path.display()))?;
            let pool: Vec<Track> = tracks.iter().filter(|t| t.id != current.id).cloned().collect();

            let mut engine = build_engine(&config, seed);
            let next = engine.select_next_track(current, &pool)?;
            println!("{}\t{}", next.id, describe(next));
        }
        Command::Play { catalog: path, mood, user, length, seed, json } => {
            let tracks = catalog::load_tracks(&path)?;
            let mut engine = build_engine(&config, seed);
            let length = length.unwrap_or(config.journey_length);

            info!("Playing a {length}-track `{mood}' journey for {user}");
            let journey = run_journey(&mut engine, &tracks, &mood, &user, length)?;

            if json {
                print_json(&journey)?;
            } else {
                print_journey(&journey);
            }
        }
        Command::Stats { journeys, user, json } => {
            let history = catalog::load_journeys(&journeys, user.as_deref())?;
            let stats = moodtrail::stats::compute_stats(&history);

            if json {
                print_json(&stats)?;
            } else {
                print_stats(&stats);
            }
        }
        Command::Insights { journeys, user, days, json } => {
            let history = catalog::load_journeys(&journeys, user.as_deref())?;
            let days = days.unwrap_or(config.trend_days);
            let insights = analytics::insights(&history, Utc::now(), days, config.top_limit);

            if json {
                print_json(&insights)?;
            } else {
                print_insights(&insights);
            }
        }
        // handled above, before the config is read
        Command::Completion { .. } => {}
    }

    Ok(())
}
