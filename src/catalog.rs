//! JSON input for the command-line front end.
//!
//! The engine itself takes already-resolved values. This module is the thin
//! collaborator that gets them off disk: a catalog is a JSON array of tracks,
//! a history is a JSON array of journeys.

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use crate::journey::Journey;
use crate::track::Track;

fn load_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {what} file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse {what} file {}", path.display()))
}

/// Reads a track catalog, warning about scores outside `[0, 1]`.
///
/// # Errors
///
/// Fails if the file cannot be read or is not a JSON array of tracks.
pub fn load_tracks(path: &Path) -> Result<Vec<Track>> {
    let tracks: Vec<Track> = load_json(path, "catalog")?;

    for track in &tracks {
        for (name, value) in track.out_of_range_values() {
            warn!("Track `{}' has {name} = {value}, outside [0, 1]", track.id);
        }
    }
    debug!("Loaded {} tracks from {}", tracks.len(), path.display());
    Ok(tracks)
}

/// Reads past journeys, optionally keeping only those of `user_id`.
///
/// # Errors
///
/// Fails if the file cannot be read or is not a JSON array of journeys.
pub fn load_journeys(path: &Path, user_id: Option<&str>) -> Result<Vec<Journey>> {
    let mut journeys: Vec<Journey> = load_json(path, "journeys")?;

    for journey in &journeys {
        if journey.emotion_trail().len() != journey.tracks().len() {
            warn!(
                "Journey `{}' has {} trail points for {} tracks",
                journey.id(),
                journey.emotion_trail().len(),
                journey.tracks().len()
            );
        }
    }

    if let Some(user) = user_id {
        journeys.retain(|j| j.user_id() == user);
    }
    debug!("Loaded {} journeys from {}", journeys.len(), path.display());
    Ok(journeys)
}

/// Looks a track up by id.
#[must_use]
pub fn find_track<'a>(catalog: &'a [Track], id: &str) -> Option<&'a Track> {
    catalog.iter().find(|t| t.id == id)
}

/// Opening track for a journey in `mood`: the first track tagged with the mood
/// as an emotion, else the first track of the catalog.
#[must_use]
pub fn opening_track<'a>(catalog: &'a [Track], mood: &str) -> Option<&'a Track> {
    catalog
        .iter()
        .find(|t| t.emotion_scores.contains(mood))
        .or_else(|| catalog.first())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CATALOG: &str = r#"[
        {"id": "next1", "title": "Starboy", "artist": "The Weeknd", "album": "Starboy",
         "durationSeconds": 230, "emotionScores": {"energetic": 0.85, "confident": 0.8}},
        {"id": "song1", "title": "Weightless", "artist": "Marconi Union", "album": "Weightless",
         "durationSeconds": 480, "emotionScores": {"calm": 0.95, "peaceful": 0.85}}
    ]"#;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_tracks() {
        let file = write_temp(CATALOG);
        let tracks = load_tracks(file.path()).unwrap();

        assert_eq!(tracks.len(), 2);
        assert_eq!(find_track(&tracks, "song1").unwrap().title, "Weightless");
        assert!(find_track(&tracks, "nope").is_none());
    }

    #[test]
    fn test_opening_track_prefers_mood_tag() {
        let file = write_temp(CATALOG);
        let tracks = load_tracks(file.path()).unwrap();

        assert_eq!(opening_track(&tracks, "calm").unwrap().id, "song1");
        assert_eq!(opening_track(&tracks, "sad").unwrap().id, "next1");
        assert!(opening_track(&[], "calm").is_none());
    }

    #[test]
    fn test_malformed_catalog_reports_path() {
        let file = write_temp("{ not json");
        let err = load_tracks(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse catalog file"));
    }

    #[test]
    fn test_load_journeys_filters_by_user() {
        let file = write_temp(
            r#"[
                {"id": "1", "userId": "user123", "mood": "calm", "startTime": "2024-01-15T14:30:00Z"},
                {"id": "2", "userId": "other", "mood": "energetic", "startTime": "2024-01-14T18:00:00Z"}
            ]"#,
        );

        assert_eq!(load_journeys(file.path(), None).unwrap().len(), 2);
        let mine = load_journeys(file.path(), Some("user123")).unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].mood(), "calm");
    }
}
