//! The journey engine.
//!
//! [`JourneyEngine`] holds the only two impure inputs of the domain, a random
//! source and a clock, and threads them through the journey lifecycle:
//!
//! ```text
//!   start_journey ──► Active ──append_track──► Active
//!                        │
//!                        └──complete_journey──► Completed (terminal)
//! ```
//!
//! Journeys are plain values owned by the caller. The engine never keeps a
//! "current journey" of its own, so one engine can serve any number of
//! sessions as long as each journey is passed back in by its owner.

use chrono::{DateTime, Utc};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::favorites::{FavoriteSong, Favorites, Playlist};
use crate::journey::{EmotionPoint, Journey, JourneyState};
use crate::selection;
use crate::stats::{self, JourneyStats};
use crate::track::Track;

/// Wall-clock source. Swapped out in tests for a fixed time.
pub type Clock = fn() -> DateTime<Utc>;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_LEN: usize = 9;

/// Short lowercase base-36 identifier.
pub(crate) fn new_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..ID_LEN)
        .map(|_| char::from(ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())]))
        .collect()
}

#[derive(Debug, Clone)]
pub struct JourneyEngine<R = StdRng> {
    rng: R,
    clock: Clock,
    default_emotion: String,
}

impl JourneyEngine<StdRng> {
    /// Engine seeded from the operating system.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Engine with a fixed seed; selections and ids are reproducible.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Engine set up from a loaded configuration.
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        let engine = match config.seed {
            Some(seed) => Self::seeded(seed),
            None => Self::new(),
        };
        engine.with_default_emotion(config.default_emotion.clone())
    }
}

impl Default for JourneyEngine<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> JourneyEngine<R> {
    #[must_use]
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            clock: Utc::now,
            default_emotion: selection::DEFAULT_EMOTION.to_string(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Emotion assumed for tracks that carry no emotion scores.
    #[must_use]
    pub fn with_default_emotion(mut self, emotion: impl Into<String>) -> Self {
        self.default_emotion = emotion.into();
        self
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Opens a new, empty journey for `user_id` in `mood`.
    pub fn start_journey(&mut self, mood: &str, user_id: &str) -> Journey {
        let id = new_id(&mut self.rng);
        debug!("Starting journey {id} for user {user_id} in mood `{mood}'");
        Journey::new(id, user_id, mood, self.now())
    }

    /// Adds `track` to the end of `journey` and records its emotions.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidState`] if the journey is already completed.
    pub fn append_track(&self, journey: &mut Journey, track: Track) -> Result<()> {
        ensure_active(journey, "append a track to")?;

        let timestamp = self.now();
        journey.duration_seconds += u64::from(track.duration_seconds);
        journey.emotion_trail.push(EmotionPoint {
            timestamp,
            emotions: track.emotion_scores.clone(),
        });
        debug!(
            "Journey {}: appended `{}' ({} tracks, {}s)",
            journey.id,
            track.title,
            journey.tracks.len() + 1,
            journey.duration_seconds
        );
        journey.tracks.push(track);
        Ok(())
    }

    /// Chooses the track to play after `current` from `pool`.
    ///
    /// See [`selection::select_next_track`] for the rule.
    ///
    /// # Errors
    ///
    /// [`EngineError::EmptyPool`] if `pool` is empty.
    pub fn select_next_track<'a>(&mut self, current: &Track, pool: &'a [Track]) -> Result<&'a Track> {
        selection::select_next_track(current, pool, &self.default_emotion, &mut self.rng)
    }

    /// Closes `journey`. No further tracks can be added afterwards.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidState`] if the journey is already completed.
    pub fn complete_journey(&self, journey: &mut Journey) -> Result<()> {
        ensure_active(journey, "complete")?;

        journey.completed = true;
        journey.end_time = Some(self.now());
        debug!(
            "Journey {} completed after {} tracks",
            journey.id,
            journey.tracks.len()
        );
        Ok(())
    }

    #[must_use]
    pub fn compute_stats(&self, journeys: &[Journey]) -> JourneyStats {
        stats::compute_stats(journeys)
    }

    /// Stores `track` as a favourite and returns the new entry.
    pub fn add_favorite(&mut self, favorites: &mut Favorites, track: &Track) -> FavoriteSong {
        let favorite = FavoriteSong::from_track(new_id(&mut self.rng), track, self.now());
        favorites.insert_favorite(favorite.clone());
        favorite
    }

    pub fn create_playlist(
        &mut self,
        favorites: &mut Favorites,
        name: &str,
        description: &str,
    ) -> Playlist {
        let playlist = Playlist::new(new_id(&mut self.rng), name, description, self.now());
        favorites.insert_playlist(playlist.clone());
        playlist
    }

    /// Adds `song` to a playlist unless it is already there.
    ///
    /// Returns whether the playlist changed.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnknownPlaylist`] if no playlist has `playlist_id`.
    pub fn add_to_playlist(
        &self,
        favorites: &mut Favorites,
        playlist_id: &str,
        song: &FavoriteSong,
    ) -> Result<bool> {
        favorites.add_to_playlist(playlist_id, song, self.now())
    }

    /// Removes the song with `song_id` from a playlist.
    ///
    /// Returns whether a song was removed.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnknownPlaylist`] if no playlist has `playlist_id`.
    pub fn remove_from_playlist(
        &self,
        favorites: &mut Favorites,
        playlist_id: &str,
        song_id: &str,
    ) -> Result<bool> {
        favorites.remove_from_playlist(playlist_id, song_id, self.now())
    }
}

fn ensure_active(journey: &Journey, operation: &'static str) -> Result<()> {
    match journey.state() {
        JourneyState::Active => Ok(()),
        state => Err(EngineError::InvalidState {
            journey: journey.id.clone(),
            state,
            operation,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 0).unwrap()
    }

    fn engine() -> JourneyEngine {
        JourneyEngine::seeded(2024).with_clock(fixed_now)
    }

    fn track(id: &str, seconds: u32, emotion: &str, score: f64) -> Track {
        Track::new(id, id, "Artist", "Album", seconds).with_emotion(emotion, score)
    }

    #[test]
    fn test_start_journey() {
        let mut engine = engine();
        let journey = engine.start_journey("calm", "user123");

        assert_eq!(journey.mood(), "calm");
        assert_eq!(journey.user_id(), "user123");
        assert_eq!(journey.start_time(), fixed_now());
        assert_eq!(journey.state(), JourneyState::Active);
        assert_eq!(journey.id().len(), 9);
        assert!(journey
            .id()
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_ids_are_reproducible_per_seed() {
        let a = JourneyEngine::seeded(5).start_journey("calm", "u");
        let b = JourneyEngine::seeded(5).start_journey("calm", "u");
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn test_append_keeps_duration_and_trail_in_step() {
        let engine = engine();
        let mut journey = JourneyEngine::seeded(1).start_journey("calm", "user123");
        let lengths = [480u32, 330, 215, 1, 0, 3600];

        for (i, &seconds) in lengths.iter().enumerate() {
            engine
                .append_track(&mut journey, track(&format!("t{i}"), seconds, "calm", 0.5))
                .unwrap();

            let expected: u64 = lengths[..=i].iter().map(|&s| u64::from(s)).sum();
            assert_eq!(journey.duration_seconds(), expected);
            assert_eq!(journey.emotion_trail().len(), journey.tracks().len());
        }

        let point = &journey.emotion_trail()[0];
        assert_eq!(point.timestamp, fixed_now());
        assert_eq!(point.emotions.get("calm"), Some(0.5));
    }

    #[test]
    fn test_complete_is_terminal() {
        let mut engine = engine();
        let mut journey = engine.start_journey("calm", "user123");
        engine
            .append_track(&mut journey, track("t1", 100, "calm", 0.9))
            .unwrap();

        engine.complete_journey(&mut journey).unwrap();
        assert!(journey.is_completed());
        assert_eq!(journey.end_time(), Some(fixed_now()));

        let again = engine.complete_journey(&mut journey);
        assert!(matches!(
            again,
            Err(EngineError::InvalidState { state: JourneyState::Completed, .. })
        ));

        let append = engine.append_track(&mut journey, track("t2", 100, "calm", 0.9));
        assert!(matches!(append, Err(EngineError::InvalidState { .. })));
        assert_eq!(journey.tracks().len(), 1, "Rejected append must not mutate");
        assert_eq!(journey.duration_seconds(), 100);
    }

    #[test]
    fn test_engine_selection_uses_default_emotion() {
        let mut engine = engine().with_default_emotion("focused");
        let current = Track::new("c", "Silence", "A", "B", 60);
        let pool = vec![track("a", 100, "energetic", 0.9), track("b", 100, "focused", 0.4)];

        let next = engine.select_next_track(&current, &pool).unwrap();
        assert_eq!(next.id, "b");
    }

    #[test]
    fn test_from_config_seed_is_reproducible() {
        let config = EngineConfig {
            seed: Some(77),
            ..EngineConfig::default()
        };
        let a = JourneyEngine::from_config(&config).start_journey("calm", "u");
        let b = JourneyEngine::from_config(&config).start_journey("calm", "u");
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn test_favorites_round_trip_through_engine() {
        let mut engine = engine();
        let mut favorites = Favorites::default();
        let song = track("s1", 200, "calm", 0.9);

        let favorite = engine.add_favorite(&mut favorites, &song);
        assert!(favorites.is_favorite("s1"));
        assert_eq!(favorite.added_at, fixed_now());

        let playlist = engine.create_playlist(&mut favorites, "Evening", "wind down");
        assert!(engine.add_to_playlist(&mut favorites, &playlist.id, &favorite).unwrap());
        assert!(!engine.add_to_playlist(&mut favorites, &playlist.id, &favorite).unwrap());
        assert_eq!(favorites.playlist(&playlist.id).unwrap().songs.len(), 1);

        assert!(engine
            .remove_from_playlist(&mut favorites, &playlist.id, "s1")
            .unwrap());
        assert_eq!(
            engine.add_to_playlist(&mut favorites, "missing", &favorite),
            Err(EngineError::UnknownPlaylist("missing".to_string()))
        );
    }
}
