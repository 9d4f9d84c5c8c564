//! Tracks and their emotion annotations.
//!
//! A [`Track`] is immutable once built. Its [`EmotionScores`] keep the order in
//! which labels were added, because tie-breaks elsewhere in the crate (the
//! dominant emotion of a track, for one) resolve to the first label seen.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Insertion-ordered `label -> score` map.
///
/// Scores are expected in `[0, 1]` but are not required to sum to 1. Emotion
/// maps are tiny (a handful of labels), so lookups are linear scans.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EmotionScores {
    entries: Vec<(String, f64)>,
}

impl EmotionScores {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `label` to `score`. An existing label keeps its position.
    pub fn insert(&mut self, label: impl Into<String>, score: f64) {
        let label = label.into();
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some(entry) => entry.1 = score,
            None => self.entries.push((label, score)),
        }
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|&(_, score)| score)
    }

    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.entries.iter().any(|(l, _)| l == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(l, s)| (l.as_str(), *s))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The highest-scoring label. Among equal scores the earliest label wins.
    ///
    /// # Examples
    ///
    /// ```
    /// use moodtrail::track::EmotionScores;
    ///
    /// let scores: EmotionScores = [("calm", 0.9), ("peaceful", 0.9), ("sad", 0.2)]
    ///     .into_iter()
    ///     .collect();
    /// assert_eq!(scores.dominant(), Some("calm"));
    /// ```
    #[must_use]
    pub fn dominant(&self) -> Option<&str> {
        let mut best: Option<(&str, f64)> = None;
        for (label, score) in self.iter() {
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((label, score)),
            }
        }
        best.map(|(label, _)| label)
    }
}

impl<L: Into<String>> FromIterator<(L, f64)> for EmotionScores {
    fn from_iter<I: IntoIterator<Item = (L, f64)>>(iter: I) -> Self {
        let mut scores = Self::new();
        for (label, score) in iter {
            scores.insert(label, score);
        }
        scores
    }
}

impl Serialize for EmotionScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, score) in &self.entries {
            map.serialize_entry(label, score)?;
        }
        map.end()
    }
}

struct EmotionScoresVisitor;

impl<'de> Visitor<'de> for EmotionScoresVisitor {
    type Value = EmotionScores;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of emotion labels to scores")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut scores = EmotionScores::new();
        while let Some((label, score)) = access.next_entry::<String, f64>()? {
            scores.insert(label, score);
        }
        Ok(scores)
    }
}

impl<'de> Deserialize<'de> for EmotionScores {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(EmotionScoresVisitor)
    }
}

/// Spotify-style audio descriptors, each in `[0, 1]`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub valence: f64,
    pub energy: f64,
    pub danceability: f64,
}

/// A playable track as supplied by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub duration_seconds: u32,
    #[serde(default)]
    pub emotion_scores: EmotionScores,
    #[serde(default)]
    pub audio_features: AudioFeatures,
    /// Cover art, only carried through for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Track {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        album: impl Into<String>,
        duration_seconds: u32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            album: album.into(),
            duration_seconds,
            emotion_scores: EmotionScores::new(),
            audio_features: AudioFeatures::default(),
            image_url: None,
        }
    }

    #[must_use]
    pub fn with_emotion(mut self, label: impl Into<String>, score: f64) -> Self {
        self.emotion_scores.insert(label, score);
        self
    }

    #[must_use]
    pub fn with_audio_features(mut self, valence: f64, energy: f64, danceability: f64) -> Self {
        self.audio_features = AudioFeatures {
            valence,
            energy,
            danceability,
        };
        self
    }

    /// Scores or features outside `[0, 1]`, as `(name, value)` pairs.
    ///
    /// Used by the catalog loader to warn about suspicious input; out-of-range
    /// values are not rejected.
    #[must_use]
    pub fn out_of_range_values(&self) -> Vec<(String, f64)> {
        let features = [
            ("valence", self.audio_features.valence),
            ("energy", self.audio_features.energy),
            ("danceability", self.audio_features.danceability),
        ];

        self.emotion_scores
            .iter()
            .chain(features)
            .filter(|(_, value)| !(0.0..=1.0).contains(value))
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_first_position_on_update() {
        let mut scores = EmotionScores::new();
        scores.insert("calm", 0.5);
        scores.insert("happy", 0.7);
        scores.insert("calm", 0.9);

        let labels: Vec<_> = scores.labels().collect();
        assert_eq!(labels, vec!["calm", "happy"]);
        assert_eq!(scores.get("calm"), Some(0.9));
    }

    #[test]
    fn test_dominant_tie_goes_to_first_label() {
        let scores: EmotionScores = [("happy", 0.8), ("fun", 0.8)].into_iter().collect();
        assert_eq!(scores.dominant(), Some("happy"));

        let scores: EmotionScores = [("fun", 0.8), ("happy", 0.8)].into_iter().collect();
        assert_eq!(scores.dominant(), Some("fun"));
    }

    #[test]
    fn test_dominant_of_empty_scores() {
        assert_eq!(EmotionScores::new().dominant(), None);
    }

    #[test]
    fn test_json_preserves_document_order() {
        let json = r#"{"serene": 0.85, "calm": 0.92, "contemplative": 0.88}"#;
        let scores: EmotionScores = serde_json::from_str(json).unwrap();

        let labels: Vec<_> = scores.labels().collect();
        assert_eq!(labels, vec!["serene", "calm", "contemplative"]);

        let back = serde_json::to_string(&scores).unwrap();
        assert_eq!(back, r#"{"serene":0.85,"calm":0.92,"contemplative":0.88}"#);
    }

    #[test]
    fn test_track_deserializes_camel_case() {
        let json = r#"{
            "id": "song1",
            "title": "Weightless",
            "artist": "Marconi Union",
            "album": "Weightless",
            "durationSeconds": 480,
            "emotionScores": {"calm": 0.95, "peaceful": 0.85},
            "audioFeatures": {"valence": 0.4, "energy": 0.2, "danceability": 0.3}
        }"#;

        let track: Track = serde_json::from_str(json).unwrap();
        assert_eq!(track.duration_seconds, 480);
        assert_eq!(track.emotion_scores.dominant(), Some("calm"));
        assert_eq!(track.audio_features.energy, 0.2);
        assert!(track.image_url.is_none());
    }

    #[test]
    fn test_out_of_range_values() {
        let track = Track::new("t", "T", "A", "B", 100)
            .with_emotion("calm", 1.4)
            .with_emotion("sad", 0.2)
            .with_audio_features(0.5, -0.1, 0.5);

        let bad = track.out_of_range_values();
        assert_eq!(bad, vec![("calm".to_string(), 1.4), ("energy".to_string(), -0.1)]);
    }
}
