//! Listening journeys.
//!
//! A [`Journey`] is one mood-driven listening session: the tracks played in
//! order, plus an emotion trail with one snapshot per track. Journeys are
//! created and mutated through [`JourneyEngine`](crate::engine::JourneyEngine);
//! the fields are read-only from outside the crate so that the invariants
//!
//! ```text
//! duration_seconds == sum(track.duration_seconds)
//! emotion_trail.len() == tracks.len()
//! ```
//!
//! cannot be broken by callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::track::{EmotionScores, Track};

/// Lifecycle of a journey. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JourneyState {
    Active,
    Completed,
}

impl fmt::Display for JourneyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("active"),
            Self::Completed => f.write_str("completed"),
        }
    }
}

/// Emotion snapshot taken when a track joins a journey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionPoint {
    pub timestamp: DateTime<Utc>,
    pub emotions: EmotionScores,
}

/// How far through its track list a listener is.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progression {
    /// 1-based; 0 only when the journey has no tracks.
    pub current_track: usize,
    pub total_tracks: usize,
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "JourneyRecord")]
pub struct Journey {
    pub(crate) id: String,
    pub(crate) user_id: String,
    pub(crate) mood: String,
    pub(crate) start_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) end_time: Option<DateTime<Utc>>,
    pub(crate) duration_seconds: u64,
    pub(crate) tracks: Vec<Track>,
    pub(crate) emotion_trail: Vec<EmotionPoint>,
    pub(crate) completed: bool,
}

/// Wire shape of a journey. Any stored duration is ignored and recomputed.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JourneyRecord {
    id: String,
    user_id: String,
    mood: String,
    start_time: DateTime<Utc>,
    #[serde(default)]
    end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    tracks: Vec<Track>,
    #[serde(default)]
    emotion_trail: Vec<EmotionPoint>,
    #[serde(default)]
    completed: bool,
}

impl From<JourneyRecord> for Journey {
    fn from(record: JourneyRecord) -> Self {
        let duration_seconds = record
            .tracks
            .iter()
            .map(|t| u64::from(t.duration_seconds))
            .sum();

        Self {
            id: record.id,
            user_id: record.user_id,
            mood: record.mood,
            start_time: record.start_time,
            end_time: record.end_time,
            duration_seconds,
            tracks: record.tracks,
            emotion_trail: record.emotion_trail,
            completed: record.completed,
        }
    }
}

impl Journey {
    pub(crate) fn new(
        id: String,
        user_id: impl Into<String>,
        mood: impl Into<String>,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id: user_id.into(),
            mood: mood.into(),
            start_time,
            end_time: None,
            duration_seconds: 0,
            tracks: Vec::new(),
            emotion_trail: Vec::new(),
            completed: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn mood(&self) -> &str {
        &self.mood
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    pub fn duration_seconds(&self) -> u64 {
        self.duration_seconds
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn emotion_trail(&self) -> &[EmotionPoint] {
        &self.emotion_trail
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn state(&self) -> JourneyState {
        if self.completed {
            JourneyState::Completed
        } else {
            JourneyState::Active
        }
    }

    /// The most recently added track.
    pub fn last_track(&self) -> Option<&Track> {
        self.tracks.last()
    }

    /// Progress of a listener sitting at `position` (0-based) in the track list.
    ///
    /// Positions past the end are clamped to the last track.
    #[must_use]
    pub fn progression(&self, position: usize) -> Progression {
        let total = self.tracks.len();
        if total == 0 {
            return Progression::default();
        }

        let current = position.min(total - 1) + 1;
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let percentage = ((current as f64 / total as f64) * 100.0).round() as u32;

        Progression {
            current_track: current,
            total_tracks: total,
            percentage,
        }
    }

    /// Average score of each emotion over the trail points it appears in.
    ///
    /// Labels come out in the order they were first seen.
    #[must_use]
    pub fn emotion_insights(&self) -> EmotionScores {
        average_emotions(self.emotion_trail.iter().map(|p| &p.emotions))
    }
}

/// Per-label mean over a sequence of emotion maps, first-seen label order.
pub(crate) fn average_emotions<'a>(
    snapshots: impl IntoIterator<Item = &'a EmotionScores>,
) -> EmotionScores {
    let mut totals: Vec<(&str, f64, u32)> = Vec::new();

    for snapshot in snapshots {
        for (label, score) in snapshot.iter() {
            match totals.iter_mut().find(|(l, _, _)| *l == label) {
                Some(entry) => {
                    entry.1 += score;
                    entry.2 += 1;
                }
                None => totals.push((label, score, 1)),
            }
        }
    }

    totals
        .into_iter()
        .map(|(label, total, count)| (label, total / f64::from(count)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, hour, 0, 0).unwrap()
    }

    fn journey_with_tracks(count: usize) -> Journey {
        let mut journey = Journey::new("j1".to_string(), "user123", "calm", at(14));
        for i in 0..count {
            journey.tracks.push(Track::new(format!("t{i}"), "T", "A", "B", 100));
        }
        journey
    }

    #[test]
    fn test_new_journey_is_active_and_empty() {
        let journey = Journey::new("j1".to_string(), "user123", "calm", at(14));

        assert_eq!(journey.state(), JourneyState::Active);
        assert!(journey.tracks().is_empty());
        assert!(journey.emotion_trail().is_empty());
        assert_eq!(journey.duration_seconds(), 0);
        assert!(journey.end_time().is_none());
    }

    #[test]
    fn test_progression_empty_journey() {
        assert_eq!(journey_with_tracks(0).progression(3), Progression::default());
    }

    #[test]
    fn test_progression_rounds_percentage() {
        let journey = journey_with_tracks(3);

        let p = journey.progression(0);
        assert_eq!((p.current_track, p.total_tracks, p.percentage), (1, 3, 33));

        let p = journey.progression(1);
        assert_eq!(p.percentage, 67);
    }

    #[test]
    fn test_progression_clamps_past_end() {
        let p = journey_with_tracks(4).progression(10);
        assert_eq!((p.current_track, p.percentage), (4, 100));
    }

    #[test]
    fn test_emotion_insights_average_per_label() {
        let mut journey = journey_with_tracks(0);
        journey.emotion_trail.push(EmotionPoint {
            timestamp: at(14),
            emotions: [("calm", 0.9), ("peaceful", 0.8)].into_iter().collect(),
        });
        journey.emotion_trail.push(EmotionPoint {
            timestamp: at(15),
            emotions: [("relaxed", 0.6), ("calm", 0.7)].into_iter().collect(),
        });

        let insights = journey.emotion_insights();
        let labels: Vec<_> = insights.labels().collect();
        assert_eq!(labels, vec!["calm", "peaceful", "relaxed"]);
        assert!((insights.get("calm").unwrap() - 0.8).abs() < 1e-9);
        assert!((insights.get("peaceful").unwrap() - 0.8).abs() < 1e-9);
        assert!((insights.get("relaxed").unwrap() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_deserialize_recomputes_duration() {
        let json = r#"{
            "id": "1",
            "userId": "user123",
            "mood": "calm",
            "startTime": "2024-01-15T14:30:00Z",
            "endTime": "2024-01-15T15:15:00Z",
            "durationSeconds": 2700,
            "tracks": [
                {"id": "a", "title": "A", "artist": "X", "album": "Y", "durationSeconds": 480},
                {"id": "b", "title": "B", "artist": "X", "album": "Y", "durationSeconds": 330}
            ],
            "completed": true
        }"#;

        let journey: Journey = serde_json::from_str(json).unwrap();
        assert_eq!(journey.duration_seconds(), 810);
        assert_eq!(journey.state(), JourneyState::Completed);
        assert_eq!(journey.tracks().len(), 2);
    }

    #[test]
    fn test_state_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&JourneyState::Completed).unwrap(), "\"completed\"");
    }
}
