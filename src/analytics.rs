//! Listening analytics derived from past journeys.
//!
//! These are read-only views for charts and summary pages: weekly totals,
//! daily emotion trends, listening habits and mood/emotion correlations. Like
//! [`stats`](crate::stats), all of it is recomputed from the journeys passed
//! in. Dates are bucketed in UTC.

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, Timelike, Utc, Weekday};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::journey::{average_emotions, Journey};
use crate::stats::{most_frequent, ranked_by_frequency, sum_by_label, to_percentages};
use crate::track::EmotionScores;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummary {
    /// Monday of the week.
    pub week_start: NaiveDate,
    /// e.g. `Jan 1 - Jan 7, 2024`.
    pub label: String,
    pub total_journeys: usize,
    pub total_time_seconds: u64,
    /// Listening time rounded to whole hours.
    pub hours: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionTrend {
    pub date: NaiveDate,
    pub emotions: EmotionScores,
}

/// Coarse part of the day a journey started in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    #[must_use]
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => Self::Morning,
            12..=16 => Self::Afternoon,
            17..=20 => Self::Evening,
            _ => Self::Night,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListeningHabits {
    pub total_time_seconds: u64,
    pub songs_played: usize,
    pub favorite_time_of_day: Option<TimeOfDay>,
    pub favorite_day_of_week: Option<String>,
    /// Share of journeys per mood, integer percent.
    pub mood_distribution: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodCorrelation {
    pub mood: String,
    pub correlated_emotions: Vec<String>,
}

/// One slice of a mood pie chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoodSlice {
    pub name: String,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInsights {
    pub emotion_trends: Vec<EmotionTrend>,
    pub listening_habits: ListeningHabits,
    pub favorite_artists: Vec<String>,
    pub mood_correlations: Vec<MoodCorrelation>,
    pub weekly_summary: Vec<WeeklySummary>,
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

fn week_label(start: NaiveDate) -> String {
    let end = start + Days::new(6);
    format!("{} - {}", start.format("%b %-d"), end.format("%b %-d, %Y"))
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Journeys and listening time per calendar week, oldest week first.
///
/// # Examples
///
/// ```
/// use moodtrail::analytics::weekly_summary;
///
/// assert!(weekly_summary(&[]).is_empty());
/// ```
#[must_use]
pub fn weekly_summary(journeys: &[Journey]) -> Vec<WeeklySummary> {
    let mut weeks: BTreeMap<NaiveDate, (usize, u64)> = BTreeMap::new();
    for journey in journeys {
        let entry = weeks
            .entry(week_start(journey.start_time().date_naive()))
            .or_default();
        entry.0 += 1;
        entry.1 += journey.duration_seconds();
    }

    weeks
        .into_iter()
        .map(|(start, (total_journeys, total_time_seconds))| WeeklySummary {
            week_start: start,
            label: week_label(start),
            total_journeys,
            total_time_seconds,
            hours: (total_time_seconds + 1800) / 3600,
        })
        .collect()
}

/// Daily average emotions over the last `days` days before `now`.
///
/// A window reaching past the earliest representable time has no cutoff.
#[must_use]
pub fn emotion_trends(journeys: &[Journey], now: DateTime<Utc>, days: u64) -> Vec<EmotionTrend> {
    let cutoff = i64::try_from(days)
        .ok()
        .and_then(Duration::try_days)
        .and_then(|window| now.checked_sub_signed(window));
    let mut by_day: BTreeMap<NaiveDate, Vec<&EmotionScores>> = BTreeMap::new();

    for point in journeys.iter().flat_map(Journey::emotion_trail) {
        if cutoff.map_or(true, |cutoff| point.timestamp >= cutoff) {
            by_day
                .entry(point.timestamp.date_naive())
                .or_default()
                .push(&point.emotions);
        }
    }

    by_day
        .into_iter()
        .map(|(date, snapshots)| EmotionTrend {
            date,
            emotions: average_emotions(snapshots),
        })
        .collect()
}

#[must_use]
pub fn listening_habits(journeys: &[Journey]) -> ListeningHabits {
    let starts = || journeys.iter().map(Journey::start_time);

    ListeningHabits {
        total_time_seconds: journeys.iter().map(Journey::duration_seconds).sum(),
        songs_played: journeys.iter().map(|j| j.tracks().len()).sum(),
        favorite_time_of_day: most_frequent(starts().map(|t| TimeOfDay::from_hour(t.hour()))),
        favorite_day_of_week: most_frequent(starts().map(|t| t.weekday()))
            .map(|day| weekday_name(day).to_string()),
        mood_distribution: to_percentages(
            ranked_by_frequency(journeys.iter().map(Journey::mood))
                .into_iter()
                .map(|(mood, count)| {
                    #[allow(clippy::cast_precision_loss)]
                    let weight = count as f64;
                    (mood, weight)
                })
                .collect(),
        ),
    }
}

/// The `limit` most played artists, most played first.
#[must_use]
pub fn favorite_artists(journeys: &[Journey], limit: usize) -> Vec<String> {
    ranked_by_frequency(
        journeys
            .iter()
            .flat_map(Journey::tracks)
            .map(|t| t.artist.as_str()),
    )
    .into_iter()
    .take(limit)
    .map(|(artist, _)| artist.to_string())
    .collect()
}

/// For each mood, the `limit` emotions that scored highest across its tracks.
///
/// The mood's own label is left out, so a `calm` journey correlates with
/// `peaceful` and `relaxed` rather than with `calm`.
#[must_use]
pub fn mood_correlations(journeys: &[Journey], limit: usize) -> Vec<MoodCorrelation> {
    let mut moods: Vec<&str> = Vec::new();
    for journey in journeys {
        if !moods.contains(&journey.mood()) {
            moods.push(journey.mood());
        }
    }

    moods
        .into_iter()
        .map(|mood| {
            let mut totals = sum_by_label(
                journeys
                    .iter()
                    .filter(|j| j.mood() == mood)
                    .flat_map(Journey::tracks)
                    .flat_map(|t| t.emotion_scores.iter())
                    .filter(|(label, _)| *label != mood),
            );
            totals.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

            MoodCorrelation {
                mood: mood.to_string(),
                correlated_emotions: totals
                    .into_iter()
                    .take(limit)
                    .map(|(label, _)| label.to_string())
                    .collect(),
            }
        })
        .collect()
}

/// Chart rows for the mood distribution, with capitalized names.
#[must_use]
pub fn mood_slices(habits: &ListeningHabits) -> Vec<MoodSlice> {
    let mut slices: Vec<MoodSlice> = habits
        .mood_distribution
        .iter()
        .map(|(mood, &value)| MoodSlice {
            name: capitalize(mood),
            value,
        })
        .collect();
    slices.sort_by(|a, b| b.value.cmp(&a.value));
    slices
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Everything the insights page shows, in one pass over the journeys.
#[must_use]
pub fn insights(journeys: &[Journey], now: DateTime<Utc>, days: u64, limit: usize) -> UserInsights {
    UserInsights {
        emotion_trends: emotion_trends(journeys, now, days),
        listening_habits: listening_habits(journeys),
        favorite_artists: favorite_artists(journeys, limit),
        mood_correlations: mood_correlations(journeys, limit),
        weekly_summary: weekly_summary(journeys),
    }
}
