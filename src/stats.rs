//! Summary statistics over completed journeys.
//!
//! Everything here is recomputed on demand from a slice of journeys; nothing
//! is cached or stored. Ties in "most frequent" questions go to whichever value
//! was seen first while walking the journeys in order.

use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::hash::Hash;

use crate::journey::Journey;

/// Placeholder for favourite mood / most played track when there is no data.
pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyStats {
    pub total_journeys: usize,
    pub total_time_seconds: u64,
    pub favorite_mood: String,
    pub most_played_track_title: String,
    /// Integer percentages summing to 100, or empty.
    pub emotion_distribution: BTreeMap<String, u32>,
}

/// Derives [`JourneyStats`] from `journeys`.
///
/// # Examples
///
/// ```
/// use moodtrail::engine::JourneyEngine;
/// use moodtrail::stats::compute_stats;
///
/// let mut engine = JourneyEngine::seeded(1);
/// let journeys = vec![
///     engine.start_journey("calm", "user123"),
///     engine.start_journey("calm", "user123"),
///     engine.start_journey("energetic", "user123"),
/// ];
///
/// let stats = compute_stats(&journeys);
/// assert_eq!(stats.total_journeys, 3);
/// assert_eq!(stats.favorite_mood, "calm");
/// assert_eq!(stats.most_played_track_title, "Unknown");
/// assert!(stats.emotion_distribution.is_empty());
/// ```
#[must_use]
pub fn compute_stats(journeys: &[Journey]) -> JourneyStats {
    let tracks = journeys.iter().flat_map(Journey::tracks);

    JourneyStats {
        total_journeys: journeys.len(),
        total_time_seconds: journeys.iter().map(Journey::duration_seconds).sum(),
        favorite_mood: most_frequent(journeys.iter().map(Journey::mood))
            .unwrap_or(UNKNOWN)
            .to_string(),
        most_played_track_title: most_frequent(tracks.clone().map(|t| t.title.as_str()))
            .unwrap_or(UNKNOWN)
            .to_string(),
        emotion_distribution: to_percentages(sum_by_label(
            tracks.flat_map(|t| t.emotion_scores.iter()),
        )),
    }
}

/// The most common item; the earliest one wins a tie.
pub fn most_frequent<T, I>(items: I) -> Option<T>
where
    T: Eq + Hash + Copy,
    I: IntoIterator<Item = T>,
{
    ranked_by_frequency(items)
        .into_iter()
        .next()
        .map(|(item, _)| item)
}

/// Items ordered by descending count, first-seen order among equal counts.
pub fn ranked_by_frequency<T, I>(items: I) -> Vec<(T, usize)>
where
    T: Eq + Hash + Copy,
    I: IntoIterator<Item = T>,
{
    let mut order: Vec<(T, usize)> = Vec::new();
    let mut index: HashMap<T, usize> = HashMap::new();

    for item in items {
        match index.get(&item) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(item, order.len());
                order.push((item, 1));
            }
        }
    }

    // stable sort keeps first-seen order for ties
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order
}

/// Sums scores per label, in first-seen label order.
pub(crate) fn sum_by_label<'a>(scores: impl IntoIterator<Item = (&'a str, f64)>) -> Vec<(&'a str, f64)> {
    let mut totals: Vec<(&str, f64)> = Vec::new();
    for (label, score) in scores {
        match totals.iter_mut().find(|(l, _)| *l == label) {
            Some(entry) => entry.1 += score,
            None => totals.push((label, score)),
        }
    }
    totals
}

/// Normalizes weights into integer percentages that sum to exactly 100.
///
/// Uses largest-remainder rounding: every share is floored, then the points
/// still missing go to the largest fractional parts (earliest label on ties).
/// Labels whose weight is not positive are dropped; if nothing positive is
/// left the result is empty.
#[must_use]
pub fn to_percentages<L: Into<String>>(weights: Vec<(L, f64)>) -> BTreeMap<String, u32> {
    let positive: Vec<(L, f64)> = weights.into_iter().filter(|(_, w)| *w > 0.0).collect();
    let total: f64 = positive.iter().map(|(_, w)| w).sum();
    if positive.is_empty() || !total.is_finite() {
        return BTreeMap::new();
    }

    let exact: Vec<f64> = positive.iter().map(|(_, w)| w / total * 100.0).collect();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let mut shares: Vec<u32> = exact.iter().map(|e| e.floor() as u32).collect();

    let assigned: u32 = shares.iter().sum();
    let mut by_remainder: Vec<usize> = (0..exact.len()).collect();
    by_remainder.sort_by(|&a, &b| {
        let ra = exact[a] - exact[a].floor();
        let rb = exact[b] - exact[b].floor();
        rb.partial_cmp(&ra).unwrap_or(std::cmp::Ordering::Equal)
    });
    for &i in by_remainder.iter().take(100u32.saturating_sub(assigned) as usize) {
        shares[i] += 1;
    }

    positive
        .into_iter()
        .zip(shares)
        .map(|((label, _), share)| (label.into(), share))
        .collect()
}
