//! Next-track selection by emotion tag.
//!
//! The rule is plain tag matching:
//!
//! ```text
//! dominant  = argmax(current.emotion_scores)        (first label wins ties)
//! matching  = pool.filter(|t| t has key `dominant`) (score ignored)
//! next      = uniform_choice(matching) or pool[0]
//! ```
//!
//! There is no similarity ranking and no weighting beyond tag membership.

use log::trace;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{EngineError, Result};
use crate::track::Track;

/// Label used when the current track carries no emotion scores.
pub const DEFAULT_EMOTION: &str = "energetic";

/// Dominant emotion of `track`, or `fallback` when it has none.
#[must_use]
pub fn dominant_emotion<'a>(track: &'a Track, fallback: &'a str) -> &'a str {
    track.emotion_scores.dominant().unwrap_or(fallback)
}

/// Tracks in `pool` tagged with `emotion`, in pool order.
#[must_use]
pub fn matching_candidates<'p>(emotion: &str, pool: &'p [Track]) -> Vec<&'p Track> {
    pool.iter()
        .filter(|candidate| candidate.emotion_scores.contains(emotion))
        .collect()
}

/// Picks the track to follow `current` from `pool`.
///
/// # Errors
///
/// Returns [`EngineError::EmptyPool`] when `pool` is empty.
///
/// # Examples
///
/// ```
/// use moodtrail::selection::{select_next_track, DEFAULT_EMOTION};
/// use moodtrail::track::Track;
/// use rand::SeedableRng;
///
/// let current = Track::new("c", "Weightless", "Marconi Union", "Weightless", 480)
///     .with_emotion("calm", 0.9);
/// let pool = vec![
///     Track::new("a", "Starboy", "The Weeknd", "Starboy", 230).with_emotion("energetic", 0.85),
///     Track::new("b", "Clair de Lune", "Debussy", "Essentials", 330).with_emotion("calm", 0.92),
/// ];
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(7);
/// let next = select_next_track(&current, &pool, DEFAULT_EMOTION, &mut rng)?;
/// assert_eq!(next.id, "b");
/// # Ok::<(), moodtrail::error::EngineError>(())
/// ```
pub fn select_next_track<'a, R: Rng + ?Sized>(
    current: &Track,
    pool: &'a [Track],
    fallback_emotion: &str,
    rng: &mut R,
) -> Result<&'a Track> {
    let first = pool.first().ok_or(EngineError::EmptyPool)?;
    let dominant = dominant_emotion(current, fallback_emotion);

    let matching = matching_candidates(dominant, pool);

    match matching.choose(rng) {
        Some(&chosen) => {
            trace!(
                "Picked `{}' from {} candidate(s) sharing `{dominant}' with `{}'.",
                chosen.title,
                matching.len(),
                current.title
            );
            Ok(chosen)
        }
        None => {
            trace!("No candidate shares `{dominant}'; falling back to `{}'.", first.title);
            Ok(first)
        }
    }
}
