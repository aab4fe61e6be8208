//! Charm and emotion score sets and their proportional breakdowns.
//!
//! Every matchup movie owns one [`CharmPoints`] and one [`EmotionPoints`]
//! set. Votes add non-negative per-axis deltas; read models report each
//! axis as an integer percentage of the set's total.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Number of axes in every score set.
pub const AXIS_COUNT: usize = 7;

/// Largest point delta one vote may add to a single axis.
pub const MAX_AXIS_DELTA: i64 = 1_000;

/// A fixed seven-axis, non-negative integer score set.
///
/// Implementors only describe how to flatten to and rebuild from an axis
/// array; the ledger arithmetic is shared by the provided methods.
pub trait ScoreSet: Sized + Copy {
    /// Axis names in storage order.
    const AXES: [&'static str; AXIS_COUNT];

    fn to_axes(&self) -> [i64; AXIS_COUNT];

    fn from_axes(values: [i64; AXIS_COUNT]) -> Self;

    /// Sum over all axes.
    fn total(&self) -> i64 {
        self.to_axes().iter().sum()
    }

    /// Reject a delta with an axis outside `0..=MAX_AXIS_DELTA`.
    fn validate_delta(&self) -> Result<(), CoreError> {
        for (name, value) in Self::AXES.iter().zip(self.to_axes()) {
            if !(0..=MAX_AXIS_DELTA).contains(&value) {
                return Err(CoreError::Validation(format!(
                    "Point delta for '{name}' must be between 0 and {MAX_AXIS_DELTA}, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Add `delta` axis-by-axis. Axes with a zero delta are unchanged.
    ///
    /// On overflow nothing is applied.
    fn apply_delta(&mut self, delta: &Self) -> Result<(), CoreError> {
        let mut values = self.to_axes();
        for ((value, add), name) in values.iter_mut().zip(delta.to_axes()).zip(Self::AXES) {
            *value = value.checked_add(add).ok_or_else(|| {
                CoreError::Validation(format!("Point total for '{name}' would overflow"))
            })?;
        }
        *self = Self::from_axes(values);
        Ok(())
    }

    /// Per-axis share of the total as `floor(value * 100 / total)`.
    ///
    /// An all-zero set reports zero on every axis. Shares are not
    /// normalized, so they may sum to slightly less than 100.
    fn proportions(&self) -> Self {
        let values = self.to_axes();
        let total: i128 = values.iter().map(|v| i128::from(*v)).sum();
        if total == 0 {
            return Self::from_axes([0; AXIS_COUNT]);
        }
        let mut shares = [0i64; AXIS_COUNT];
        for (share, value) in shares.iter_mut().zip(values) {
            // Values are non-negative, so integer division is floor division.
            *share = (i128::from(value) * 100 / total) as i64;
        }
        Self::from_axes(shares)
    }
}

/// Charm axes: what a voter liked about the movie.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharmPoints {
    pub ost: i64,
    #[serde(alias = "direction")]
    pub directing: i64,
    pub story: i64,
    pub dialogue: i64,
    pub visual: i64,
    pub acting: i64,
    #[serde(alias = "special_effect")]
    pub special_effects: i64,
}

impl ScoreSet for CharmPoints {
    const AXES: [&'static str; AXIS_COUNT] = [
        "ost",
        "directing",
        "story",
        "dialogue",
        "visual",
        "acting",
        "special_effects",
    ];

    fn to_axes(&self) -> [i64; AXIS_COUNT] {
        [
            self.ost,
            self.directing,
            self.story,
            self.dialogue,
            self.visual,
            self.acting,
            self.special_effects,
        ]
    }

    fn from_axes(v: [i64; AXIS_COUNT]) -> Self {
        Self {
            ost: v[0],
            directing: v[1],
            story: v[2],
            dialogue: v[3],
            visual: v[4],
            acting: v[5],
            special_effects: v[6],
        }
    }
}

/// Emotion axes: how the movie made the voter feel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmotionPoints {
    pub touching: i64,
    pub angry: i64,
    pub joy: i64,
    pub immersion: i64,
    pub excited: i64,
    pub empathy: i64,
    pub tension: i64,
}

impl ScoreSet for EmotionPoints {
    const AXES: [&'static str; AXIS_COUNT] = [
        "touching",
        "angry",
        "joy",
        "immersion",
        "excited",
        "empathy",
        "tension",
    ];

    fn to_axes(&self) -> [i64; AXIS_COUNT] {
        [
            self.touching,
            self.angry,
            self.joy,
            self.immersion,
            self.excited,
            self.empathy,
            self.tension,
        ]
    }

    fn from_axes(v: [i64; AXIS_COUNT]) -> Self {
        Self {
            touching: v[0],
            angry: v[1],
            joy: v[2],
            immersion: v[3],
            excited: v[4],
            empathy: v[5],
            tension: v[6],
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
