//! Multi-criterion artwork ratings.
//!
//! A [`Rating`] holds four scores on a 0–5 scale in half-point steps. Scores are
//! snapped and clamped on construction so every stored value is representable by
//! the rating sliders. A score of zero means "unrated" for display purposes.

use serde::{Deserialize, Deserializer, Serialize};

/// Highest score a criterion can hold.
pub const MAX_SCORE: f32 = 5.0;

/// Increment between two adjacent slider positions.
pub const SCORE_STEP: f32 = 0.5;

/// The four rated criteria, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Criterion {
    Overall,
    Technique,
    Originality,
    Emotion,
}

impl Criterion {
    /// All criteria in display order.
    pub const ALL: [Self; 4] = [
        Self::Overall,
        Self::Technique,
        Self::Originality,
        Self::Emotion,
    ];

    /// Label shown next to the slider.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Overall => "Overall",
            Self::Technique => "Technique",
            Self::Originality => "Originality",
            Self::Emotion => "Emotion",
        }
    }

    /// Next criterion, wrapping after the last one.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Overall => Self::Technique,
            Self::Technique => Self::Originality,
            Self::Originality => Self::Emotion,
            Self::Emotion => Self::Overall,
        }
    }

    /// Previous criterion, wrapping before the first one.
    #[must_use]
    pub const fn previous(self) -> Self {
        match self {
            Self::Overall => Self::Emotion,
            Self::Technique => Self::Overall,
            Self::Originality => Self::Technique,
            Self::Emotion => Self::Originality,
        }
    }
}

/// Snaps a raw score to the nearest half step inside `0.0..=5.0`.
///
/// Non-finite input is treated as zero.
#[must_use]
pub fn normalize_score(raw: f32) -> f32 {
    if !raw.is_finite() {
        return 0.0;
    }
    let snapped = (raw / SCORE_STEP).round() * SCORE_STEP;
    snapped.clamp(0.0, MAX_SCORE)
}

/// A user's rating of one artwork.
///
/// Deserializes from the backend row shape (`overall_rating`, `technique_rating`,
/// ...) where each field may be a number, a numeric string, or `null`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rating {
    #[serde(rename = "overall_rating", default, deserialize_with = "lenient_score")]
    pub overall: f32,
    #[serde(rename = "technique_rating", default, deserialize_with = "lenient_score")]
    pub technique: f32,
    #[serde(rename = "originality_rating", default, deserialize_with = "lenient_score")]
    pub originality: f32,
    #[serde(rename = "emotion_rating", default, deserialize_with = "lenient_score")]
    pub emotion: f32,
}

impl Rating {
    /// Creates a rating, normalizing every score.
    #[must_use]
    pub fn new(overall: f32, technique: f32, originality: f32, emotion: f32) -> Self {
        Self {
            overall: normalize_score(overall),
            technique: normalize_score(technique),
            originality: normalize_score(originality),
            emotion: normalize_score(emotion),
        }
    }

    #[must_use]
    pub const fn get(&self, criterion: Criterion) -> f32 {
        match criterion {
            Criterion::Overall => self.overall,
            Criterion::Technique => self.technique,
            Criterion::Originality => self.originality,
            Criterion::Emotion => self.emotion,
        }
    }

    /// Sets one criterion, normalizing the value.
    pub fn set(&mut self, criterion: Criterion, value: f32) {
        let value = normalize_score(value);
        match criterion {
            Criterion::Overall => self.overall = value,
            Criterion::Technique => self.technique = value,
            Criterion::Originality => self.originality = value,
            Criterion::Emotion => self.emotion = value,
        }
    }

    /// Moves one criterion by `steps` half points, saturating at the bounds.
    pub fn nudge(&mut self, criterion: Criterion, steps: i8) {
        let current = self.get(criterion);
        self.set(criterion, current + f32::from(steps) * SCORE_STEP);
    }

    /// Returns `true` when no criterion has been scored.
    #[must_use]
    pub fn is_unrated(&self) -> bool {
        Criterion::ALL.iter().all(|c| self.get(*c) == 0.0)
    }

    /// Request body for `POST /api/ratings/:id`.
    #[must_use]
    pub fn to_request_body(&self) -> serde_json::Value {
        serde_json::json!({
            "overall": self.overall,
            "technique": self.technique,
            "originality": self.originality,
            "emotion": self.emotion,
        })
    }
}

/// Renders a score as five star glyphs with a half star where needed.
///
/// Returns an empty string for zero so unrated criteria show no indicator.
#[must_use]
pub fn stars(score: f32) -> String {
    let score = normalize_score(score);
    if score == 0.0 {
        return String::new();
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let halves = (score / SCORE_STEP).round() as usize;
    let full = halves / 2;
    let half = halves % 2;
    let empty = 5 - full - half;
    format!("{}{}{}", "★".repeat(full), "½".repeat(half), "☆".repeat(empty))
}

fn lenient_score<'de, D>(deserializer: D) -> std::result::Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Missing(Option<()>),
    }

    #[allow(clippy::cast_possible_truncation)]
    let value = match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n as f32,
        Raw::Text(s) => s.trim().parse::<f32>().map_err(serde::de::Error::custom)?,
        Raw::Missing(_) => 0.0,
    };
    Ok(normalize_score(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_snap_to_half_steps_and_clamp() {
        assert_eq!(normalize_score(3.26), 3.5);
        assert_eq!(normalize_score(3.2), 3.0);
        assert_eq!(normalize_score(7.0), 5.0);
        assert_eq!(normalize_score(-1.0), 0.0);
        assert_eq!(normalize_score(f32::NAN), 0.0);
    }

    #[test]
    fn nudge_saturates_at_bounds() {
        let mut rating = Rating::new(4.5, 0.0, 0.0, 0.0);
        rating.nudge(Criterion::Overall, 1);
        rating.nudge(Criterion::Overall, 1);
        assert_eq!(rating.overall, 5.0);

        rating.nudge(Criterion::Technique, -1);
        assert_eq!(rating.technique, 0.0);
    }

    #[test]
    fn backend_rows_accept_strings_numbers_and_nulls() {
        let rating: Rating = serde_json::from_str(
            r#"{"overall_rating":"4.5","technique_rating":3,"originality_rating":null}"#,
        )
        .unwrap();
        assert_eq!(rating, Rating::new(4.5, 3.0, 0.0, 0.0));
    }

    #[test]
    fn request_body_uses_short_field_names() {
        let body = Rating::new(4.5, 3.0, 5.0, 2.0).to_request_body();
        assert_eq!(body["overall"], 4.5);
        assert_eq!(body["emotion"], 2.0);
    }

    #[test]
    fn zero_renders_no_stars() {
        assert_eq!(stars(0.0), "");
        assert_eq!(stars(3.5), "★★★½☆");
        assert_eq!(stars(5.0), "★★★★★");
    }

    #[test]
    fn criteria_cycle() {
        assert_eq!(Criterion::Emotion.next(), Criterion::Overall);
        assert_eq!(Criterion::Overall.previous(), Criterion::Emotion);
        assert!(Rating::default().is_unrated());
    }
}
