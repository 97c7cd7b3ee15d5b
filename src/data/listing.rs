use serde::Serialize;

/// CSV column names for the six review sub-scores, in [SubRatings] field order.
pub const SUB_RATING_COLUMNS: [&str; 6] = [
    "review_scores_accuracy",
    "review_scores_cleanliness",
    "review_scores_checkin",
    "review_scores_communication",
    "review_scores_location",
    "review_scores_value",
];

/// Review sub-scores. Any of them may be absent in the source data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SubRatings {
    pub accuracy: Option<f64>,
    pub cleanliness: Option<f64>,
    pub checkin: Option<f64>,
    pub communication: Option<f64>,
    pub location: Option<f64>,
    pub value: Option<f64>,
}

impl SubRatings {
    /// All six sub-ratings set to the same score.
    pub fn uniform(score: f64) -> Self {
        Self {
            accuracy: Some(score),
            cleanliness: Some(score),
            checkin: Some(score),
            communication: Some(score),
            location: Some(score),
            value: Some(score),
        }
    }

    pub fn from_array(values: [Option<f64>; 6]) -> Self {
        let [accuracy, cleanliness, checkin, communication, location, value] = values;
        Self {
            accuracy,
            cleanliness,
            checkin,
            communication,
            location,
            value,
        }
    }

    pub fn as_array(&self) -> [Option<f64>; 6] {
        [
            self.accuracy,
            self.cleanliness,
            self.checkin,
            self.communication,
            self.location,
            self.value,
        ]
    }

    /// True when every sub-rating is present and at least `threshold`.
    /// A missing score never clears a threshold.
    pub fn all_at_least(&self, threshold: f64) -> bool {
        self.as_array()
            .iter()
            .all(|score| score.map_or(false, |s| s >= threshold))
    }
}

/// One rentable property from the cleaned listings table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    /// Position in the cleaned table (0-based, dropped rows do not consume an index).
    pub index: usize,
    pub name: String,
    pub listing_url: String,
    /// Nightly price after stripping currency formatting.
    pub price: f64,
    /// Number of guests the property sleeps.
    pub accommodates: u32,
    /// Overall review score, 0–5.
    pub rating: f64,
    pub sub_ratings: SubRatings,
}
