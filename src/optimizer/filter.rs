//! Rating pre-filter that narrows the listing table to a scenario's candidates.

use crate::config::{ScenarioConfig, ScenarioMode};
use crate::data::listing::Listing;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingFilter {
    pub threshold: f64,
    pub mode: ScenarioMode,
}

impl RatingFilter {
    pub fn for_scenario(scenario: &ScenarioConfig) -> Self {
        Self {
            threshold: scenario.min_rating,
            mode: scenario.mode,
        }
    }

    pub fn accepts(&self, listing: &Listing) -> bool {
        if listing.rating < self.threshold {
            return false;
        }
        match self.mode {
            ScenarioMode::Standard => true,
            ScenarioMode::Strict => listing.sub_ratings.all_at_least(self.threshold),
        }
    }

    /// Accepted listings, in table order.
    pub fn apply(&self, listings: &[Listing]) -> Vec<Listing> {
        listings
            .iter()
            .filter(|listing| self.accepts(listing))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::listing::SubRatings;

    fn listing(index: usize, rating: f64, sub_ratings: SubRatings) -> Listing {
        Listing {
            index,
            name: format!("listing {index}"),
            listing_url: format!("http://example.test/{index}"),
            price: 100.0,
            accommodates: 2,
            rating,
            sub_ratings,
        }
    }

    #[test]
    fn standard_mode_checks_overall_rating_only() {
        let filter = RatingFilter {
            threshold: 4.5,
            mode: ScenarioMode::Standard,
        };
        assert!(filter.accepts(&listing(0, 4.5, SubRatings::uniform(1.0))));
        assert!(!filter.accepts(&listing(1, 4.49, SubRatings::uniform(5.0))));
    }

    #[test]
    fn strict_mode_checks_every_sub_rating() {
        let filter = RatingFilter {
            threshold: 4.5,
            mode: ScenarioMode::Strict,
        };
        let mut weak_location = SubRatings::uniform(4.9);
        weak_location.location = Some(4.2);

        assert!(filter.accepts(&listing(0, 4.8, SubRatings::uniform(4.5))));
        assert!(!filter.accepts(&listing(1, 4.8, weak_location)));
        assert!(!filter.accepts(&listing(2, 4.8, SubRatings::default())));
    }

    #[test]
    fn apply_preserves_table_order() {
        let listings = vec![
            listing(0, 4.9, SubRatings::uniform(5.0)),
            listing(1, 3.0, SubRatings::uniform(5.0)),
            listing(2, 4.6, SubRatings::uniform(5.0)),
        ];
        let filter = RatingFilter {
            threshold: 4.5,
            mode: ScenarioMode::Standard,
        };
        let kept: Vec<usize> = filter.apply(&listings).iter().map(|l| l.index).collect();
        assert_eq!(kept, vec![0, 2]);
    }
}
