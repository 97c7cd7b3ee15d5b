use std::collections::HashSet;
use std::fmt;

use crate::data::listing::Listing;
use crate::data::loader::LoadedListings;

/// Upper bound of the review scale.
pub const MAX_RATING: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

/// Check a cleaned listings table for values the optimizer would accept but
/// that are probably data problems.
pub fn validate_listings(loaded: &LoadedListings) -> ValidationReport {
    let mut report = ValidationReport::default();
    let load = &loaded.report;

    if loaded.listings.is_empty() {
        report.push(
            ValidationSeverity::Error,
            "table",
            format!("no listing survived cleaning ({} rows read)", load.rows_read),
        );
    }
    if load.rows_malformed > 0 {
        report.push(
            ValidationSeverity::Info,
            "table",
            format!("{} malformed row(s) skipped", load.rows_malformed),
        );
    }
    if load.rows_missing_essentials > 0 {
        report.push(
            ValidationSeverity::Info,
            "table",
            format!(
                "{} row(s) dropped for missing price, accommodates or rating",
                load.rows_missing_essentials
            ),
        );
    }

    let mut seen_urls = HashSet::new();
    for listing in &loaded.listings {
        validate_listing(&mut report, listing, &mut seen_urls);
    }

    report
}

fn validate_listing<'a>(
    report: &mut ValidationReport,
    listing: &'a Listing,
    seen_urls: &mut HashSet<&'a str>,
) {
    let context = format!("listing[{}]", listing.index);

    if listing.price <= 0.0 {
        report.push(
            ValidationSeverity::Warning,
            format!("{context}.price"),
            format!("non-positive price {}", listing.price),
        );
    }
    if listing.accommodates == 0 {
        report.push(
            ValidationSeverity::Warning,
            format!("{context}.accommodates"),
            "listing sleeps nobody",
        );
    }
    if !(0.0..=MAX_RATING).contains(&listing.rating) {
        report.push(
            ValidationSeverity::Warning,
            format!("{context}.review_scores_rating"),
            format!("rating {} outside 0-{MAX_RATING}", listing.rating),
        );
    }
    for score in listing.sub_ratings.as_array().into_iter().flatten() {
        if !(0.0..=MAX_RATING).contains(&score) {
            report.push(
                ValidationSeverity::Warning,
                format!("{context}.sub_ratings"),
                format!("sub-rating {score} outside 0-{MAX_RATING}"),
            );
            break;
        }
    }

    let url = listing.listing_url.trim();
    if !url.is_empty() && !seen_urls.insert(url) {
        report.push(
            ValidationSeverity::Warning,
            format!("{context}.listing_url"),
            format!("duplicate url '{url}'"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::listing::SubRatings;
    use crate::data::loader::LoadReport;

    fn listing(index: usize, price: f64, accommodates: u32, rating: f64, url: &str) -> Listing {
        Listing {
            index,
            name: format!("listing {index}"),
            listing_url: url.to_string(),
            price,
            accommodates,
            rating,
            sub_ratings: SubRatings::uniform(4.9),
        }
    }

    #[test]
    fn empty_table_is_an_error() {
        let loaded = LoadedListings {
            listings: Vec::new(),
            report: LoadReport {
                rows_read: 3,
                rows_missing_essentials: 3,
                ..LoadReport::default()
            },
        };
        let report = validate_listings(&loaded);
        assert!(report.has_errors());
        assert_eq!(report.count(ValidationSeverity::Info), 1);
    }

    #[test]
    fn suspicious_values_are_warnings() {
        let loaded = LoadedListings {
            listings: vec![
                listing(0, 0.0, 2, 4.8, "http://a"),
                listing(1, 90.0, 0, 97.0, "http://a"),
            ],
            report: LoadReport::default(),
        };
        let report = validate_listings(&loaded);
        assert!(!report.has_errors());
        // price, capacity, rating scale, duplicate url
        assert_eq!(report.count(ValidationSeverity::Warning), 4);
    }

    #[test]
    fn clean_table_has_no_diagnostics() {
        let loaded = LoadedListings {
            listings: vec![listing(0, 120.0, 4, 4.9, "http://a"), listing(1, 80.0, 2, 4.6, "http://b")],
            report: LoadReport::default(),
        };
        assert!(validate_listings(&loaded).diagnostics.is_empty());
    }
}
