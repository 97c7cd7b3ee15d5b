//! Load and clean the listings CSV.
//!
//! Rows whose field count disagrees with the header are skipped. Rows without a
//! usable `price`, `accommodates` or `review_scores_rating` are dropped. Neither
//! aborts the load; both are counted in [LoadReport].

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::data::listing::{Listing, SubRatings, SUB_RATING_COLUMNS};

const PRICE_COLUMN: &str = "price";
const ACCOMMODATES_COLUMN: &str = "accommodates";
const RATING_COLUMN: &str = "review_scores_rating";
const NAME_COLUMN: &str = "name";
const URL_COLUMN: &str = "listing_url";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open listings file '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read listings CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("listings CSV is missing required column '{0}'")]
    MissingColumn(&'static str),
}

/// Row accounting for one load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Data rows encountered (header excluded).
    pub rows_read: usize,
    pub rows_kept: usize,
    /// Rows skipped because they could not be parsed as a record.
    pub rows_malformed: usize,
    /// Rows dropped for a missing price, capacity or rating.
    pub rows_missing_essentials: usize,
}

#[derive(Debug, Clone)]
pub struct LoadedListings {
    pub listings: Vec<Listing>,
    pub report: LoadReport,
}

/// Column positions resolved from the header row by name.
struct ListingColumns {
    price: usize,
    accommodates: usize,
    rating: usize,
    name: usize,
    url: usize,
    sub_ratings: [Option<usize>; 6],
}

impl ListingColumns {
    fn from_header(header: &csv::StringRecord) -> Result<Self, LoadError> {
        fn find(header: &csv::StringRecord, name: &str) -> Option<usize> {
            header.iter().position(|h| h.trim() == name)
        }
        fn require(header: &csv::StringRecord, name: &'static str) -> Result<usize, LoadError> {
            find(header, name).ok_or(LoadError::MissingColumn(name))
        }

        let sub_ratings = SUB_RATING_COLUMNS.map(|column| find(header, column));
        for (column, position) in SUB_RATING_COLUMNS.iter().zip(sub_ratings.iter()) {
            if position.is_none() {
                warn!(column, "sub-rating column absent; strict scenarios will reject every listing");
            }
        }

        Ok(Self {
            price: require(header, PRICE_COLUMN)?,
            accommodates: require(header, ACCOMMODATES_COLUMN)?,
            rating: require(header, RATING_COLUMN)?,
            name: require(header, NAME_COLUMN)?,
            url: require(header, URL_COLUMN)?,
            sub_ratings,
        })
    }
}

/// Load listings from a CSV file on disk.
pub fn load_listings(path: impl AsRef<Path>) -> Result<LoadedListings, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.display().to_string(),
        source,
    })?;
    let loaded = load_listings_from_reader(file)?;
    info!(
        path = %path.display(),
        kept = loaded.report.rows_kept,
        malformed = loaded.report.rows_malformed,
        missing_essentials = loaded.report.rows_missing_essentials,
        "loaded listings"
    );
    Ok(loaded)
}

/// Load listings from any CSV source (header row required).
pub fn load_listings_from_reader<R: Read>(source: R) -> Result<LoadedListings, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source);
    let columns = ListingColumns::from_header(reader.headers()?)?;

    let mut listings = Vec::new();
    let mut report = LoadReport::default();

    for (row, result) in reader.records().enumerate() {
        report.rows_read += 1;
        let record = match result {
            Ok(record) => record,
            Err(err) if is_row_level(&err) => {
                warn!(row, error = %err, "skipping malformed row");
                report.rows_malformed += 1;
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        match parse_record(&record, &columns, listings.len()) {
            Some(listing) => listings.push(listing),
            None => {
                debug!(row, "dropping row without price, capacity or rating");
                report.rows_missing_essentials += 1;
            }
        }
    }

    report.rows_kept = listings.len();
    Ok(LoadedListings { listings, report })
}

fn is_row_level(err: &csv::Error) -> bool {
    matches!(
        err.kind(),
        csv::ErrorKind::UnequalLengths { .. } | csv::ErrorKind::Utf8 { .. }
    )
}

fn parse_record(record: &csv::StringRecord, columns: &ListingColumns, index: usize) -> Option<Listing> {
    let price = record.get(columns.price).and_then(parse_price)?;
    let accommodates = record.get(columns.accommodates).and_then(parse_capacity)?;
    let rating = record.get(columns.rating).and_then(parse_number)?;
    let sub_ratings = SubRatings::from_array(
        columns
            .sub_ratings
            .map(|position| position.and_then(|i| record.get(i)).and_then(parse_number)),
    );

    Some(Listing {
        index,
        name: record.get(columns.name).unwrap_or_default().to_string(),
        listing_url: record.get(columns.url).unwrap_or_default().to_string(),
        price,
        accommodates,
        rating,
        sub_ratings,
    })
}

/// Parse a formatted price such as `"$1,250.00"`.
/// Currency symbols, thousands separators and spaces are stripped; whatever
/// remains must be a plain number, so `"12abc"` is missing and `"1e3"` is 1000.
pub fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '€' | '£' | '¥') && !c.is_whitespace())
        .collect();
    parse_number(&cleaned)
}

/// Parse a plain number; empty cells and non-finite values are missing.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Capacity must be a non-negative whole number (`"4"` and `"4.0"` both parse).
pub fn parse_capacity(raw: &str) -> Option<u32> {
    let value = parse_number(raw)?;
    if value < 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return None;
    }
    Some(value as u32)
}
