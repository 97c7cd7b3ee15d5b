pub mod listing;
pub mod loader;
pub mod validate;

pub use listing::{Listing, SubRatings, SUB_RATING_COLUMNS};
pub use loader::{load_listings, load_listings_from_reader, LoadError, LoadReport, LoadedListings};
pub use validate::{validate_listings, ValidationReport, ValidationSeverity};
