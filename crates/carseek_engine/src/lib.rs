//! Carseek engine: effect execution for the search coordinator and the
//! listings HTTP client.
mod coordinator;
mod fetch;
mod filters;
mod types;

pub use coordinator::SearchCoordinator;
pub use fetch::{ClientSettings, HttpListingsFetcher, SearchFetcher};
pub use filters::SearchFilters;
pub use types::{FetchError, FetchFailureKind, Listing, ListingsPage, SellerType};
