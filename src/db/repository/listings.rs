//! Listing repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{DateRange, HostId, Listing, ListingId, NewListing, PetSize};

/// Attribute filters applied at the persistence layer.
///
/// Only active listings are ever returned. Text filters are case-insensitive
/// substring matches on the host's city/state.
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    pub city: Option<String>,
    pub state: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub accepts_dogs: Option<bool>,
    pub accepts_cats: Option<bool>,
    pub pet_size: Option<PetSize>,
    pub has_yard: Option<bool>,
    pub allows_walks: Option<bool>,
    pub provides_medication: Option<bool>,
}

/// Aggregated review data for a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReviewStats {
    pub average_rating: f64,
    pub review_count: u64,
}

/// Repository trait for listing persistence and read-side aggregates.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Fetch one listing. `NotFound` if absent.
    async fn get_listing(&self, listing_id: ListingId) -> RepositoryResult<Listing>;

    /// Insert a listing. The repository assigns the id.
    async fn insert_listing(&self, listing: NewListing) -> RepositoryResult<Listing>;

    /// Flip a listing's active flag.
    async fn set_listing_active(
        &self,
        listing_id: ListingId,
        is_active: bool,
    ) -> RepositoryResult<Listing>;

    /// Delete a listing row. `NotFound` if absent.
    async fn delete_listing(&self, listing_id: ListingId) -> RepositoryResult<()>;

    /// Fetch active listings matching the attribute filter.
    async fn find_listings(&self, filter: &ListingFilter) -> RepositoryResult<Vec<Listing>>;

    /// Fetch all listings of one host, newest-created first.
    async fn listings_by_host(&self, host_id: HostId) -> RepositoryResult<Vec<Listing>>;

    /// Average rating and review count for a listing. Zero stats when the
    /// listing has no reviews.
    async fn review_stats(&self, listing_id: ListingId) -> RepositoryResult<ReviewStats>;

    /// Hosts that blocked at least one calendar date inside `range`.
    async fn blocked_host_ids(&self, range: &DateRange) -> RepositoryResult<Vec<HostId>>;
}
