//! Booking repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{
    Booking, BookingId, BookingSpan, BookingStatus, DateRange, HostId, ListingId, NewBooking,
    TutorId,
};

/// Scope and filters for listing bookings.
///
/// `tutor_id` and `host_id` scope results to bookings made by that tutor or
/// received by that host's listings; when both are set the scopes are OR-ed
/// (the user participates on either side). When both are `None` the query
/// matches nothing — an unscoped listing is never meaningful here.
#[derive(Debug, Clone, Default)]
pub struct BookingListQuery {
    pub tutor_id: Option<TutorId>,
    pub host_id: Option<HostId>,
    pub status: Option<BookingStatus>,
    pub offset: i64,
    pub limit: i64,
}

/// A page of bookings plus the total matching count.
#[derive(Debug, Clone)]
pub struct BookingPage {
    pub bookings: Vec<Booking>,
    pub total: u64,
}

/// Repository trait for booking persistence.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Check that the backing store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Fetch the date spans of a listing's bookings in the given statuses.
    ///
    /// This is the read side of the availability engine; a read failure must
    /// propagate rather than be treated as "no bookings".
    async fn booking_spans(
        &self,
        listing_id: ListingId,
        statuses: &[BookingStatus],
    ) -> RepositoryResult<Vec<BookingSpan>>;

    /// Fetch the ids of all listings that have at least one booking in the
    /// given statuses overlapping `range` (inclusive bounds on both ends).
    ///
    /// Bulk form of the conflict check used by search. Must agree with
    /// applying the overlap test to [`booking_spans`](Self::booking_spans)
    /// per listing.
    async fn conflicting_listing_ids(
        &self,
        range: &DateRange,
        statuses: &[BookingStatus],
    ) -> RepositoryResult<Vec<ListingId>>;

    /// Insert a booking, re-checking availability atomically with the insert.
    ///
    /// The check and the insert must be mutually exclusive with any other
    /// guarded insert for the same listing (advisory lock, serializable
    /// transaction, or an equivalent store-wide critical section), so two
    /// concurrent creates for overlapping dates cannot both succeed. Returns
    /// `ConflictError` when an availability-blocking booking overlaps.
    async fn insert_booking_guarded(&self, booking: NewBooking) -> RepositoryResult<Booking>;

    /// Fetch one booking. `NotFound` if absent.
    async fn get_booking(&self, booking_id: BookingId) -> RepositoryResult<Booking>;

    /// Update a booking's status, overwriting notes when supplied.
    async fn update_booking_status(
        &self,
        booking_id: BookingId,
        status: BookingStatus,
        notes: Option<String>,
    ) -> RepositoryResult<Booking>;

    /// Delete a booking row. `NotFound` if absent.
    async fn delete_booking(&self, booking_id: BookingId) -> RepositoryResult<()>;

    /// List bookings for a participant, newest-created first.
    async fn list_bookings(&self, query: &BookingListQuery) -> RepositoryResult<BookingPage>;

    /// Count a listing's bookings in the given statuses.
    async fn count_bookings_for_listing(
        &self,
        listing_id: ListingId,
        statuses: &[BookingStatus],
    ) -> RepositoryResult<u64>;
}
