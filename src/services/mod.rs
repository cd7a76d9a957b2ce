//! Business-logic layer.
//!
//! Repository-agnostic operations over the repository traits: the
//! availability engine, the booking lifecycle manager, the search filter,
//! and the listing lifecycle. Functions take any [`FullRepository`]
//! implementation, so the same logic runs against the in-memory store in
//! tests and Postgres in production.
//!
//! [`FullRepository`]: crate::db::repository::FullRepository

pub mod availability;
pub mod bookings;
pub mod error;
pub mod listings;
pub mod search;

pub use availability::{filter_available, has_conflict};
pub use bookings::{
    create_booking, delete_booking, get_booking, list_bookings, update_status, BookingDetails,
    BookingList, BookingListFilter, CreateBookingRequest,
};
pub use error::{ServiceError, ServiceResult};
pub use listings::{
    create_listing, delete_listing, get_listing, list_host_listings, toggle_active,
    CreateListingRequest,
};
pub use search::{
    search_listings, SearchCriteria, SearchHit, SearchPage, SortKey, SortOrder, DEFAULT_RADIUS_KM,
};
