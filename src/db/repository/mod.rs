//! Repository trait definitions.
//!
//! The traits here are the abstract persistence contract the service layer
//! programs against. Implementations live in `db::repositories`.

pub mod bookings;
pub mod error;
pub mod listings;
pub mod profiles;

pub use bookings::{BookingListQuery, BookingPage, BookingRepository};
pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use listings::{ListingFilter, ListingRepository, ReviewStats};
pub use profiles::ProfileRepository;

/// Umbrella trait for a backend implementing every repository concern.
pub trait FullRepository: BookingRepository + ListingRepository + ProfileRepository {}

impl<T> FullRepository for T where T: BookingRepository + ListingRepository + ProfileRepository {}
