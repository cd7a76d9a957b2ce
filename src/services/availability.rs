//! Availability engine: conflict detection over booking intervals.
//!
//! Pure decision functions over persisted booking spans. Only bookings in an
//! availability-blocking status (confirmed, ongoing) count; pending requests
//! and terminal bookings never conflict.
//!
//! The overlap test is inclusive on both bounds: a booking ending on day D
//! conflicts with one starting on day D. Same-day turnover is intentionally
//! not supported.

use std::collections::HashSet;

use super::error::ServiceResult;
use crate::db::repository::FullRepository;
use crate::models::{BookingId, BookingStatus, DateRange, ListingId};

/// Whether any blocking booking of `listing_id` overlaps `range`.
///
/// `excluding` skips one booking, to support re-evaluating an existing
/// booking against the rest. An empty booking set yields `false`; a read
/// failure propagates rather than being treated as "available".
pub async fn has_conflict<R>(
    repo: &R,
    listing_id: ListingId,
    range: &DateRange,
    excluding: Option<BookingId>,
) -> ServiceResult<bool>
where
    R: FullRepository + ?Sized,
{
    let spans = repo
        .booking_spans(listing_id, &BookingStatus::AVAILABILITY_BLOCKING)
        .await?;

    Ok(spans
        .iter()
        .filter(|span| excluding != Some(span.id))
        .any(|span| range.overlaps_span(span.start_date, span.end_date)))
}

/// Partition `listing_ids` by availability, returning the available subset.
///
/// Bulk form used by search: one query fetches every listing id with a
/// blocking booking overlapping `range`, and the complement of the input is
/// returned. Agrees with calling [`has_conflict`] once per id.
pub async fn filter_available<R>(
    repo: &R,
    listing_ids: &[ListingId],
    range: &DateRange,
) -> ServiceResult<HashSet<ListingId>>
where
    R: FullRepository + ?Sized,
{
    let conflicting: HashSet<ListingId> = repo
        .conflicting_listing_ids(range, &BookingStatus::AVAILABILITY_BLOCKING)
        .await?
        .into_iter()
        .collect();

    Ok(listing_ids
        .iter()
        .copied()
        .filter(|id| !conflicting.contains(id))
        .collect())
}

#[cfg(test)]
#[path = "availability_tests.rs"]
mod availability_tests;
