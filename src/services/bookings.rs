//! Booking lifecycle manager.
//!
//! Governs booking creation, status transitions, deletion, and participant-
//! scoped listing. All permission checks resolve the acting user's
//! [`ActorRole`] once per operation and branch on that value.

use super::availability;
use super::error::{ServiceError, ServiceResult};
use crate::db::repository::{BookingListQuery, FullRepository};
use crate::models::{
    ActorRole, Booking, BookingId, BookingRole, BookingStatus, Clock, DateRange, HostProfile,
    Listing, ListingId, NewBooking, TutorProfile, UserId,
};

/// Input for creating a booking.
///
/// `total_price` is taken from the caller as-is and not cross-checked against
/// `price_per_day x nights`; see the module docs in [`crate::models::booking`].
#[derive(Debug, Clone)]
pub struct CreateBookingRequest {
    pub listing_id: ListingId,
    pub start_date: chrono::DateTime<chrono::Utc>,
    pub end_date: chrono::DateTime<chrono::Utc>,
    pub total_price: i64,
    pub notes: Option<String>,
}

/// Status and role filters for listing bookings.
#[derive(Debug, Clone, Copy, Default)]
pub struct BookingListFilter {
    pub status: Option<BookingStatus>,
    pub role: Option<BookingRole>,
}

/// A booking with the display fields the API denormalizes into responses.
#[derive(Debug, Clone)]
pub struct BookingDetails {
    pub booking: Booking,
    pub listing: Listing,
    pub host: HostProfile,
    pub tutor: TutorProfile,
}

/// A page of booking details plus the total matching count.
#[derive(Debug, Clone)]
pub struct BookingList {
    pub bookings: Vec<BookingDetails>,
    pub total: u64,
}

async fn load_details<R>(repo: &R, booking: Booking) -> ServiceResult<BookingDetails>
where
    R: FullRepository + ?Sized,
{
    let listing = repo.get_listing(booking.listing_id).await?;
    let host = repo.get_host(listing.host_id).await?;
    let tutor = repo.get_tutor(booking.tutor_id).await?;
    Ok(BookingDetails {
        booking,
        listing,
        host,
        tutor,
    })
}

/// Create a booking in `pending` state.
///
/// The acting user must own a tutor profile; the listing must exist and be
/// active. The availability pre-check produces the user-facing conflict
/// message, but the insert itself re-checks under the repository's
/// per-listing guard, which is the authoritative double-booking signal.
pub async fn create_booking<R>(
    repo: &R,
    clock: &dyn Clock,
    user_id: UserId,
    request: CreateBookingRequest,
) -> ServiceResult<BookingDetails>
where
    R: FullRepository + ?Sized,
{
    let tutor = repo
        .tutor_by_user(user_id)
        .await?
        .ok_or_else(|| ServiceError::forbidden("Only tutors can create bookings"))?;

    let range = DateRange::new(request.start_date, request.end_date)
        .map_err(ServiceError::Validation)?;
    if request.total_price <= 0 {
        return Err(ServiceError::validation("Total price must be positive"));
    }

    let listing = repo.get_listing(request.listing_id).await?;
    if !listing.is_active {
        return Err(ServiceError::invalid_state(
            "Listing is not accepting bookings",
        ));
    }

    // Fast-path check for a friendly message; the guarded insert below is
    // what actually enforces the invariant under concurrency.
    if availability::has_conflict(repo, listing.id, &range, None).await? {
        return Err(ServiceError::conflict(
            "Listing is not available for the selected dates",
        ));
    }

    let booking = repo
        .insert_booking_guarded(NewBooking {
            listing_id: listing.id,
            tutor_id: tutor.id,
            start_date: request.start_date,
            end_date: request.end_date,
            total_price: request.total_price,
            status: BookingStatus::Pending,
            notes: request.notes,
            created_at: clock.now(),
        })
        .await?;

    let host = repo.get_host(listing.host_id).await?;
    Ok(BookingDetails {
        booking,
        listing,
        host,
        tutor,
    })
}

/// Fetch one booking. Participants only.
pub async fn get_booking<R>(
    repo: &R,
    booking_id: BookingId,
    user_id: UserId,
) -> ServiceResult<BookingDetails>
where
    R: FullRepository + ?Sized,
{
    let booking = repo.get_booking(booking_id).await?;
    let details = load_details(repo, booking).await?;

    let role = ActorRole::resolve(user_id, details.tutor.user_id, details.host.user_id);
    if role == ActorRole::Neither {
        return Err(ServiceError::forbidden(
            "You do not have access to this booking",
        ));
    }
    Ok(details)
}

/// List bookings the user participates in, newest-created first.
///
/// `role` narrows the scope to one side of the marketplace. A user with
/// neither profile gets an empty page with `total = 0` rather than an error.
pub async fn list_bookings<R>(
    repo: &R,
    user_id: UserId,
    filter: BookingListFilter,
    page: u32,
    limit: u32,
) -> ServiceResult<BookingList>
where
    R: FullRepository + ?Sized,
{
    let page = page.max(1) as i64;
    let limit = limit.clamp(1, 100) as i64;

    let tutor = repo.tutor_by_user(user_id).await?;
    let host = repo.host_by_user(user_id).await?;

    let tutor_id = match filter.role {
        Some(BookingRole::Host) => None,
        _ => tutor.map(|t| t.id),
    };
    let host_id = match filter.role {
        Some(BookingRole::Tutor) => None,
        _ => host.map(|h| h.id),
    };

    if tutor_id.is_none() && host_id.is_none() {
        return Ok(BookingList {
            bookings: Vec::new(),
            total: 0,
        });
    }

    let page_result = repo
        .list_bookings(&BookingListQuery {
            tutor_id,
            host_id,
            status: filter.status,
            offset: (page - 1) * limit,
            limit,
        })
        .await?;

    let mut bookings = Vec::with_capacity(page_result.bookings.len());
    for booking in page_result.bookings {
        bookings.push(load_details(repo, booking).await?);
    }

    Ok(BookingList {
        bookings,
        total: page_result.total,
    })
}

/// Transition a booking to `confirmed` or `canceled`.
///
/// Confirmation is host-only, only from `pending`, and re-checks that no
/// other blocking booking covers the dates. Cancellation is open
/// to either party from `pending` or `confirmed`, and `cancellation_reason`
/// overwrites the booking's notes. `ongoing` and `completed` are produced by
/// external time-driven processes and are rejected here.
pub async fn update_status<R>(
    repo: &R,
    booking_id: BookingId,
    user_id: UserId,
    target: BookingStatus,
    cancellation_reason: Option<String>,
) -> ServiceResult<BookingDetails>
where
    R: FullRepository + ?Sized,
{
    let booking = repo.get_booking(booking_id).await?;
    let details = load_details(repo, booking).await?;

    let role = ActorRole::resolve(user_id, details.tutor.user_id, details.host.user_id);
    if role == ActorRole::Neither {
        return Err(ServiceError::forbidden(
            "You do not have access to this booking",
        ));
    }

    match target {
        BookingStatus::Confirmed => {
            if role != ActorRole::Host {
                return Err(ServiceError::forbidden(
                    "Only the host can confirm a booking",
                ));
            }
            if details.booking.status != BookingStatus::Pending {
                return Err(ServiceError::invalid_transition(
                    "Only pending bookings can be confirmed",
                ));
            }
            // Overlapping requests may coexist while pending; only one of
            // them may be confirmed.
            let range = details.booking.date_range();
            if availability::has_conflict(repo, details.listing.id, &range, Some(booking_id))
                .await?
            {
                return Err(ServiceError::conflict(
                    "Another booking already covers these dates",
                ));
            }
        }
        BookingStatus::Canceled => {
            if !matches!(
                details.booking.status,
                BookingStatus::Pending | BookingStatus::Confirmed
            ) {
                return Err(ServiceError::invalid_transition(
                    "Only pending or confirmed bookings can be canceled",
                ));
            }
        }
        other => {
            return Err(ServiceError::invalid_transition(format!(
                "Bookings cannot be set to '{}' directly",
                other
            )));
        }
    }

    let updated = repo
        .update_booking_status(booking_id, target, cancellation_reason)
        .await?;
    Ok(BookingDetails {
        booking: updated,
        ..details
    })
}

/// Delete a booking. Only the tutor who created it, and only while the
/// booking is `pending` or `canceled`.
pub async fn delete_booking<R>(
    repo: &R,
    booking_id: BookingId,
    user_id: UserId,
) -> ServiceResult<()>
where
    R: FullRepository + ?Sized,
{
    let booking = repo.get_booking(booking_id).await?;
    let tutor = repo.get_tutor(booking.tutor_id).await?;

    if tutor.user_id != user_id {
        return Err(ServiceError::forbidden(
            "Only the tutor who created the booking can delete it",
        ));
    }
    if !matches!(
        booking.status,
        BookingStatus::Pending | BookingStatus::Canceled
    ) {
        return Err(ServiceError::invalid_state(
            "Only pending or canceled bookings can be deleted",
        ));
    }

    repo.delete_booking(booking_id).await?;
    Ok(())
}

#[cfg(test)]
#[path = "bookings_tests.rs"]
mod bookings_tests;
