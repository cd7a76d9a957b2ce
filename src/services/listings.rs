//! Listing lifecycle: creation, activation, deletion.
//!
//! Listings are created inactive and must be activated explicitly; both
//! creation and activation require the host's subscription to be active
//! (billing itself is an external concern, only its outcome reaches this
//! layer).

use super::error::{ServiceError, ServiceResult};
use crate::db::repository::FullRepository;
use crate::models::{BookingStatus, Clock, Listing, ListingId, NewListing, UserId};

/// Input for creating a listing.
#[derive(Debug, Clone)]
pub struct CreateListingRequest {
    pub title: String,
    pub description: Option<String>,
    pub price_per_day: i64,
    pub accepts_dogs: bool,
    pub accepts_cats: bool,
    pub accepts_small_pets: bool,
    pub accepts_medium_pets: bool,
    pub accepts_large_pets: bool,
    pub has_yard: bool,
    pub allows_walks: bool,
    pub provides_medication: bool,
}

async fn owned_listing<R>(
    repo: &R,
    listing_id: ListingId,
    user_id: UserId,
) -> ServiceResult<Listing>
where
    R: FullRepository + ?Sized,
{
    let listing = repo.get_listing(listing_id).await?;
    let host = repo.get_host(listing.host_id).await?;
    if host.user_id != user_id {
        return Err(ServiceError::forbidden("You do not own this listing"));
    }
    Ok(listing)
}

/// Create a listing, inactive until explicitly activated.
pub async fn create_listing<R>(
    repo: &R,
    clock: &dyn Clock,
    user_id: UserId,
    request: CreateListingRequest,
) -> ServiceResult<Listing>
where
    R: FullRepository + ?Sized,
{
    let host = repo
        .host_by_user(user_id)
        .await?
        .ok_or_else(|| ServiceError::forbidden("Only hosts can create listings"))?;
    if !host.subscription_active {
        return Err(ServiceError::forbidden(
            "An active subscription is required to create listings",
        ));
    }

    if request.title.trim().is_empty() {
        return Err(ServiceError::validation("Title must not be empty"));
    }
    if request.price_per_day <= 0 {
        return Err(ServiceError::validation("Price per day must be positive"));
    }

    let listing = repo
        .insert_listing(NewListing {
            host_id: host.id,
            title: request.title,
            description: request.description,
            price_per_day: request.price_per_day,
            accepts_dogs: request.accepts_dogs,
            accepts_cats: request.accepts_cats,
            accepts_small_pets: request.accepts_small_pets,
            accepts_medium_pets: request.accepts_medium_pets,
            accepts_large_pets: request.accepts_large_pets,
            has_yard: request.has_yard,
            allows_walks: request.allows_walks,
            provides_medication: request.provides_medication,
            created_at: clock.now(),
        })
        .await?;
    Ok(listing)
}

/// Fetch one listing.
pub async fn get_listing<R>(repo: &R, listing_id: ListingId) -> ServiceResult<Listing>
where
    R: FullRepository + ?Sized,
{
    Ok(repo.get_listing(listing_id).await?)
}

/// Activate or deactivate a listing. Owner only; activation additionally
/// requires an active subscription.
pub async fn toggle_active<R>(
    repo: &R,
    listing_id: ListingId,
    user_id: UserId,
    is_active: bool,
) -> ServiceResult<Listing>
where
    R: FullRepository + ?Sized,
{
    let listing = owned_listing(repo, listing_id, user_id).await?;

    if is_active {
        let host = repo.get_host(listing.host_id).await?;
        if !host.subscription_active {
            return Err(ServiceError::forbidden(
                "An active subscription is required to activate listings",
            ));
        }
    }

    Ok(repo.set_listing_active(listing_id, is_active).await?)
}

/// Delete a listing. Owner only; rejected while any booking is still in a
/// non-terminal state.
pub async fn delete_listing<R>(
    repo: &R,
    listing_id: ListingId,
    user_id: UserId,
) -> ServiceResult<()>
where
    R: FullRepository + ?Sized,
{
    owned_listing(repo, listing_id, user_id).await?;

    let open = repo
        .count_bookings_for_listing(listing_id, &BookingStatus::NON_TERMINAL)
        .await?;
    if open > 0 {
        return Err(ServiceError::invalid_state(
            "Listings with active bookings cannot be deleted",
        ));
    }

    repo.delete_listing(listing_id).await?;
    Ok(())
}

/// All listings of the acting user's host profile, newest first.
pub async fn list_host_listings<R>(repo: &R, user_id: UserId) -> ServiceResult<Vec<Listing>>
where
    R: FullRepository + ?Sized,
{
    let host = repo
        .host_by_user(user_id)
        .await?
        .ok_or_else(|| ServiceError::forbidden("Only hosts have listings"))?;
    Ok(repo.listings_by_host(host.id).await?)
}

#[cfg(test)]
#[path = "listings_tests.rs"]
mod listings_tests;
