//! Unit tests for the listing lifecycle.

use chrono::{TimeZone, Utc};

use super::*;
use crate::db::repositories::LocalRepository;
use crate::db::repository::BookingRepository;
use crate::models::{FixedClock, HostId, HostProfile, NewBooking, TutorId};

fn clock() -> FixedClock {
    FixedClock::new(Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap())
}

fn seed_host(repo: &LocalRepository, subscription_active: bool) -> (UserId, HostId) {
    let user_id = UserId::generate();
    let host_id = HostId::generate();
    repo.insert_host(HostProfile {
        id: host_id,
        user_id,
        name: "Marta".into(),
        avatar_url: None,
        city: None,
        state: None,
        latitude: None,
        longitude: None,
        subscription_active,
    });
    (user_id, host_id)
}

fn request(title: &str) -> CreateListingRequest {
    CreateListingRequest {
        title: title.into(),
        description: None,
        price_per_day: 5000,
        accepts_dogs: true,
        accepts_cats: false,
        accepts_small_pets: true,
        accepts_medium_pets: false,
        accepts_large_pets: false,
        has_yard: false,
        allows_walks: true,
        provides_medication: false,
    }
}

#[tokio::test]
async fn test_create_listing_starts_inactive() {
    let repo = LocalRepository::new();
    let clock = clock();
    let (user, _) = seed_host(&repo, true);

    let listing = create_listing(&repo, &clock, user, request("Garden home"))
        .await
        .unwrap();
    assert!(!listing.is_active);
    assert_eq!(listing.created_at, clock.now());
}

#[tokio::test]
async fn test_create_listing_requires_host_and_subscription() {
    let repo = LocalRepository::new();
    let clock = clock();

    let err = create_listing(&repo, &clock, UserId::generate(), request("x"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));

    let (lapsed_user, _) = seed_host(&repo, false);
    let err = create_listing(&repo, &clock, lapsed_user, request("x"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
}

#[tokio::test]
async fn test_create_listing_validation() {
    let repo = LocalRepository::new();
    let clock = clock();
    let (user, _) = seed_host(&repo, true);

    let err = create_listing(&repo, &clock, user, request("  "))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let mut req = request("Garden home");
    req.price_per_day = 0;
    let err = create_listing(&repo, &clock, user, req).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn test_toggle_active_rules() {
    let repo = LocalRepository::new();
    let clock = clock();
    let (owner, _) = seed_host(&repo, true);
    let listing = create_listing(&repo, &clock, owner, request("Garden home"))
        .await
        .unwrap();

    // A stranger cannot touch it.
    let (other, _) = seed_host(&repo, true);
    let err = toggle_active(&repo, listing.id, other, true)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));

    let activated = toggle_active(&repo, listing.id, owner, true).await.unwrap();
    assert!(activated.is_active);
    let deactivated = toggle_active(&repo, listing.id, owner, false)
        .await
        .unwrap();
    assert!(!deactivated.is_active);
}

#[tokio::test]
async fn test_activation_requires_subscription_deactivation_does_not() {
    let repo = LocalRepository::new();
    let clock = clock();
    let (owner, host_id) = seed_host(&repo, true);
    let listing = create_listing(&repo, &clock, owner, request("Garden home"))
        .await
        .unwrap();
    toggle_active(&repo, listing.id, owner, true).await.unwrap();

    // Subscription lapses.
    repo.insert_host(HostProfile {
        id: host_id,
        user_id: owner,
        name: "Marta".into(),
        avatar_url: None,
        city: None,
        state: None,
        latitude: None,
        longitude: None,
        subscription_active: false,
    });

    // Deactivation still works, re-activation does not.
    toggle_active(&repo, listing.id, owner, false).await.unwrap();
    let err = toggle_active(&repo, listing.id, owner, true)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
}

#[tokio::test]
async fn test_delete_blocked_by_open_bookings() {
    let repo = LocalRepository::new();
    let clock = clock();
    let (owner, _) = seed_host(&repo, true);
    let listing = create_listing(&repo, &clock, owner, request("Garden home"))
        .await
        .unwrap();

    let booking = repo
        .insert_booking_guarded(NewBooking {
            listing_id: listing.id,
            tutor_id: TutorId::generate(),
            start_date: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2025, 6, 5, 0, 0, 0).unwrap(),
            total_price: 5000,
            status: BookingStatus::Pending,
            notes: None,
            created_at: clock.now(),
        })
        .await
        .unwrap();

    let err = delete_listing(&repo, listing.id, owner).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidState(_)));

    // Once the booking is terminal the listing can go.
    repo.update_booking_status(booking.id, BookingStatus::Canceled, None)
        .await
        .unwrap();
    delete_listing(&repo, listing.id, owner).await.unwrap();
    assert!(matches!(
        get_listing(&repo, listing.id).await.unwrap_err(),
        ServiceError::NotFound(_)
    ));
}

#[tokio::test]
async fn test_list_host_listings_newest_first() {
    let repo = LocalRepository::new();
    let clock = clock();
    let (owner, _) = seed_host(&repo, true);

    let first = create_listing(&repo, &clock, owner, request("First"))
        .await
        .unwrap();
    clock.advance(chrono::Duration::hours(1));
    let second = create_listing(&repo, &clock, owner, request("Second"))
        .await
        .unwrap();

    let listings = list_host_listings(&repo, owner).await.unwrap();
    assert_eq!(
        listings.iter().map(|l| l.id).collect::<Vec<_>>(),
        vec![second.id, first.id]
    );
}
