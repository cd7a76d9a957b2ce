//! Unit tests for the booking lifecycle manager.

use chrono::{DateTime, TimeZone, Utc};

use super::*;
use crate::db::repositories::LocalRepository;
use crate::db::repository::{BookingRepository, ListingRepository};
use crate::models::{FixedClock, HostId, TutorId};

fn date(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, d, 0, 0, 0).unwrap()
}

struct Harness {
    repo: LocalRepository,
    clock: FixedClock,
    host_user: UserId,
    tutor_user: UserId,
    listing_id: ListingId,
}

fn harness() -> Harness {
    let repo = LocalRepository::new();
    let clock = FixedClock::new(Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap());

    let host_user = UserId::generate();
    let host_id = HostId::generate();
    repo.insert_host(HostProfile {
        id: host_id,
        user_id: host_user,
        name: "Marta".into(),
        avatar_url: None,
        city: Some("Lisbon".into()),
        state: Some("Lisboa".into()),
        latitude: None,
        longitude: None,
        subscription_active: true,
    });

    let tutor_user = UserId::generate();
    repo.insert_tutor(TutorProfile {
        id: TutorId::generate(),
        user_id: tutor_user,
        name: "Jonas".into(),
        avatar_url: None,
    });

    let listing_id = ListingId::generate();
    repo.insert_listing_record(Listing {
        id: listing_id,
        host_id,
        title: "Sunny garden home".into(),
        description: None,
        price_per_day: 5000,
        is_active: true,
        accepts_dogs: true,
        accepts_cats: true,
        accepts_small_pets: true,
        accepts_medium_pets: true,
        accepts_large_pets: false,
        has_yard: true,
        allows_walks: true,
        provides_medication: false,
        created_at: Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap(),
    });

    Harness {
        repo,
        clock,
        host_user,
        tutor_user,
        listing_id,
    }
}

fn request(h: &Harness, start: u32, end: u32) -> CreateBookingRequest {
    CreateBookingRequest {
        listing_id: h.listing_id,
        start_date: date(start),
        end_date: date(end),
        total_price: 20000,
        notes: None,
    }
}

async fn create(h: &Harness, start: u32, end: u32) -> ServiceResult<BookingDetails> {
    create_booking(&h.repo, &h.clock, h.tutor_user, request(h, start, end)).await
}

async fn create_confirmed(h: &Harness, start: u32, end: u32) -> BookingId {
    let details = create(h, start, end).await.unwrap();
    update_status(
        &h.repo,
        details.booking.id,
        h.host_user,
        BookingStatus::Confirmed,
        None,
    )
    .await
    .unwrap();
    details.booking.id
}

#[tokio::test]
async fn test_create_booking_starts_pending_with_details() {
    let h = harness();

    let details = create(&h, 1, 5).await.unwrap();
    assert_eq!(details.booking.status, BookingStatus::Pending);
    assert_eq!(details.booking.created_at, h.clock.now());
    assert_eq!(details.listing.id, h.listing_id);
    assert_eq!(details.host.name, "Marta");
    assert_eq!(details.tutor.name, "Jonas");
}

#[tokio::test]
async fn test_create_rejects_overlap_with_confirmed() {
    let h = harness();
    create_confirmed(&h, 1, 5).await;

    let err = create(&h, 3, 7).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn test_create_rejects_touching_boundary() {
    let h = harness();
    create_confirmed(&h, 1, 5).await;

    // Start on the existing end day: still a conflict, no same-day turnover.
    let err = create(&h, 5, 10).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    // The next day is free.
    assert!(create(&h, 6, 10).await.is_ok());
}

#[tokio::test]
async fn test_create_requires_tutor_profile() {
    let h = harness();

    let err = create_booking(&h.repo, &h.clock, UserId::generate(), request(&h, 1, 5))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
}

#[tokio::test]
async fn test_create_rejects_inactive_listing() {
    let h = harness();
    h.repo.set_listing_active(h.listing_id, false).await.unwrap();

    let err = create(&h, 1, 5).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidState(_)));
}

#[tokio::test]
async fn test_create_validates_input() {
    let h = harness();

    let err = create(&h, 5, 5).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let mut req = request(&h, 1, 5);
    req.total_price = 0;
    let err = create_booking(&h.repo, &h.clock, h.tutor_user, req)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn test_create_rejects_unknown_listing() {
    let h = harness();

    let mut req = request(&h, 1, 5);
    req.listing_id = ListingId::generate();
    let err = create_booking(&h.repo, &h.clock, h.tutor_user, req)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn test_only_host_confirms_and_only_from_pending() {
    let h = harness();
    let details = create(&h, 1, 5).await.unwrap();
    let id = details.booking.id;

    // The tutor cannot confirm their own request.
    let err = update_status(&h.repo, id, h.tutor_user, BookingStatus::Confirmed, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));

    // The host can.
    let updated = update_status(&h.repo, id, h.host_user, BookingStatus::Confirmed, None)
        .await
        .unwrap();
    assert_eq!(updated.booking.status, BookingStatus::Confirmed);

    // Confirming twice is an invalid transition.
    let err = update_status(&h.repo, id, h.host_user, BookingStatus::Confirmed, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidTransition(_)));
}

#[tokio::test]
async fn test_confirm_rejects_when_dates_already_taken() {
    let h = harness();

    // Two overlapping requests may coexist while pending.
    let first = create(&h, 1, 5).await.unwrap();
    let second = create(&h, 3, 7).await.unwrap();

    update_status(
        &h.repo,
        first.booking.id,
        h.host_user,
        BookingStatus::Confirmed,
        None,
    )
    .await
    .unwrap();

    // Confirming the second would double-book.
    let err = update_status(
        &h.repo,
        second.booking.id,
        h.host_user,
        BookingStatus::Confirmed,
        None,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn test_cancel_with_reason_overwrites_notes() {
    let h = harness();
    let details = create(&h, 1, 5).await.unwrap();
    let id = details.booking.id;
    update_status(&h.repo, id, h.host_user, BookingStatus::Confirmed, None)
        .await
        .unwrap();

    let updated = update_status(
        &h.repo,
        id,
        h.tutor_user,
        BookingStatus::Canceled,
        Some("trip canceled".into()),
    )
    .await
    .unwrap();
    assert_eq!(updated.booking.status, BookingStatus::Canceled);
    assert_eq!(updated.booking.notes.as_deref(), Some("trip canceled"));
}

#[tokio::test]
async fn test_cancel_rejected_from_terminal_state() {
    let h = harness();
    let details = create(&h, 1, 5).await.unwrap();
    let id = details.booking.id;

    // Drive to completed through the repository, as an external process would.
    h.repo
        .update_booking_status(id, BookingStatus::Completed, None)
        .await
        .unwrap();

    let err = update_status(&h.repo, id, h.tutor_user, BookingStatus::Canceled, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidTransition(_)));
}

#[tokio::test]
async fn test_direct_ongoing_and_completed_rejected() {
    let h = harness();
    let details = create(&h, 1, 5).await.unwrap();
    let id = details.booking.id;

    for target in [BookingStatus::Ongoing, BookingStatus::Completed] {
        let err = update_status(&h.repo, id, h.host_user, target, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition(_)));
    }
}

#[tokio::test]
async fn test_update_status_rejects_strangers() {
    let h = harness();
    let details = create(&h, 1, 5).await.unwrap();

    let err = update_status(
        &h.repo,
        details.booking.id,
        UserId::generate(),
        BookingStatus::Canceled,
        None,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
}

#[tokio::test]
async fn test_delete_rules() {
    let h = harness();
    let details = create(&h, 1, 5).await.unwrap();
    let id = details.booking.id;
    update_status(&h.repo, id, h.host_user, BookingStatus::Confirmed, None)
        .await
        .unwrap();

    // Confirmed bookings cannot be deleted.
    let err = delete_booking(&h.repo, id, h.tutor_user).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidState(_)));

    // The host never deletes, even after cancellation.
    update_status(&h.repo, id, h.tutor_user, BookingStatus::Canceled, None)
        .await
        .unwrap();
    let err = delete_booking(&h.repo, id, h.host_user).await.unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));

    // The tutor deletes the canceled booking.
    delete_booking(&h.repo, id, h.tutor_user).await.unwrap();
    assert!(matches!(
        get_booking(&h.repo, id, h.tutor_user).await.unwrap_err(),
        ServiceError::NotFound(_)
    ));
}

#[tokio::test]
async fn test_get_booking_participants_only() {
    let h = harness();
    let details = create(&h, 1, 5).await.unwrap();
    let id = details.booking.id;

    assert!(get_booking(&h.repo, id, h.tutor_user).await.is_ok());
    assert!(get_booking(&h.repo, id, h.host_user).await.is_ok());
    assert!(matches!(
        get_booking(&h.repo, id, UserId::generate()).await.unwrap_err(),
        ServiceError::Forbidden(_)
    ));
}

#[tokio::test]
async fn test_list_bookings_newest_first_and_paginated() {
    let h = harness();

    let first = create(&h, 1, 3).await.unwrap().booking.id;
    h.clock.advance(chrono::Duration::minutes(1));
    let second = create(&h, 10, 12).await.unwrap().booking.id;
    h.clock.advance(chrono::Duration::minutes(1));
    let third = create(&h, 20, 22).await.unwrap().booking.id;

    let list = list_bookings(&h.repo, h.tutor_user, BookingListFilter::default(), 1, 2)
        .await
        .unwrap();
    assert_eq!(list.total, 3);
    let ids: Vec<BookingId> = list.bookings.iter().map(|d| d.booking.id).collect();
    assert_eq!(ids, vec![third, second]);

    let list = list_bookings(&h.repo, h.tutor_user, BookingListFilter::default(), 2, 2)
        .await
        .unwrap();
    assert_eq!(
        list.bookings.iter().map(|d| d.booking.id).collect::<Vec<_>>(),
        vec![first]
    );
}

#[tokio::test]
async fn test_list_bookings_filters_by_status_and_role() {
    let h = harness();
    let confirmed = create_confirmed(&h, 1, 5).await;
    create(&h, 10, 12).await.unwrap();

    let filter = BookingListFilter {
        status: Some(BookingStatus::Confirmed),
        role: None,
    };
    let list = list_bookings(&h.repo, h.tutor_user, filter, 1, 10)
        .await
        .unwrap();
    assert_eq!(list.total, 1);
    assert_eq!(list.bookings[0].booking.id, confirmed);

    // The host sees the bookings on their listings.
    let filter = BookingListFilter {
        status: None,
        role: Some(BookingRole::Host),
    };
    let list = list_bookings(&h.repo, h.host_user, filter, 1, 10)
        .await
        .unwrap();
    assert_eq!(list.total, 2);

    // The host has no tutor side.
    let filter = BookingListFilter {
        status: None,
        role: Some(BookingRole::Tutor),
    };
    let list = list_bookings(&h.repo, h.host_user, filter, 1, 10)
        .await
        .unwrap();
    assert_eq!(list.total, 0);
}

#[tokio::test]
async fn test_list_bookings_without_profiles_is_empty() {
    let h = harness();
    create(&h, 1, 5).await.unwrap();

    let list = list_bookings(
        &h.repo,
        UserId::generate(),
        BookingListFilter::default(),
        1,
        10,
    )
    .await
    .unwrap();
    assert!(list.bookings.is_empty());
    assert_eq!(list.total, 0);
}

#[tokio::test]
async fn test_blocking_bookings_stay_disjoint() {
    let h = harness();

    // Overlapping requests pile up while pending, then get interleaved
    // confirmations and cancellations.
    let a = create(&h, 1, 5).await.unwrap().booking.id;
    let b = create(&h, 3, 7).await.unwrap().booking.id;
    let c = create(&h, 7, 9).await.unwrap().booking.id;

    update_status(&h.repo, a, h.host_user, BookingStatus::Confirmed, None)
        .await
        .unwrap();
    assert!(
        update_status(&h.repo, b, h.host_user, BookingStatus::Confirmed, None)
            .await
            .is_err()
    );
    update_status(&h.repo, a, h.tutor_user, BookingStatus::Canceled, None)
        .await
        .unwrap();
    update_status(&h.repo, b, h.host_user, BookingStatus::Confirmed, None)
        .await
        .unwrap();
    // c touches b's end day; inclusive bounds make that a conflict.
    assert!(
        update_status(&h.repo, c, h.host_user, BookingStatus::Confirmed, None)
            .await
            .is_err()
    );

    // Every pair of blocking bookings must be disjoint.
    let spans = h
        .repo
        .booking_spans(h.listing_id, &BookingStatus::AVAILABILITY_BLOCKING)
        .await
        .unwrap();
    for (i, x) in spans.iter().enumerate() {
        for y in spans.iter().skip(i + 1) {
            let range = DateRange::new(x.start_date, x.end_date).unwrap();
            assert!(!range.overlaps_span(y.start_date, y.end_date));
        }
    }
}
