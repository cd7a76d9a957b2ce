//! End-to-end tests over the service layer with the in-memory repository.
//!
//! These exercise whole flows (listing publication, booking lifecycle,
//! search) through the public service functions rather than single calls.

use chrono::{DateTime, TimeZone, Utc};

use pawnest_rust::db::repositories::LocalRepository;
use pawnest_rust::models::{
    BookingRole, BookingStatus, FixedClock, HostId, HostProfile, TutorId, TutorProfile, UserId,
};
use pawnest_rust::services::{
    self, BookingListFilter, CreateBookingRequest, CreateListingRequest, SearchCriteria,
    ServiceError, SortKey, SortOrder,
};

fn date(month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, month, day, 0, 0, 0).unwrap()
}

struct World {
    repo: LocalRepository,
    clock: FixedClock,
    host_user: UserId,
    tutor_user: UserId,
}

impl World {
    fn new() -> Self {
        let repo = LocalRepository::new();
        let host_user = UserId::generate();
        let tutor_user = UserId::generate();

        repo.insert_host(HostProfile {
            id: HostId::generate(),
            user_id: host_user,
            name: "Ana".to_string(),
            avatar_url: None,
            city: Some("Lisbon".to_string()),
            state: Some("Lisboa".to_string()),
            latitude: Some(38.7223),
            longitude: Some(-9.1393),
            subscription_active: true,
        });
        repo.insert_tutor(TutorProfile {
            id: TutorId::generate(),
            user_id: tutor_user,
            name: "Jonas".to_string(),
            avatar_url: None,
        });

        Self {
            repo,
            clock: FixedClock::new(date(1, 1)),
            host_user,
            tutor_user,
        }
    }

    /// Publish an active listing through the lifecycle service.
    async fn publish_listing(&self, title: &str, price_per_day: i64) -> pawnest_rust::models::ListingId {
        let listing = services::create_listing(
            &self.repo,
            &self.clock,
            self.host_user,
            CreateListingRequest {
                title: title.to_string(),
                description: Some("Quiet flat near the park".to_string()),
                price_per_day,
                accepts_dogs: true,
                accepts_cats: false,
                accepts_small_pets: true,
                accepts_medium_pets: true,
                accepts_large_pets: false,
                has_yard: true,
                allows_walks: true,
                provides_medication: false,
            },
        )
        .await
        .unwrap();
        assert!(!listing.is_active, "listings must start inactive");

        let listing = services::toggle_active(&self.repo, listing.id, self.host_user, true)
            .await
            .unwrap();
        assert!(listing.is_active);
        listing.id
    }

    fn booking_request(
        &self,
        listing_id: pawnest_rust::models::ListingId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> CreateBookingRequest {
        CreateBookingRequest {
            listing_id,
            start_date: start,
            end_date: end,
            total_price: 10_500,
            notes: None,
        }
    }
}

fn search_for_dates(start: DateTime<Utc>, end: DateTime<Utc>) -> SearchCriteria {
    SearchCriteria {
        start_date: Some(start),
        end_date: Some(end),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_full_booking_lifecycle() {
    let world = World::new();
    let listing_id = world.publish_listing("Cozy home with yard", 3_500).await;

    // Tutor requests a stay; booking starts pending.
    let details = services::create_booking(
        &world.repo,
        &world.clock,
        world.tutor_user,
        world.booking_request(listing_id, date(6, 10), date(6, 15)),
    )
    .await
    .unwrap();
    assert_eq!(details.booking.status, BookingStatus::Pending);
    assert_eq!(details.host.name, "Ana");
    assert_eq!(details.tutor.name, "Jonas");

    // Pending bookings do not block search.
    let page = services::search_listings(&world.repo, &search_for_dates(date(6, 12), date(6, 14)))
        .await
        .unwrap();
    assert_eq!(page.total, 1);

    // Host confirms; the dates now block availability.
    let details = services::update_status(
        &world.repo,
        details.booking.id,
        world.host_user,
        BookingStatus::Confirmed,
        None,
    )
    .await
    .unwrap();
    assert_eq!(details.booking.status, BookingStatus::Confirmed);

    let page = services::search_listings(&world.repo, &search_for_dates(date(6, 12), date(6, 14)))
        .await
        .unwrap();
    assert_eq!(page.total, 0, "confirmed dates must vanish from search");

    let err = services::create_booking(
        &world.repo,
        &world.clock,
        world.tutor_user,
        world.booking_request(listing_id, date(6, 14), date(6, 18)),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    // Tutor cancels; the dates free up again.
    services::update_status(
        &world.repo,
        details.booking.id,
        world.tutor_user,
        BookingStatus::Canceled,
        Some("Trip moved".to_string()),
    )
    .await
    .unwrap();

    let page = services::search_listings(&world.repo, &search_for_dates(date(6, 12), date(6, 14)))
        .await
        .unwrap();
    assert_eq!(page.total, 1);

    // Canceled bookings can be deleted by their tutor.
    services::delete_booking(&world.repo, details.booking.id, world.tutor_user)
        .await
        .unwrap();
    assert_eq!(world.repo.booking_count(), 0);
}

#[tokio::test]
async fn test_first_confirmation_wins_over_overlapping_requests() {
    let world = World::new();
    let listing_id = world.publish_listing("Sunny terrace", 4_000).await;

    let second_user = UserId::generate();
    world.repo.insert_tutor(TutorProfile {
        id: TutorId::generate(),
        user_id: second_user,
        name: "Rita".to_string(),
        avatar_url: None,
    });

    // Two tutors request overlapping stays; both requests are legal.
    let first = services::create_booking(
        &world.repo,
        &world.clock,
        world.tutor_user,
        world.booking_request(listing_id, date(7, 1), date(7, 5)),
    )
    .await
    .unwrap();
    let second = services::create_booking(
        &world.repo,
        &world.clock,
        second_user,
        world.booking_request(listing_id, date(7, 4), date(7, 8)),
    )
    .await
    .unwrap();

    // Confirming the first blocks the second from being confirmed.
    services::update_status(
        &world.repo,
        first.booking.id,
        world.host_user,
        BookingStatus::Confirmed,
        None,
    )
    .await
    .unwrap();

    let err = services::update_status(
        &world.repo,
        second.booking.id,
        world.host_user,
        BookingStatus::Confirmed,
        None,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    // Once the winner is canceled, the loser can be confirmed after all.
    services::update_status(
        &world.repo,
        first.booking.id,
        world.tutor_user,
        BookingStatus::Canceled,
        None,
    )
    .await
    .unwrap();
    let second = services::update_status(
        &world.repo,
        second.booking.id,
        world.host_user,
        BookingStatus::Confirmed,
        None,
    )
    .await
    .unwrap();
    assert_eq!(second.booking.status, BookingStatus::Confirmed);
}

#[tokio::test]
async fn test_booking_lists_for_both_sides() {
    let world = World::new();
    let listing_id = world.publish_listing("Garden room", 2_500).await;

    for day in [1, 10, 20] {
        services::create_booking(
            &world.repo,
            &world.clock,
            world.tutor_user,
            world.booking_request(listing_id, date(8, day), date(8, day + 3)),
        )
        .await
        .unwrap();
        world.clock.advance(chrono::Duration::hours(1));
    }

    // Tutor view, newest first.
    let list = services::list_bookings(
        &world.repo,
        world.tutor_user,
        BookingListFilter {
            status: None,
            role: Some(BookingRole::Tutor),
        },
        1,
        2,
    )
    .await
    .unwrap();
    assert_eq!(list.total, 3);
    assert_eq!(list.bookings.len(), 2);
    assert_eq!(list.bookings[0].booking.start_date, date(8, 20));

    // Host sees bookings on their listings.
    let list = services::list_bookings(
        &world.repo,
        world.host_user,
        BookingListFilter {
            status: Some(BookingStatus::Pending),
            role: Some(BookingRole::Host),
        },
        1,
        10,
    )
    .await
    .unwrap();
    assert_eq!(list.total, 3);

    // A user with no profile gets an empty page, not an error.
    let list = services::list_bookings(
        &world.repo,
        UserId::generate(),
        BookingListFilter {
            status: None,
            role: None,
        },
        1,
        10,
    )
    .await
    .unwrap();
    assert_eq!(list.total, 0);
}

#[tokio::test]
async fn test_search_ranks_across_hosts() {
    let world = World::new();
    let near = world.publish_listing("Lisbon loft", 3_000).await;

    // Second host further north, cheaper, better rated.
    let porto_user = UserId::generate();
    world.repo.insert_host(HostProfile {
        id: HostId::generate(),
        user_id: porto_user,
        name: "Bruno".to_string(),
        avatar_url: None,
        city: Some("Porto".to_string()),
        state: Some("Porto".to_string()),
        latitude: Some(41.1579),
        longitude: Some(-8.6291),
        subscription_active: true,
    });
    let far_world = World {
        repo: world.repo.clone(),
        clock: FixedClock::new(date(1, 2)),
        host_user: porto_user,
        tutor_user: world.tutor_user,
    };
    let far = far_world.publish_listing("Porto attic", 2_000).await;

    world.repo.add_review(far, 5);
    world.repo.add_review(far, 5);
    world.repo.add_review(near, 3);

    // Rating sort puts the Porto listing first.
    let criteria = SearchCriteria {
        sort_by: SortKey::Rating,
        sort_order: SortOrder::Desc,
        ..Default::default()
    };
    let page = services::search_listings(&world.repo, &criteria).await.unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.hits[0].listing.id, far);
    assert!((page.hits[0].average_rating - 5.0).abs() < f64::EPSILON);

    // A 50 km default radius around Lisbon drops the Porto host.
    let criteria = SearchCriteria {
        latitude: Some(38.7223),
        longitude: Some(-9.1393),
        ..Default::default()
    };
    let page = services::search_listings(&world.repo, &criteria).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.hits[0].listing.id, near);
    assert!(page.hits[0].distance_km.unwrap() < 1.0);

    // City filter is a case-insensitive substring match.
    let criteria = SearchCriteria {
        city: Some("porTO".to_string()),
        ..Default::default()
    };
    let page = services::search_listings(&world.repo, &criteria).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.hits[0].listing.id, far);
}
