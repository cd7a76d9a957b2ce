//! In-memory local repository implementation.
//!
//! This module provides a local implementation of all repository traits
//! suitable for unit testing and local development. All data is stored in
//! memory using HashMap and Vec structures, providing fast, deterministic,
//! and isolated execution.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::db::repository::*;
use crate::models::*;

/// In-memory local repository.
///
/// All state lives behind a single `RwLock`, which doubles as the mutual
/// exclusion required by [`BookingRepository::insert_booking_guarded`]: the
/// availability re-check and the insert run under one write guard, so no
/// other insert can interleave between them.
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

#[derive(Default)]
struct LocalData {
    hosts: HashMap<HostId, HostProfile>,
    tutors: HashMap<TutorId, TutorProfile>,
    listings: HashMap<ListingId, Listing>,
    bookings: HashMap<BookingId, Booking>,
    reviews: HashMap<ListingId, Vec<i32>>,
    blocked_dates: Vec<HostBlockedDate>,
    is_healthy: bool,
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData {
                is_healthy: true,
                ..Default::default()
            })),
        }
    }

    // ==================== Seed helpers ====================

    /// Add a host profile. Helper for setting up data.
    pub fn insert_host(&self, host: HostProfile) {
        self.data.write().unwrap().hosts.insert(host.id, host);
    }

    /// Add a tutor profile. Helper for setting up data.
    pub fn insert_tutor(&self, tutor: TutorProfile) {
        self.data.write().unwrap().tutors.insert(tutor.id, tutor);
    }

    /// Add a listing record directly, bypassing the lifecycle service.
    pub fn insert_listing_record(&self, listing: Listing) {
        self.data
            .write()
            .unwrap()
            .listings
            .insert(listing.id, listing);
    }

    /// Record a review rating (1-5) for a listing.
    pub fn add_review(&self, listing_id: ListingId, rating: i32) {
        self.data
            .write()
            .unwrap()
            .reviews
            .entry(listing_id)
            .or_default()
            .push(rating);
    }

    /// Block a calendar date on a host's availability calendar.
    pub fn block_date(&self, host_id: HostId, date: NaiveDate) {
        self.data
            .write()
            .unwrap()
            .blocked_dates
            .push(HostBlockedDate { host_id, date });
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().unwrap().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write().unwrap();
        let is_healthy = data.is_healthy;
        *data = LocalData {
            is_healthy,
            ..Default::default()
        };
    }

    /// Number of bookings stored.
    pub fn booking_count(&self) -> usize {
        self.data.read().unwrap().bookings.len()
    }

    // ==================== Internal helpers ====================

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self) -> RepositoryResult<()> {
        if !self.data.read().unwrap().is_healthy {
            return Err(RepositoryError::connection("Database is not healthy"));
        }
        Ok(())
    }

    fn get_listing_impl(&self, listing_id: ListingId) -> RepositoryResult<Listing> {
        self.data
            .read()
            .unwrap()
            .listings
            .get(&listing_id)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    format!("Listing {} not found", listing_id),
                    ErrorContext::default()
                        .with_entity("listing")
                        .with_entity_id(listing_id),
                )
            })
    }

    fn get_booking_impl(&self, booking_id: BookingId) -> RepositoryResult<Booking> {
        self.data
            .read()
            .unwrap()
            .bookings
            .get(&booking_id)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    format!("Booking {} not found", booking_id),
                    ErrorContext::default()
                        .with_entity("booking")
                        .with_entity_id(booking_id),
                )
            })
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

// ==================== Booking Repository ====================

#[async_trait]
impl BookingRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().unwrap().is_healthy)
    }

    async fn booking_spans(
        &self,
        listing_id: ListingId,
        statuses: &[BookingStatus],
    ) -> RepositoryResult<Vec<BookingSpan>> {
        self.check_health()?;
        let data = self.data.read().unwrap();

        Ok(data
            .bookings
            .values()
            .filter(|b| b.listing_id == listing_id && statuses.contains(&b.status))
            .map(|b| BookingSpan {
                id: b.id,
                start_date: b.start_date,
                end_date: b.end_date,
            })
            .collect())
    }

    async fn conflicting_listing_ids(
        &self,
        range: &DateRange,
        statuses: &[BookingStatus],
    ) -> RepositoryResult<Vec<ListingId>> {
        self.check_health()?;
        let data = self.data.read().unwrap();

        let mut ids: Vec<ListingId> = data
            .bookings
            .values()
            .filter(|b| statuses.contains(&b.status))
            .filter(|b| range.overlaps_span(b.start_date, b.end_date))
            .map(|b| b.listing_id)
            .collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    async fn insert_booking_guarded(&self, booking: NewBooking) -> RepositoryResult<Booking> {
        self.check_health()?;

        // Re-check and insert under one write guard; no other insert can
        // interleave between the overlap test and the map insertion.
        let mut data = self.data.write().unwrap();

        let range = DateRange {
            start: booking.start_date,
            end: booking.end_date,
        };
        let conflict = data.bookings.values().any(|b| {
            b.listing_id == booking.listing_id
                && b.status.blocks_availability()
                && range.overlaps_span(b.start_date, b.end_date)
        });
        if conflict {
            return Err(RepositoryError::conflict_with_context(
                "An overlapping booking already exists for this listing",
                ErrorContext::new("insert_booking_guarded")
                    .with_entity("booking")
                    .with_details(format!("listing_id={}", booking.listing_id)),
            ));
        }

        let stored = Booking {
            id: BookingId::generate(),
            listing_id: booking.listing_id,
            tutor_id: booking.tutor_id,
            start_date: booking.start_date,
            end_date: booking.end_date,
            total_price: booking.total_price,
            status: booking.status,
            notes: booking.notes,
            created_at: booking.created_at,
        };
        data.bookings.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get_booking(&self, booking_id: BookingId) -> RepositoryResult<Booking> {
        self.check_health()?;
        self.get_booking_impl(booking_id)
    }

    async fn update_booking_status(
        &self,
        booking_id: BookingId,
        status: BookingStatus,
        notes: Option<String>,
    ) -> RepositoryResult<Booking> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();

        let booking = data.bookings.get_mut(&booking_id).ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("Booking {} not found", booking_id),
                ErrorContext::new("update_booking_status")
                    .with_entity("booking")
                    .with_entity_id(booking_id),
            )
        })?;

        booking.status = status;
        if let Some(notes) = notes {
            booking.notes = Some(notes);
        }
        Ok(booking.clone())
    }

    async fn delete_booking(&self, booking_id: BookingId) -> RepositoryResult<()> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();

        if data.bookings.remove(&booking_id).is_none() {
            return Err(RepositoryError::not_found(format!(
                "Booking {} not found",
                booking_id
            )));
        }
        Ok(())
    }

    async fn list_bookings(&self, query: &BookingListQuery) -> RepositoryResult<BookingPage> {
        self.check_health()?;
        let data = self.data.read().unwrap();

        let mut matches: Vec<Booking> = data
            .bookings
            .values()
            .filter(|b| {
                let as_tutor = query.tutor_id.is_some_and(|t| b.tutor_id == t);
                let as_host = query.host_id.is_some_and(|h| {
                    data.listings
                        .get(&b.listing_id)
                        .is_some_and(|l| l.host_id == h)
                });
                as_tutor || as_host
            })
            .filter(|b| query.status.is_none_or(|s| b.status == s))
            .cloned()
            .collect();

        // Newest first; id as tie-breaker for a stable order.
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matches.len() as u64;
        let offset = query.offset.max(0) as usize;
        let limit = query.limit.max(0) as usize;
        let bookings = matches.into_iter().skip(offset).take(limit).collect();

        Ok(BookingPage { bookings, total })
    }

    async fn count_bookings_for_listing(
        &self,
        listing_id: ListingId,
        statuses: &[BookingStatus],
    ) -> RepositoryResult<u64> {
        self.check_health()?;
        let data = self.data.read().unwrap();

        Ok(data
            .bookings
            .values()
            .filter(|b| b.listing_id == listing_id && statuses.contains(&b.status))
            .count() as u64)
    }
}

// ==================== Listing Repository ====================

#[async_trait]
impl ListingRepository for LocalRepository {
    async fn get_listing(&self, listing_id: ListingId) -> RepositoryResult<Listing> {
        self.check_health()?;
        self.get_listing_impl(listing_id)
    }

    async fn insert_listing(&self, listing: NewListing) -> RepositoryResult<Listing> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();

        let stored = Listing {
            id: ListingId::generate(),
            host_id: listing.host_id,
            title: listing.title,
            description: listing.description,
            price_per_day: listing.price_per_day,
            is_active: false,
            accepts_dogs: listing.accepts_dogs,
            accepts_cats: listing.accepts_cats,
            accepts_small_pets: listing.accepts_small_pets,
            accepts_medium_pets: listing.accepts_medium_pets,
            accepts_large_pets: listing.accepts_large_pets,
            has_yard: listing.has_yard,
            allows_walks: listing.allows_walks,
            provides_medication: listing.provides_medication,
            created_at: listing.created_at,
        };
        data.listings.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn set_listing_active(
        &self,
        listing_id: ListingId,
        is_active: bool,
    ) -> RepositoryResult<Listing> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();

        let listing = data.listings.get_mut(&listing_id).ok_or_else(|| {
            RepositoryError::not_found(format!("Listing {} not found", listing_id))
        })?;
        listing.is_active = is_active;
        Ok(listing.clone())
    }

    async fn delete_listing(&self, listing_id: ListingId) -> RepositoryResult<()> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();

        if data.listings.remove(&listing_id).is_none() {
            return Err(RepositoryError::not_found(format!(
                "Listing {} not found",
                listing_id
            )));
        }
        Ok(())
    }

    async fn find_listings(&self, filter: &ListingFilter) -> RepositoryResult<Vec<Listing>> {
        self.check_health()?;
        let data = self.data.read().unwrap();

        let contains_ci = |haystack: &Option<String>, needle: &str| {
            haystack
                .as_deref()
                .is_some_and(|h| h.to_lowercase().contains(&needle.to_lowercase()))
        };

        let matches = data
            .listings
            .values()
            .filter(|l| l.is_active)
            .filter(|l| {
                let host = data.hosts.get(&l.host_id);
                let city_ok = filter.city.as_deref().is_none_or(|city| {
                    host.is_some_and(|h| contains_ci(&h.city, city))
                });
                let state_ok = filter.state.as_deref().is_none_or(|state| {
                    host.is_some_and(|h| contains_ci(&h.state, state))
                });
                city_ok && state_ok
            })
            .filter(|l| filter.min_price.is_none_or(|p| l.price_per_day >= p))
            .filter(|l| filter.max_price.is_none_or(|p| l.price_per_day <= p))
            .filter(|l| filter.accepts_dogs.is_none_or(|v| l.accepts_dogs == v))
            .filter(|l| filter.accepts_cats.is_none_or(|v| l.accepts_cats == v))
            .filter(|l| filter.pet_size.is_none_or(|s| l.accepts_size(s)))
            .filter(|l| filter.has_yard.is_none_or(|v| l.has_yard == v))
            .filter(|l| filter.allows_walks.is_none_or(|v| l.allows_walks == v))
            .filter(|l| {
                filter
                    .provides_medication
                    .is_none_or(|v| l.provides_medication == v)
            })
            .cloned()
            .collect();

        Ok(matches)
    }

    async fn listings_by_host(&self, host_id: HostId) -> RepositoryResult<Vec<Listing>> {
        self.check_health()?;
        let data = self.data.read().unwrap();

        let mut listings: Vec<Listing> = data
            .listings
            .values()
            .filter(|l| l.host_id == host_id)
            .cloned()
            .collect();
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listings)
    }

    async fn review_stats(&self, listing_id: ListingId) -> RepositoryResult<ReviewStats> {
        self.check_health()?;
        let data = self.data.read().unwrap();

        let ratings = match data.reviews.get(&listing_id) {
            Some(r) if !r.is_empty() => r,
            _ => return Ok(ReviewStats::default()),
        };
        let sum: i64 = ratings.iter().map(|r| *r as i64).sum();
        Ok(ReviewStats {
            average_rating: sum as f64 / ratings.len() as f64,
            review_count: ratings.len() as u64,
        })
    }

    async fn blocked_host_ids(&self, range: &DateRange) -> RepositoryResult<Vec<HostId>> {
        self.check_health()?;
        let data = self.data.read().unwrap();

        let start = range.start.date_naive();
        let end = range.end.date_naive();
        let mut ids: Vec<HostId> = data
            .blocked_dates
            .iter()
            .filter(|b| b.date >= start && b.date <= end)
            .map(|b| b.host_id)
            .collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }
}

// ==================== Profile Repository ====================

#[async_trait]
impl ProfileRepository for LocalRepository {
    async fn tutor_by_user(&self, user_id: UserId) -> RepositoryResult<Option<TutorProfile>> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        Ok(data.tutors.values().find(|t| t.user_id == user_id).cloned())
    }

    async fn host_by_user(&self, user_id: UserId) -> RepositoryResult<Option<HostProfile>> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        Ok(data.hosts.values().find(|h| h.user_id == user_id).cloned())
    }

    async fn get_tutor(&self, tutor_id: TutorId) -> RepositoryResult<TutorProfile> {
        self.check_health()?;
        self.data
            .read()
            .unwrap()
            .tutors
            .get(&tutor_id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("Tutor {} not found", tutor_id)))
    }

    async fn get_host(&self, host_id: HostId) -> RepositoryResult<HostProfile> {
        self.check_health()?;
        self.data
            .read()
            .unwrap()
            .hosts
            .get(&host_id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("Host {} not found", host_id)))
    }
}
