//! Diesel row types for the Postgres repository.
//!
//! Hosts, tutors, and blocked dates are written by the wider platform;
//! this API only reads them, so those tables get no insertable rows.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{bookings, listings};

#[derive(Debug, Queryable)]
pub struct HostRow {
    pub host_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub avatar_url: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub subscription_active: bool,
}

#[derive(Debug, Queryable)]
pub struct TutorRow {
    pub tutor_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Queryable)]
pub struct ListingRow {
    pub listing_id: Uuid,
    pub host_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price_per_day: i64,
    pub is_active: bool,
    pub accepts_dogs: bool,
    pub accepts_cats: bool,
    pub accepts_small_pets: bool,
    pub accepts_medium_pets: bool,
    pub accepts_large_pets: bool,
    pub has_yard: bool,
    pub allows_walks: bool,
    pub provides_medication: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = listings)]
pub struct NewListingRow {
    pub listing_id: Uuid,
    pub host_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price_per_day: i64,
    pub is_active: bool,
    pub accepts_dogs: bool,
    pub accepts_cats: bool,
    pub accepts_small_pets: bool,
    pub accepts_medium_pets: bool,
    pub accepts_large_pets: bool,
    pub has_yard: bool,
    pub allows_walks: bool,
    pub provides_medication: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Queryable)]
pub struct BookingRow {
    pub booking_id: Uuid,
    pub listing_id: Uuid,
    pub tutor_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_price: i64,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = bookings)]
pub struct NewBookingRow {
    pub booking_id: Uuid,
    pub listing_id: Uuid,
    pub tutor_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_price: i64,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
