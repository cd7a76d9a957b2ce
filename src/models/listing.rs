//! Listing and profile domain types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{HostId, ListingId, TutorId, UserId};

/// Size class of pets a listing accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetSize {
    Small,
    Medium,
    Large,
}

/// A bookable offering published by a host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub host_id: HostId,
    pub title: String,
    pub description: Option<String>,
    /// Price per day in the smallest currency unit.
    pub price_per_day: i64,
    /// Inactive listings are invisible to search and reject new bookings.
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

impl Listing {
    /// Whether the listing accepts the given pet size.
    pub fn accepts_size(&self, size: PetSize) -> bool {
        match size {
            PetSize::Small => self.accepts_small_pets,
            PetSize::Medium => self.accepts_medium_pets,
            PetSize::Large => self.accepts_large_pets,
        }
    }
}

/// Fields for creating a listing. Listings start inactive and must be
/// activated explicitly.
#[derive(Debug, Clone)]
pub struct NewListing {
    pub host_id: HostId,
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
    pub created_at: DateTime<Utc>,
}

/// Host profile with the display fields the API denormalizes into responses.
///
/// Subscription billing lives in an external collaborator; only its outcome
/// (an active subscription or not) reaches this core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostProfile {
    pub id: HostId,
    pub user_id: UserId,
    pub name: String,
    pub avatar_url: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub subscription_active: bool,
}

/// Tutor profile with display fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TutorProfile {
    pub id: TutorId,
    pub user_id: UserId,
    pub name: String,
    pub avatar_url: Option<String>,
}

/// A single calendar date a host has blocked out, independent of bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostBlockedDate {
    pub host_id: HostId,
    pub date: NaiveDate,
}
