//! Booking domain types: status state machine, records, actor roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BookingId, ListingId, TutorId, UserId};
use super::time::DateRange;

/// Lifecycle status of a booking.
///
/// `pending -> confirmed -> ongoing -> completed`, with cancellation possible
/// from `pending` or `confirmed`. The `ongoing` and `completed` transitions
/// are driven by external time-based processes; the status-update operation
/// only ever produces `confirmed` or `canceled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Ongoing,
    Completed,
    Canceled,
}

impl BookingStatus {
    /// Statuses that block a listing's availability for overlapping dates.
    ///
    /// Pending requests do not reserve dates; only confirmed and ongoing
    /// stays do.
    pub const AVAILABILITY_BLOCKING: [BookingStatus; 2] =
        [BookingStatus::Confirmed, BookingStatus::Ongoing];

    /// Statuses that have not yet reached a terminal state.
    pub const NON_TERMINAL: [BookingStatus; 3] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Ongoing,
    ];

    /// Whether this status counts toward availability conflicts.
    pub fn blocks_availability(&self) -> bool {
        Self::AVAILABILITY_BLOCKING.contains(self)
    }

    /// Whether the booking can still change state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Canceled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Ongoing => "ongoing",
            BookingStatus::Completed => "completed",
            BookingStatus::Canceled => "canceled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "ongoing" => Ok(BookingStatus::Ongoing),
            "completed" => Ok(BookingStatus::Completed),
            "canceled" => Ok(BookingStatus::Canceled),
            other => Err(format!("Unknown booking status: {}", other)),
        }
    }
}

/// A reservation of one listing by one tutor for a date interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub listing_id: ListingId,
    pub tutor_id: TutorId,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Caller-supplied total in the smallest currency unit. Not cross-checked
    /// against `price_per_day x nights`; see the service docs.
    pub total_price: i64,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// The booked interval as a validated range.
    pub fn date_range(&self) -> DateRange {
        DateRange {
            start: self.start_date,
            end: self.end_date,
        }
    }
}

/// Fields for inserting a new booking. The repository assigns the id.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub listing_id: ListingId,
    pub tutor_id: TutorId,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_price: i64,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A booking's interval, as fetched for conflict checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BookingSpan {
    pub id: BookingId,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// The acting user's relationship to a booking, resolved once per operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorRole {
    /// The user owns the tutor profile that made the booking.
    Tutor,
    /// The user owns the host profile behind the booked listing.
    Host,
    /// The user is not a party to the booking.
    Neither,
}

impl ActorRole {
    /// Resolve the role from the owning user ids of both sides.
    pub fn resolve(actor: UserId, tutor_user: UserId, host_user: UserId) -> Self {
        if actor == tutor_user {
            ActorRole::Tutor
        } else if actor == host_user {
            ActorRole::Host
        } else {
            ActorRole::Neither
        }
    }
}

/// Side of the marketplace a user acts on, used by the booking list filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingRole {
    Tutor,
    Host,
}
