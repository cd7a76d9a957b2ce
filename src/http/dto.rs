//! Data Transfer Objects for the HTTP API.
//!
//! The wire format is camelCase JSON with ISO-8601 date-times, matching the
//! conventions of the surrounding platform. DTOs convert to and from the
//! service-layer types; handlers never expose repository rows directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{
    BookingId, BookingRole, BookingStatus, HostId, Listing, ListingId, PetSize, TutorId,
};
use crate::services::{
    BookingDetails, CreateBookingRequest as CreateBookingInput,
    CreateListingRequest as CreateListingInput, SearchCriteria, SearchHit, SortKey, SortOrder,
};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// Offset pagination envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl PaginationInfo {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let limit_u64 = limit.max(1) as u64;
        Self {
            page,
            limit,
            total,
            total_pages: total.div_ceil(limit_u64),
        }
    }
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

fn default_search_limit() -> u32 {
    20
}

// =============================================================================
// Bookings
// =============================================================================

/// Request body for creating a booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub listing_id: ListingId,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Total in the smallest currency unit.
    pub total_price: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<CreateBookingRequest> for CreateBookingInput {
    fn from(req: CreateBookingRequest) -> Self {
        Self {
            listing_id: req.listing_id,
            start_date: req.start_date,
            end_date: req.end_date,
            total_price: req.total_price,
            notes: req.notes,
        }
    }
}

/// Request body for the status transition endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
    #[serde(default)]
    pub cancellation_reason: Option<String>,
}

/// Compact listing summary denormalized into booking responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSummaryDto {
    pub id: ListingId,
    pub title: String,
    pub price_per_day: i64,
}

/// Compact profile summary denormalized into booking responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummaryDto {
    pub name: String,
    pub avatar_url: Option<String>,
}

/// A booking with denormalized display fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: BookingId,
    pub listing_id: ListingId,
    pub tutor_id: TutorId,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_price: i64,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub listing: ListingSummaryDto,
    pub host: ProfileSummaryDto,
    pub tutor: ProfileSummaryDto,
}

impl From<BookingDetails> for BookingResponse {
    fn from(details: BookingDetails) -> Self {
        let b = details.booking;
        Self {
            id: b.id,
            listing_id: b.listing_id,
            tutor_id: b.tutor_id,
            start_date: b.start_date,
            end_date: b.end_date,
            total_price: b.total_price,
            status: b.status,
            notes: b.notes,
            created_at: b.created_at,
            listing: ListingSummaryDto {
                id: details.listing.id,
                title: details.listing.title,
                price_per_day: details.listing.price_per_day,
            },
            host: ProfileSummaryDto {
                name: details.host.name,
                avatar_url: details.host.avatar_url,
            },
            tutor: ProfileSummaryDto {
                name: details.tutor.name,
                avatar_url: details.tutor.avatar_url,
            },
        }
    }
}

/// Query parameters for listing bookings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BookingListQueryParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub status: Option<BookingStatus>,
    #[serde(default)]
    pub role: Option<BookingRole>,
}

/// Response for the booking list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingListResponse {
    pub bookings: Vec<BookingResponse>,
    pub pagination: PaginationInfo,
}

// =============================================================================
// Listings & search
// =============================================================================

/// A listing as returned by the listing endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    pub id: ListingId,
    pub host_id: HostId,
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

impl From<Listing> for ListingResponse {
    fn from(l: Listing) -> Self {
        Self {
            id: l.id,
            host_id: l.host_id,
            title: l.title,
            description: l.description,
            price_per_day: l.price_per_day,
            is_active: l.is_active,
            accepts_dogs: l.accepts_dogs,
            accepts_cats: l.accepts_cats,
            accepts_small_pets: l.accepts_small_pets,
            accepts_medium_pets: l.accepts_medium_pets,
            accepts_large_pets: l.accepts_large_pets,
            has_yard: l.has_yard,
            allows_walks: l.allows_walks,
            provides_medication: l.provides_medication,
            created_at: l.created_at,
        }
    }
}

/// Request body for creating a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price_per_day: i64,
    #[serde(default)]
    pub accepts_dogs: bool,
    #[serde(default)]
    pub accepts_cats: bool,
    #[serde(default)]
    pub accepts_small_pets: bool,
    #[serde(default)]
    pub accepts_medium_pets: bool,
    #[serde(default)]
    pub accepts_large_pets: bool,
    #[serde(default)]
    pub has_yard: bool,
    #[serde(default)]
    pub allows_walks: bool,
    #[serde(default)]
    pub provides_medication: bool,
}

impl From<CreateListingRequest> for CreateListingInput {
    fn from(req: CreateListingRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            price_per_day: req.price_per_day,
            accepts_dogs: req.accepts_dogs,
            accepts_cats: req.accepts_cats,
            accepts_small_pets: req.accepts_small_pets,
            accepts_medium_pets: req.accepts_medium_pets,
            accepts_large_pets: req.accepts_large_pets,
            has_yard: req.has_yard,
            allows_walks: req.allows_walks,
            provides_medication: req.provides_medication,
        }
    }
}

/// Request body for activating/deactivating a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetListingActiveRequest {
    pub is_active: bool,
}

/// Sort key accepted by the search endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortByParam {
    Price,
    Distance,
    Rating,
    #[default]
    CreatedAt,
}

impl From<SortByParam> for SortKey {
    fn from(p: SortByParam) -> Self {
        match p {
            SortByParam::Price => SortKey::Price,
            SortByParam::Distance => SortKey::Distance,
            SortByParam::Rating => SortKey::Rating,
            SortByParam::CreatedAt => SortKey::CreatedAt,
        }
    }
}

/// Sort direction accepted by the search endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrderParam {
    Asc,
    #[default]
    Desc,
}

impl From<SortOrderParam> for SortOrder {
    fn from(p: SortOrderParam) -> Self {
        match p {
            SortOrderParam::Asc => SortOrder::Asc,
            SortOrderParam::Desc => SortOrder::Desc,
        }
    }
}

/// Query parameters for the search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchQueryParams {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub min_price: Option<i64>,
    #[serde(default)]
    pub max_price: Option<i64>,
    #[serde(default)]
    pub accepts_dogs: Option<bool>,
    #[serde(default)]
    pub accepts_cats: Option<bool>,
    #[serde(default)]
    pub pet_size: Option<PetSize>,
    #[serde(default)]
    pub has_yard: Option<bool>,
    #[serde(default)]
    pub allows_walks: Option<bool>,
    #[serde(default)]
    pub provides_medication: Option<bool>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Radius in km; only meaningful with coordinates.
    #[serde(default)]
    pub radius: Option<f64>,
    #[serde(default)]
    pub min_rating: Option<f64>,
    #[serde(default)]
    pub sort_by: SortByParam,
    #[serde(default)]
    pub sort_order: SortOrderParam,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_search_limit")]
    pub limit: u32,
}

impl From<SearchQueryParams> for SearchCriteria {
    fn from(p: SearchQueryParams) -> Self {
        Self {
            city: p.city,
            state: p.state,
            min_price: p.min_price,
            max_price: p.max_price,
            accepts_dogs: p.accepts_dogs,
            accepts_cats: p.accepts_cats,
            pet_size: p.pet_size,
            has_yard: p.has_yard,
            allows_walks: p.allows_walks,
            provides_medication: p.provides_medication,
            start_date: p.start_date,
            end_date: p.end_date,
            latitude: p.latitude,
            longitude: p.longitude,
            radius_km: p.radius,
            min_rating: p.min_rating,
            sort_by: p.sort_by.into(),
            sort_order: p.sort_order.into(),
            page: p.page,
            limit: p.limit,
        }
    }
}

/// One search result with read-side aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchListingResponse {
    #[serde(flatten)]
    pub listing: ListingResponse,
    pub host_name: String,
    pub host_avatar_url: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub average_rating: f64,
    pub review_count: u64,
    /// Km from the query point; absent without coordinates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl From<SearchHit> for SearchListingResponse {
    fn from(hit: SearchHit) -> Self {
        Self {
            listing: hit.listing.into(),
            host_name: hit.host.name,
            host_avatar_url: hit.host.avatar_url,
            city: hit.host.city,
            state: hit.host.state,
            average_rating: hit.average_rating,
            review_count: hit.review_count,
            distance: hit.distance_km,
        }
    }
}

/// Response for the search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub listings: Vec<SearchListingResponse>,
    pub pagination: PaginationInfo,
}

/// Response for the host's own listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostListingsResponse {
    pub listings: Vec<ListingResponse>,
    pub total: usize,
}
