//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the service
//! layer for business logic. Authentication is an external concern; the
//! acting user arrives as an `X-User-Id` header set by the gateway.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use uuid::Uuid;

use super::dto::{
    BookingListQueryParams, BookingListResponse, BookingResponse, CreateBookingRequest,
    CreateListingRequest, HealthResponse, HostListingsResponse, ListingResponse, PaginationInfo,
    SearchListingResponse, SearchQueryParams, SearchResponse, SetListingActiveRequest,
    UpdateBookingStatusRequest,
};
use super::error::AppError;
use super::state::AppState;
use crate::models::{BookingId, ListingId, UserId};
use crate::services::{self, BookingListFilter};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Resolve the acting user from the `X-User-Id` header.
fn require_user(headers: &HeaderMap) -> Result<UserId, AppError> {
    let raw = headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing X-User-Id header".to_string()))?;
    let uuid = Uuid::parse_str(raw)
        .map_err(|_| AppError::Unauthorized("Invalid X-User-Id header".to_string()))?;
    Ok(UserId::from(uuid))
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Verify the service is running and the repository is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let database = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
    }))
}

// =============================================================================
// Bookings
// =============================================================================

/// POST /api/bookings
pub async fn create_booking(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let user = require_user(&headers)?;
    let details = services::create_booking(
        state.repository.as_ref(),
        state.clock.as_ref(),
        user,
        request.into(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(details.into())))
}

/// GET /api/bookings
pub async fn list_bookings(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<BookingListQueryParams>,
) -> HandlerResult<BookingListResponse> {
    let user = require_user(&headers)?;
    let filter = BookingListFilter {
        status: params.status,
        role: params.role,
    };
    let list = services::list_bookings(
        state.repository.as_ref(),
        user,
        filter,
        params.page,
        params.limit,
    )
    .await?;

    Ok(Json(BookingListResponse {
        bookings: list.bookings.into_iter().map(Into::into).collect(),
        pagination: PaginationInfo::new(params.page.max(1), params.limit, list.total),
    }))
}

/// GET /api/bookings/{booking_id}
pub async fn get_booking(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(booking_id): Path<Uuid>,
) -> HandlerResult<BookingResponse> {
    let user = require_user(&headers)?;
    let details =
        services::get_booking(state.repository.as_ref(), BookingId::from(booking_id), user)
            .await?;
    Ok(Json(details.into()))
}

/// PATCH /api/bookings/{booking_id}/status
pub async fn update_booking_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(booking_id): Path<Uuid>,
    Json(request): Json<UpdateBookingStatusRequest>,
) -> HandlerResult<BookingResponse> {
    let user = require_user(&headers)?;
    let details = services::update_status(
        state.repository.as_ref(),
        BookingId::from(booking_id),
        user,
        request.status,
        request.cancellation_reason,
    )
    .await?;
    Ok(Json(details.into()))
}

/// DELETE /api/bookings/{booking_id}
pub async fn delete_booking(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(booking_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let user = require_user(&headers)?;
    services::delete_booking(state.repository.as_ref(), BookingId::from(booking_id), user)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Listings & search
// =============================================================================

/// GET /api/listings
///
/// Public search; no authentication required.
pub async fn search_listings(
    State(state): State<AppState>,
    Query(params): Query<SearchQueryParams>,
) -> HandlerResult<SearchResponse> {
    let page = params.page;
    let limit = params.limit;
    let criteria = params.into();
    let result = services::search_listings(state.repository.as_ref(), &criteria).await?;

    let listings: Vec<SearchListingResponse> =
        result.hits.into_iter().map(Into::into).collect();
    Ok(Json(SearchResponse {
        listings,
        pagination: PaginationInfo::new(page.max(1), limit, result.total),
    }))
}

/// GET /api/listings/{listing_id}
pub async fn get_listing(
    State(state): State<AppState>,
    Path(listing_id): Path<Uuid>,
) -> HandlerResult<ListingResponse> {
    let listing =
        services::get_listing(state.repository.as_ref(), ListingId::from(listing_id)).await?;
    Ok(Json(listing.into()))
}

/// POST /api/listings
pub async fn create_listing(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateListingRequest>,
) -> Result<(StatusCode, Json<ListingResponse>), AppError> {
    let user = require_user(&headers)?;
    let listing = services::create_listing(
        state.repository.as_ref(),
        state.clock.as_ref(),
        user,
        request.into(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(listing.into())))
}

/// PATCH /api/listings/{listing_id}/active
pub async fn set_listing_active(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(listing_id): Path<Uuid>,
    Json(request): Json<SetListingActiveRequest>,
) -> HandlerResult<ListingResponse> {
    let user = require_user(&headers)?;
    let listing = services::toggle_active(
        state.repository.as_ref(),
        ListingId::from(listing_id),
        user,
        request.is_active,
    )
    .await?;
    Ok(Json(listing.into()))
}

/// DELETE /api/listings/{listing_id}
pub async fn delete_listing(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(listing_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let user = require_user(&headers)?;
    services::delete_listing(state.repository.as_ref(), ListingId::from(listing_id), user)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/host/listings
pub async fn list_host_listings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> HandlerResult<HostListingsResponse> {
    let user = require_user(&headers)?;
    let listings = services::list_host_listings(state.repository.as_ref(), user).await?;
    let listings: Vec<ListingResponse> = listings.into_iter().map(Into::into).collect();
    Ok(Json(HostListingsResponse {
        total: listings.len(),
        listings,
    }))
}
