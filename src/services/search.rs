//! Search filter: attribute filtering, availability exclusion, ranking.
//!
//! Attribute filters run at the persistence layer; date-availability
//! exclusion, rating aggregation, distance, sorting, and pagination happen
//! here, in that order. `total` always reflects the fully filtered set, not
//! the pre-filter candidate count.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use super::availability;
use super::error::{ServiceError, ServiceResult};
use crate::db::repository::{FullRepository, ListingFilter};
use crate::models::{DateRange, HostProfile, Listing, ListingId, PetSize};

/// Default search radius in kilometers when coordinates are supplied.
pub const DEFAULT_RADIUS_KM: f64 = 50.0;

/// Sort key for search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Price,
    Distance,
    Rating,
    #[default]
    CreatedAt,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Full search criteria.
#[derive(Debug, Clone, Default)]
pub struct SearchCriteria {
    pub city: Option<String>,
    pub state: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub accepts_dogs: Option<bool>,
    pub accepts_cats: Option<bool>,
    pub pet_size: Option<PetSize>,
    pub has_yard: Option<bool>,
    pub allows_walks: Option<bool>,
    pub provides_medication: Option<bool>,
    /// Availability window; both dates must be present to take effect.
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Radius filter in km, only meaningful with coordinates.
    pub radius_km: Option<f64>,
    pub min_rating: Option<f64>,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
    pub page: u32,
    pub limit: u32,
}

/// One search hit with its read-side aggregates.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub listing: Listing,
    pub host: HostProfile,
    pub average_rating: f64,
    pub review_count: u64,
    /// Km from the query point; `None` when either side lacks coordinates.
    pub distance_km: Option<f64>,
}

/// A page of search hits plus the filtered-set size.
#[derive(Debug, Clone)]
pub struct SearchPage {
    pub hits: Vec<SearchHit>,
    pub total: u64,
}

/// Great-circle distance between two coordinates, in kilometers.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

fn attribute_filter(criteria: &SearchCriteria) -> ListingFilter {
    ListingFilter {
        city: criteria.city.clone(),
        state: criteria.state.clone(),
        min_price: criteria.min_price,
        max_price: criteria.max_price,
        accepts_dogs: criteria.accepts_dogs,
        accepts_cats: criteria.accepts_cats,
        pet_size: criteria.pet_size,
        has_yard: criteria.has_yard,
        allows_walks: criteria.allows_walks,
        provides_medication: criteria.provides_medication,
    }
}

fn compare_hits(a: &SearchHit, b: &SearchHit, key: SortKey) -> Ordering {
    match key {
        SortKey::Price => a.listing.price_per_day.cmp(&b.listing.price_per_day),
        SortKey::Distance => match (a.distance_km, b.distance_km) {
            // Hits without a distance keep their relative position.
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
        SortKey::Rating => a
            .average_rating
            .partial_cmp(&b.average_rating)
            .unwrap_or(Ordering::Equal),
        SortKey::CreatedAt => a.listing.created_at.cmp(&b.listing.created_at),
    }
}

/// Search active listings.
///
/// Pipeline: persistence-level attribute filters, then (when both dates are
/// given) removal of listings with conflicting blocking bookings and of
/// listings whose host blocked a date in the window, then rating/distance
/// aggregation, radius and rating filters, sort, and finally pagination.
pub async fn search_listings<R>(repo: &R, criteria: &SearchCriteria) -> ServiceResult<SearchPage>
where
    R: FullRepository + ?Sized,
{
    let page = criteria.page.max(1) as usize;
    let limit = criteria.limit.clamp(1, 100) as usize;

    let mut candidates = repo.find_listings(&attribute_filter(criteria)).await?;

    if let (Some(start), Some(end)) = (criteria.start_date, criteria.end_date) {
        let range = DateRange::new(start, end).map_err(ServiceError::Validation)?;

        let ids: Vec<ListingId> = candidates.iter().map(|l| l.id).collect();
        let available = availability::filter_available(repo, &ids, &range).await?;
        let blocked_hosts = repo.blocked_host_ids(&range).await?;

        candidates.retain(|l| available.contains(&l.id) && !blocked_hosts.contains(&l.host_id));
    }

    let mut hits = Vec::with_capacity(candidates.len());
    for listing in candidates {
        let host = repo.get_host(listing.host_id).await?;
        let stats = repo.review_stats(listing.id).await?;

        let distance_km = match (criteria.latitude, criteria.longitude) {
            (Some(lat), Some(lon)) => match (host.latitude, host.longitude) {
                (Some(hlat), Some(hlon)) => Some(haversine_km(lat, lon, hlat, hlon)),
                _ => None,
            },
            _ => None,
        };

        hits.push(SearchHit {
            listing,
            host,
            average_rating: stats.average_rating,
            review_count: stats.review_count,
            distance_km,
        });
    }

    // With a query point, hosts without coordinates fall outside any radius.
    if criteria.latitude.is_some() && criteria.longitude.is_some() {
        let radius = criteria.radius_km.unwrap_or(DEFAULT_RADIUS_KM);
        hits.retain(|h| h.distance_km.is_some_and(|d| d <= radius));
    }

    if let Some(min_rating) = criteria.min_rating {
        hits.retain(|h| h.average_rating >= min_rating);
    }

    let key = criteria.sort_by;
    hits.sort_by(|a, b| {
        let ord = compare_hits(a, b, key);
        match criteria.sort_order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });

    let total = hits.len() as u64;
    let hits = hits
        .into_iter()
        .skip((page - 1) * limit)
        .take(limit)
        .collect();

    Ok(SearchPage { hits, total })
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
