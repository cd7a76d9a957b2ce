//! Postgres repository implementation using Diesel.
//!
//! This module implements the repository traits against a Postgres database.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Automatic migration execution
//! - Per-listing advisory locks guarding booking inserts, with a gist
//!   exclusion constraint as the storage-level backstop
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::task;
use uuid::Uuid;

use crate::db::repository::{
    BookingListQuery, BookingPage, BookingRepository, ErrorContext, ListingFilter,
    ListingRepository, ProfileRepository, RepositoryError, RepositoryResult, ReviewStats,
};
use crate::models::*;

mod models;
mod schema;

use models::*;
use schema::{bookings, host_blocked_dates, hosts, listings, reviews, tutors};

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        fn env_parse<T: FromStr>(key: &str, default: T) -> T {
            std::env::var(key)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }

        Ok(Self {
            database_url,
            max_pool_size: env_parse("PG_POOL_MAX", 10),
            min_pool_size: env_parse("PG_POOL_MIN", 1),
            connection_timeout_sec: env_parse("PG_CONN_TIMEOUT_SEC", 30),
            idle_timeout_sec: env_parse("PG_IDLE_TIMEOUT_SEC", 600),
            max_retries: env_parse("PG_MAX_RETRIES", 3),
            retry_delay_ms: env_parse("PG_RETRY_DELAY_MS", 100),
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Point-in-time view of pool health and query counters.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    pub connections: u32,
    pub idle_connections: u32,
    pub total_queries: u64,
    pub failed_queries: u64,
    pub retried_operations: u64,
}

/// Diesel-backed repository for Postgres.
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
    total_queries: std::sync::Arc<AtomicU64>,
    failed_queries: std::sync::Arc<AtomicU64>,
    retried_operations: std::sync::Arc<AtomicU64>,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self {
            pool,
            config,
            total_queries: std::sync::Arc::new(AtomicU64::new(0)),
            failed_queries: std::sync::Arc::new(AtomicU64::new(0)),
            retried_operations: std::sync::Arc::new(AtomicU64::new(0)),
        })
    }

    /// Snapshot pool state and query counters.
    pub fn pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections: state.connections,
            idle_connections: state.idle_connections,
            total_queries: self.total_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
            retried_operations: self.retried_operations.load(Ordering::Relaxed),
        }
    }

    /// Run pending database migrations.
    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;
        Ok(())
    }

    /// Execute a database operation with automatic retry for transient failures.
    ///
    /// Retries up to `max_retries` times with exponential backoff when a
    /// retryable error occurs (connection errors, timeouts, serialization
    /// failures).
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;
        let total_queries = self.total_queries.clone();
        let failed_queries = self.failed_queries.clone();
        let retried_operations = self.retried_operations.clone();

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    retried_operations.fetch_add(1, Ordering::Relaxed);
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2;
                }

                let mut conn = match pool.get() {
                    Ok(c) => c,
                    Err(e) => {
                        let err = RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new("get_connection")
                                .with_details(format!("attempt={}", attempt + 1))
                                .retryable(),
                        );
                        if attempt < max_retries {
                            last_error = Some(err);
                            continue;
                        }
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(err);
                    }
                };

                total_queries.fetch_add(1, Ordering::Relaxed);
                match f.clone()(&mut conn) {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        last_error = Some(e);
                        continue;
                    }
                    Err(e) => {
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(e);
                    }
                }
            }

            failed_queries.fetch_add(1, Ordering::Relaxed);
            Err(last_error.unwrap_or_else(|| {
                RepositoryError::internal("Max retries exceeded with no error captured")
            }))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }
}

fn status_strings(statuses: &[BookingStatus]) -> Vec<String> {
    statuses.iter().map(|s| s.as_str().to_string()).collect()
}

fn row_to_booking(row: BookingRow) -> RepositoryResult<Booking> {
    let status = BookingStatus::from_str(&row.status).map_err(RepositoryError::internal)?;
    Ok(Booking {
        id: BookingId(row.booking_id),
        listing_id: ListingId(row.listing_id),
        tutor_id: TutorId(row.tutor_id),
        start_date: row.start_date,
        end_date: row.end_date,
        total_price: row.total_price,
        status,
        notes: row.notes,
        created_at: row.created_at,
    })
}

fn row_to_listing(row: ListingRow) -> Listing {
    Listing {
        id: ListingId(row.listing_id),
        host_id: HostId(row.host_id),
        title: row.title,
        description: row.description,
        price_per_day: row.price_per_day,
        is_active: row.is_active,
        accepts_dogs: row.accepts_dogs,
        accepts_cats: row.accepts_cats,
        accepts_small_pets: row.accepts_small_pets,
        accepts_medium_pets: row.accepts_medium_pets,
        accepts_large_pets: row.accepts_large_pets,
        has_yard: row.has_yard,
        allows_walks: row.allows_walks,
        provides_medication: row.provides_medication,
        created_at: row.created_at,
    }
}

fn row_to_host(row: HostRow) -> HostProfile {
    HostProfile {
        id: HostId(row.host_id),
        user_id: UserId(row.user_id),
        name: row.name,
        avatar_url: row.avatar_url,
        city: row.city,
        state: row.state,
        latitude: row.latitude,
        longitude: row.longitude,
        subscription_active: row.subscription_active,
    }
}

fn row_to_tutor(row: TutorRow) -> TutorProfile {
    TutorProfile {
        id: TutorId(row.tutor_id),
        user_id: UserId(row.user_id),
        name: row.name,
        avatar_url: row.avatar_url,
    }
}

/// Take the per-listing advisory lock for the current transaction.
///
/// The lock key is derived from the listing id text; it serializes guarded
/// booking inserts for one listing while leaving other listings untouched.
fn lock_listing(conn: &mut PgConnection, listing_id: ListingId) -> RepositoryResult<()> {
    sql_query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind::<diesel::sql_types::Text, _>(listing_id.to_string())
        .execute(conn)?;
    Ok(())
}

// ==================== Booking Repository ====================

#[async_trait]
impl BookingRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1").execute(conn)?;
            Ok(true)
        })
        .await
    }

    async fn booking_spans(
        &self,
        listing_id: ListingId,
        statuses: &[BookingStatus],
    ) -> RepositoryResult<Vec<BookingSpan>> {
        let statuses = status_strings(statuses);
        self.with_conn(move |conn| {
            let rows = bookings::table
                .filter(bookings::listing_id.eq(listing_id.value()))
                .filter(bookings::status.eq_any(statuses.clone()))
                .select((bookings::booking_id, bookings::start_date, bookings::end_date))
                .load::<(Uuid, chrono::DateTime<chrono::Utc>, chrono::DateTime<chrono::Utc>)>(
                    conn,
                )?;
            Ok(rows
                .into_iter()
                .map(|(id, start_date, end_date)| BookingSpan {
                    id: BookingId(id),
                    start_date,
                    end_date,
                })
                .collect())
        })
        .await
    }

    async fn conflicting_listing_ids(
        &self,
        range: &DateRange,
        statuses: &[BookingStatus],
    ) -> RepositoryResult<Vec<ListingId>> {
        let range = *range;
        let statuses = status_strings(statuses);
        self.with_conn(move |conn| {
            // Inclusive bounds on both ends, matching DateRange::overlaps.
            let ids = bookings::table
                .filter(bookings::status.eq_any(statuses.clone()))
                .filter(bookings::start_date.le(range.end))
                .filter(bookings::end_date.ge(range.start))
                .select(bookings::listing_id)
                .distinct()
                .load::<Uuid>(conn)?;
            Ok(ids.into_iter().map(ListingId).collect())
        })
        .await
    }

    async fn insert_booking_guarded(&self, booking: NewBooking) -> RepositoryResult<Booking> {
        self.with_conn(move |conn| {
            conn.transaction::<Booking, RepositoryError, _>(|conn| {
                lock_listing(conn, booking.listing_id)?;

                let blocking = status_strings(&BookingStatus::AVAILABILITY_BLOCKING);
                let overlapping: i64 = bookings::table
                    .filter(bookings::listing_id.eq(booking.listing_id.value()))
                    .filter(bookings::status.eq_any(blocking))
                    .filter(bookings::start_date.le(booking.end_date))
                    .filter(bookings::end_date.ge(booking.start_date))
                    .count()
                    .get_result(conn)?;
                if overlapping > 0 {
                    return Err(RepositoryError::conflict_with_context(
                        "An overlapping booking already exists for this listing",
                        ErrorContext::new("insert_booking_guarded")
                            .with_entity("booking")
                            .with_details(format!("listing_id={}", booking.listing_id)),
                    ));
                }

                let row = NewBookingRow {
                    booking_id: Uuid::new_v4(),
                    listing_id: booking.listing_id.value(),
                    tutor_id: booking.tutor_id.value(),
                    start_date: booking.start_date,
                    end_date: booking.end_date,
                    total_price: booking.total_price,
                    status: booking.status.as_str().to_string(),
                    notes: booking.notes.clone(),
                    created_at: booking.created_at,
                };
                // The exclusion constraint remains as backstop; its violation
                // also surfaces as a conflict.
                let stored: BookingRow = diesel::insert_into(bookings::table)
                    .values(&row)
                    .get_result(conn)?;
                row_to_booking(stored)
            })
        })
        .await
    }

    async fn get_booking(&self, booking_id: BookingId) -> RepositoryResult<Booking> {
        self.with_conn(move |conn| {
            let row: BookingRow = bookings::table
                .find(booking_id.value())
                .first(conn)
                .optional()?
                .ok_or_else(|| {
                    RepositoryError::not_found(format!("Booking {} not found", booking_id))
                })?;
            row_to_booking(row)
        })
        .await
    }

    async fn update_booking_status(
        &self,
        booking_id: BookingId,
        status: BookingStatus,
        notes: Option<String>,
    ) -> RepositoryResult<Booking> {
        self.with_conn(move |conn| {
            let row: Option<BookingRow> = match notes.clone() {
                Some(notes) => diesel::update(bookings::table.find(booking_id.value()))
                    .set((
                        bookings::status.eq(status.as_str()),
                        bookings::notes.eq(notes),
                    ))
                    .get_result(conn)
                    .optional()?,
                None => diesel::update(bookings::table.find(booking_id.value()))
                    .set(bookings::status.eq(status.as_str()))
                    .get_result(conn)
                    .optional()?,
            };
            let row = row.ok_or_else(|| {
                RepositoryError::not_found(format!("Booking {} not found", booking_id))
            })?;
            row_to_booking(row)
        })
        .await
    }

    async fn delete_booking(&self, booking_id: BookingId) -> RepositoryResult<()> {
        self.with_conn(move |conn| {
            let deleted =
                diesel::delete(bookings::table.find(booking_id.value())).execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::not_found(format!(
                    "Booking {} not found",
                    booking_id
                )));
            }
            Ok(())
        })
        .await
    }

    async fn list_bookings(&self, query: &BookingListQuery) -> RepositoryResult<BookingPage> {
        let query = query.clone();
        if query.tutor_id.is_none() && query.host_id.is_none() {
            return Ok(BookingPage {
                bookings: Vec::new(),
                total: 0,
            });
        }

        self.with_conn(move |conn| {
            let scope = |q: bookings::BoxedQuery<'static, diesel::pg::Pg>| {
                let q = match (query.tutor_id, query.host_id) {
                    (Some(t), Some(h)) => {
                        let host_listings = listings::table
                            .filter(listings::host_id.eq(h.value()))
                            .select(listings::listing_id);
                        q.filter(
                            bookings::tutor_id
                                .eq(t.value())
                                .or(bookings::listing_id.eq_any(host_listings)),
                        )
                    }
                    (Some(t), None) => q.filter(bookings::tutor_id.eq(t.value())),
                    (None, Some(h)) => {
                        let host_listings = listings::table
                            .filter(listings::host_id.eq(h.value()))
                            .select(listings::listing_id);
                        q.filter(bookings::listing_id.eq_any(host_listings))
                    }
                    (None, None) => unreachable!("handled above"),
                };
                match query.status {
                    Some(status) => q.filter(bookings::status.eq(status.as_str())),
                    None => q,
                }
            };

            let total = scope(bookings::table.select(bookings::booking_id).into_boxed())
                .load::<Uuid>(conn)?
                .len() as u64;

            let rows: Vec<BookingRow> = scope(bookings::table.into_boxed())
                .order((bookings::created_at.desc(), bookings::booking_id.desc()))
                .offset(query.offset.max(0))
                .limit(query.limit.max(0))
                .load(conn)?;

            let bookings = rows
                .into_iter()
                .map(row_to_booking)
                .collect::<RepositoryResult<Vec<_>>>()?;
            Ok(BookingPage { bookings, total })
        })
        .await
    }

    async fn count_bookings_for_listing(
        &self,
        listing_id: ListingId,
        statuses: &[BookingStatus],
    ) -> RepositoryResult<u64> {
        let statuses = status_strings(statuses);
        self.with_conn(move |conn| {
            let count: i64 = bookings::table
                .filter(bookings::listing_id.eq(listing_id.value()))
                .filter(bookings::status.eq_any(statuses.clone()))
                .count()
                .get_result(conn)?;
            Ok(count as u64)
        })
        .await
    }
}

// ==================== Listing Repository ====================

#[async_trait]
impl ListingRepository for PostgresRepository {
    async fn get_listing(&self, listing_id: ListingId) -> RepositoryResult<Listing> {
        self.with_conn(move |conn| {
            let row: ListingRow = listings::table
                .find(listing_id.value())
                .first(conn)
                .optional()?
                .ok_or_else(|| {
                    RepositoryError::not_found(format!("Listing {} not found", listing_id))
                })?;
            Ok(row_to_listing(row))
        })
        .await
    }

    async fn insert_listing(&self, listing: NewListing) -> RepositoryResult<Listing> {
        self.with_conn(move |conn| {
            let row = NewListingRow {
                listing_id: Uuid::new_v4(),
                host_id: listing.host_id.value(),
                title: listing.title.clone(),
                description: listing.description.clone(),
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
            let stored: ListingRow = diesel::insert_into(listings::table)
                .values(&row)
                .get_result(conn)?;
            Ok(row_to_listing(stored))
        })
        .await
    }

    async fn set_listing_active(
        &self,
        listing_id: ListingId,
        is_active: bool,
    ) -> RepositoryResult<Listing> {
        self.with_conn(move |conn| {
            let row: ListingRow = diesel::update(listings::table.find(listing_id.value()))
                .set(listings::is_active.eq(is_active))
                .get_result(conn)
                .optional()?
                .ok_or_else(|| {
                    RepositoryError::not_found(format!("Listing {} not found", listing_id))
                })?;
            Ok(row_to_listing(row))
        })
        .await
    }

    async fn delete_listing(&self, listing_id: ListingId) -> RepositoryResult<()> {
        self.with_conn(move |conn| {
            let deleted =
                diesel::delete(listings::table.find(listing_id.value())).execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::not_found(format!(
                    "Listing {} not found",
                    listing_id
                )));
            }
            Ok(())
        })
        .await
    }

    async fn find_listings(&self, filter: &ListingFilter) -> RepositoryResult<Vec<Listing>> {
        let filter = filter.clone();
        self.with_conn(move |conn| {
            let mut q = listings::table
                .filter(listings::is_active.eq(true))
                .into_boxed();

            if filter.city.is_some() || filter.state.is_some() {
                let mut hosts_q = hosts::table.into_boxed();
                if let Some(ref city) = filter.city {
                    hosts_q = hosts_q
                        .filter(hosts::city.assume_not_null().ilike(format!("%{}%", city)));
                }
                if let Some(ref state) = filter.state {
                    hosts_q = hosts_q
                        .filter(hosts::state.assume_not_null().ilike(format!("%{}%", state)));
                }
                let matching_hosts: Vec<Uuid> = hosts_q.select(hosts::host_id).load(conn)?;
                q = q.filter(listings::host_id.eq_any(matching_hosts));
            }

            if let Some(p) = filter.min_price {
                q = q.filter(listings::price_per_day.ge(p));
            }
            if let Some(p) = filter.max_price {
                q = q.filter(listings::price_per_day.le(p));
            }
            if let Some(v) = filter.accepts_dogs {
                q = q.filter(listings::accepts_dogs.eq(v));
            }
            if let Some(v) = filter.accepts_cats {
                q = q.filter(listings::accepts_cats.eq(v));
            }
            match filter.pet_size {
                Some(PetSize::Small) => q = q.filter(listings::accepts_small_pets.eq(true)),
                Some(PetSize::Medium) => q = q.filter(listings::accepts_medium_pets.eq(true)),
                Some(PetSize::Large) => q = q.filter(listings::accepts_large_pets.eq(true)),
                None => {}
            }
            if let Some(v) = filter.has_yard {
                q = q.filter(listings::has_yard.eq(v));
            }
            if let Some(v) = filter.allows_walks {
                q = q.filter(listings::allows_walks.eq(v));
            }
            if let Some(v) = filter.provides_medication {
                q = q.filter(listings::provides_medication.eq(v));
            }

            let rows: Vec<ListingRow> = q.load(conn)?;
            Ok(rows.into_iter().map(row_to_listing).collect())
        })
        .await
    }

    async fn listings_by_host(&self, host_id: HostId) -> RepositoryResult<Vec<Listing>> {
        self.with_conn(move |conn| {
            let rows: Vec<ListingRow> = listings::table
                .filter(listings::host_id.eq(host_id.value()))
                .order(listings::created_at.desc())
                .load(conn)?;
            Ok(rows.into_iter().map(row_to_listing).collect())
        })
        .await
    }

    async fn review_stats(&self, listing_id: ListingId) -> RepositoryResult<ReviewStats> {
        self.with_conn(move |conn| {
            let ratings: Vec<i32> = reviews::table
                .filter(reviews::listing_id.eq(listing_id.value()))
                .select(reviews::rating)
                .load(conn)?;
            if ratings.is_empty() {
                return Ok(ReviewStats::default());
            }
            let sum: i64 = ratings.iter().map(|r| *r as i64).sum();
            Ok(ReviewStats {
                average_rating: sum as f64 / ratings.len() as f64,
                review_count: ratings.len() as u64,
            })
        })
        .await
    }

    async fn blocked_host_ids(&self, range: &DateRange) -> RepositoryResult<Vec<HostId>> {
        let start = range.start.date_naive();
        let end = range.end.date_naive();
        self.with_conn(move |conn| {
            let ids: Vec<Uuid> = host_blocked_dates::table
                .filter(host_blocked_dates::blocked_on.ge(start))
                .filter(host_blocked_dates::blocked_on.le(end))
                .select(host_blocked_dates::host_id)
                .distinct()
                .load(conn)?;
            Ok(ids.into_iter().map(HostId).collect())
        })
        .await
    }
}

// ==================== Profile Repository ====================

#[async_trait]
impl ProfileRepository for PostgresRepository {
    async fn tutor_by_user(&self, user_id: UserId) -> RepositoryResult<Option<TutorProfile>> {
        self.with_conn(move |conn| {
            let row: Option<TutorRow> = tutors::table
                .filter(tutors::user_id.eq(user_id.value()))
                .first(conn)
                .optional()?;
            Ok(row.map(row_to_tutor))
        })
        .await
    }

    async fn host_by_user(&self, user_id: UserId) -> RepositoryResult<Option<HostProfile>> {
        self.with_conn(move |conn| {
            let row: Option<HostRow> = hosts::table
                .filter(hosts::user_id.eq(user_id.value()))
                .first(conn)
                .optional()?;
            Ok(row.map(row_to_host))
        })
        .await
    }

    async fn get_tutor(&self, tutor_id: TutorId) -> RepositoryResult<TutorProfile> {
        self.with_conn(move |conn| {
            let row: TutorRow = tutors::table
                .find(tutor_id.value())
                .first(conn)
                .optional()?
                .ok_or_else(|| {
                    RepositoryError::not_found(format!("Tutor {} not found", tutor_id))
                })?;
            Ok(row_to_tutor(row))
        })
        .await
    }

    async fn get_host(&self, host_id: HostId) -> RepositoryResult<HostProfile> {
        self.with_conn(move |conn| {
            let row: HostRow = hosts::table
                .find(host_id.value())
                .first(conn)
                .optional()?
                .ok_or_else(|| RepositoryError::not_found(format!("Host {} not found", host_id)))?;
            Ok(row_to_host(row))
        })
        .await
    }
}
