//! # PawNest Booking Backend
//!
//! Booking availability and conflict-resolution core of a two-sided
//! pet-sitting marketplace (hosts publish listings, tutors book stays),
//! exposed as a REST API via axum.
//!
//! ## Features
//!
//! - **Availability Engine**: inclusive-bounds interval conflict detection
//!   over confirmed/ongoing bookings, in single and bulk form
//! - **Booking Lifecycle**: creation, host confirmation, cancellation, and
//!   deletion with role-based permission checks
//! - **Search Filter**: attribute filtering, date-availability exclusion,
//!   rating aggregation, distance ranking, and offset pagination
//! - **Storage backends**: an in-memory repository for tests and local
//!   development, and an optional Diesel/Postgres backend with a storage-level
//!   exclusion constraint backing the no-double-booking invariant
//!
//! ## Architecture
//!
//! - [`models`]: domain types (ids, bookings, listings, date ranges, clock)
//! - [`db`]: repository traits, implementations, and the factory
//! - [`services`]: availability engine, booking lifecycle, search filter
//! - [`http`]: axum-based HTTP server and request handlers

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
