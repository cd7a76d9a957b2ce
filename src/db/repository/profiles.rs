//! Profile repository trait.
//!
//! User accounts and authentication live in an external system; this trait
//! only resolves the host/tutor profiles the booking core needs for
//! permission checks and denormalized display fields.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{HostId, HostProfile, TutorId, TutorProfile, UserId};

/// Repository trait for host and tutor profiles.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Resolve a user's tutor profile, if they have one.
    async fn tutor_by_user(&self, user_id: UserId) -> RepositoryResult<Option<TutorProfile>>;

    /// Resolve a user's host profile, if they have one.
    async fn host_by_user(&self, user_id: UserId) -> RepositoryResult<Option<HostProfile>>;

    /// Fetch a tutor profile by id. `NotFound` if absent.
    async fn get_tutor(&self, tutor_id: TutorId) -> RepositoryResult<TutorProfile>;

    /// Fetch a host profile by id. `NotFound` if absent.
    async fn get_host(&self, host_id: HostId) -> RepositoryResult<HostProfile>;
}
