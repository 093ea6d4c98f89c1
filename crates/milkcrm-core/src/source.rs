//! Remote-source contracts consumed by the managers.
//!
//! Calls are assumed to be already authorised; see [`crate::rest::Session`].
//! Futures are not required to be `Send`: the frontend drives them on a
//! single-threaded executor.

#![allow(async_fn_in_trait)]

use crate::dashboard::{DashboardData, DashboardQuery};
use crate::entity::EntityKind;
use crate::error::RemoteError;
use crate::models::EntityId;

/// CRUD access to one entity collection.
pub trait RemoteSource<K: EntityKind> {
    async fn list(&self) -> Result<Vec<K::Record>, RemoteError>;

    async fn create(&self, payload: &K::Payload) -> Result<K::Record, RemoteError>;

    async fn update(&self, id: &EntityId, payload: &K::Payload) -> Result<K::Record, RemoteError>;

    async fn delete(&self, id: &EntityId) -> Result<(), RemoteError>;
}

/// Delivery metrics for the dashboard.
pub trait DashboardSource {
    async fn dashboard(&self, query: &DashboardQuery) -> Result<DashboardData, RemoteError>;
}

/// Operations on the signed-in admin's own account.
pub trait AccountSource {
    async fn change_password(&self, current: &str, new: &str) -> Result<(), RemoteError>;
}
