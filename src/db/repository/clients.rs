//! Client persistence operations.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{Client, ClientId, NewClient};

#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// Insert a client. Fails with a conflict error when the email is
    /// already registered.
    async fn store_client(&self, new: NewClient) -> RepositoryResult<Client>;

    /// Fetch one client; not-found error when the id is unknown.
    async fn fetch_client(&self, id: ClientId) -> RepositoryResult<Client>;

    /// All clients, ordered by id.
    async fn fetch_clients(&self) -> RepositoryResult<Vec<Client>>;

    /// Replace the mutable fields of a client, preserving `created_at` and
    /// bumping `updated_at`. Email uniqueness is re-checked.
    async fn update_client(&self, id: ClientId, fields: NewClient) -> RepositoryResult<Client>;

    /// Remove a client. Fails with a conflict error while reservations
    /// still reference it.
    async fn delete_client(&self, id: ClientId) -> RepositoryResult<()>;
}
