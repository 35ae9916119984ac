//! Document stores for invoices and user accounts.
//!
//! Handlers receive these as `Arc<dyn ...>` handles; every operation touches
//! exactly one record.

pub mod in_memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use invoicehub_auth::User;
use invoicehub_core::{InvoiceId, Username};
use invoicehub_invoicing::Invoice;

pub use in_memory::{InMemoryInvoiceStore, InMemoryStore, InMemoryUserStore};
pub use postgres::{connect, ensure_schema, PostgresInvoiceStore, PostgresUserStore};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A record with the same key already exists.
    #[error("duplicate key: {0}")]
    Duplicate(String),

    /// The record to replace does not exist.
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("store lock poisoned")]
    Poisoned,

    /// A stored document could not be decoded.
    #[error("failed to decode stored record: {0}")]
    Decode(String),

    /// Any other backend failure (connection, query, pool).
    #[error("{0}")]
    Backend(String),
}

/// Invoice persistence.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Insert a new invoice; `Duplicate` if the id is taken.
    async fn insert(&self, invoice: Invoice) -> StoreResult<Invoice>;

    async fn get(&self, id: &InvoiceId) -> StoreResult<Option<Invoice>>;

    /// All invoices, ordered by `createdAt` then id.
    async fn list(&self) -> StoreResult<Vec<Invoice>>;

    /// Overwrite an existing invoice; `NotFound` if it is absent.
    async fn replace(&self, invoice: Invoice) -> StoreResult<Invoice>;

    /// Remove an invoice. Returns whether it existed.
    async fn delete(&self, id: &InvoiceId) -> StoreResult<bool>;
}

/// Credential persistence.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new account; `Duplicate` if the username is taken.
    async fn insert(&self, user: User) -> StoreResult<User>;

    async fn get(&self, username: &Username) -> StoreResult<Option<User>>;

    /// Overwrite the account stored under `current`, which may rename it.
    ///
    /// `NotFound` if `current` is absent, `Duplicate` if the new username
    /// belongs to another account.
    async fn replace(&self, current: &Username, user: User) -> StoreResult<User>;

    /// Remove an account. Returns whether it existed.
    async fn delete(&self, username: &Username) -> StoreResult<bool>;
}
