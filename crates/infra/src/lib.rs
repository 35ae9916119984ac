//! Infrastructure layer: invoice and credential persistence.

pub mod store;

pub use store::{
    InMemoryInvoiceStore, InMemoryStore, InMemoryUserStore, InvoiceStore, PostgresInvoiceStore,
    PostgresUserStore, StoreError, StoreResult, UserStore,
};
