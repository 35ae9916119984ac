//! Postgres-backed stores.
//!
//! Invoices are kept as JSONB documents next to their id and creation time;
//! users as plain columns. Uniqueness of invoice ids and usernames is enforced
//! by primary keys.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `Duplicate` |
//! | Database (other) | any other | `Backend` |
//! | PoolClosed / other | N/A | `Backend` |

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::instrument;

use invoicehub_auth::User;
use invoicehub_core::{Entity, InvoiceId, Username};
use invoicehub_invoicing::Invoice;

use super::{InvoiceStore, StoreError, StoreResult, UserStore};

/// Open a connection pool.
pub async fn connect(database_url: &str) -> StoreResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .map_err(|e| map_sqlx_error("connect", e))
}

/// Create the tables if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> StoreResult<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS invoices (
            id          TEXT PRIMARY KEY,
            created_at  TIMESTAMPTZ NOT NULL,
            document    JSONB NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| map_sqlx_error("ensure_schema", e))?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            username       TEXT PRIMARY KEY,
            password_hash  TEXT NOT NULL,
            email          TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| map_sqlx_error("ensure_schema", e))?;

    Ok(())
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => StoreError::Duplicate(msg),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::PoolClosed => StoreError::Backend(format!("connection pool closed in {operation}")),
        other => StoreError::Backend(format!("sqlx error in {operation}: {other}")),
    }
}

fn decode_invoice(row: &sqlx::postgres::PgRow) -> StoreResult<Invoice> {
    row.try_get::<Json<Invoice>, _>("document")
        .map(|doc| doc.0)
        .map_err(|e| StoreError::Decode(e.to_string()))
}

fn decode_user(row: &sqlx::postgres::PgRow) -> StoreResult<User> {
    let username: String = row.try_get("username").map_err(|e| StoreError::Decode(e.to_string()))?;
    let password_hash: String = row
        .try_get("password_hash")
        .map_err(|e| StoreError::Decode(e.to_string()))?;
    let email: String = row.try_get("email").map_err(|e| StoreError::Decode(e.to_string()))?;
    Ok(User {
        username: Username::new(username),
        password_hash,
        email,
    })
}

/// Postgres-backed invoice store.
#[derive(Debug, Clone)]
pub struct PostgresInvoiceStore {
    pool: Arc<PgPool>,
}

impl PostgresInvoiceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Arc::new(pool) }
    }
}

#[async_trait]
impl InvoiceStore for PostgresInvoiceStore {
    #[instrument(skip(self, invoice), fields(invoice_id = %invoice.id()), err)]
    async fn insert(&self, invoice: Invoice) -> StoreResult<Invoice> {
        sqlx::query("INSERT INTO invoices (id, created_at, document) VALUES ($1, $2, $3)")
            .bind(invoice.id().as_str())
            .bind(invoice.created_at())
            .bind(Json(&invoice))
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_invoice", e))?;
        Ok(invoice)
    }

    #[instrument(skip(self), fields(invoice_id = %id), err)]
    async fn get(&self, id: &InvoiceId) -> StoreResult<Option<Invoice>> {
        let row = sqlx::query("SELECT document FROM invoices WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_invoice", e))?;
        row.as_ref().map(decode_invoice).transpose()
    }

    #[instrument(skip(self), err)]
    async fn list(&self) -> StoreResult<Vec<Invoice>> {
        let rows = sqlx::query("SELECT document FROM invoices ORDER BY created_at ASC, id ASC")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_invoices", e))?;
        rows.iter().map(decode_invoice).collect()
    }

    #[instrument(skip(self, invoice), fields(invoice_id = %invoice.id()), err)]
    async fn replace(&self, invoice: Invoice) -> StoreResult<Invoice> {
        let result = sqlx::query("UPDATE invoices SET document = $2 WHERE id = $1")
            .bind(invoice.id().as_str())
            .bind(Json(&invoice))
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("replace_invoice", e))?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(invoice.id().to_string()));
        }
        Ok(invoice)
    }

    #[instrument(skip(self), fields(invoice_id = %id), err)]
    async fn delete(&self, id: &InvoiceId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id.as_str())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_invoice", e))?;
        Ok(result.rows_affected() > 0)
    }
}

/// Postgres-backed credential store.
#[derive(Debug, Clone)]
pub struct PostgresUserStore {
    pool: Arc<PgPool>,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Arc::new(pool) }
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    #[instrument(skip(self, user), fields(username = %user.username), err)]
    async fn insert(&self, user: User) -> StoreResult<User> {
        sqlx::query("INSERT INTO users (username, password_hash, email) VALUES ($1, $2, $3)")
            .bind(user.username.as_str())
            .bind(&user.password_hash)
            .bind(&user.email)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_user", e))?;
        Ok(user)
    }

    #[instrument(skip(self), fields(username = %username), err)]
    async fn get(&self, username: &Username) -> StoreResult<Option<User>> {
        let row = sqlx::query("SELECT username, password_hash, email FROM users WHERE username = $1")
            .bind(username.as_str())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_user", e))?;
        row.as_ref().map(decode_user).transpose()
    }

    #[instrument(skip(self, user), fields(username = %current), err)]
    async fn replace(&self, current: &Username, user: User) -> StoreResult<User> {
        let result = sqlx::query(
            "UPDATE users SET username = $2, password_hash = $3, email = $4 WHERE username = $1",
        )
        .bind(current.as_str())
        .bind(user.username.as_str())
        .bind(&user.password_hash)
        .bind(&user.email)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("replace_user", e))?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(current.to_string()));
        }
        Ok(user)
    }

    #[instrument(skip(self), fields(username = %username), err)]
    async fn delete(&self, username: &Username) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE username = $1")
            .bind(username.as_str())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_user", e))?;
        Ok(result.rows_affected() > 0)
    }
}
