//! Application services: the operations behind every route.
//!
//! Handlers stay thin; each method here validates, touches exactly one stored
//! record, and logs the state change.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use invoicehub_auth::{
    hash_password, validate_registration, validate_update, verify_password, Hs256Jwt, PasswordError,
    RegisterUser, TokenError, UpdateUser, User, UserProfile,
};
use invoicehub_core::{DomainError, InvoiceId, Username};
use invoicehub_infra::{
    InMemoryInvoiceStore, InMemoryUserStore, InvoiceStore, PostgresInvoiceStore, PostgresUserStore,
    StoreError, UserStore,
};
use invoicehub_invoicing::{fixtures, CreateInvoice, Invoice, InvoicePatch};

/// Account written by the demo seed.
pub const DEMO_USERNAME: &str = "testuser";
pub const DEMO_PASSWORD: &str = "password123";
pub const DEMO_EMAIL: &str = "testuser@example.com";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Invoice {0} not found")]
    InvoiceNotFound(InvoiceId),

    #[error("User {0} not found")]
    UserNotFound(Username),

    #[error("{0} already exists")]
    UsernameTaken(Username),

    #[error("Invoice {0} already exists")]
    DuplicateInvoice(InvoiceId),

    /// Unknown user or wrong password; the two are deliberately indistinguishable.
    #[error("invalid username or password")]
    LoginFailed,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("background task failed: {0}")]
    Task(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Successful login: the account and a bearer token for it.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: UserProfile,
    pub token: String,
}

#[derive(Clone)]
pub struct AppServices {
    invoices: Arc<dyn InvoiceStore>,
    users: Arc<dyn UserStore>,
    jwt: Hs256Jwt,
}

impl AppServices {
    pub fn new(invoices: Arc<dyn InvoiceStore>, users: Arc<dyn UserStore>, jwt: Hs256Jwt) -> Self {
        Self { invoices, users, jwt }
    }

    /// Services backed by process-local stores.
    pub fn in_memory(jwt: Hs256Jwt) -> Self {
        Self::new(
            Arc::new(InMemoryInvoiceStore::new()),
            Arc::new(InMemoryUserStore::new()),
            jwt,
        )
    }

    /// Services backed by Postgres; creates the tables if needed.
    pub async fn postgres(database_url: &str, jwt: Hs256Jwt) -> ServiceResult<Self> {
        let pool = invoicehub_infra::store::connect(database_url).await?;
        invoicehub_infra::store::ensure_schema(&pool).await?;
        Ok(Self::new(
            Arc::new(PostgresInvoiceStore::new(pool.clone())),
            Arc::new(PostgresUserStore::new(pool)),
            jwt,
        ))
    }

    pub fn jwt(&self) -> &Hs256Jwt {
        &self.jwt
    }

    // -------------------------
    // Invoices
    // -------------------------

    pub async fn create_invoice(&self, cmd: CreateInvoice) -> ServiceResult<Invoice> {
        let invoice = Invoice::create(cmd, Utc::now())?;
        let id = invoice.id_typed().clone();

        let invoice = self.invoices.insert(invoice).await.map_err(|e| match e {
            StoreError::Duplicate(_) => ServiceError::DuplicateInvoice(id.clone()),
            other => other.into(),
        })?;

        tracing::info!(invoice_id = %id, status = %invoice.status(), "invoice created");
        Ok(invoice)
    }

    pub async fn get_invoice(&self, id: &InvoiceId) -> ServiceResult<Invoice> {
        self.invoices
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::InvoiceNotFound(id.clone()))
    }

    pub async fn list_invoices(&self) -> ServiceResult<Vec<Invoice>> {
        Ok(self.invoices.list().await?)
    }

    pub async fn update_invoice(&self, id: &InvoiceId, patch: InvoicePatch) -> ServiceResult<Invoice> {
        let mut invoice = self.get_invoice(id).await?;
        invoice.apply_update(patch)?;
        let invoice = self.replace_invoice(invoice).await?;

        tracing::info!(invoice_id = %id, status = %invoice.status(), "invoice updated");
        Ok(invoice)
    }

    pub async fn mark_invoice_paid(&self, id: &InvoiceId) -> ServiceResult<Invoice> {
        let mut invoice = self.get_invoice(id).await?;
        invoice.mark_paid();
        let invoice = self.replace_invoice(invoice).await?;

        tracing::info!(invoice_id = %id, "invoice marked as paid");
        Ok(invoice)
    }

    pub async fn delete_invoice(&self, id: &InvoiceId) -> ServiceResult<()> {
        if !self.invoices.delete(id).await? {
            return Err(ServiceError::InvoiceNotFound(id.clone()));
        }
        tracing::info!(invoice_id = %id, "invoice deleted");
        Ok(())
    }

    async fn replace_invoice(&self, invoice: Invoice) -> ServiceResult<Invoice> {
        let id = invoice.id_typed().clone();
        self.invoices.replace(invoice).await.map_err(|e| match e {
            // Deleted between the read and the write.
            StoreError::NotFound(_) => ServiceError::InvoiceNotFound(id),
            other => other.into(),
        })
    }

    // -------------------------
    // Users
    // -------------------------

    pub async fn register(&self, cmd: RegisterUser) -> ServiceResult<UserProfile> {
        let registration = validate_registration(cmd)?;
        let username = registration.username.clone();

        if self.users.get(&username).await?.is_some() {
            return Err(ServiceError::UsernameTaken(username));
        }

        let hash = hash_blocking(registration.password.clone()).await?;
        let user = User::register(registration, hash);

        let user = self.users.insert(user).await.map_err(|e| match e {
            StoreError::Duplicate(_) => ServiceError::UsernameTaken(username.clone()),
            other => other.into(),
        })?;

        tracing::info!(username = %username, "user registered");
        Ok(user.profile())
    }

    pub async fn login(&self, username: &str, password: &str) -> ServiceResult<LoginOutcome> {
        let username: Username = username.parse().map_err(|_| ServiceError::LoginFailed)?;
        let user = self
            .users
            .get(&username)
            .await?
            .ok_or(ServiceError::LoginFailed)?;

        if !verify_blocking(password.to_string(), user.password_hash.clone()).await? {
            tracing::info!(username = %username, "login rejected");
            return Err(ServiceError::LoginFailed);
        }

        let token = self.jwt.issue(&user.username, Utc::now())?;
        tracing::info!(username = %username, "user logged in");
        Ok(LoginOutcome {
            user: user.profile(),
            token,
        })
    }

    pub async fn update_user(&self, current: &Username, cmd: UpdateUser) -> ServiceResult<UserProfile> {
        let changes = validate_update(cmd)?;
        let mut user = self
            .users
            .get(current)
            .await?
            .ok_or_else(|| ServiceError::UserNotFound(current.clone()))?;

        let password_hash = match &changes.password {
            Some(password) => Some(hash_blocking(password.clone()).await?),
            None => None,
        };
        user.apply_changes(changes, password_hash);
        let renamed_to = user.username.clone();

        let user = self.users.replace(current, user).await.map_err(|e| match e {
            StoreError::NotFound(_) => ServiceError::UserNotFound(current.clone()),
            StoreError::Duplicate(_) => ServiceError::UsernameTaken(renamed_to),
            other => other.into(),
        })?;

        tracing::info!(username = %current, new_username = %user.username, "user updated");
        Ok(user.profile())
    }

    pub async fn delete_user(&self, username: &Username) -> ServiceResult<()> {
        if !self.users.delete(username).await? {
            return Err(ServiceError::UserNotFound(username.clone()));
        }
        tracing::info!(username = %username, "user deleted");
        Ok(())
    }

    // -------------------------
    // Demo data
    // -------------------------

    /// Write the demo account and the paid sample invoice, leaving existing
    /// records untouched.
    pub async fn seed_demo_data(&self) -> ServiceResult<()> {
        let sample = fixtures::sample_invoice();
        let sample_id = sample.id_typed().clone();
        match self.invoices.insert(sample).await {
            Ok(_) => tracing::info!(invoice_id = %sample_id, "seeded sample invoice"),
            Err(StoreError::Duplicate(_)) => {}
            Err(e) => return Err(e.into()),
        }

        let demo = RegisterUser {
            username: DEMO_USERNAME.to_string(),
            password: DEMO_PASSWORD.to_string(),
            email: DEMO_EMAIL.to_string(),
        };
        match self.register(demo).await {
            Ok(_) | Err(ServiceError::UsernameTaken(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

async fn hash_blocking(password: String) -> ServiceResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ServiceError::Task(e.to_string()))?
        .map_err(ServiceError::from)
}

async fn verify_blocking(password: String, hash: String) -> ServiceResult<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| ServiceError::Task(e.to_string()))?
        .map_err(ServiceError::from)
}
