use serde::{Deserialize, Serialize};

use invoicehub_auth::UserProfile;
use invoicehub_invoicing::Invoice;

use crate::app::services::LoginOutcome;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserProfile,
    pub token: String,
}

impl From<LoginOutcome> for LoginResponse {
    fn from(outcome: LoginOutcome) -> Self {
        Self {
            user: outcome.user,
            token: outcome.token,
        }
    }
}

/// `{message, invoice}` envelope returned by invoice mutations.
#[derive(Debug, Serialize)]
pub struct InvoiceEnvelope {
    pub message: String,
    pub invoice: Invoice,
}

impl InvoiceEnvelope {
    pub fn new(message: impl Into<String>, invoice: Invoice) -> Self {
        Self {
            message: message.into(),
            invoice,
        }
    }
}
