use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use invoicehub_core::InvoiceId;
use invoicehub_invoicing::{CreateInvoice, InvoicePatch};

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

/// Path ids go through the same parsing as ids in a create body; a blank id
/// can never match a stored invoice.
fn invoice_id(raw: &str) -> Result<InvoiceId, axum::response::Response> {
    raw.parse().map_err(|_| {
        errors::json_error(StatusCode::NOT_FOUND, "not_found", format!("Invoice {raw} not found"))
    })
}

pub async fn create_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<CreateInvoice>,
) -> axum::response::Response {
    tracing::debug!(username = %principal.username(), "create invoice");
    match services.create_invoice(body).await {
        Ok(invoice) => (StatusCode::CREATED, Json(invoice)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_invoices(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.list_invoices().await {
        Ok(invoices) => Json(invoices).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match invoice_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.get_invoice(&id).await {
        Ok(invoice) => Json(invoice).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<InvoicePatch>,
) -> axum::response::Response {
    let id = match invoice_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.update_invoice(&id, body).await {
        Ok(invoice) => Json(dto::InvoiceEnvelope::new("Invoice updated successfully", invoice)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn mark_invoice_paid(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match invoice_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.mark_invoice_paid(&id).await {
        Ok(invoice) => Json(dto::InvoiceEnvelope::new("Invoice marked as paid", invoice)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match invoice_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.delete_invoice(&id).await {
        Ok(()) => format!("Invoice {id} was deleted.").into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
