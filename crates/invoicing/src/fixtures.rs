//! Canonical sample documents.
//!
//! Used by the demo seed and by tests across the workspace.

use chrono::{NaiveDate, TimeZone, Utc};

use invoicehub_core::InvoiceId;

use crate::invoice::{AddressFields, Invoice, InvoiceFields, InvoiceStatus, LineItemFields};

/// Id of the sample invoice written by the demo seed.
pub const SAMPLE_INVOICE_ID: &str = "RT3080";

fn address(street: &str, city: &str, post_code: &str, country: &str) -> AddressFields {
    AddressFields {
        street: Some(street.to_string()),
        city: Some(city.to_string()),
        post_code: Some(post_code.to_string()),
        country: Some(country.to_string()),
    }
}

/// A body that satisfies every pending rule.
pub fn complete_fields() -> InvoiceFields {
    InvoiceFields {
        payment_due: NaiveDate::from_ymd_opt(2021, 8, 19),
        description: Some("Re-branding".to_string()),
        payment_terms: Some(1),
        client_name: Some("John Lock".to_string()),
        client_email: Some("johnlock@mail.com".to_string()),
        total: Some(1800.90),
        sender_address: address("Sonnenallee 23", "Berlin", "12059", "Germany"),
        client_address: address("106 Kendell Street", "Sharrington", "NR24 5WQ", "United Kingdom"),
        items: vec![LineItemFields {
            name: Some("Brand Guidelines".to_string()),
            quantity: Some(1.0),
            price: Some(1800.90),
            total: Some(1800.90),
        }],
    }
}

/// The paid sample invoice `RT3080`.
pub fn sample_invoice() -> Invoice {
    let created_at = Utc
        .with_ymd_and_hms(2021, 8, 18, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now);
    Invoice::restore(
        InvoiceId::new(SAMPLE_INVOICE_ID),
        created_at,
        InvoiceStatus::Paid,
        complete_fields(),
    )
}
