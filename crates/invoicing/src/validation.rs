//! Status-dependent completeness rules.
//!
//! Validation is a total function from the raw document to a typed variant:
//! a `pending` invoice comes out as a [`CompleteInvoice`] whose fields are no
//! longer optional, or as the list of every field that stopped it.

use chrono::NaiveDate;

use invoicehub_core::{DomainError, DomainResult, ValueObject};

use crate::invoice::{AddressFields, InvoiceFields, InvoiceStatus, LineItemFields};

/// Complete postal address.
#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub post_code: String,
    pub country: String,
}

impl ValueObject for Address {}

/// Line item that satisfies the pending rules.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub name: String,
    pub quantity: f64,
    pub price: f64,
    pub total: f64,
}

impl ValueObject for LineItem {}

/// An invoice body with every field the `pending` status mandates.
///
/// `items` is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct CompleteInvoice {
    pub payment_due: NaiveDate,
    pub description: String,
    pub payment_terms: i64,
    pub client_name: String,
    pub client_email: String,
    pub total: f64,
    pub sender_address: Address,
    pub client_address: Address,
    pub items: Vec<LineItem>,
}

/// Outcome of validating an invoice body against its status.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidatedInvoice {
    /// Drafts carry whatever the client sent.
    Draft(InvoiceFields),
    Pending(CompleteInvoice),
    /// Paid invoices are never re-validated.
    Paid(InvoiceFields),
}

impl ValidatedInvoice {
    pub fn status(&self) -> InvoiceStatus {
        match self {
            ValidatedInvoice::Draft(_) => InvoiceStatus::Draft,
            ValidatedInvoice::Pending(_) => InvoiceStatus::Pending,
            ValidatedInvoice::Paid(_) => InvoiceStatus::Paid,
        }
    }

    /// Back to the stored document shape.
    pub fn into_fields(self) -> InvoiceFields {
        match self {
            ValidatedInvoice::Draft(fields) | ValidatedInvoice::Paid(fields) => fields,
            ValidatedInvoice::Pending(complete) => complete.into(),
        }
    }
}

impl From<Address> for AddressFields {
    fn from(value: Address) -> Self {
        Self {
            street: Some(value.street),
            city: Some(value.city),
            post_code: Some(value.post_code),
            country: Some(value.country),
        }
    }
}

impl From<LineItem> for LineItemFields {
    fn from(value: LineItem) -> Self {
        Self {
            name: Some(value.name),
            quantity: Some(value.quantity),
            price: Some(value.price),
            total: Some(value.total),
        }
    }
}

impl From<CompleteInvoice> for InvoiceFields {
    fn from(value: CompleteInvoice) -> Self {
        Self {
            payment_due: Some(value.payment_due),
            description: Some(value.description),
            payment_terms: Some(value.payment_terms),
            client_name: Some(value.client_name),
            client_email: Some(value.client_email),
            total: Some(value.total),
            sender_address: value.sender_address.into(),
            client_address: value.client_address.into(),
            items: value.items.into_iter().map(Into::into).collect(),
        }
    }
}

/// Check `fields` against the rules of `status`.
///
/// - `draft`: always valid.
/// - `pending`: every field must be present and non-blank, both addresses
///   complete, and `items` non-empty with name, `quantity > 0`, `price > 0`
///   and `total >= 0` on each item. Offending fields are reported as JSON
///   paths (`senderAddress.city`, `items[1].price`) in document order.
/// - `paid`: not a target status; rejected.
pub fn validate_for_status(status: InvoiceStatus, fields: &InvoiceFields) -> DomainResult<ValidatedInvoice> {
    match status {
        InvoiceStatus::Draft => Ok(ValidatedInvoice::Draft(fields.clone())),
        InvoiceStatus::Pending => complete(fields).map(ValidatedInvoice::Pending),
        InvoiceStatus::Paid => Err(DomainError::invalid_status(
            "invoices are validated as draft or pending only",
        )),
    }
}

/// Collects offending field paths while the checks run.
#[derive(Default)]
struct Missing(Vec<String>);

impl Missing {
    fn text(&mut self, path: impl Into<String>, value: &Option<String>) -> Option<String> {
        match value {
            Some(v) if !v.trim().is_empty() => Some(v.clone()),
            _ => {
                self.0.push(path.into());
                None
            }
        }
    }

    fn present<T: Copy>(&mut self, path: impl Into<String>, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.0.push(path.into());
        }
        value
    }

    fn number(&mut self, path: impl Into<String>, value: Option<f64>, ok: impl Fn(f64) -> bool) -> Option<f64> {
        match value {
            Some(v) if ok(v) => Some(v),
            _ => {
                self.0.push(path.into());
                None
            }
        }
    }

    fn address(&mut self, prefix: &str, fields: &AddressFields) -> Option<Address> {
        let street = self.text(format!("{prefix}.street"), &fields.street);
        let city = self.text(format!("{prefix}.city"), &fields.city);
        let post_code = self.text(format!("{prefix}.postCode"), &fields.post_code);
        let country = self.text(format!("{prefix}.country"), &fields.country);
        Some(Address {
            street: street?,
            city: city?,
            post_code: post_code?,
            country: country?,
        })
    }

    fn item(&mut self, index: usize, fields: &LineItemFields) -> Option<LineItem> {
        let name = self.text(format!("items[{index}].name"), &fields.name);
        let quantity = self.number(format!("items[{index}].quantity"), fields.quantity, |v| v > 0.0);
        let price = self.number(format!("items[{index}].price"), fields.price, |v| v > 0.0);
        let total = self.number(format!("items[{index}].total"), fields.total, |v| v >= 0.0);
        Some(LineItem {
            name: name?,
            quantity: quantity?,
            price: price?,
            total: total?,
        })
    }

    fn items(&mut self, items: &[LineItemFields]) -> Option<Vec<LineItem>> {
        if items.is_empty() {
            self.0.push("items".to_string());
            return None;
        }
        // Check every item so all offending paths are reported, not just the first.
        let checked: Vec<Option<LineItem>> = items
            .iter()
            .enumerate()
            .map(|(index, item)| self.item(index, item))
            .collect();
        checked.into_iter().collect()
    }
}

fn complete(fields: &InvoiceFields) -> DomainResult<CompleteInvoice> {
    let mut missing = Missing::default();

    let payment_due = missing.present("paymentDue", fields.payment_due);
    let description = missing.text("description", &fields.description);
    let payment_terms = missing.present("paymentTerms", fields.payment_terms);
    let client_name = missing.text("clientName", &fields.client_name);
    let client_email = missing.text("clientEmail", &fields.client_email);
    let total = missing.present("total", fields.total);
    let sender_address = missing.address("senderAddress", &fields.sender_address);
    let client_address = missing.address("clientAddress", &fields.client_address);
    let items = missing.items(&fields.items);

    match (
        payment_due,
        description,
        payment_terms,
        client_name,
        client_email,
        total,
        sender_address,
        client_address,
        items,
    ) {
        (
            Some(payment_due),
            Some(description),
            Some(payment_terms),
            Some(client_name),
            Some(client_email),
            Some(total),
            Some(sender_address),
            Some(client_address),
            Some(items),
        ) => Ok(CompleteInvoice {
            payment_due,
            description,
            payment_terms,
            client_name,
            client_email,
            total,
            sender_address,
            client_address,
            items,
        }),
        _ => Err(DomainError::MissingFields(missing.0)),
    }
}
