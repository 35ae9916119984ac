//! Invoicing domain module.
//!
//! This crate contains the invoice document and the rules that decide which
//! fields each status requires, implemented purely as deterministic domain
//! logic (no IO, no HTTP, no storage).

pub mod fixtures;
pub mod invoice;
pub mod validation;

pub use invoice::{
    AddressFields, CreateInvoice, Invoice, InvoiceFields, InvoicePatch, InvoiceStatus, LineItemFields,
};
pub use validation::{validate_for_status, Address, CompleteInvoice, LineItem, ValidatedInvoice};
