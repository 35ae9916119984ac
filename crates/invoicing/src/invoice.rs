use core::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use invoicehub_core::{DomainError, DomainResult, Entity, InvoiceId, ValueObject};

use crate::validation::{validate_for_status, ValidatedInvoice};

/// Invoice status lifecycle.
///
/// `draft` and `pending` are chosen by the client; `paid` is only reachable
/// through [`Invoice::mark_paid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Pending,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
        }
    }

    /// Whether a client may set this status directly on create/update.
    pub fn is_client_settable(&self) -> bool {
        matches!(self, InvoiceStatus::Draft | InvoiceStatus::Pending)
    }
}

impl core::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(InvoiceStatus::Draft),
            "pending" => Ok(InvoiceStatus::Pending),
            "paid" => Ok(InvoiceStatus::Paid),
            other => Err(DomainError::invalid_status(format!(
                "'{other}' is not one of: draft, pending, paid"
            ))),
        }
    }
}

/// Postal address as submitted by the client; any part may still be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl ValueObject for AddressFields {}

impl AddressFields {
    /// Overlay supplied parts of `other` onto `self`.
    pub fn merge(&mut self, other: AddressFields) {
        if other.street.is_some() {
            self.street = other.street;
        }
        if other.city.is_some() {
            self.city = other.city;
        }
        if other.post_code.is_some() {
            self.post_code = other.post_code;
        }
        if other.country.is_some() {
            self.country = other.country;
        }
    }
}

/// One billed unit as submitted by the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItemFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
}

impl ValueObject for LineItemFields {}

/// Everything on an invoice besides its identity, creation time and status.
///
/// All fields are optional here: completeness depends on the status and is
/// decided by [`validate_for_status`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_due: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_terms: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sender_address: AddressFields,
    #[serde(default, deserialize_with = "null_as_default")]
    pub client_address: AddressFields,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<LineItemFields>,
}

/// `null` decodes like an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl InvoiceFields {
    /// Overlay the supplied parts of a patch.
    ///
    /// Scalars replace, address parts replace one by one, and a supplied
    /// `items` list replaces the whole list.
    pub fn merge(&mut self, patch: InvoicePatch) {
        if patch.payment_due.is_some() {
            self.payment_due = patch.payment_due;
        }
        if patch.description.is_some() {
            self.description = patch.description;
        }
        if patch.payment_terms.is_some() {
            self.payment_terms = patch.payment_terms;
        }
        if patch.client_name.is_some() {
            self.client_name = patch.client_name;
        }
        if patch.client_email.is_some() {
            self.client_email = patch.client_email;
        }
        if patch.total.is_some() {
            self.total = patch.total;
        }
        if let Some(address) = patch.sender_address {
            self.sender_address.merge(address);
        }
        if let Some(address) = patch.client_address {
            self.client_address.merge(address);
        }
        if let Some(items) = patch.items {
            self.items = items;
        }
    }
}

/// Command: create an invoice.
///
/// `id` and `status` are optional at the wire level so that their absence is
/// reported as missing fields instead of a body-decoding failure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoice {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "timestamp::deserialize_optional")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub fields: InvoiceFields,
}

/// Command: partially update an invoice.
///
/// `id` and `createdAt` are not part of the patch; unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePatch {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub payment_due: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub payment_terms: Option<i64>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub client_email: Option<String>,
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(default)]
    pub sender_address: Option<AddressFields>,
    #[serde(default)]
    pub client_address: Option<AddressFields>,
    #[serde(default)]
    pub items: Option<Vec<LineItemFields>>,
}

/// Invoice document.
///
/// Invariant: a `pending` invoice always satisfies the pending rule set.
/// Construction goes through [`Invoice::create`]; stored documents come back
/// through serde or [`Invoice::restore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    id: InvoiceId,
    #[serde(with = "timestamp")]
    created_at: DateTime<Utc>,
    status: InvoiceStatus,
    #[serde(flatten)]
    fields: InvoiceFields,
}

impl Invoice {
    /// Validate a create command and build the document.
    ///
    /// `now` is used when the caller did not supply `createdAt`.
    pub fn create(cmd: CreateInvoice, now: DateTime<Utc>) -> DomainResult<Self> {
        let id = cmd.id.as_deref().and_then(|raw| raw.parse::<InvoiceId>().ok());
        let status = cmd.status.as_deref().filter(|raw| !raw.trim().is_empty());

        let mut missing = Vec::new();
        if id.is_none() {
            missing.push("id".to_string());
        }
        if status.is_none() {
            missing.push("status".to_string());
        }
        let (Some(id), Some(status)) = (id, status) else {
            return Err(DomainError::MissingFields(missing));
        };

        let status: InvoiceStatus = status.parse()?;
        if !status.is_client_settable() {
            return Err(DomainError::invalid_status(format!(
                "an invoice cannot be created as '{status}' (use draft or pending)"
            )));
        }

        let validated = validate_for_status(status, &cmd.fields)?;

        Ok(Self {
            id,
            created_at: cmd.created_at.unwrap_or(now),
            status,
            fields: validated.into_fields(),
        })
    }

    /// Rebuild a document from stored parts without re-validating it.
    pub fn restore(
        id: InvoiceId,
        created_at: DateTime<Utc>,
        status: InvoiceStatus,
        fields: InvoiceFields,
    ) -> Self {
        Self {
            id,
            created_at,
            status,
            fields,
        }
    }

    /// Merge a patch and re-check the pending rule set when the resulting
    /// status is `pending`.
    ///
    /// On error the invoice is left unchanged.
    pub fn apply_update(&mut self, patch: InvoicePatch) -> DomainResult<()> {
        let requested = match patch.status.as_deref() {
            Some(raw) => {
                let status: InvoiceStatus = raw.parse()?;
                if !status.is_client_settable() {
                    return Err(DomainError::invalid_status(
                        "status 'paid' can only be set with mark-as-paid",
                    ));
                }
                Some(status)
            }
            None => None,
        };
        let status = requested.unwrap_or(self.status);

        let mut fields = self.fields.clone();
        fields.merge(patch);

        let fields = if status == InvoiceStatus::Pending {
            validate_for_status(status, &fields)?.into_fields()
        } else {
            fields
        };

        self.status = status;
        self.fields = fields;
        Ok(())
    }

    /// Set the status to `paid`. Nothing else changes; calling it twice is a no-op.
    pub fn mark_paid(&mut self) {
        self.status = InvoiceStatus::Paid;
    }

    pub fn id_typed(&self) -> &InvoiceId {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn status(&self) -> InvoiceStatus {
        self.status
    }

    pub fn fields(&self) -> &InvoiceFields {
        &self.fields
    }

    /// Typed view of the document for its current status.
    ///
    /// Paid invoices carry their raw fields: paying an invoice never
    /// re-validates it.
    pub fn validated(&self) -> DomainResult<ValidatedInvoice> {
        match self.status {
            InvoiceStatus::Paid => Ok(ValidatedInvoice::Paid(self.fields.clone())),
            status => validate_for_status(status, &self.fields),
        }
    }
}

impl Entity for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// `createdAt` wire format: RFC 3339 out; RFC 3339 or `YYYY-MM-DD` in.
pub mod timestamp {
    use super::*;
    use serde::de::Error as _;

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
        let midnight = date.and_hms_opt(0, 0, 0)?;
        Some(Utc.from_utc_datetime(&midnight))
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp '{raw}'")))
    }

    pub fn deserialize_optional<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid timestamp '{raw}'"))),
            None => Ok(None),
        }
    }
}
