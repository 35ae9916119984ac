//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**; they are defined entirely by their
//! attribute values. An invoice's addresses and line items are value objects,
//! while the invoice itself is an entity keyed by its id.

/// Marker trait for value objects.
///
/// ## Value Object vs Entity
///
/// - **Value Object**: two values with the same attributes are equal
///   (`Address { street: "Sonnenallee 23", .. }`)
/// - **Entity**: two records with the same id are the same record
///   (`Invoice { id: "RT3080", .. }`)
///
/// The trait requires `Clone`, `PartialEq` and `Debug` so values can be copied
/// into merged documents, compared in tests and logged.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct Address {
///     street: String,
///     city: String,
/// }
///
/// impl ValueObject for Address {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
