//! Database ID type definition.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

/// The ID of a transaction row.
///
/// Callers should treat this as opaque: it is only ever compared and
/// round-tripped through URLs.
pub type TransactionId = DatabaseId;
