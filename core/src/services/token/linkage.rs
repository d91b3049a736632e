//! Derivation between the two token identifiers of a pair
//!
//! A refresh identifier is its access identifier followed by a fixed
//! suffix, so either half of a pair can locate the other without a store
//! lookup. Access identifiers are hyphenated UUIDs and never contain the
//! separator.

use uuid::Uuid;

/// Separator between the access identifier and the refresh marker
pub const SEPARATOR: &str = "__";

/// Suffix appended to an access identifier to form its refresh identifier
pub const REFRESH_SUFFIX: &str = "__refresh";

/// Generates a fresh random access identifier
pub fn new_access_identifier() -> String {
    Uuid::new_v4().to_string()
}

/// Derives the refresh identifier paired with `access_id`
pub fn derive_refresh_identifier(access_id: &str) -> String {
    format!("{}{}", access_id, REFRESH_SUFFIX)
}

/// Recovers the access identifier from a refresh identifier
///
/// Returns `None` when `refresh_id` is not a refresh identifier.
pub fn derive_access_identifier(refresh_id: &str) -> Option<&str> {
    refresh_id
        .strip_suffix(REFRESH_SUFFIX)
        .filter(|access_id| !access_id.is_empty() && !access_id.contains(SEPARATOR))
}

/// Whether `token_id` has the shape of a refresh identifier
pub fn is_refresh_identifier(token_id: &str) -> bool {
    derive_access_identifier(token_id).is_some()
}
