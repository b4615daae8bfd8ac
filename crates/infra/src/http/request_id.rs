//! Request correlation identifiers

use uuid::Uuid;

/// Generate a value for the `X-Request-ID` header
///
/// Random (v4) UUID in its hyphenated lowercase form.
#[must_use]
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}
