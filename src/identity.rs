//! Server-side half of the anonymous identity contract. Browsers generate a
//! v4 UUID once, keep it in local storage and send it with every request;
//! the server never issues identifiers, it only validates them before writes.

use uuid::{Uuid, Variant};

/// Accepts only the canonical hyphenated 8-4-4-4-12 form with the version
/// nibble set to 4 and the RFC 4122 variant. `Uuid::try_parse` alone also
/// admits simple and urn layouts, so the shape is checked first.
pub fn is_uuid_v4(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != 36 {
        return false;
    }
    if bytes[8] != b'-' || bytes[13] != b'-' || bytes[18] != b'-' || bytes[23] != b'-' {
        return false;
    }

    match Uuid::try_parse(s) {
        Ok(id) => id.get_version_num() == 4 && id.get_variant() == Variant::RFC4122,
        Err(_) => false,
    }
}
