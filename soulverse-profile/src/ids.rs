//! Identifier checks shared by every route that takes a document id.
//!
//! Presence is checked first with an operation-specific message, then the
//! 24-hex ObjectId syntax. Both run before any store access.

use mongodb::bson::oid::ObjectId;

use soulverse_shared::errors::{AppError, AppResult, ErrorCode};

pub const INVALID_ID: &str = "Bad Request, id is not a valid";

pub fn require<'a>(value: Option<&'a str>, missing: &str) -> AppResult<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::new(ErrorCode::MissingIdentifier, missing)),
    }
}

pub fn parse(value: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(value).map_err(|_| AppError::new(ErrorCode::InvalidIdentifier, INVALID_ID))
}

/// `require` followed by `parse`.
pub fn require_object_id(value: Option<&str>, missing: &str) -> AppResult<ObjectId> {
    parse(require(value, missing)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use soulverse_shared::ErrorKind;

    #[test]
    fn accepts_24_hex_chars() {
        let id = ObjectId::new();
        assert_eq!(require_object_id(Some(&id.to_hex()), "missing").unwrap(), id);
    }

    #[test]
    fn blank_is_missing() {
        let err = require_object_id(Some("  "), "Parameters missing").unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::MissingIdentifier));
        assert_eq!(err.to_string(), "Parameters missing");

        let err = require_object_id(None, "Parameters missing").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn malformed_ids_are_rejected() {
        for bad in ["123", "zzzzzzzzzzzzzzzzzzzzzzzz", "65f1c0ffee65f1c0ffee65f1c0"] {
            let err = parse(bad).unwrap_err();
            assert_eq!(err.code(), Some(ErrorCode::InvalidIdentifier), "{bad}");
            assert_eq!(err.to_string(), INVALID_ID);
        }
    }
}
