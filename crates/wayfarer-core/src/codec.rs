//! Flat string tokens for ephemeral values.
//!
//! A token is a run of length-prefixed fields, each written as
//! `<byte length>:<bytes>`. `{town, 3, 4}` becomes `4:town1:31:4`. Because
//! every field carries its own length, identity strings may contain any
//! character, including the `:` separator.
//!
//! Encoding is canonical: lengths have no leading zeros and integers are
//! written in their shortest decimal form. Decoding rejects anything else,
//! so a decoded token always re-encodes to the same bytes. Membership
//! removal relies on that, as it matches tokens exactly.

use std::fmt::Write as _;

use thiserror::Error;

use crate::error::DomainError;

/// Separator between a field's length and its bytes.
pub const LENGTH_DELIMITER: char = ':';

/// Reasons a token fails to decode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A length prefix is missing, empty, non-numeric or zero-padded.
    #[error("malformed field length at byte {offset}")]
    MalformedLength {
        /// Byte offset of the field within the token.
        offset: usize,
    },

    /// A field claims more bytes than remain in the token, or splits a
    /// UTF-8 sequence.
    #[error("field at byte {offset} overruns the token")]
    Truncated {
        /// Byte offset of the field within the token.
        offset: usize,
    },

    /// The token holds the wrong number of fields.
    #[error("expected {expected} fields, found {found}")]
    FieldCount {
        /// Fields the tuple needs.
        expected: usize,
        /// Fields the token held.
        found: usize,
    },

    /// A numeric field is not a canonical `i32`.
    #[error("field `{field}` is not an integer: {value:?}")]
    NotAnInteger {
        /// Name of the offending field.
        field: &'static str,
        /// Raw field contents.
        value: String,
    },
}

impl From<CodecError> for DomainError {
    fn from(err: CodecError) -> Self {
        Self::Internal(format!("undecodable ephemeral value: {err}"))
    }
}

/// Builds a token one field at a time.
#[derive(Debug, Default)]
pub struct TokenWriter {
    buf: String,
}

impl TokenWriter {
    /// Starts an empty token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a string field.
    #[must_use]
    pub fn text(mut self, value: &str) -> Self {
        // Writing into a String cannot fail.
        let _ = write!(self.buf, "{}{LENGTH_DELIMITER}{value}", value.len());
        self
    }

    /// Appends an integer field.
    #[must_use]
    pub fn int(self, value: i32) -> Self {
        self.text(&value.to_string())
    }

    /// Returns the finished token.
    #[must_use]
    pub fn finish(self) -> String {
        self.buf
    }
}

/// Splits `token` into exactly `N` fields.
///
/// # Errors
///
/// Returns a `CodecError` if any field is malformed or the field count is
/// not `N`.
pub fn split_fields<const N: usize>(token: &str) -> Result<[&str; N], CodecError> {
    let mut fields = Vec::with_capacity(N);
    let mut offset = 0;

    while offset < token.len() {
        let rest = &token[offset..];
        let Some(colon) = rest.find(LENGTH_DELIMITER) else {
            return Err(CodecError::MalformedLength { offset });
        };

        let digits = &rest[..colon];
        let canonical = !digits.is_empty()
            && digits.bytes().all(|b| b.is_ascii_digit())
            && (digits == "0" || !digits.starts_with('0'));
        if !canonical {
            return Err(CodecError::MalformedLength { offset });
        }
        let len: usize = digits
            .parse()
            .map_err(|_| CodecError::MalformedLength { offset })?;

        let start = colon + 1;
        let field = start
            .checked_add(len)
            .and_then(|end| rest.get(start..end))
            .ok_or(CodecError::Truncated { offset })?;

        fields.push(field);
        offset += start + len;
    }

    let found = fields.len();
    <[&str; N]>::try_from(fields).map_err(|_| CodecError::FieldCount { expected: N, found })
}

/// Parses a numeric field, accepting only the canonical decimal form.
///
/// # Errors
///
/// Returns `CodecError::NotAnInteger` if `value` is not an `i32` written the
/// way [`TokenWriter::int`] writes it.
pub fn parse_int(field: &'static str, value: &str) -> Result<i32, CodecError> {
    match value.parse::<i32>() {
        Ok(n) if n.to_string() == value => Ok(n),
        _ => Err(CodecError::NotAnInteger {
            field,
            value: value.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_prefixes_each_field_with_its_byte_length() {
        let token = TokenWriter::new().text("town").int(3).int(-42).finish();
        assert_eq!(token, "4:town1:33:-42");
    }

    #[test]
    fn test_empty_string_field_is_zero_length() {
        let token = TokenWriter::new().text("").int(0).finish();
        assert_eq!(token, "0:1:0");
        let [a, b] = split_fields::<2>(&token).unwrap();
        assert_eq!(a, "");
        assert_eq!(b, "0");
    }

    #[test]
    fn test_split_handles_delimiter_inside_field() {
        let token = TokenWriter::new().text("a:b:c").int(1).finish();
        let [name, n] = split_fields::<2>(&token).unwrap();
        assert_eq!(name, "a:b:c");
        assert_eq!(n, "1");
    }

    #[test]
    fn test_split_counts_bytes_not_chars() {
        let token = TokenWriter::new().text("café").finish();
        assert_eq!(token, "5:café");
        let [name] = split_fields::<1>(&token).unwrap();
        assert_eq!(name, "café");
    }

    #[test]
    fn test_split_rejects_wrong_field_count() {
        let token = TokenWriter::new().text("town").int(1).finish();
        assert_eq!(
            split_fields::<3>(&token),
            Err(CodecError::FieldCount {
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn test_split_rejects_legacy_colon_joined_token() {
        let result = split_fields::<3>("town:0:0");
        assert_eq!(result, Err(CodecError::MalformedLength { offset: 0 }));
    }

    #[test]
    fn test_split_rejects_zero_padded_length() {
        assert_eq!(
            split_fields::<1>("04:town"),
            Err(CodecError::MalformedLength { offset: 0 })
        );
    }

    #[test]
    fn test_split_rejects_overrun() {
        assert_eq!(
            split_fields::<2>("4:town9:1"),
            Err(CodecError::Truncated { offset: 6 })
        );
    }

    #[test]
    fn test_split_rejects_length_splitting_a_char() {
        assert_eq!(
            split_fields::<1>("4:café"),
            Err(CodecError::Truncated { offset: 0 })
        );
    }

    #[test]
    fn test_parse_int_rejects_non_canonical_forms() {
        assert_eq!(parse_int("x", "-7"), Ok(-7));
        assert!(parse_int("x", "+7").is_err());
        assert!(parse_int("x", "07").is_err());
        assert!(parse_int("x", "seven").is_err());
        assert!(parse_int("x", "99999999999").is_err());
    }
}
