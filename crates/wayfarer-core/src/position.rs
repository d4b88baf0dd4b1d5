//! Live positions and their token forms.

use serde::{Deserialize, Serialize};

use crate::codec::{CodecError, TokenWriter, parse_int, split_fields};

/// A player's place in the world: a location name plus an offset within it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Name of the location.
    pub location: String,
    /// Horizontal offset from the location origin.
    pub x: i32,
    /// Vertical offset from the location origin.
    pub y: i32,
}

impl Position {
    /// A position at the origin of `location`.
    #[must_use]
    pub fn at_origin(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            x: 0,
            y: 0,
        }
    }

    /// Encodes as `location, x, y`.
    #[must_use]
    pub fn encode(&self) -> String {
        TokenWriter::new()
            .text(&self.location)
            .int(self.x)
            .int(self.y)
            .finish()
    }

    /// Decodes a token written by [`Position::encode`].
    ///
    /// # Errors
    ///
    /// Returns `CodecError` if the token does not hold exactly three
    /// well-formed fields or an offset is not an integer.
    pub fn decode(token: &str) -> Result<Self, CodecError> {
        let [location, x, y] = split_fields::<3>(token)?;
        Ok(Self {
            location: location.to_owned(),
            x: parse_int("x", x)?,
            y: parse_int("y", y)?,
        })
    }
}

/// A player together with their position: one location membership entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerPosition {
    /// The player's username.
    pub username: String,
    /// Where the player is.
    pub position: Position,
}

impl PlayerPosition {
    /// Pairs a username with a position.
    #[must_use]
    pub fn new(username: impl Into<String>, position: Position) -> Self {
        Self {
            username: username.into(),
            position,
        }
    }

    /// Encodes as `username, location, x, y`.
    #[must_use]
    pub fn encode(&self) -> String {
        TokenWriter::new()
            .text(&self.username)
            .text(&self.position.location)
            .int(self.position.x)
            .int(self.position.y)
            .finish()
    }

    /// Decodes a token written by [`PlayerPosition::encode`].
    ///
    /// # Errors
    ///
    /// Returns `CodecError` if the token does not hold exactly four
    /// well-formed fields or an offset is not an integer.
    pub fn decode(token: &str) -> Result<Self, CodecError> {
        let [username, location, x, y] = split_fields::<4>(token)?;
        Ok(Self {
            username: username.to_owned(),
            position: Position {
                location: location.to_owned(),
                x: parse_int("x", x)?,
                y: parse_int("y", y)?,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_round_trips_through_token() {
        let cases = [
            Position::at_origin("town"),
            Position {
                location: "village".to_owned(),
                x: 3,
                y: -4,
            },
            Position {
                location: "the:docks".to_owned(),
                x: i32::MIN,
                y: i32::MAX,
            },
            Position::at_origin(""),
        ];

        for position in cases {
            assert_eq!(Position::decode(&position.encode()), Ok(position));
        }
    }

    #[test]
    fn test_player_position_round_trips_with_delimiters_in_identities() {
        let entry = PlayerPosition::new(
            "al:ice",
            Position {
                location: "location:town".to_owned(),
                x: 3,
                y: 4,
            },
        );

        let token = entry.encode();

        assert_eq!(token, "6:al:ice13:location:town1:31:4");
        assert_eq!(PlayerPosition::decode(&token), Ok(entry));
    }

    #[test]
    fn test_encoding_is_stable_for_equal_tuples() {
        let a = PlayerPosition::new("alice", Position::at_origin("town"));
        let b = PlayerPosition::new("alice".to_owned(), Position::at_origin("town".to_owned()));
        assert_eq!(a.encode(), b.encode());
    }

    #[test]
    fn test_position_decode_rejects_player_token() {
        let token = PlayerPosition::new("alice", Position::at_origin("town")).encode();
        assert_eq!(
            Position::decode(&token),
            Err(CodecError::FieldCount {
                expected: 3,
                found: 4
            })
        );
    }

    #[test]
    fn test_decode_rejects_non_integer_offset() {
        let token = TokenWriter::new().text("town").text("east").int(0).finish();
        assert_eq!(
            Position::decode(&token),
            Err(CodecError::NotAnInteger {
                field: "x",
                value: "east".to_owned()
            })
        );
    }
}
