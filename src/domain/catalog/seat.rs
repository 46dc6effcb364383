//! Seat identifiers within a room.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// A seat position: row letter plus 1-based seat number (e.g. "A1", "C12").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeatLabel {
    row: char,
    number: u16,
}

impl SeatLabel {
    /// Creates a seat label, rejecting lowercase/non-letter rows and a
    /// zero seat number.
    pub fn new(row: char, number: u16) -> Result<Self, ValidationError> {
        if !row.is_ascii_uppercase() {
            return Err(ValidationError::invalid_format(
                "seat_row",
                "row must be an uppercase letter A-Z",
            ));
        }
        if number == 0 {
            return Err(ValidationError::out_of_range("seat_number", 1, u16::MAX as i64, 0));
        }
        Ok(Self { row, number })
    }

    pub fn row(&self) -> char {
        self.row
    }

    pub fn number(&self) -> u16 {
        self.number
    }
}

impl fmt::Display for SeatLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row, self.number)
    }
}

impl FromStr for SeatLabel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let row = chars.next().ok_or_else(|| ValidationError::empty_field("seat"))?;
        let rest = chars.as_str();
        if rest.is_empty() {
            return Err(ValidationError::invalid_format(
                "seat",
                "expected row letter followed by seat number, e.g. 'A1'",
            ));
        }
        let number: u16 = rest.parse().map_err(|_| {
            ValidationError::invalid_format("seat", "seat number must be a positive integer")
        })?;
        Self::new(row, number)
    }
}

impl Serialize for SeatLabel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for SeatLabel {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A catalog entry: seat position plus its VIP flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub label: SeatLabel,
    pub is_vip: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seat_label_displays_row_and_number() {
        let seat = SeatLabel::new('A', 1).unwrap();
        assert_eq!(seat.to_string(), "A1");

        let seat = SeatLabel::new('C', 12).unwrap();
        assert_eq!(seat.to_string(), "C12");
    }

    #[test]
    fn seat_label_parses_from_string() {
        let seat: SeatLabel = "B7".parse().unwrap();
        assert_eq!(seat.row(), 'B');
        assert_eq!(seat.number(), 7);
    }

    #[test]
    fn seat_label_parses_multi_digit_numbers() {
        let seat: SeatLabel = "D24".parse().unwrap();
        assert_eq!(seat.number(), 24);
    }

    #[test]
    fn seat_label_rejects_lowercase_row() {
        assert!(SeatLabel::new('a', 1).is_err());
        assert!("a1".parse::<SeatLabel>().is_err());
    }

    #[test]
    fn seat_label_rejects_zero_number() {
        assert!(SeatLabel::new('A', 0).is_err());
        assert!("A0".parse::<SeatLabel>().is_err());
    }

    #[test]
    fn seat_label_rejects_missing_number() {
        assert!("A".parse::<SeatLabel>().is_err());
        assert!("".parse::<SeatLabel>().is_err());
    }

    #[test]
    fn seat_label_ordering_is_row_then_number() {
        let a2: SeatLabel = "A2".parse().unwrap();
        let a10: SeatLabel = "A10".parse().unwrap();
        let b1: SeatLabel = "B1".parse().unwrap();

        assert!(a2 < a10);
        assert!(a10 < b1);
    }

    #[test]
    fn seat_label_serializes_as_compact_string() {
        let seat: SeatLabel = "A1".parse().unwrap();
        assert_eq!(serde_json::to_string(&seat).unwrap(), "\"A1\"");

        let back: SeatLabel = serde_json::from_str("\"A1\"").unwrap();
        assert_eq!(back, seat);
    }
}
