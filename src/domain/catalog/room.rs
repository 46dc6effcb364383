//! Room aggregate: fixed seat geometry plus VIP set.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::errors::CatalogError;
use super::seat::{Seat, SeatLabel};
use crate::domain::foundation::{RoomId, Timestamp};

/// Maximum number of lettered rows (A through Z).
const MAX_ROWS: u16 = 26;
/// Upper bound on seats per row; keeps labels and layouts sane.
const MAX_SEATS_PER_ROW: u16 = 100;

/// A cinema room with a fixed rectangular seat layout.
///
/// Geometry is immutable relative to reservations: edits go through
/// `update_geometry`, which revalidates the VIP set against the new bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    id: RoomId,
    name: String,
    location: String,
    rows: u16,
    seats_per_row: u16,
    vip_seats: BTreeSet<SeatLabel>,
    created_at: Timestamp,
}

impl Room {
    /// Creates a room, validating geometry bounds and that every VIP seat
    /// falls inside the geometry.
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        rows: u16,
        seats_per_row: u16,
        vip_seats: BTreeSet<SeatLabel>,
        now: Timestamp,
    ) -> Result<Self, CatalogError> {
        let name = name.into();
        let location = location.into();
        if name.trim().is_empty() {
            return Err(CatalogError::validation("name", "cannot be empty"));
        }
        Self::check_geometry(rows, seats_per_row, &vip_seats)?;

        Ok(Self {
            id: RoomId::new(),
            name,
            location,
            rows,
            seats_per_row,
            vip_seats,
            created_at: now,
        })
    }

    /// Reconstructs a room from persisted state without validation.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: RoomId,
        name: String,
        location: String,
        rows: u16,
        seats_per_row: u16,
        vip_seats: BTreeSet<SeatLabel>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            name,
            location,
            rows,
            seats_per_row,
            vip_seats,
            created_at,
        }
    }

    fn check_geometry(
        rows: u16,
        seats_per_row: u16,
        vip_seats: &BTreeSet<SeatLabel>,
    ) -> Result<(), CatalogError> {
        if rows == 0 || rows > MAX_ROWS {
            return Err(CatalogError::invalid_geometry(format!(
                "rows must be between 1 and {}, got {}",
                MAX_ROWS, rows
            )));
        }
        if seats_per_row == 0 || seats_per_row > MAX_SEATS_PER_ROW {
            return Err(CatalogError::invalid_geometry(format!(
                "seats_per_row must be between 1 and {}, got {}",
                MAX_SEATS_PER_ROW, seats_per_row
            )));
        }
        let outside: Vec<String> = vip_seats
            .iter()
            .filter(|s| !Self::in_bounds(rows, seats_per_row, s))
            .map(|s| s.to_string())
            .collect();
        if !outside.is_empty() {
            return Err(CatalogError::invalid_geometry(format!(
                "VIP seats outside room geometry: {}",
                outside.join(", ")
            )));
        }
        Ok(())
    }

    fn in_bounds(rows: u16, seats_per_row: u16, seat: &SeatLabel) -> bool {
        let row_index = (seat.row() as u16) - ('A' as u16);
        row_index < rows && seat.number() >= 1 && seat.number() <= seats_per_row
    }

    /// Replaces the geometry and VIP set, revalidating both together.
    pub fn update_geometry(
        &mut self,
        rows: u16,
        seats_per_row: u16,
        vip_seats: BTreeSet<SeatLabel>,
    ) -> Result<(), CatalogError> {
        Self::check_geometry(rows, seats_per_row, &vip_seats)?;
        self.rows = rows;
        self.seats_per_row = seats_per_row;
        self.vip_seats = vip_seats;
        Ok(())
    }

    /// Deterministic ordered catalog: row A seat 1 through the last row's
    /// last seat, each tagged with its VIP flag.
    pub fn seats(&self) -> Vec<Seat> {
        let mut out = Vec::with_capacity((self.rows * self.seats_per_row) as usize);
        for row_index in 0..self.rows {
            let row = (b'A' + row_index as u8) as char;
            for number in 1..=self.seats_per_row {
                // Constructor bounds guarantee valid labels here.
                if let Ok(label) = SeatLabel::new(row, number) {
                    out.push(Seat {
                        label,
                        is_vip: self.vip_seats.contains(&label),
                    });
                }
            }
        }
        out
    }

    /// Checks whether a seat label falls inside this room's geometry.
    pub fn is_valid_seat(&self, seat: &SeatLabel) -> bool {
        Self::in_bounds(self.rows, self.seats_per_row, seat)
    }

    /// Total number of seats in the room.
    pub fn capacity(&self) -> u32 {
        self.rows as u32 * self.seats_per_row as u32
    }

    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn seats_per_row(&self) -> u16 {
        self.seats_per_row
    }

    pub fn vip_seats(&self) -> &BTreeSet<SeatLabel> {
        &self.vip_seats
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }
}
