//! CreateRoomHandler - admin command to add a room to the catalog.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::catalog::{CatalogError, Room, SeatLabel};
use crate::domain::foundation::Clock;
use crate::ports::RoomRepository;

/// Command to create a room.
#[derive(Debug, Clone)]
pub struct CreateRoomCommand {
    pub name: String,
    pub location: String,
    pub rows: u16,
    pub seats_per_row: u16,
    pub vip_seats: BTreeSet<SeatLabel>,
}

/// Handler for room creation.
pub struct CreateRoomHandler {
    rooms: Arc<dyn RoomRepository>,
    clock: Arc<dyn Clock>,
}

impl CreateRoomHandler {
    pub fn new(rooms: Arc<dyn RoomRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { rooms, clock }
    }

    pub async fn handle(&self, cmd: CreateRoomCommand) -> Result<Room, CatalogError> {
        let room = Room::new(
            cmd.name,
            cmd.location,
            cmd.rows,
            cmd.seats_per_row,
            cmd.vip_seats,
            self.clock.now(),
        )?;
        self.rooms.save(&room).await?;
        Ok(room)
    }
}
