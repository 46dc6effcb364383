//! DeleteRoomHandler - admin command to remove a room.

use std::sync::Arc;

use crate::domain::catalog::CatalogError;
use crate::domain::foundation::RoomId;
use crate::ports::{RoomRepository, ShowtimeRepository};

/// Command to delete a room.
#[derive(Debug, Clone)]
pub struct DeleteRoomCommand {
    pub room_id: RoomId,
}

/// Handler for room deletion.
///
/// A room is deletable only while no showtime references it.
pub struct DeleteRoomHandler {
    rooms: Arc<dyn RoomRepository>,
    showtimes: Arc<dyn ShowtimeRepository>,
}

impl DeleteRoomHandler {
    pub fn new(rooms: Arc<dyn RoomRepository>, showtimes: Arc<dyn ShowtimeRepository>) -> Self {
        Self { rooms, showtimes }
    }

    pub async fn handle(&self, cmd: DeleteRoomCommand) -> Result<(), CatalogError> {
        self.rooms
            .find_by_id(cmd.room_id)
            .await?
            .ok_or(CatalogError::NotFound(cmd.room_id))?;

        let scheduled = self
            .showtimes
            .count_for_room(cmd.room_id)
            .await
            .map_err(|e| CatalogError::infrastructure(e.to_string()))?;
        if scheduled > 0 {
            return Err(CatalogError::room_in_use(cmd.room_id));
        }

        self.rooms.delete(cmd.room_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryRoomRepository, InMemoryShowtimeRepository};
    use crate::domain::catalog::Room;
    use crate::domain::foundation::{MovieId, Timestamp};
    use crate::domain::scheduling::Showtime;
    use std::collections::BTreeSet;

    fn room() -> Room {
        Room::new("A1", "loc", 5, 6, BTreeSet::new(), Timestamp::now()).unwrap()
    }

    #[tokio::test]
    async fn deletes_unused_room() {
        let rooms = Arc::new(InMemoryRoomRepository::new());
        let showtimes = Arc::new(InMemoryShowtimeRepository::new());
        let r = room();
        rooms.save(&r).await.unwrap();

        let handler = DeleteRoomHandler::new(rooms.clone(), showtimes);
        handler.handle(DeleteRoomCommand { room_id: r.id() }).await.unwrap();

        assert!(rooms.find_by_id(r.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn refuses_room_with_showtimes() {
        let rooms = Arc::new(InMemoryRoomRepository::new());
        let showtimes = Arc::new(InMemoryShowtimeRepository::new());
        let r = room();
        rooms.save(&r).await.unwrap();
        showtimes
            .save(&Showtime::new(r.id(), MovieId::new(), Timestamp::now(), 120).unwrap())
            .await
            .unwrap();

        let handler = DeleteRoomHandler::new(rooms.clone(), showtimes);
        let result = handler.handle(DeleteRoomCommand { room_id: r.id() }).await;

        assert!(matches!(result, Err(CatalogError::RoomInUse(_))));
        assert!(rooms.find_by_id(r.id()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn missing_room_fails_not_found() {
        let handler = DeleteRoomHandler::new(
            Arc::new(InMemoryRoomRepository::new()),
            Arc::new(InMemoryShowtimeRepository::new()),
        );
        let result = handler.handle(DeleteRoomCommand { room_id: RoomId::new() }).await;
        assert!(matches!(result, Err(CatalogError::NotFound(_))));
    }
}
