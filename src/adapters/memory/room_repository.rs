//! In-memory room repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::catalog::{CatalogError, Room};
use crate::domain::foundation::RoomId;
use crate::ports::RoomRepository;

#[derive(Default)]
pub struct InMemoryRoomRepository {
    rooms: Mutex<HashMap<RoomId, Room>>,
}

impl InMemoryRoomRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn save(&self, room: &Room) -> Result<(), CatalogError> {
        let mut rooms = self.rooms.lock().unwrap_or_else(|e| e.into_inner());
        rooms.insert(room.id(), room.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: RoomId) -> Result<Option<Room>, CatalogError> {
        let rooms = self.rooms.lock().unwrap_or_else(|e| e.into_inner());
        Ok(rooms.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Room>, CatalogError> {
        let rooms = self.rooms.lock().unwrap_or_else(|e| e.into_inner());
        let mut out: Vec<Room> = rooms.values().cloned().collect();
        out.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(out)
    }

    async fn delete(&self, id: RoomId) -> Result<(), CatalogError> {
        let mut rooms = self.rooms.lock().unwrap_or_else(|e| e.into_inner());
        rooms
            .remove(&id)
            .map(|_| ())
            .ok_or(CatalogError::NotFound(id))
    }
}
