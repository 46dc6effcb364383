//! Room repository port.

use async_trait::async_trait;

use crate::domain::catalog::{CatalogError, Room};
use crate::domain::foundation::RoomId;

/// Repository port for Room aggregate persistence.
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Save a new room.
    async fn save(&self, room: &Room) -> Result<(), CatalogError>;

    /// Find a room by its ID. Returns `None` if not found.
    async fn find_by_id(&self, id: RoomId) -> Result<Option<Room>, CatalogError>;

    /// List all rooms, ordered by name.
    async fn list(&self) -> Result<Vec<Room>, CatalogError>;

    /// Delete a room.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the room doesn't exist
    /// - `RoomInUse` if any showtime still references it
    async fn delete(&self, id: RoomId) -> Result<(), CatalogError>;
}
