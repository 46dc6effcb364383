//! Seat catalog handlers.

mod create_room;
mod delete_room;

pub use create_room::{CreateRoomCommand, CreateRoomHandler};
pub use delete_room::{DeleteRoomCommand, DeleteRoomHandler};
