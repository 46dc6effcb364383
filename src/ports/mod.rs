//! Ports - trait interfaces between the domain and the outside world.
//!
//! Adapters (postgres, memory, mercadopago, http) implement these; the
//! application layer depends only on the traits.

mod event_publisher;
mod payment_gateway;
mod reservation_ledger;
mod room_repository;
mod showtime_repository;
mod system_parameters;

pub use event_publisher::EventPublisher;
pub use payment_gateway::{PaymentGateway, PaymentNotification, PaymentPreference, PaymentResult};
pub use reservation_ledger::ReservationLedger;
pub use room_repository::RoomRepository;
pub use showtime_repository::ShowtimeRepository;
pub use system_parameters::{BookingPolicy, SystemParameters};
