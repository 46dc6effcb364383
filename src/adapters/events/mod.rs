//! Event publisher adapters.

mod in_memory;
mod tracing;

pub use in_memory::InMemoryEventPublisher;
pub use self::tracing::TracingEventPublisher;
