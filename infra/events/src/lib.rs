//! # Event Bus
//!
//! Typed in-process fan-out for domain events. Each event type gets its own
//! `tokio` broadcast channel; publishers never block and never fail because
//! nobody is listening.
//!
//! ```rust
//! use freg_event_bus::{EventBus, EventBusError, EventReceiverExt};
//!
//! #[derive(Debug, PartialEq)]
//! enum FacilityEvent { Deactivated { id: u64 } }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), EventBusError> {
//!     let bus = EventBus::new();
//!     let mut rx = bus.subscribe::<FacilityEvent>()?;
//!
//!     bus.publish(FacilityEvent::Deactivated { id: 4 })?;
//!     let event = rx.next_event().await;
//!     assert_eq!(event.as_deref(), Some(&FacilityEvent::Deactivated { id: 4 }));
//!     Ok(())
//! }
//! ```

mod bus;
mod error;
mod receiver;

pub use bus::{DEFAULT_CAPACITY, Event, EventBus};
pub use error::{EventBusError, EventBusErrorExt};
pub use receiver::EventReceiverExt;
