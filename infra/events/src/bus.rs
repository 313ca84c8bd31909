use crate::error::EventBusError;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::any::{Any, TypeId, type_name};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{trace, warn};

/// Buffer size used when the first subscriber or publisher does not pick one.
pub const DEFAULT_CAPACITY: usize = 128;

/// Anything `Send + Sync + 'static` can travel over the bus.
pub trait Event: Any + Send + Sync + 'static {}
impl<T: Any + Send + Sync + 'static> Event for T {}

#[derive(Debug)]
struct Channel {
    capacity: usize,
    sender: Box<dyn Any + Send + Sync>,
}

impl Channel {
    fn new<T: Event>(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel::<Arc<T>>(capacity);
        Self { capacity, sender: Box::new(tx) }
    }

    fn sender<T: Event>(&self) -> Result<broadcast::Sender<Arc<T>>, EventBusError> {
        self.sender.downcast_ref::<broadcast::Sender<Arc<T>>>().cloned().ok_or_else(|| {
            EventBusError::TypeMismatch {
                message: type_name::<T>().into(),
                context: Some("Channel registered with a different event type".into()),
            }
        })
    }
}

/// Fan-out bus keyed by event type.
///
/// One broadcast channel per event type, created lazily. Publishing with no
/// subscribers is not an error; the event is dropped and `0` is returned.
/// Clones share the same channels.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    channels: Arc<RwLock<FxHashMap<TypeId, Channel>>>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to `T` with the default buffer size.
    ///
    /// # Errors
    /// [`EventBusError::TypeMismatch`] if the internal registry is inconsistent.
    ///
    /// ```rust
    /// use freg_event_bus::{EventBus, EventReceiverExt};
    ///
    /// #[derive(Debug)]
    /// struct Registered(u64);
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), freg_event_bus::EventBusError> {
    /// let bus = EventBus::new();
    /// let mut rx = bus.subscribe::<Registered>()?;
    /// bus.publish(Registered(1))?;
    /// assert_eq!(rx.next_event().await.map(|e| e.0), Some(1));
    /// # Ok(())
    /// # }
    /// ```
    pub fn subscribe<T: Event>(&self) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        self.subscribe_with_capacity::<T>(DEFAULT_CAPACITY)
    }

    /// Subscribes to `T`; `capacity` only applies if this call creates the channel.
    ///
    /// # Errors
    /// [`EventBusError::InvalidCapacity`] for a zero capacity.
    pub fn subscribe_with_capacity<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        if capacity == 0 {
            return Err(EventBusError::InvalidCapacity {
                message: "capacity must be at least 1".into(),
                context: Some(type_name::<T>().into()),
            });
        }
        Ok(self.sender::<T>(Some(capacity))?.subscribe())
    }

    /// Publishes `event` to every live subscriber of `T` and returns how many received it.
    ///
    /// # Errors
    /// [`EventBusError::TypeMismatch`] if the internal registry is inconsistent.
    pub fn publish<T: Event>(&self, event: T) -> Result<usize, EventBusError> {
        self.publish_arc(Arc::new(event))
    }

    /// Like [`EventBus::publish`] for an already shared event.
    ///
    /// # Errors
    /// [`EventBusError::TypeMismatch`] if the internal registry is inconsistent.
    pub fn publish_arc<T: Event>(&self, event: Arc<T>) -> Result<usize, EventBusError> {
        let sender = self.sender::<T>(None)?;
        let delivered = sender.send(event).unwrap_or(0);
        trace!(event = type_name::<T>(), delivered, "Event published");
        Ok(delivered)
    }

    /// Number of live receivers for `T`.
    #[must_use]
    pub fn subscriber_count<T: Event>(&self) -> usize {
        self.channels
            .read()
            .get(&TypeId::of::<T>())
            .and_then(|channel| channel.sender::<T>().ok())
            .map_or(0, |tx| tx.receiver_count())
    }

    /// Drops every channel; outstanding receivers observe the end of the stream.
    ///
    /// Returns the number of channels closed.
    pub fn shutdown(&self) -> usize {
        let mut channels = self.channels.write();
        let closed = channels.len();
        channels.clear();
        closed
    }

    fn sender<T: Event>(
        &self,
        requested: Option<usize>,
    ) -> Result<broadcast::Sender<Arc<T>>, EventBusError> {
        let id = TypeId::of::<T>();

        {
            let channels = self.channels.read();
            if let Some(channel) = channels.get(&id) {
                if let Some(requested) = requested.filter(|&c| c != channel.capacity) {
                    warn!(
                        event = type_name::<T>(),
                        existing = channel.capacity,
                        requested,
                        "Channel already exists with a different capacity"
                    );
                }
                return channel.sender::<T>();
            }
        }

        let capacity = requested.unwrap_or(DEFAULT_CAPACITY);
        let mut channels = self.channels.write();
        channels
            .entry(id)
            .or_insert_with(|| {
                trace!(event = type_name::<T>(), capacity, "Creating event channel");
                Channel::new::<T>(capacity)
            })
            .sender::<T>()
    }
}
