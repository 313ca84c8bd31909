use std::borrow::Cow;

/// Errors raised by [`crate::EventBus`].
#[freg_derive::freg_error]
pub enum EventBusError {
    /// The registry held a sender of a different event type under this key.
    #[error("Type mismatch{}: {message}", format_context(.context))]
    TypeMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Broadcast buffers must hold at least one event.
    #[error("Invalid capacity{}: {message}", format_context(.context))]
    InvalidCapacity { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
