//! Chat-facing layer: transport seam, pending-choice broker, preview
//! rendering and artifact delivery.

pub mod broker;
pub mod delivery;
pub mod preview;
pub mod transport;

// Re-exports for convenience
pub use broker::{Choice, ClaimOutcome, InteractionBroker, PendingJob};
pub use transport::{ChatEvent, ChatId, ChatTransport, MediaPayload, MessageId, PlayCommand, UserId};
