use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

use crate::strap::{attribute::AttributeDescriptor, outcome::LinkOutcome};

#[derive(Debug, Clone)]
pub enum TransportEvent {
    AvailabilityChanged {
        service_id: u16,
        available: bool,
    },
    Notified {
        attribute: AttributeDescriptor,
    },
}

#[derive(Debug, Clone)]
pub struct ReadReply {
    pub outcome: LinkOutcome,
    pub value: Vec<u8>,
}

/// One physical or simulated request/response link to a smartstrap accessory.
/// Writes are two-phase: `begin_write` reserves the outgoing frame buffer,
/// `end_write` commits the payload. A successful begin is always followed by
/// exactly one end.
#[async_trait]
pub trait LinkTransport: Send + Sync + 'static {
    // Called once, when a client attaches to this transport
    fn attach_events(&self, events: Sender<TransportEvent>);

    async fn service_available(&self, service_id: u16) -> bool;

    async fn read(&self, attribute: AttributeDescriptor) -> ReadReply;

    async fn begin_write(&self, attribute: AttributeDescriptor) -> LinkOutcome;

    async fn end_write(&self, attribute: AttributeDescriptor, payload: &[u8]) -> LinkOutcome;
}
