use super::{attribute::AttributeDescriptor, outcome::LinkOutcome};

// Completions arrive in the order the link resolves them, not in request
// order when reads overlap
#[derive(Debug)]
pub enum LinkEvent {
    AvailabilityChanged {
        service_id: u16,
        available: bool,
    },
    ReadCompleted {
        attribute: AttributeDescriptor,
        outcome: LinkOutcome,
        value: Vec<u8>,
    },
    Notified {
        attribute: AttributeDescriptor,
    },
}
