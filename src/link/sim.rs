use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc::Sender;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

use crate::strap::{
    attribute::{self, AttributeDescriptor},
    outcome::LinkOutcome,
    profile,
};

use super::transport::{LinkTransport, ReadReply, TransportEvent};

struct SimState {
    available: bool,
    led: u8,
    reservation: Option<AttributeDescriptor>,
    altitude: Box<dyn FnMut() -> u32 + Send>,
}

// In-process stand-in for the strap hardware. Altitude readings come from
// the closure handed to new(), uptime counts seconds since construction and
// the LED is a one-byte register readable back through led().
pub struct SimStrap {
    state: Mutex<SimState>,
    events: OnceLock<Sender<TransportEvent>>,
    started_at: Instant,
    read_latency: Duration,
}

impl SimStrap {
    pub fn new<F>(altitude: F) -> Self
    where
        F: FnMut() -> u32 + Send + 'static,
    {
        return SimStrap {
            state: Mutex::new(SimState {
                available: true,
                led: 0,
                reservation: None,
                altitude: Box::new(altitude),
            }),
            events: OnceLock::new(),
            started_at: Instant::now(),
            read_latency: Duration::from_millis(20),
        };
    }

    pub fn with_read_latency(mut self, latency: Duration) -> Self {
        self.read_latency = latency;
        self
    }

    pub async fn led(&self) -> bool {
        self.state.lock().await.led != 0
    }

    pub async fn set_available(&self, available: bool) {
        self.state.lock().await.available = available;
        self.emit(TransportEvent::AvailabilityChanged {
            service_id: profile::SERVICE_ID,
            available,
        })
        .await;
    }

    // Raise a notify on the uptime attribute, like the hardware does when it
    // wants the watch to pull fresh state
    pub async fn notify_uptime(&self) {
        self.emit(TransportEvent::Notified {
            attribute: profile::UPTIME,
        })
        .await;
    }

    async fn emit(&self, event: TransportEvent) {
        match self.events.get() {
            Some(sender) => {
                if let Err(err) = sender.send(event).await {
                    log::error!("Error raising simulated link event: {:?}", err);
                }
            }
            None => log::debug!("Simulated link event dropped, no client attached"),
        }
    }

    fn uptime_seconds(&self) -> u32 {
        self.started_at.elapsed().as_secs() as u32
    }
}

#[async_trait]
impl LinkTransport for SimStrap {
    fn attach_events(&self, events: Sender<TransportEvent>) {
        if self.events.set(events).is_err() {
            log::error!("Event sink already attached to simulated strap");
        }
    }

    async fn service_available(&self, service_id: u16) -> bool {
        return service_id == profile::SERVICE_ID && self.state.lock().await.available;
    }

    async fn read(&self, attribute: AttributeDescriptor) -> ReadReply {
        sleep(self.read_latency).await;

        let mut state = self.state.lock().await;
        if attribute.service_id != profile::SERVICE_ID || !state.available {
            return ReadReply {
                outcome: LinkOutcome::ServiceUnavailable,
                value: Vec::new(),
            };
        }

        if attribute == profile::ALTITUDE {
            let sample = (state.altitude)();
            return ReadReply {
                outcome: LinkOutcome::Ok,
                value: attribute::encode_u32(sample).to_vec(),
            };
        }
        if attribute == profile::UPTIME {
            return ReadReply {
                outcome: LinkOutcome::Ok,
                value: attribute::encode_u32(self.uptime_seconds()).to_vec(),
            };
        }
        if attribute == profile::LED {
            return ReadReply {
                outcome: LinkOutcome::Ok,
                value: vec![state.led],
            };
        }
        return ReadReply {
            outcome: LinkOutcome::LinkError,
            value: Vec::new(),
        };
    }

    async fn begin_write(&self, attribute: AttributeDescriptor) -> LinkOutcome {
        let mut state = self.state.lock().await;
        if attribute.service_id != profile::SERVICE_ID || !state.available {
            return LinkOutcome::ServiceUnavailable;
        }
        if state.reservation.is_some() {
            return LinkOutcome::Busy;
        }
        state.reservation = Some(attribute);
        return LinkOutcome::Ok;
    }

    async fn end_write(&self, attribute: AttributeDescriptor, payload: &[u8]) -> LinkOutcome {
        let mut state = self.state.lock().await;
        if state.reservation.take() != Some(attribute) {
            return LinkOutcome::LinkError;
        }
        if attribute == profile::LED {
            state.led = payload.first().copied().unwrap_or(0);
        }
        return LinkOutcome::Ok;
    }
}
