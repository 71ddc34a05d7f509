use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, Timelike};
use futures::channel::oneshot;
use tokio::sync::mpsc::{self, Receiver};
use tokio::time::{sleep_until, Instant};

use crate::{
    config::Config,
    display::DisplaySurface,
    engine::TrendEngine,
    error::{Error, ErrorType},
    link::{LinkClient, LinkTransport},
    scheduler::PollSchedule,
    strap::{
        attribute::{self, AttributeDescriptor},
        link_event::LinkEvent,
        outcome::LinkOutcome,
        profile,
    },
};

const EVENT_CHANNEL_CAPACITY: usize = 256;

struct EngineState {
    engine: TrendEngine,
    connected: bool,
}

#[derive(Clone)]
pub struct LedHandle {
    link: Arc<LinkClient>,
}

impl LedHandle {
    pub async fn set_led(&self, on: bool) -> Result<(), Error> {
        return self.link.write(profile::LED, &[u8::from(on)]).await;
    }
}

pub struct AltimeterApp {
    link: Arc<LinkClient>,
    events: Receiver<LinkEvent>,
    schedule: PollSchedule,
    state: EngineState,
    display: Box<dyn DisplaySurface>,
}

impl AltimeterApp {
    // Must be called from within a Tokio runtime.
    pub fn new(
        transport: Arc<dyn LinkTransport>,
        display: Box<dyn DisplaySurface>,
        config: &Config,
    ) -> Self {
        let (sender_tx, receiver_rx) = mpsc::channel::<LinkEvent>(EVENT_CHANNEL_CAPACITY);
        let link = Arc::new(LinkClient::new(transport, sender_tx));
        return AltimeterApp {
            link,
            events: receiver_rx,
            schedule: PollSchedule::new(config.poll_interval),
            state: EngineState {
                engine: TrendEngine::new(),
                connected: false,
            },
            display,
        };
    }

    pub fn led_handle(&self) -> LedHandle {
        return LedHandle {
            link: self.link.clone(),
        };
    }

    // All mutable state is owned here and only touched between select arms.
    pub async fn run(mut self, mut shutdown: oneshot::Receiver<()>) -> Result<(), Error> {
        let connected = self.link.service_available(profile::SERVICE_ID).await;
        self.state.connected = connected;
        self.display.set_connection_status(connected);
        self.display.set_clock_text(&clock_text(&Local::now()));

        self.schedule.start(Instant::now());
        // Re-armed only inside the clock arm
        let mut clock_due = Instant::now() + until_next_minute();

        loop {
            let poll_due = match self.schedule.due_at() {
                Some(due_at) => due_at,
                None => break,
            };

            tokio::select! {
                maybe_event = self.events.recv() => {
                    match maybe_event {
                        Some(event) => {
                            if let Err(err) = self.handle_event(event) {
                                log::error!("{}", err);
                            }
                        }
                        None => {
                            log::error!("Link event channel closed, stopping");
                            self.schedule.stop();
                            return Err(Error::from_type(ErrorType::ChannelError));
                        }
                    }
                }
                _ = sleep_until(poll_due) => {
                    if self.schedule.fire(Instant::now()) {
                        if let Err(err) = self.poll_altitude() {
                            log::error!("{}", err);
                        }
                    }
                }
                _ = sleep_until(clock_due) => {
                    self.display.set_clock_text(&clock_text(&Local::now()));
                    clock_due = Instant::now() + until_next_minute();
                }
                _ = &mut shutdown => {
                    self.schedule.stop();
                    return Ok(());
                }
            }
        }
        return Ok(());
    }

    fn handle_event(&mut self, event: LinkEvent) -> Result<(), Error> {
        match event {
            LinkEvent::AvailabilityChanged {
                service_id,
                available,
            } => {
                if service_id != profile::SERVICE_ID {
                    return Ok(());
                }
                self.state.connected = available;
                self.display.set_connection_status(available);
                return Ok(());
            }
            LinkEvent::ReadCompleted {
                attribute,
                outcome,
                value,
            } => {
                return self.handle_read(attribute, outcome, &value);
            }
            LinkEvent::Notified { attribute } => {
                if attribute != profile::UPTIME {
                    return Ok(());
                }
                return self.link.read(profile::UPTIME);
            }
        }
    }

    // Failed completions leave engine and display state exactly as they were.
    fn handle_read(
        &mut self,
        attribute: AttributeDescriptor,
        outcome: LinkOutcome,
        value: &[u8],
    ) -> Result<(), Error> {
        if outcome != LinkOutcome::Ok {
            let error_type = match outcome {
                LinkOutcome::ServiceUnavailable => ErrorType::LinkUnavailable,
                _ => ErrorType::ReadFailed,
            };
            return Err(Error::new(
                format!("attribute {:#06x}", attribute.attribute_id),
                format!("Read failed with result {:?}", outcome),
                error_type,
            ));
        }
        if value.len() != attribute.length {
            return Err(Error::new(
                format!("attribute {:#06x}", attribute.attribute_id),
                format!(
                    "Got response of unexpected length ({} of {} expected)",
                    value.len(),
                    attribute.length
                ),
                ErrorType::LengthMismatch,
            ));
        }

        if attribute == profile::UPTIME {
            if let Some(seconds) = attribute::decode_u32(value) {
                self.display.set_uptime_text(&seconds.to_string());
            }
        } else if attribute == profile::ALTITUDE {
            if let Some(raw) = attribute::decode_u32(value) {
                log::debug!("Altitude sample {}", raw);
                let update = self.state.engine.accept(raw);
                self.display.set_trend_value(&update.average.to_string());
                self.display.set_trend_direction(update.trend);
            }
        } else {
            log::debug!(
                "Completion for unhandled attribute {:#06x}",
                attribute.attribute_id
            );
        }
        return Ok(());
    }

    fn poll_altitude(&mut self) -> Result<(), Error> {
        if !self.state.connected {
            log::debug!(
                "Altitude poll skipped, service {:#06x} unavailable",
                profile::SERVICE_ID
            );
            return Ok(());
        }
        return self.link.read(profile::ALTITUDE);
    }
}

fn clock_text<T: Timelike>(time: &T) -> String {
    return format!("{:02}:{:02}", time.hour(), time.minute());
}

fn until_next_minute() -> Duration {
    let now = Local::now();
    return Duration::from_secs(u64::from(60 - now.second()));
}
