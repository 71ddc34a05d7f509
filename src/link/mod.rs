mod sim;
mod transport;

use std::sync::Arc;

use futures::channel::oneshot;
use tokio::sync::mpsc::{self, Sender};

use crate::{
    error::{Error, ErrorType},
    strap::{attribute::AttributeDescriptor, link_event::LinkEvent, outcome::LinkOutcome},
};

pub use self::sim::SimStrap;
pub use self::transport::{LinkTransport, ReadReply, TransportEvent};

pub struct LinkClient {
    transport: Arc<dyn LinkTransport>,
    sender_tx: Sender<LinkEvent>,
    // stops the forwarding task on drop
    _drop_tx: oneshot::Sender<()>,
}

impl LinkClient {
    // Must be called from within a Tokio runtime.
    pub fn new(transport: Arc<dyn LinkTransport>, sender_tx: Sender<LinkEvent>) -> Self {
        let (event_tx, mut event_rx) = mpsc::channel::<TransportEvent>(32);
        transport.attach_events(event_tx);

        let (_drop_tx, drop_rx) = oneshot::channel();
        let sender = sender_tx.clone();
        tokio::spawn(async move {
            let pump = async {
                while let Some(event) = event_rx.recv().await {
                    let forwarded = match event {
                        TransportEvent::AvailabilityChanged {
                            service_id,
                            available,
                        } => LinkEvent::AvailabilityChanged {
                            service_id,
                            available,
                        },
                        TransportEvent::Notified { attribute } => {
                            LinkEvent::Notified { attribute }
                        }
                    };
                    if let Err(err) = sender.send(forwarded).await {
                        log::error!("Error forwarding link event: {:?}", err);
                    }
                }
            };
            tokio::select! {
                _ = pump => {},
                _ = drop_rx => {},
            }
        });

        return LinkClient {
            transport,
            sender_tx,
            _drop_tx,
        };
    }

    pub async fn service_available(&self, service_id: u16) -> bool {
        return self.transport.service_available(service_id).await;
    }

    // Fire-and-forget; the completion arrives as a ReadCompleted event once
    // the link answers.
    pub fn read(&self, attribute: AttributeDescriptor) -> Result<(), Error> {
        if self.sender_tx.is_closed() {
            return Err(Error::from_type(ErrorType::ChannelError));
        }
        let transport = self.transport.clone();
        let sender = self.sender_tx.clone();
        tokio::spawn(async move {
            let reply = transport.read(attribute).await;
            let completed = LinkEvent::ReadCompleted {
                attribute,
                outcome: reply.outcome,
                value: reply.value,
            };
            if let Err(err) = sender.send(completed).await {
                log::error!("Error delivering read completion: {:?}", err);
            }
        });
        return Ok(());
    }

    // A failed begin aborts before any byte is handed to the transport.
    pub async fn write(&self, attribute: AttributeDescriptor, payload: &[u8]) -> Result<(), Error> {
        if payload.len() != attribute.length {
            return Err(Error::from_string(
                format!(
                    "Payload of {} bytes for attribute {:#06x} with fixed length {}",
                    payload.len(),
                    attribute.attribute_id,
                    attribute.length
                ),
                ErrorType::LengthMismatch,
            ));
        }

        let begun = self.transport.begin_write(attribute).await;
        if begun != LinkOutcome::Ok {
            log::error!("Begin write failed with result {:?}", begun);
            return Err(Error::from_string(
                format!("Begin write resolved {:?}", begun),
                ErrorType::WriteFailed,
            ));
        }

        let ended = self.transport.end_write(attribute, payload).await;
        if ended != LinkOutcome::Ok {
            log::error!("End write failed with result {:?}", ended);
            return Err(Error::from_string(
                format!("End write resolved {:?}", ended),
                ErrorType::WriteFailed,
            ));
        }

        return Ok(());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::strap::profile;

    #[derive(Debug, Default)]
    struct ScriptedTransport {
        begin_outcome: Option<LinkOutcome>,
        read_value: Vec<u8>,
        begins: Mutex<Vec<AttributeDescriptor>>,
        ends: Mutex<Vec<(AttributeDescriptor, Vec<u8>)>>,
        reads: Mutex<Vec<AttributeDescriptor>>,
        events: Mutex<Option<Sender<TransportEvent>>>,
    }

    impl ScriptedTransport {
        fn new() -> Self {
            Self::default()
        }

        fn with_begin_outcome(mut self, outcome: LinkOutcome) -> Self {
            self.begin_outcome = Some(outcome);
            self
        }

        fn with_read_value(mut self, value: Vec<u8>) -> Self {
            self.read_value = value;
            self
        }

        async fn emit(&self, event: TransportEvent) {
            let sender = self
                .events
                .lock()
                .unwrap()
                .clone()
                .expect("no event sink attached");
            sender.send(event).await.unwrap();
        }
    }

    #[async_trait]
    impl LinkTransport for ScriptedTransport {
        fn attach_events(&self, events: Sender<TransportEvent>) {
            *self.events.lock().unwrap() = Some(events);
        }

        async fn service_available(&self, _service_id: u16) -> bool {
            true
        }

        async fn read(&self, attribute: AttributeDescriptor) -> ReadReply {
            self.reads.lock().unwrap().push(attribute);
            ReadReply {
                outcome: LinkOutcome::Ok,
                value: self.read_value.clone(),
            }
        }

        async fn begin_write(&self, attribute: AttributeDescriptor) -> LinkOutcome {
            self.begins.lock().unwrap().push(attribute);
            self.begin_outcome.unwrap_or(LinkOutcome::Ok)
        }

        async fn end_write(&self, attribute: AttributeDescriptor, payload: &[u8]) -> LinkOutcome {
            self.ends
                .lock()
                .unwrap()
                .push((attribute, payload.to_vec()));
            LinkOutcome::Ok
        }
    }

    #[tokio::test]
    async fn test_write_rejects_wrong_length_before_begin() {
        let transport = Arc::new(ScriptedTransport::new());
        let (tx, _rx) = mpsc::channel(8);
        let client = LinkClient::new(transport.clone(), tx);

        let result = client.write(profile::LED, &[1, 2]).await;

        let err = result.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::LengthMismatch);
        assert!(transport.begins.lock().unwrap().is_empty());
        assert!(transport.ends.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_busy_begin_skips_end_phase() {
        let transport =
            Arc::new(ScriptedTransport::new().with_begin_outcome(LinkOutcome::Busy));
        let (tx, _rx) = mpsc::channel(8);
        let client = LinkClient::new(transport.clone(), tx);

        let result = client.write(profile::LED, &[1]).await;

        let err = result.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::WriteFailed);
        assert_eq!(transport.begins.lock().unwrap().len(), 1);
        assert!(transport.ends.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_hands_full_payload_to_end_phase() {
        let transport = Arc::new(ScriptedTransport::new());
        let (tx, _rx) = mpsc::channel(8);
        let client = LinkClient::new(transport.clone(), tx);

        client.write(profile::LED, &[1]).await.unwrap();

        let ends = transport.ends.lock().unwrap();
        assert_eq!(ends.len(), 1);
        assert_eq!(ends[0].0, profile::LED);
        assert_eq!(ends[0].1, vec![1]);
    }

    #[tokio::test]
    async fn test_read_completion_arrives_on_event_channel() {
        let transport =
            Arc::new(ScriptedTransport::new().with_read_value(vec![0x2A, 0, 0, 0]));
        let (tx, mut rx) = mpsc::channel(8);
        let client = LinkClient::new(transport.clone(), tx);

        client.read(profile::ALTITUDE).unwrap();

        let event = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        match event {
            LinkEvent::ReadCompleted {
                attribute,
                outcome,
                value,
            } => {
                assert_eq!(attribute, profile::ALTITUDE);
                assert_eq!(outcome, LinkOutcome::Ok);
                assert_eq!(value, vec![0x2A, 0, 0, 0]);
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(transport.reads.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_read_after_receiver_dropped_reports_channel_error() {
        let transport = Arc::new(ScriptedTransport::new());
        let (tx, rx) = mpsc::channel(8);
        let client = LinkClient::new(transport, tx);
        drop(rx);

        let err = client.read(profile::ALTITUDE).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::ChannelError);
    }

    #[tokio::test]
    async fn test_transport_events_forwarded_as_link_events() {
        let transport = Arc::new(ScriptedTransport::new());
        let (tx, mut rx) = mpsc::channel(8);
        let _client = LinkClient::new(transport.clone(), tx);

        transport
            .emit(TransportEvent::AvailabilityChanged {
                service_id: profile::SERVICE_ID,
                available: true,
            })
            .await;
        transport
            .emit(TransportEvent::Notified {
                attribute: profile::UPTIME,
            })
            .await;

        let first = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        match first {
            LinkEvent::AvailabilityChanged {
                service_id,
                available,
            } => {
                assert_eq!(service_id, profile::SERVICE_ID);
                assert!(available);
            }
            other => panic!("unexpected event: {:?}", other),
        }

        let second = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        match second {
            LinkEvent::Notified { attribute } => assert_eq!(attribute, profile::UPTIME),
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
