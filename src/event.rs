use crate::frame::Frame;
use crate::seq::SeqNr;
use tokio::sync::mpsc;
use tracing::debug;

/// The only inputs the engine ever processes. Channel arrivals and timer expirations from
///  all sources are funnelled into a single queue of these, consumed one at a time.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum LinkEvent {
    /// The layer above has a packet ready and send credit to spend on it.
    NetworkReady,
    /// The channel delivered a frame intact.
    FrameArrived(Frame),
    /// The channel detected a damaged frame; nothing usable arrived with it.
    ChecksumError,
    /// The retransmission timer for this sequence number expired.
    RetransmitTimeout(SeqNr),
    /// The deferred-ack timer expired without an outbound data frame carrying the ack.
    AckTimeout,
}

/// The concurrency-safe enqueue path into the engine's event queue. The channel environment
///  and the layer above hold clones of this; timer tasks hold one internally. All protocol
///  state stays with the queue's single consumer - senders never touch it directly.
#[derive(Clone)]
pub struct EventSender {
    tx: mpsc::Sender<LinkEvent>,
}

impl EventSender {
    pub(crate) fn new(tx: mpsc::Sender<LinkEvent>) -> EventSender {
        EventSender { tx }
    }

    pub async fn network_ready(&self) {
        self.send(LinkEvent::NetworkReady).await;
    }

    pub async fn frame_arrived(&self, frame: Frame) {
        self.send(LinkEvent::FrameArrived(frame)).await;
    }

    pub async fn checksum_error(&self) {
        self.send(LinkEvent::ChecksumError).await;
    }

    pub(crate) async fn retransmit_timeout(&self, seq: SeqNr) {
        self.send(LinkEvent::RetransmitTimeout(seq)).await;
    }

    pub(crate) async fn ack_timeout(&self) {
        self.send(LinkEvent::AckTimeout).await;
    }

    async fn send(&self, event: LinkEvent) {
        if self.tx.send(event).await.is_err() {
            debug!("link engine is gone - dropping event");
        }
    }
}
