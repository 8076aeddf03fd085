use crate::config::LinkConfig;
use crate::dispatcher::FrameDispatcher;
use crate::event::{EventSender, LinkEvent};
use crate::frame::{Frame, FrameKind};
use crate::layers::{NetworkLayer, PhysicalLayer};
use crate::seq::{SeqNr, WINDOW_SIZE};
use crate::timer::TimerTable;
use crate::window::{ReceiveWindow, SendWindow};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

/// The protocol engine: a selective-repeat sliding window with piggybacked acks and
///  NAK-triggered fast retransmission.
///
/// All window, buffer and timer state lives here and is mutated only by the single
///  consumer of the event queue. The channel environment, the layer above and the timer
///  tasks communicate with the engine exclusively by enqueueing events through an
///  [EventSender], so the core needs no locking.
pub struct SlidingWindowLink {
    network: Arc<dyn NetworkLayer>,
    event_tx: EventSender,
    event_rx: mpsc::Receiver<LinkEvent>,
    dispatcher: FrameDispatcher,
    send_window: SendWindow,
    receive_window: ReceiveWindow,
}

impl SlidingWindowLink {
    pub fn new(
        config: Arc<LinkConfig>,
        network: Arc<dyn NetworkLayer>,
        physical: Arc<dyn PhysicalLayer>,
    ) -> anyhow::Result<SlidingWindowLink> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.event_queue_capacity);
        let events = EventSender::new(tx);
        let timers = TimerTable::new(events.clone(), config.retransmit_delay, config.ack_delay);

        Ok(SlidingWindowLink {
            network,
            event_tx: events,
            event_rx: rx,
            dispatcher: FrameDispatcher::new(physical, timers),
            send_window: SendWindow::new(),
            receive_window: ReceiveWindow::new(),
        })
    }

    /// The enqueue handle for the channel environment and the layer above.
    pub fn event_sender(&self) -> EventSender {
        self.event_tx.clone()
    }

    /// Run the engine for the lifetime of the link: grant the initial send credit, then
    ///  consume events one at a time in arrival order.
    pub async fn run(mut self) {
        self.network.grant_credit(WINDOW_SIZE as u32).await;

        while let Some(event) = self.event_rx.recv().await {
            self.on_event(event).await;
        }
        debug!("all event senders are gone - stopping the engine");
    }

    async fn on_event(&mut self, event: LinkEvent) {
        match event {
            LinkEvent::NetworkReady => self.on_network_ready().await,
            LinkEvent::FrameArrived(frame) => self.on_frame(frame).await,
            LinkEvent::ChecksumError => self.on_checksum_error().await,
            LinkEvent::RetransmitTimeout(seq) => self.on_retransmit_timeout(seq).await,
            LinkEvent::AckTimeout => self.on_ack_timeout().await,
        }
    }

    /// Accept, buffer and transmit a fresh outbound frame.
    async fn on_network_ready(&mut self) {
        if self.send_window.is_full() {
            warn!("network layer signalled ready with a full send window - ignoring");
            return;
        }

        let payload = self.network.take_next_outbound().await;
        let seq = self.send_window.accept(payload);
        trace!("accepted outbound payload as frame {}", seq);

        self.dispatcher
            .send_data(seq, self.receive_window.frame_expected(), &self.send_window)
            .await;
    }

    async fn on_frame(&mut self, frame: Frame) {
        match frame.kind {
            FrameKind::Data => self.on_data_frame(&frame).await,
            FrameKind::Nak => {
                // the peer is missing the frame after the one it acknowledges
                let missing = frame.ack.next();
                if self.send_window.is_outstanding(missing) {
                    debug!("peer NAK'ed frame {} - retransmitting", missing);
                    self.dispatcher
                        .send_data(missing, self.receive_window.frame_expected(), &self.send_window)
                        .await;
                }
            }
            FrameKind::Ack => {}
        }

        // every frame kind carries a piggybacked cumulative ack
        self.process_piggyback_ack(frame.ack).await;
    }

    async fn on_data_frame(&mut self, frame: &Frame) {
        let Some(payload) = &frame.payload else {
            warn!("data frame {} without payload - discarding", frame.seq);
            return;
        };

        if frame.seq != self.receive_window.frame_expected() && self.dispatcher.nak_gate_open() {
            debug!(
                "received frame {} while expecting {} - requesting retransmission",
                frame.seq,
                self.receive_window.frame_expected()
            );
            self.dispatcher
                .send_nak(self.receive_window.frame_expected())
                .await;
        } else {
            self.dispatcher.start_ack_timer();
        }

        if self.receive_window.accepts(frame.seq) {
            self.receive_window.store(frame.seq, payload.clone());

            // deliver everything that is now contiguous at the lower window edge
            while let Some(payload) = self.receive_window.pop_next() {
                self.network.deliver(payload).await;
                self.dispatcher.reset_nak_gate();
                self.dispatcher.start_ack_timer();
            }
        }
    }

    /// Slide the send window past everything the piggybacked ack confirms, stopping the
    ///  retransmission timers and granting fresh send credit as it moves.
    async fn process_piggyback_ack(&mut self, ack: SeqNr) {
        for seq in self.send_window.acknowledge(ack) {
            self.dispatcher.stop_retransmit(seq);
            self.network.grant_credit(1).await;
            trace!(
                "frame {} acknowledged - send window now starts at {}",
                seq,
                self.send_window.ack_expected()
            );
        }
    }

    async fn on_checksum_error(&mut self) {
        if self.dispatcher.nak_gate_open() {
            debug!("damaged frame on the channel - requesting retransmission");
            self.dispatcher
                .send_nak(self.receive_window.frame_expected())
                .await;
        }
    }

    /// The retransmission timer for `seq` fired: resend exactly that frame.
    async fn on_retransmit_timeout(&mut self, seq: SeqNr) {
        if !self.send_window.is_outstanding(seq) {
            // the ack arrived while the timeout event was already queued
            debug!("retransmit timeout for {} which is not outstanding - ignoring", seq);
            return;
        }

        debug!("retransmit timeout for frame {}", seq);
        self.dispatcher
            .send_data(seq, self.receive_window.frame_expected(), &self.send_window)
            .await;
    }

    /// No outbound data frame carried the ack within the grace period - send it bare.
    async fn on_ack_timeout(&mut self) {
        trace!("ack timer expired - sending a bare ack");
        self.dispatcher
            .send_ack(self.receive_window.frame_expected())
            .await;
    }
}
