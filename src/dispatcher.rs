use crate::frame::Frame;
use crate::layers::PhysicalLayer;
use crate::seq::SeqNr;
use crate::timer::TimerTable;
use crate::window::SendWindow;
use std::sync::Arc;
use tracing::trace;

/// Builds outgoing frames and owns the side effects of transmission: the piggybacked ack
///  field, the NAK gate, the retransmission timer start and the deferred-ack timer cancel.
///
/// Every outgoing frame acknowledges `frame_expected.prev()` - "everything up to here was
///  received in order" - so any transmission makes a pending bare ack redundant.
pub struct FrameDispatcher {
    physical: Arc<dyn PhysicalLayer>,
    timers: TimerTable,
    /// true while no NAK is outstanding for the current run of damage
    no_nak: bool,
}

impl FrameDispatcher {
    pub fn new(physical: Arc<dyn PhysicalLayer>, timers: TimerTable) -> FrameDispatcher {
        FrameDispatcher {
            physical,
            timers,
            no_nak: true,
        }
    }

    pub fn nak_gate_open(&self) -> bool {
        self.no_nak
    }

    /// A frame was delivered in order - the next run of damage may be NAK'ed again.
    pub fn reset_nak_gate(&mut self) {
        self.no_nak = true;
    }

    pub fn stop_retransmit(&mut self, seq: SeqNr) {
        self.timers.stop_retransmit(seq);
    }

    pub fn start_ack_timer(&mut self) {
        self.timers.start_ack();
    }

    /// (Re)send the data frame at `seq` from the outbound buffer, piggybacking the ack for
    ///  everything before `frame_expected`, and (re)start the frame's retransmission timer.
    pub async fn send_data(&mut self, seq: SeqNr, frame_expected: SeqNr, send_window: &SendWindow) {
        let frame = Frame::data(seq, frame_expected.prev(), send_window.payload(seq));
        trace!("transmitting {:?}", frame);
        self.physical.transmit(frame).await;

        self.timers.start_retransmit(seq);
        self.timers.stop_ack();
    }

    /// Send a bare ack frame for everything before `frame_expected`.
    pub async fn send_ack(&mut self, frame_expected: SeqNr) {
        let frame = Frame::ack(frame_expected.prev());
        trace!("transmitting {:?}", frame);
        self.physical.transmit(frame).await;

        self.timers.stop_ack();
    }

    /// Send a NAK requesting retransmission of `frame_expected`, closing the NAK gate so
    ///  the same run of damage is not NAK'ed twice.
    pub async fn send_nak(&mut self, frame_expected: SeqNr) {
        self.no_nak = false;

        let frame = Frame::nak(frame_expected.prev());
        trace!("transmitting {:?}", frame);
        self.physical.transmit(frame).await;

        self.timers.stop_ack();
    }
}
