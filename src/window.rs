use crate::seq::{between, SeqNr, SEQ_SPACE, WINDOW_SIZE};
use bytes::Bytes;

/// Sender-side window state: the circular half-open interval `[ack_expected,
///  next_frame_to_send)` of outstanding frames, plus the outbound payload buffers keyed
///  by `seq mod WINDOW_SIZE`.
pub struct SendWindow {
    /// lower window edge: the oldest frame not yet acknowledged
    ack_expected: SeqNr,
    /// upper window edge: the sequence number the next fresh frame will get
    next_frame_to_send: SeqNr,
    out_buf: [Option<Bytes>; WINDOW_SIZE],
}

impl SendWindow {
    pub fn new() -> SendWindow {
        SendWindow {
            ack_expected: SeqNr::ZERO,
            next_frame_to_send: SeqNr::ZERO,
            out_buf: Default::default(),
        }
    }

    pub fn ack_expected(&self) -> SeqNr {
        self.ack_expected
    }

    pub fn next_frame_to_send(&self) -> SeqNr {
        self.next_frame_to_send
    }

    /// number of frames sent but not yet acknowledged
    pub fn in_flight(&self) -> usize {
        ((SEQ_SPACE + self.next_frame_to_send.to_raw() - self.ack_expected.to_raw()) % SEQ_SPACE)
            as usize
    }

    pub fn is_full(&self) -> bool {
        self.in_flight() >= WINDOW_SIZE
    }

    /// Store a fresh outbound payload in the next slot, advancing the upper window edge.
    ///  Returns the sequence number assigned to the new frame.
    pub fn accept(&mut self, payload: Bytes) -> SeqNr {
        let seq = self.next_frame_to_send;
        self.out_buf[seq.slot()] = Some(payload);
        self.next_frame_to_send = seq.next();
        seq
    }

    /// Is `seq` sent but not yet acknowledged?
    pub fn is_outstanding(&self, seq: SeqNr) -> bool {
        between(self.ack_expected, seq, self.next_frame_to_send)
    }

    /// Buffered payload of an outstanding frame, for (re)transmission.
    pub fn payload(&self, seq: SeqNr) -> Bytes {
        self.out_buf[seq.slot()]
            .clone()
            .expect("outstanding frame without a buffered payload")
    }

    /// Slide the lower window edge past everything `ack` cumulatively confirms, freeing
    ///  the buffer slots. Returns the newly acknowledged sequence numbers, oldest first.
    pub fn acknowledge(&mut self, ack: SeqNr) -> Vec<SeqNr> {
        let mut acked = Vec::new();
        while between(self.ack_expected, ack, self.next_frame_to_send) {
            let seq = self.ack_expected;
            self.out_buf[seq.slot()] = None;
            self.ack_expected = seq.next();
            acked.push(seq);
        }
        acked
    }
}

/// Receiver-side window state: the circular half-open interval `[frame_expected, too_far)`
///  of sequence numbers the receiver buffers out of order, with a per-slot arrived flag
///  and the inbound payload buffers.
pub struct ReceiveWindow {
    /// lower window edge: the next frame to deliver upward
    frame_expected: SeqNr,
    /// upper window edge, always `frame_expected + WINDOW_SIZE`
    too_far: SeqNr,
    arrived: [bool; WINDOW_SIZE],
    in_buf: [Option<Bytes>; WINDOW_SIZE],
}

impl ReceiveWindow {
    pub fn new() -> ReceiveWindow {
        ReceiveWindow {
            frame_expected: SeqNr::ZERO,
            too_far: SeqNr::from_raw(WINDOW_SIZE as u8),
            arrived: [false; WINDOW_SIZE],
            in_buf: Default::default(),
        }
    }

    pub fn frame_expected(&self) -> SeqNr {
        self.frame_expected
    }

    /// Frames may be accepted in any order within the window, but each sequence number
    ///  only once.
    pub fn accepts(&self, seq: SeqNr) -> bool {
        between(self.frame_expected, seq, self.too_far) && !self.arrived[seq.slot()]
    }

    pub fn store(&mut self, seq: SeqNr, payload: Bytes) {
        self.arrived[seq.slot()] = true;
        self.in_buf[seq.slot()] = Some(payload);
    }

    /// Take the next in-order payload if it has arrived, advancing both window edges.
    pub fn pop_next(&mut self) -> Option<Bytes> {
        let slot = self.frame_expected.slot();
        if !self.arrived[slot] {
            return None;
        }
        self.arrived[slot] = false;
        let payload = self.in_buf[slot]
            .take()
            .expect("arrived slot without a buffered payload");
        self.frame_expected = self.frame_expected.next();
        self.too_far = self.too_far.next();
        Some(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    fn payload(tag: u8) -> Bytes {
        Bytes::from(vec![tag])
    }

    #[test]
    fn test_send_window_accept_assigns_sequential_numbers() {
        let mut window = SendWindow::new();
        assert_eq!(window.in_flight(), 0);

        for expected in 0..WINDOW_SIZE as u8 {
            assert!(!window.is_full());
            let seq = window.accept(payload(expected));
            assert_eq!(seq, SeqNr::from_raw(expected));
            assert!(window.is_outstanding(seq));
            assert_eq!(window.payload(seq), payload(expected));
        }
        assert!(window.is_full());
        assert_eq!(window.in_flight(), WINDOW_SIZE);
    }

    #[rstest]
    #[case::first(0, vec![0])]
    #[case::partial(1, vec![0, 1])]
    #[case::all(3, vec![0, 1, 2, 3])]
    #[case::stale(7, vec![])]
    fn test_send_window_acknowledge(#[case] ack: u8, #[case] expected_acked: Vec<u8>) {
        let mut window = SendWindow::new();
        for tag in 0..WINDOW_SIZE as u8 {
            window.accept(payload(tag));
        }

        let acked = window.acknowledge(SeqNr::from_raw(ack));

        let expected = expected_acked
            .iter()
            .map(|&raw| SeqNr::from_raw(raw))
            .collect::<Vec<_>>();
        assert_eq!(acked, expected);
        assert_eq!(window.in_flight(), WINDOW_SIZE - expected.len());
        assert_eq!(window.ack_expected(), SeqNr::from_raw(ack).next());
        for seq in expected {
            assert!(!window.is_outstanding(seq));
        }
    }

    #[test]
    fn test_send_window_wraps_around_the_sequence_space() {
        let mut window = SendWindow::new();

        // cycle through more than one full sequence space, acknowledging as we go
        for round in 0..2 * SEQ_SPACE {
            let seq = window.accept(payload(round));
            assert_eq!(seq, SeqNr::from_raw(round % SEQ_SPACE));
            assert_eq!(window.acknowledge(seq), vec![seq]);
        }
        assert_eq!(window.next_frame_to_send(), SeqNr::ZERO);
        assert_eq!(window.in_flight(), 0);
    }

    #[test]
    fn test_receive_window_in_order() {
        let mut window = ReceiveWindow::new();

        for raw in 0..SEQ_SPACE {
            let seq = SeqNr::from_raw(raw);
            assert_eq!(window.frame_expected(), seq);
            assert!(window.accepts(seq));
            window.store(seq, payload(raw));
            assert_eq!(window.pop_next(), Some(payload(raw)));
            assert_eq!(window.pop_next(), None);
        }
        assert_eq!(window.frame_expected(), SeqNr::ZERO);
    }

    #[test]
    fn test_receive_window_buffers_out_of_order_and_drains_in_order() {
        let mut window = ReceiveWindow::new();

        window.store(SeqNr::from_raw(2), payload(2));
        window.store(SeqNr::from_raw(1), payload(1));
        assert_eq!(window.pop_next(), None);

        window.store(SeqNr::from_raw(0), payload(0));
        assert_eq!(window.pop_next(), Some(payload(0)));
        assert_eq!(window.pop_next(), Some(payload(1)));
        assert_eq!(window.pop_next(), Some(payload(2)));
        assert_eq!(window.pop_next(), None);
        assert_eq!(window.frame_expected(), SeqNr::from_raw(3));
    }

    #[rstest]
    #[case::expected(0, 0, true)]
    #[case::ahead_inside(0, 3, true)]
    #[case::just_outside(0, 4, false)]
    #[case::old(2, 1, false)]
    #[case::window_straddles_wrap_inside(6, 1, true)]
    #[case::window_straddles_wrap_outside(6, 2, false)]
    fn test_receive_window_admission(
        #[case] frame_expected: u8,
        #[case] seq: u8,
        #[case] expected: bool,
    ) {
        let mut window = ReceiveWindow::new();
        // advance the window by delivering everything up to `frame_expected`
        for raw in 0..frame_expected {
            window.store(SeqNr::from_raw(raw), payload(raw));
            window.pop_next();
        }

        assert_eq!(window.accepts(SeqNr::from_raw(seq)), expected);
    }

    #[test]
    fn test_receive_window_rejects_duplicate_buffered_frame() {
        let mut window = ReceiveWindow::new();

        assert!(window.accepts(SeqNr::from_raw(2)));
        window.store(SeqNr::from_raw(2), payload(2));
        assert!(!window.accepts(SeqNr::from_raw(2)));

        // other window slots are unaffected
        assert!(window.accepts(SeqNr::from_raw(1)));
        assert!(window.accepts(SeqNr::from_raw(3)));
    }

    #[test]
    fn test_receive_window_delivers_across_the_wrap_boundary() {
        let mut window = ReceiveWindow::new();
        for raw in 0..6 {
            window.store(SeqNr::from_raw(raw), payload(raw));
            window.pop_next();
        }

        // arrivals 6, 7, 0, 1 must not be misclassified as old duplicates
        for raw in [6u8, 7, 0, 1] {
            let seq = SeqNr::from_raw(raw);
            assert!(window.accepts(seq));
            window.store(seq, payload(raw));
            assert_eq!(window.pop_next(), Some(payload(raw)));
        }
        assert_eq!(window.frame_expected(), SeqNr::from_raw(2));
    }
}
