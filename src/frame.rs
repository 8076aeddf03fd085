use crate::seq::SeqNr;
use bytes::Bytes;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum FrameKind {
    Data,
    Ack,
    Nak,
}

/// A frame as handed to / received from the channel. The engine works at the frame-object
///  level; serialization to bytes on the wire is the channel's concern.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Frame {
    pub kind: FrameKind,
    /// only meaningful for data frames
    pub seq: SeqNr,
    /// Piggybacked cumulative acknowledgement: the highest sequence number up to which
    ///  everything was received in order.
    pub ack: SeqNr,
    /// present only for data frames
    pub payload: Option<Bytes>,
}

impl Frame {
    pub fn data(seq: SeqNr, ack: SeqNr, payload: Bytes) -> Frame {
        Frame {
            kind: FrameKind::Data,
            seq,
            ack,
            payload: Some(payload),
        }
    }

    pub fn ack(ack: SeqNr) -> Frame {
        Frame {
            kind: FrameKind::Ack,
            seq: SeqNr::ZERO,
            ack,
            payload: None,
        }
    }

    pub fn nak(ack: SeqNr) -> Frame {
        Frame {
            kind: FrameKind::Nak,
            seq: SeqNr::ZERO,
            ack,
            payload: None,
        }
    }
}
