//! A link-layer reliability protocol engine: it delivers packets across an unreliable
//!  channel - frames may be lost or corrupted - guaranteeing in-order, duplicate-free,
//!  loss-recovering delivery to the layer above, with several frames in flight at once.
//!
//! ## Design
//!
//! * Selective repeat over a circular sequence space of 8, window size 4
//!   * only the specific lost or timed-out frame is resent, never the whole window
//!   * the receiver buffers up to a window of out-of-order frames and delivers them
//!     upward as soon as they become contiguous
//! * Acknowledgements are piggybacked on every outgoing frame
//!   * a deferred-ack timer sends a bare ack frame only when no outbound data frame
//!     came along to carry it
//! * Negative acknowledgements shortcut the retransmission timer
//!   * one NAK per run of damage: the gate reopens on the next in-order delivery
//! * One retransmission timer per outstanding frame, restarted on every (re)send
//! * The engine is a single event-queue consumer
//!   * channel arrivals and timer expirations are funnelled into one `mpsc` queue and
//!     processed strictly one at a time, so the protocol state needs no locking
//!   * timer tasks and the channel environment communicate with the engine exclusively
//!     through [event::EventSender]
//! * The boundaries above and below are traits
//!   * [layers::NetworkLayer] pulls outbound packets (credit-gated) and takes deliveries
//!   * [layers::PhysicalLayer] accepts frames for transmission; the channel decides
//!     whether they arrive intact, damaged, or not at all
//!
//! The engine works at the frame-object level; serialization of frames to bytes on a
//!  wire is the channel's concern, as is checksum verification - corruption surfaces
//!  as a checksum-error event, not as a damaged payload.

pub mod config;
pub mod dispatcher;
pub mod event;
pub mod frame;
pub mod layers;
pub mod link;
pub mod seq;
pub mod test_util;
pub mod timer;
pub mod window;
