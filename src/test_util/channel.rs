use crate::event::EventSender;
use crate::frame::Frame;
use crate::layers::PhysicalLayer;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use std::sync::OnceLock;
use tokio::sync::Mutex;
use tracing::{debug, trace, warn};

/// A physical layer that records every transmitted frame and forwards nothing. For tests
///  that drive the engine directly and assert on its outgoing traffic.
pub struct TrackingPhysicalLayer {
    transmitted: Mutex<Vec<Frame>>,
}

impl TrackingPhysicalLayer {
    pub fn new() -> TrackingPhysicalLayer {
        TrackingPhysicalLayer {
            transmitted: Default::default(),
        }
    }

    pub async fn transmitted(&self) -> Vec<Frame> {
        self.transmitted.lock().await.clone()
    }
}

#[async_trait]
impl PhysicalLayer for TrackingPhysicalLayer {
    async fn transmit(&self, frame: Frame) {
        self.transmitted.lock().await.push(frame);
    }
}

/// An in-memory simulated channel: each transmitted frame is delivered to the connected
///  peer engine, dropped, or turned into a checksum error, per configured probabilities.
///
/// The random number generator is seeded so a simulation run is reproducible.
pub struct LossyChannel {
    /// probability that a frame is lost without a trace
    loss_probability: f64,
    /// probability that a frame arrives damaged, surfacing as a checksum error
    corruption_probability: f64,
    rng: Mutex<StdRng>,
    peer: OnceLock<EventSender>,
}

impl LossyChannel {
    pub fn new(loss_probability: f64, corruption_probability: f64, seed: u64) -> LossyChannel {
        LossyChannel {
            loss_probability,
            corruption_probability,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            peer: OnceLock::new(),
        }
    }

    /// a channel that delivers every frame intact
    pub fn perfect() -> LossyChannel {
        LossyChannel::new(0.0, 0.0, 0)
    }

    /// Connect the receiving end. Frames transmitted before this are dropped.
    pub fn connect(&self, peer: EventSender) {
        if self.peer.set(peer).is_err() {
            warn!("channel is already connected - ignoring");
        }
    }

    async fn roll(&self) -> f64 {
        self.rng.lock().await.random()
    }
}

#[async_trait]
impl PhysicalLayer for LossyChannel {
    async fn transmit(&self, frame: Frame) {
        let Some(peer) = self.peer.get() else {
            warn!("channel is not connected - dropping frame");
            return;
        };

        let roll = self.roll().await;
        if roll < self.corruption_probability {
            debug!("channel damaged {:?}", frame);
            peer.checksum_error().await;
        } else if roll < self.corruption_probability + self.loss_probability {
            debug!("channel dropped {:?}", frame);
        } else {
            trace!("channel delivered {:?}", frame);
            peer.frame_arrived(frame).await;
        }
    }
}
