use crate::event::EventSender;
use crate::layers::NetworkLayer;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::VecDeque;
use std::sync::OnceLock;
use tokio::sync::Mutex;
use tracing::info;

/// A network layer that records what the engine does with it: payloads handed down are
///  served from a queue, deliveries and granted credit are tracked. For tests that drive
///  the engine directly.
pub struct TrackingNetworkLayer {
    outbound: Mutex<VecDeque<Bytes>>,
    delivered: Mutex<Vec<Bytes>>,
    granted_credits: Mutex<u32>,
}

impl TrackingNetworkLayer {
    pub fn new() -> TrackingNetworkLayer {
        TrackingNetworkLayer {
            outbound: Default::default(),
            delivered: Default::default(),
            granted_credits: Mutex::new(0),
        }
    }

    pub async fn queue_outbound(&self, payload: Bytes) {
        self.outbound.lock().await.push_back(payload);
    }

    pub async fn delivered(&self) -> Vec<Bytes> {
        self.delivered.lock().await.clone()
    }

    pub async fn granted_credits(&self) -> u32 {
        *self.granted_credits.lock().await
    }
}

#[async_trait]
impl NetworkLayer for TrackingNetworkLayer {
    async fn take_next_outbound(&self) -> Bytes {
        self.outbound
            .lock()
            .await
            .pop_front()
            .expect("engine pulled an outbound packet that was never queued")
    }

    async fn deliver(&self, payload: Bytes) {
        self.delivered.lock().await.push(payload);
    }

    async fn grant_credit(&self, credits: u32) {
        *self.granted_credits.lock().await += credits;
    }
}

/// A network layer for duplex simulations: queued payloads are announced to the engine as
///  `NetworkReady` events, one per unit of granted credit - the credit discipline of the
///  boundary contract. Deliveries are recorded.
pub struct ScriptedNetwork {
    events: OnceLock<EventSender>,
    /// payloads waiting for send credit
    pending: Mutex<VecDeque<Bytes>>,
    /// payloads announced via NetworkReady but not yet pulled by the engine
    announced: Mutex<VecDeque<Bytes>>,
    credits: Mutex<u32>,
    delivered: Mutex<Vec<Bytes>>,
}

impl ScriptedNetwork {
    pub fn new() -> ScriptedNetwork {
        ScriptedNetwork {
            events: OnceLock::new(),
            pending: Default::default(),
            announced: Default::default(),
            credits: Mutex::new(0),
            delivered: Default::default(),
        }
    }

    /// Connect the engine's event queue. Must happen before credit is granted.
    pub fn connect(&self, events: EventSender) {
        if self.events.set(events).is_err() {
            info!("network layer is already connected - ignoring");
        }
    }

    pub async fn queue_outbound(&self, payload: Bytes) {
        self.pending.lock().await.push_back(payload);
        self.pump().await;
    }

    pub async fn delivered(&self) -> Vec<Bytes> {
        self.delivered.lock().await.clone()
    }

    /// Announce queued payloads while credit is available.
    async fn pump(&self) {
        let Some(events) = self.events.get() else {
            return;
        };

        loop {
            let announced_one = {
                let mut credits = self.credits.lock().await;
                let mut pending = self.pending.lock().await;
                match pending.pop_front() {
                    Some(payload) if *credits > 0 => {
                        *credits -= 1;
                        self.announced.lock().await.push_back(payload);
                        true
                    }
                    Some(payload) => {
                        pending.push_front(payload);
                        false
                    }
                    None => false,
                }
            };

            if !announced_one {
                return;
            }
            events.network_ready().await;
        }
    }
}

#[async_trait]
impl NetworkLayer for ScriptedNetwork {
    async fn take_next_outbound(&self) -> Bytes {
        self.announced
            .lock()
            .await
            .pop_front()
            .expect("engine pulled an outbound packet that was never announced")
    }

    async fn deliver(&self, payload: Bytes) {
        self.delivered.lock().await.push(payload);
    }

    async fn grant_credit(&self, credits: u32) {
        *self.credits.lock().await += credits;
        self.pump().await;
    }
}
