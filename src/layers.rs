use crate::frame::Frame;
use async_trait::async_trait;
use bytes::Bytes;
#[cfg(test)] use mockall::automock;

/// The layer above the link. The engine pulls outbound packets from it and pushes
///  completed inbound packets up to it.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait NetworkLayer: Send + Sync + 'static {
    /// Fetch the next outbound packet. Called only in response to a `NetworkReady` event,
    ///  i.e. only after credit for it was granted.
    async fn take_next_outbound(&self) -> Bytes;

    /// Hand a completed packet up. Called exactly once per sequence number, in strictly
    ///  increasing sequence order, no gaps, no duplicates.
    async fn deliver(&self, payload: Bytes);

    /// Grant permission to offer `credits` more outbound packets: the full window size at
    ///  start-up, then one unit each time the send window slides forward.
    async fn grant_credit(&self, credits: u32);
}

/// The channel below the link. It may deliver a transmitted frame unmodified, drop it,
///  or deliver it damaged - surfaced to the peer as a `ChecksumError` event.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PhysicalLayer: Send + Sync + 'static {
    async fn transmit(&self, frame: Frame);
}
