use anyhow::bail;
use std::time::Duration;

pub struct LinkConfig {
    /// Delay after which an unacknowledged data frame is retransmitted. Configure to
    ///  comfortably above the round-trip time of the channel plus the peer's ack delay,
    ///  otherwise every frame is sent twice.
    pub retransmit_delay: Duration,

    /// Grace period for piggybacking an acknowledgement on an outbound data frame before
    ///  a bare ack frame is sent instead. Must be shorter than `retransmit_delay`: a peer
    ///  waiting for a bare ack must not time out first.
    pub ack_delay: Duration,

    /// Capacity of the serialized event queue that funnels channel arrivals and timer
    ///  expirations into the engine. Enqueueing blocks when the queue is full, so this
    ///  only bounds memory, it never drops events.
    pub event_queue_capacity: usize,
}

impl LinkConfig {
    /// Timing as used on links with round-trip times well below 100ms.
    pub fn default_timing() -> LinkConfig {
        LinkConfig {
            retransmit_delay: Duration::from_millis(200),
            ack_delay: Duration::from_millis(100),
            event_queue_capacity: 1024,
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.ack_delay >= self.retransmit_delay {
            bail!("ack delay must be shorter than the retransmit delay");
        }
        if self.event_queue_capacity == 0 {
            bail!("event queue capacity must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case::default_timing(200, 100, 1024, true)]
    #[case::ack_equals_retransmit(200, 200, 1024, false)]
    #[case::ack_above_retransmit(100, 200, 1024, false)]
    #[case::zero_queue(200, 100, 0, false)]
    fn test_validate(
        #[case] retransmit_millis: u64,
        #[case] ack_millis: u64,
        #[case] event_queue_capacity: usize,
        #[case] expected_ok: bool,
    ) {
        let config = LinkConfig {
            retransmit_delay: Duration::from_millis(retransmit_millis),
            ack_delay: Duration::from_millis(ack_millis),
            event_queue_capacity,
        };
        assert_eq!(config.validate().is_ok(), expected_ok);
    }
}
