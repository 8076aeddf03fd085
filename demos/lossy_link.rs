use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use swlink::config::LinkConfig;
use swlink::link::SlidingWindowLink;
use swlink::test_util::channel::LossyChannel;
use swlink::test_util::network::ScriptedNetwork;
use tokio::time::sleep;
use tracing::{info, Level};

fn init_logging() {
    tracing_subscriber::fmt()
        // .with_max_level(Level::INFO)
        .with_max_level(Level::DEBUG)
        // .with_max_level(Level::TRACE)
        .with_thread_ids(true)
        .try_init()
        .ok();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Arc::new(LinkConfig {
        retransmit_delay: Duration::from_millis(50),
        ack_delay: Duration::from_millis(20),
        event_queue_capacity: 1024,
    });

    let net_a = Arc::new(ScriptedNetwork::new());
    let net_b = Arc::new(ScriptedNetwork::new());
    let a_to_b = Arc::new(LossyChannel::new(0.2, 0.05, 12345));
    let b_to_a = Arc::new(LossyChannel::new(0.2, 0.05, 54321));

    let link_a = SlidingWindowLink::new(config.clone(), net_a.clone(), a_to_b.clone())?;
    let link_b = SlidingWindowLink::new(config, net_b.clone(), b_to_a.clone())?;

    a_to_b.connect(link_b.event_sender());
    b_to_a.connect(link_a.event_sender());
    net_a.connect(link_a.event_sender());
    net_b.connect(link_b.event_sender());

    tokio::spawn(link_a.run());
    tokio::spawn(link_b.run());

    for tag in 0u8..16 {
        net_a.queue_outbound(Bytes::from(vec![0xaa, tag])).await;
        net_b.queue_outbound(Bytes::from(vec![0xbb, tag])).await;
    }

    sleep(Duration::from_secs(2)).await;

    info!("a delivered {} packets: {:?}", net_a.delivered().await.len(), net_a.delivered().await);
    info!("b delivered {} packets: {:?}", net_b.delivered().await.len(), net_b.delivered().await);

    Ok(())
}
