use crate::event::EventSender;
use crate::seq::{SeqNr, WINDOW_SIZE};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time;

/// The one-shot timers owned by the engine: one retransmission timer per send-window slot
///  and a single deferred-ack timer.
///
/// A timer is a spawned task that sleeps and then enqueues its event; it never touches
///  protocol state. Starting a timer for a slot that already has one running replaces the
///  old one, so there are never two live timers for a slot. Cancellation aborts the task;
///  an event that was already enqueued when the timer was cancelled is handled as a no-op
///  by the engine.
pub struct TimerTable {
    events: EventSender,
    retransmit_delay: Duration,
    ack_delay: Duration,
    retransmit: [Option<JoinHandle<()>>; WINDOW_SIZE],
    ack: Option<JoinHandle<()>>,
}

impl Drop for TimerTable {
    fn drop(&mut self) {
        for handle in self.retransmit.iter().flatten() {
            handle.abort();
        }
        if let Some(handle) = &self.ack {
            handle.abort();
        }
    }
}

impl TimerTable {
    pub fn new(events: EventSender, retransmit_delay: Duration, ack_delay: Duration) -> TimerTable {
        TimerTable {
            events,
            retransmit_delay,
            ack_delay,
            retransmit: Default::default(),
            ack: None,
        }
    }

    /// (Re)start the retransmission timer for `seq`, cancelling a running one first.
    pub fn start_retransmit(&mut self, seq: SeqNr) {
        self.stop_retransmit(seq);

        let events = self.events.clone();
        let delay = self.retransmit_delay;
        self.retransmit[seq.slot()] = Some(tokio::spawn(async move {
            time::sleep(delay).await;
            events.retransmit_timeout(seq).await;
        }));
    }

    pub fn stop_retransmit(&mut self, seq: SeqNr) {
        if let Some(handle) = self.retransmit[seq.slot()].take() {
            handle.abort();
        }
    }

    /// (Re)start the deferred-ack timer, cancelling a running one first.
    pub fn start_ack(&mut self) {
        self.stop_ack();

        let events = self.events.clone();
        let delay = self.ack_delay;
        self.ack = Some(tokio::spawn(async move {
            time::sleep(delay).await;
            events.ack_timeout().await;
        }));
    }

    pub fn stop_ack(&mut self) {
        if let Some(handle) = self.ack.take() {
            handle.abort();
        }
    }
}
