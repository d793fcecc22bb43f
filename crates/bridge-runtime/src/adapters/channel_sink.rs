//! Channel-backed downstream sink.

use async_trait::async_trait;
use bridge_telemetry::log_frame_event;
use bus_types::CanFrame;
use cb_01_frame_dedup::{FrameSink, SinkError};
use tokio::sync::mpsc;

/// Forwards accepted frames into a bounded tokio channel.
///
/// Applies back-pressure to the ingest task when the consumer falls behind.
/// Dropping the receiver reports [`SinkError::Closed`], which stops ingest.
#[derive(Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<CanFrame>,
}

impl ChannelSink {
    /// Create a sink and the receiver downstream decoders read from.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<CanFrame>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }
}

#[async_trait]
impl FrameSink for ChannelSink {
    async fn deliver(&self, frame: CanFrame) -> Result<(), SinkError> {
        log_frame_event!(trace, "Frame forwarded downstream", frame.interface, frame.id);
        self.tx.send(frame).await.map_err(|_| SinkError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_delivers_in_order() {
        let (sink, mut rx) = ChannelSink::new(4);
        for id in 1..=3 {
            sink.deliver(CanFrame::new(id, &[], 0, "can0").unwrap())
                .await
                .unwrap();
        }
        for id in 1..=3 {
            assert_eq!(rx.recv().await.unwrap().id.raw(), id);
        }
    }

    #[tokio::test]
    async fn test_dropped_receiver_is_closed() {
        let (sink, rx) = ChannelSink::new(1);
        drop(rx);
        let frame = CanFrame::new(0x1, &[], 0, "can0").unwrap();
        assert_eq!(sink.deliver(frame).await, Err(SinkError::Closed));
    }
}
