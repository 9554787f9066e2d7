//! Telemetry sinks
//!
//! Telemetry is fire-and-forget: publishing never fails and never blocks the
//! run on a consumer.

use tokio::sync::broadcast;

use crate::types::TelemetryEvent;

/// Destination for telemetry events
pub trait TelemetrySink: Send + Sync {
    /// Publish an event
    fn publish(&self, event: TelemetryEvent);
}

/// Writes telemetry as structured `tracing` events
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingTelemetry;

impl TelemetrySink for TracingTelemetry {
    fn publish(&self, event: TelemetryEvent) {
        tracing::info!(
            target: "universal_download::telemetry",
            area = %event.area,
            feature = %event.feature,
            command = %event.command,
            exit_code = event.exit_code,
            timestamp = %event.timestamp,
            "telemetry"
        );
    }
}

/// Broadcasts telemetry to any number of subscribers
///
/// Events published while nobody is subscribed are dropped.
#[derive(Clone, Debug)]
pub struct ChannelTelemetry {
    tx: broadcast::Sender<TelemetryEvent>,
}

impl ChannelTelemetry {
    /// Create a channel that buffers up to `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Subscribe to future events
    pub fn subscribe(&self) -> broadcast::Receiver<TelemetryEvent> {
        self.tx.subscribe()
    }
}

impl Default for ChannelTelemetry {
    fn default() -> Self {
        Self::new(16)
    }
}

impl TelemetrySink for ChannelTelemetry {
    fn publish(&self, event: TelemetryEvent) {
        // No subscribers is not an error
        self.tx.send(event).ok();
    }
}
