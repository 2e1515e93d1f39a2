//! Where a read loop delivers its updates.

use tokio::sync::mpsc;

use crate::events::StreamUpdate;

/// Receiver side of the update contract.
///
/// `emit` runs directly on the read loop, once per update, in wire order.
/// Returning `false` means the consumer is gone and the loop stops reading.
pub trait UpdateSink: Send + 'static {
    fn emit(&mut self, update: StreamUpdate) -> bool;
}

impl UpdateSink for mpsc::UnboundedSender<StreamUpdate> {
    fn emit(&mut self, update: StreamUpdate) -> bool {
        self.send(update).is_ok()
    }
}

impl<F> UpdateSink for F
where
    F: FnMut(StreamUpdate) + Send + 'static,
{
    fn emit(&mut self, update: StreamUpdate) -> bool {
        self(update);
        true
    }
}
