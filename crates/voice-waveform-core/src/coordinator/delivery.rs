use crate::coordinator::{Completion, LoadResult};

use tokio::{runtime::Handle, sync::mpsc};
use tracing::{debug, warn};

struct Delivery {
    completion: Completion,
    result: LoadResult,
}

/// Single task on which every completion callback runs.
///
/// Callbacks execute one at a time in dispatch order, so consumers never need
/// their own synchronization.
pub(crate) struct DeliveryQueue {
    tx: mpsc::UnboundedSender<Delivery>,
}

impl DeliveryQueue {
    pub(crate) fn spawn(handle: &Handle) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Delivery>();

        handle.spawn(async move {
            while let Some(delivery) = rx.recv().await {
                (delivery.completion)(delivery.result);
            }
            debug!("Delivery task stopped");
        });

        Self { tx }
    }

    pub(crate) fn dispatch(&self, completion: Completion, result: LoadResult) {
        if self.tx.send(Delivery { completion, result }).is_err() {
            warn!("Delivery task is gone, completion dropped");
        }
    }
}
