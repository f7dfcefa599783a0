//! Audit persistence with bounded retry.

use tracing::{error, warn};

use priceflow_core::{DecisionRecord, PriceChange};
use priceflow_store::DecisionSink;

/// Decision Recorder: best-effort audit writes.
///
/// Each write is retried at most once. A write that fails twice is logged
/// for operational alerting and dropped; an audit failure must never block
/// or roll back the price change it documents.
#[derive(Debug)]
pub struct DecisionRecorder<K> {
    sink: K,
}

impl<K> DecisionRecorder<K>
where
    K: DecisionSink,
{
    pub fn new(sink: K) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Persist a decision record. Returns whether the write succeeded.
    pub fn record_decision(&self, record: DecisionRecord) -> bool {
        let retry = record.clone();
        match self.sink.record_decision(record) {
            Ok(()) => true,
            Err(first) => {
                warn!(product_id = %retry.product_id, %first, "decision write failed, retrying once");
                match self.sink.record_decision(retry.clone()) {
                    Ok(()) => true,
                    Err(second) => {
                        error!(
                            product_id = %retry.product_id,
                            %second,
                            "decision audit write dropped after retry"
                        );
                        false
                    }
                }
            }
        }
    }

    /// Persist a price change row. Returns whether the write succeeded.
    pub fn record_price_change(&self, change: PriceChange) -> bool {
        let retry = change.clone();
        match self.sink.record_price_change(change) {
            Ok(()) => true,
            Err(first) => {
                warn!(product_id = %retry.product_id, %first, "price change write failed, retrying once");
                match self.sink.record_price_change(retry.clone()) {
                    Ok(()) => true,
                    Err(second) => {
                        error!(
                            product_id = %retry.product_id,
                            %second,
                            "price change audit write dropped after retry"
                        );
                        false
                    }
                }
            }
        }
    }
}
