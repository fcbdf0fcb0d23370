use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::events::Attributes;

/// Default number of diagnostic records kept before the oldest are evicted.
pub const DEFAULT_MAX_RECORDS: usize = 500;

/// Destination for analytics events. Recording never fails from the
/// caller's point of view.
pub trait AnalyticsSink {
    fn record(&self, event_name: &str, attributes: Attributes);
}

impl<S: AnalyticsSink + ?Sized> AnalyticsSink for &S {
    fn record(&self, event_name: &str, attributes: Attributes) {
        (**self).record(event_name, attributes);
    }
}

impl<S: AnalyticsSink + ?Sized> AnalyticsSink for Rc<S> {
    fn record(&self, event_name: &str, attributes: Attributes) {
        (**self).record(event_name, attributes);
    }
}

impl<S: AnalyticsSink + ?Sized> AnalyticsSink for Arc<S> {
    fn record(&self, event_name: &str, attributes: Attributes) {
        (**self).record(event_name, attributes);
    }
}

/// Why an external forward did not happen.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ForwardError {
    #[error("reporting channel not available")]
    Unavailable,
    #[error("reporting channel failed: {0}")]
    Failed(String),
}

/// External reporting surface (e.g. a page-level analytics tag).
pub trait ReportingChannel {
    fn forward(&self, event_name: &str, attributes: &Attributes) -> Result<(), ForwardError>;
}

impl<C: ReportingChannel + ?Sized> ReportingChannel for Box<C> {
    fn forward(&self, event_name: &str, attributes: &Attributes) -> Result<(), ForwardError> {
        (**self).forward(event_name, attributes)
    }
}

impl<C: ReportingChannel + ?Sized> ReportingChannel for Rc<C> {
    fn forward(&self, event_name: &str, attributes: &Attributes) -> Result<(), ForwardError> {
        (**self).forward(event_name, attributes)
    }
}

/// One recorded analytics call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsRecord {
    /// Monotonic per-sink sequence number, starting at 1.
    pub seq: u64,
    pub name: String,
    pub attributes: Attributes,
}

struct RecordLog {
    records: VecDeque<AnalyticsRecord>,
    next_seq: u64,
}

/// Analytics sink that keeps a bounded diagnostic log and forwards to an
/// optional reporting channel on a best-effort basis.
pub struct Analytics<C = Box<dyn ReportingChannel>> {
    log: Mutex<RecordLog>,
    max_records: usize,
    channel: Option<C>,
}

impl<C: ReportingChannel> Default for Analytics<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ReportingChannel> Analytics<C> {
    /// Sink with no reporting channel.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_RECORDS)
    }

    /// Sink keeping at most `max_records` diagnostic records (at least one).
    pub fn with_capacity(max_records: usize) -> Self {
        Self {
            log: Mutex::new(RecordLog {
                records: VecDeque::new(),
                next_seq: 1,
            }),
            max_records: max_records.max(1),
            channel: None,
        }
    }

    pub fn with_channel(mut self, channel: C) -> Self {
        self.channel = Some(channel);
        self
    }

    pub fn has_channel(&self) -> bool {
        self.channel.is_some()
    }

    /// Snapshot of the diagnostic log, oldest first.
    pub fn records(&self) -> Vec<AnalyticsRecord> {
        self.lock().records.iter().cloned().collect()
    }

    /// Most recent record, if any.
    pub fn last(&self) -> Option<AnalyticsRecord> {
        self.lock().records.back().cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().records.is_empty()
    }

    /// Total records ever written, including evicted ones.
    pub fn total_recorded(&self) -> u64 {
        self.lock().next_seq - 1
    }

    fn lock(&self) -> MutexGuard<'_, RecordLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: ReportingChannel> AnalyticsSink for Analytics<C> {
    fn record(&self, event_name: &str, attributes: Attributes) {
        tracing::info!(
            event = event_name,
            attributes = %serde_json::Value::Object(attributes.clone()),
            "analytics event"
        );

        if let Some(ref channel) = self.channel {
            match channel.forward(event_name, &attributes) {
                Ok(()) => {},
                Err(ForwardError::Unavailable) => {
                    tracing::debug!(event = event_name, "no reporting channel, event kept locally");
                },
                Err(e) => {
                    tracing::warn!(event = event_name, "analytics forward failed: {e}");
                },
            }
        }

        let mut log = self.lock();
        let seq = log.next_seq;
        log.next_seq += 1;
        log.records.push_back(AnalyticsRecord {
            seq,
            name: event_name.to_string(),
            attributes,
        });
        while log.records.len() > self.max_records {
            log.records.pop_front();
        }
    }
}
