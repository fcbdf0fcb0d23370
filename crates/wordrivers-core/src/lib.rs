pub mod analytics;
pub mod bridge;
pub mod catalog;
pub mod category;
pub mod control;
pub mod events;
pub mod filter;
pub mod page;
pub mod rating;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::cell::RefCell;

    use crate::analytics::{AnalyticsSink, ForwardError, ReportingChannel};
    use crate::catalog::GameRecord;
    use crate::events::Attributes;

    /// Sink that remembers every call, for asserting on bridge output.
    #[derive(Default)]
    pub struct RecordingSink {
        calls: RefCell<Vec<(String, Attributes)>>,
    }

    impl RecordingSink {
        /// Recorded calls with attributes as JSON objects.
        pub fn calls(&self) -> Vec<(String, serde_json::Value)> {
            self.calls
                .borrow()
                .iter()
                .map(|(name, attrs)| (name.clone(), serde_json::Value::Object(attrs.clone())))
                .collect()
        }
    }

    impl AnalyticsSink for RecordingSink {
        fn record(&self, event_name: &str, attributes: Attributes) {
            self.calls
                .borrow_mut()
                .push((event_name.to_string(), attributes));
        }
    }

    /// Reporting channel that always fails with the given error.
    pub struct FailingChannel(pub ForwardError);

    impl ReportingChannel for FailingChannel {
        fn forward(&self, _: &str, _: &Attributes) -> Result<(), ForwardError> {
            Err(self.0.clone())
        }
    }

    /// A game with placeholder image and embed paths derived from `id`.
    pub fn make_game(id: &str, title: &str) -> GameRecord {
        GameRecord::new(
            id,
            title,
            format!("About {title}"),
            format!("/{id}.svg"),
            format!("/b/{id}.html"),
        )
    }
}
