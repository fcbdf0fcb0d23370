//! Consumer side of the embedded-game message channel.
//!
//! Frames post `{ type, data? }` messages to the page. The bridge accepts
//! them only from the trusted game host and turns the known types into
//! analytics events. Nothing here ever reports an error to its caller.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::Deserialize;

use crate::analytics::AnalyticsSink;
use crate::events::{BridgeEvent, GameSignal};

/// Origin of the third-party host serving the embedded games.
pub const TRUSTED_ORIGIN: &str = "https://html5.gamedistribution.com";

/// A message as delivered by the page's cross-document channel.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    pub origin: String,
    pub payload: serde_json::Value,
}

impl InboundMessage {
    pub fn new(origin: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            origin: origin.into(),
            payload,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("frame message is not an object")]
    NotAnObject,
    #[error("malformed frame message: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// What the bridge did with one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Forwarded to the sink under this analytics name.
    Recorded(&'static str),
    /// Well-formed but of a type the site does not track.
    Ignored,
    /// Dropped before inspection.
    UntrustedOrigin,
    /// Could not be read as a frame event; logged and dropped.
    Malformed,
}

/// Origin check plus type dispatch into an analytics sink.
pub struct MessageBridge<S> {
    trusted_origin: String,
    sink: S,
}

impl<S: AnalyticsSink> MessageBridge<S> {
    pub fn new(sink: S) -> Self {
        Self::with_trusted_origin(TRUSTED_ORIGIN, sink)
    }

    pub fn with_trusted_origin(trusted_origin: impl Into<String>, sink: S) -> Self {
        Self {
            trusted_origin: trusted_origin.into(),
            sink,
        }
    }

    pub fn trusted_origin(&self) -> &str {
        &self.trusted_origin
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn handle(&self, message: &InboundMessage) -> Dispatch {
        // Exact match only; no scheme or port normalisation.
        if message.origin != self.trusted_origin {
            tracing::trace!(origin = %message.origin, "dropping message from untrusted origin");
            return Dispatch::UntrustedOrigin;
        }

        match self.process(&message.payload) {
            Ok(Some(name)) => Dispatch::Recorded(name),
            Ok(None) => Dispatch::Ignored,
            Err(e) => {
                tracing::warn!("Error processing game message: {e}");
                Dispatch::Malformed
            },
        }
    }

    fn process(&self, payload: &serde_json::Value) -> Result<Option<&'static str>, BridgeError> {
        if !payload.is_object() {
            return Err(BridgeError::NotAnObject);
        }
        let event = BridgeEvent::deserialize(payload)?;
        let Some(signal) = GameSignal::from_event(&event) else {
            tracing::debug!(kind = %event.kind, "ignoring unrecognised game message");
            return Ok(None);
        };
        let name = signal.analytics_name();
        self.sink.record(name, signal.into_attributes());
        Ok(Some(name))
    }
}

/// Callback invoked for every message a source delivers.
pub type MessageHandler = Box<dyn FnMut(InboundMessage)>;

/// Something that delivers frame messages: the browser window, or an
/// in-process channel in tests and native builds.
pub trait MessageSource {
    type Subscription;

    fn subscribe(&mut self, handler: MessageHandler) -> Self::Subscription;

    fn unsubscribe(&mut self, subscription: Self::Subscription);
}

/// Owns the single active subscription of a bridge to a message source.
pub struct BridgeListener<M: MessageSource> {
    source: M,
    subscription: Option<M::Subscription>,
}

impl<M: MessageSource> BridgeListener<M> {
    pub fn new(source: M) -> Self {
        Self {
            source,
            subscription: None,
        }
    }

    /// Subscribe `bridge` to the source. Returns `false` (and changes
    /// nothing) when already listening.
    pub fn start<S: AnalyticsSink + 'static>(&mut self, bridge: Rc<MessageBridge<S>>) -> bool {
        if self.subscription.is_some() {
            tracing::debug!("game bridge already listening");
            return false;
        }
        let handler: MessageHandler = Box::new(move |message| {
            bridge.handle(&message);
        });
        self.subscription = Some(self.source.subscribe(handler));
        true
    }

    /// Remove the subscription. Returns `false` when not listening.
    pub fn stop(&mut self) -> bool {
        match self.subscription.take() {
            Some(subscription) => {
                self.source.unsubscribe(subscription);
                true
            },
            None => false,
        }
    }

    pub fn is_listening(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn source(&self) -> &M {
        &self.source
    }
}

/// In-process message source. Clones share the same subscriber list.
///
/// Handlers must not post back into the same source.
#[derive(Clone, Default)]
pub struct LocalMessageSource {
    handlers: Rc<RefCell<Vec<(u64, MessageHandler)>>>,
    next_id: Rc<Cell<u64>>,
}

/// Handle returned by [`LocalMessageSource::subscribe`].
#[derive(Debug, PartialEq, Eq)]
pub struct LocalSubscription(u64);

impl LocalMessageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a message to every subscriber. Returns how many received it.
    pub fn post(&self, origin: &str, payload: serde_json::Value) -> usize {
        let message = InboundMessage::new(origin, payload);
        let mut handlers = self.handlers.borrow_mut();
        for (_, handler) in handlers.iter_mut() {
            handler(message.clone());
        }
        handlers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.borrow().len()
    }
}

impl MessageSource for LocalMessageSource {
    type Subscription = LocalSubscription;

    fn subscribe(&mut self, handler: MessageHandler) -> LocalSubscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.handlers.borrow_mut().push((id, handler));
        LocalSubscription(id)
    }

    fn unsubscribe(&mut self, subscription: LocalSubscription) {
        self.handlers
            .borrow_mut()
            .retain(|(id, _)| *id != subscription.0);
    }
}
