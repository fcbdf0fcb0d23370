use wordrivers_core::bridge::{MessageHandler, MessageSource};

#[cfg(target_family = "wasm")]
use wasm_bindgen::prelude::*;

/// The page window's `message` events as a bridge message source.
///
/// Native builds accept subscriptions but never deliver anything.
pub struct WindowMessageSource {
    #[cfg(target_family = "wasm")]
    window: Option<web_sys::Window>,
}

/// A registered `message` listener. Detached only through
/// [`MessageSource::unsubscribe`].
pub struct WindowSubscription {
    #[cfg(target_family = "wasm")]
    closure: Option<Closure<dyn FnMut(web_sys::MessageEvent)>>,
}

impl Default for WindowMessageSource {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowMessageSource {
    pub fn new() -> Self {
        Self {
            #[cfg(target_family = "wasm")]
            window: web_sys::window(),
        }
    }
}

/// Convert a posted JS value to JSON. Values `JSON.stringify` rejects
/// (functions, cycles, `undefined`) become `null`, which the bridge
/// treats as malformed.
#[cfg(target_family = "wasm")]
fn js_to_json(value: &JsValue) -> serde_json::Value {
    js_sys::JSON::stringify(value)
        .ok()
        .and_then(|s| s.as_string())
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or(serde_json::Value::Null)
}

impl MessageSource for WindowMessageSource {
    type Subscription = WindowSubscription;

    #[cfg(target_family = "wasm")]
    fn subscribe(&mut self, mut handler: MessageHandler) -> WindowSubscription {
        use wasm_bindgen::JsCast;
        use wordrivers_core::bridge::InboundMessage;

        let Some(ref window) = self.window else {
            crate::diag::console_warn!("no window, game messages will not be received");
            return WindowSubscription { closure: None };
        };

        let closure =
            Closure::<dyn FnMut(web_sys::MessageEvent)>::new(move |evt: web_sys::MessageEvent| {
                handler(InboundMessage::new(evt.origin(), js_to_json(&evt.data())));
            });
        if let Err(e) =
            window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
        {
            crate::diag::console_warn!("failed to add message listener: {e:?}");
            return WindowSubscription { closure: None };
        }
        WindowSubscription {
            closure: Some(closure),
        }
    }

    #[cfg(not(target_family = "wasm"))]
    fn subscribe(&mut self, handler: MessageHandler) -> WindowSubscription {
        drop(handler);
        WindowSubscription {}
    }

    #[cfg(target_family = "wasm")]
    fn unsubscribe(&mut self, subscription: WindowSubscription) {
        use wasm_bindgen::JsCast;

        if let (Some(window), Some(closure)) = (&self.window, subscription.closure)
            && let Err(e) = window
                .remove_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
        {
            crate::diag::console_warn!("failed to remove message listener: {e:?}");
        }
    }

    #[cfg(not(target_family = "wasm"))]
    fn unsubscribe(&mut self, _subscription: WindowSubscription) {}
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use wordrivers_core::bridge::{BridgeListener, MessageBridge};
    use wordrivers_core::test_helpers::RecordingSink;

    use super::*;

    #[test]
    fn native_listener_lifecycle() {
        let bridge = Rc::new(MessageBridge::new(RecordingSink::default()));
        let mut listener = BridgeListener::new(WindowMessageSource::new());
        assert!(listener.start(Rc::clone(&bridge)));
        assert!(!listener.start(Rc::clone(&bridge)));
        assert!(listener.is_listening());
        assert!(listener.stop());
        assert!(!listener.stop());
        assert!(bridge.sink().calls().is_empty());
    }
}
