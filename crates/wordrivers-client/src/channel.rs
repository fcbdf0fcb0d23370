use wordrivers_core::analytics::{ForwardError, ReportingChannel};
use wordrivers_core::events::Attributes;

#[cfg(target_family = "wasm")]
use wasm_bindgen::JsValue;

/// Server endpoint the beacon channel posts to.
pub const BEACON_PATH: &str = "/api/v1/analytics";

/// Forwards to the page's Google Analytics tag: `gtag("event", name, attrs)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GtagChannel;

/// Forwards to the host server's analytics endpoint. Fire and forget.
#[derive(Debug, Clone)]
pub struct BeaconChannel {
    endpoint: String,
}

/// Forwards to every inner channel in order.
#[derive(Default)]
pub struct Fanout {
    channels: Vec<Box<dyn ReportingChannel>>,
}

#[cfg(target_family = "wasm")]
fn attributes_to_js(attributes: &Attributes) -> Result<JsValue, ForwardError> {
    let json = serde_json::to_string(attributes).map_err(|e| ForwardError::Failed(e.to_string()))?;
    js_sys::JSON::parse(&json).map_err(|e| ForwardError::Failed(format!("{e:?}")))
}

impl ReportingChannel for GtagChannel {
    #[cfg(target_family = "wasm")]
    fn forward(&self, event_name: &str, attributes: &Attributes) -> Result<(), ForwardError> {
        use wasm_bindgen::JsCast;

        let window = web_sys::window().ok_or(ForwardError::Unavailable)?;
        let gtag = js_sys::Reflect::get(&window, &JsValue::from_str("gtag"))
            .map_err(|_| ForwardError::Unavailable)?;
        if !gtag.is_function() {
            return Err(ForwardError::Unavailable);
        }
        let gtag: js_sys::Function = gtag.unchecked_into();
        let attrs = attributes_to_js(attributes)?;
        gtag.call3(
            &JsValue::NULL,
            &JsValue::from_str("event"),
            &JsValue::from_str(event_name),
            &attrs,
        )
        .map(|_| ())
        .map_err(|e| ForwardError::Failed(format!("{e:?}")))
    }

    #[cfg(not(target_family = "wasm"))]
    fn forward(&self, _: &str, _: &Attributes) -> Result<(), ForwardError> {
        Err(ForwardError::Unavailable)
    }
}

impl Default for BeaconChannel {
    fn default() -> Self {
        Self::new(BEACON_PATH)
    }
}

impl BeaconChannel {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// JSON body understood by the server's beacon endpoint.
    pub fn body(event_name: &str, attributes: &Attributes) -> serde_json::Value {
        serde_json::json!({
            "event": event_name,
            "attributes": attributes,
        })
    }
}

impl ReportingChannel for BeaconChannel {
    #[cfg(target_family = "wasm")]
    fn forward(&self, event_name: &str, attributes: &Attributes) -> Result<(), ForwardError> {
        let window = web_sys::window().ok_or(ForwardError::Unavailable)?;
        let body = Self::body(event_name, attributes).to_string();

        let init = web_sys::RequestInit::new();
        init.set_method("POST");
        init.set_body(&JsValue::from_str(&body));
        let headers = web_sys::Headers::new().map_err(|e| ForwardError::Failed(format!("{e:?}")))?;
        headers
            .set("Content-Type", "application/json")
            .map_err(|e| ForwardError::Failed(format!("{e:?}")))?;
        init.set_headers(&headers);

        let promise = window.fetch_with_str_and_init(&self.endpoint, &init);
        let event = event_name.to_string();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
                crate::diag::console_warn!("analytics beacon for {event} failed: {e:?}");
            }
        });
        Ok(())
    }

    #[cfg(not(target_family = "wasm"))]
    fn forward(&self, _: &str, _: &Attributes) -> Result<(), ForwardError> {
        Err(ForwardError::Unavailable)
    }
}

impl Fanout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, channel: impl ReportingChannel + 'static) -> Self {
        self.channels.push(Box::new(channel));
        self
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl ReportingChannel for Fanout {
    /// Every channel is tried. Succeeds if any channel accepted the event;
    /// otherwise reports the first real failure, or `Unavailable`.
    fn forward(&self, event_name: &str, attributes: &Attributes) -> Result<(), ForwardError> {
        let mut delivered = false;
        let mut failure = None;
        for channel in &self.channels {
            match channel.forward(event_name, attributes) {
                Ok(()) => delivered = true,
                Err(ForwardError::Unavailable) => {},
                Err(e) => {
                    failure.get_or_insert(e);
                },
            }
        }
        if delivered {
            return Ok(());
        }
        Err(failure.unwrap_or(ForwardError::Unavailable))
    }
}
