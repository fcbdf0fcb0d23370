use wordrivers_core::control::{ControlMessage, MuteControl};

/// Page mute button: owns the mute state and tells the game frame about
/// every change.
#[derive(Debug, Clone)]
pub struct MuteButton {
    control: MuteControl,
    trusted_origin: String,
}

impl MuteButton {
    pub fn new(trusted_origin: impl Into<String>) -> Self {
        Self {
            control: MuteControl::default(),
            trusted_origin: trusted_origin.into(),
        }
    }

    pub fn is_muted(&self) -> bool {
        self.control.is_muted()
    }

    pub fn label(&self) -> &'static str {
        self.control.button_label()
    }

    /// Attributes the page's mute button carries for the current state.
    pub fn button_attributes(&self) -> [(&'static str, String); 3] {
        [
            ("aria-label", self.label().to_string()),
            ("title", self.label().to_string()),
            ("aria-pressed", self.is_muted().to_string()),
        ]
    }

    /// Toggle, post the resulting `setMute` to the game frame and update
    /// the button. Returns the new muted state.
    pub fn press(&mut self) -> bool {
        let message = self.control.toggle();
        post_to_game_frame(&message, &self.trusted_origin);
        sync_button(self);
        self.control.is_muted()
    }
}

/// Element id of the page's mute button.
pub const MUTE_BUTTON_ID: &str = "mute-button";

/// Copy the button state onto `#mute-button`, if the page has one.
#[cfg(target_family = "wasm")]
pub fn sync_button(button: &MuteButton) {
    let Some(element) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(MUTE_BUTTON_ID))
    else {
        return;
    };
    for (name, value) in button.button_attributes() {
        if let Err(e) = element.set_attribute(name, &value) {
            crate::diag::console_warn!("failed to set {name} on mute button: {e:?}");
        }
    }
}

#[cfg(not(target_family = "wasm"))]
pub fn sync_button(_button: &MuteButton) {}

/// Post a control message to the page's game iframe, targeted at
/// `origin` only. Missing frame or window is logged and ignored.
#[cfg(target_family = "wasm")]
pub fn post_to_game_frame(message: &ControlMessage, origin: &str) {
    use wasm_bindgen::JsCast;

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let frame = match document.query_selector("iframe") {
        Ok(Some(el)) => el.dyn_into::<web_sys::HtmlIFrameElement>().ok(),
        _ => None,
    };
    let Some(target) = frame.and_then(|f| f.content_window()) else {
        crate::diag::console_warn!("no game frame to receive {message:?}");
        return;
    };
    let json = match serde_json::to_string(message) {
        Ok(json) => json,
        Err(e) => {
            crate::diag::console_warn!("failed to encode control message: {e}");
            return;
        },
    };
    let value = match js_sys::JSON::parse(&json) {
        Ok(value) => value,
        Err(e) => {
            crate::diag::console_warn!("failed to parse control message: {e:?}");
            return;
        },
    };
    if let Err(e) = target.post_message(&value, origin) {
        crate::diag::console_warn!("postMessage to game frame failed: {e:?}");
    }
}

#[cfg(not(target_family = "wasm"))]
pub fn post_to_game_frame(message: &ControlMessage, origin: &str) {
    let _ = (message, origin);
}

/// Expose `window._wrToggleMute()` for the page's mute button. Returns the
/// new muted state to the caller.
#[cfg(target_family = "wasm")]
pub fn attach_mute_hook(button: &std::rc::Rc<std::cell::RefCell<MuteButton>>) {
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;

    let Some(window) = web_sys::window() else {
        return;
    };
    sync_button(&button.borrow());
    let button = Rc::clone(button);
    let closure = Closure::<dyn FnMut() -> bool>::new(move || button.borrow_mut().press());
    if let Err(e) = js_sys::Reflect::set(
        &window,
        &"_wrToggleMute".into(),
        closure.as_ref().unchecked_ref(),
    ) {
        crate::diag::console_warn!("failed to expose _wrToggleMute: {e:?}");
    }
    closure.forget();
}

#[cfg(not(target_family = "wasm"))]
pub fn attach_mute_hook(_button: &std::rc::Rc<std::cell::RefCell<MuteButton>>) {}
