/// Rotate-to-landscape hint, shown while the viewport is portrait.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OrientationHint {
    visible: bool,
}

impl OrientationHint {
    pub fn is_portrait(width: f64, height: f64) -> bool {
        height > width
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Update from the viewport size. `true` when the hint has just
    /// become visible.
    pub fn observe(&mut self, width: f64, height: f64) -> bool {
        let portrait = Self::is_portrait(width, height);
        let shown = portrait && !self.visible;
        self.visible = portrait;
        shown
    }
}

/// Current viewport size, if the window reports one.
#[cfg(target_family = "wasm")]
fn viewport() -> Option<(f64, f64)> {
    let window = web_sys::window()?;
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some((width, height))
}

/// Reflect the hint on `<html data-portrait>` so the stylesheet can show it.
#[cfg(target_family = "wasm")]
fn mark_document(visible: bool) {
    let Some(root) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    else {
        return;
    };
    let result = if visible {
        root.set_attribute("data-portrait", "")
    } else {
        root.remove_attribute("data-portrait")
    };
    if let Err(e) = result {
        crate::diag::console_warn!("failed to mark orientation: {e:?}");
    }
}

/// Check the viewport now and on every `resize` / `orientationchange`,
/// handing each size to `on_change`, which returns whether the hint is
/// visible.
#[cfg(target_family = "wasm")]
pub fn watch_orientation(mut on_change: impl FnMut(f64, f64) -> bool + 'static) {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;

    let Some(window) = web_sys::window() else {
        return;
    };
    if let Some((width, height)) = viewport() {
        mark_document(on_change(width, height));
    }

    let closure = Closure::<dyn FnMut()>::new(move || {
        if let Some((width, height)) = viewport() {
            mark_document(on_change(width, height));
        }
    });
    for event in ["resize", "orientationchange"] {
        if let Err(e) =
            window.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        {
            crate::diag::console_warn!("failed to add {event} listener: {e:?}");
        }
    }
    closure.forget();
}

#[cfg(not(target_family = "wasm"))]
pub fn watch_orientation(on_change: impl FnMut(f64, f64) -> bool + 'static) {
    drop(on_change);
}
