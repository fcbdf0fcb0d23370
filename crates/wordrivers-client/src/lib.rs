pub mod channel;
mod diag;
pub mod mute;
pub mod orientation;
pub mod source;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use wordrivers_core::analytics::{Analytics, AnalyticsSink};
use wordrivers_core::bridge::{BridgeListener, MessageBridge, MessageSource, TRUSTED_ORIGIN};
use wordrivers_core::events::{Attributes, names};

use channel::{BeaconChannel, Fanout, GtagChannel};
use mute::MuteButton;
use orientation::OrientationHint;
use source::WindowMessageSource;

pub type PageAnalytics = Analytics<Fanout>;

/// Everything the page wires up once: analytics, the game bridge, the
/// mute button and the rotate hint.
pub struct Page<M: MessageSource = WindowMessageSource> {
    analytics: Rc<PageAnalytics>,
    bridge: Rc<MessageBridge<Rc<PageAnalytics>>>,
    listener: BridgeListener<M>,
    mute: Rc<RefCell<MuteButton>>,
    orientation: OrientationHint,
}

impl<M: MessageSource> Page<M> {
    pub fn new(source: M, channels: Fanout) -> Self {
        let analytics = Rc::new(Analytics::new().with_channel(channels));
        let bridge = Rc::new(MessageBridge::new(Rc::clone(&analytics)));
        Self {
            analytics,
            bridge,
            listener: BridgeListener::new(source),
            mute: Rc::new(RefCell::new(MuteButton::new(TRUSTED_ORIGIN))),
            orientation: OrientationHint::default(),
        }
    }

    /// Start consuming game messages. `false` if already listening.
    pub fn start(&mut self) -> bool {
        self.listener.start(Rc::clone(&self.bridge))
    }

    /// Stop consuming game messages. `false` if not listening.
    pub fn stop(&mut self) -> bool {
        self.listener.stop()
    }

    pub fn is_listening(&self) -> bool {
        self.listener.is_listening()
    }

    pub fn analytics(&self) -> &PageAnalytics {
        &self.analytics
    }

    pub fn mute(&self) -> &Rc<RefCell<MuteButton>> {
        &self.mute
    }

    pub fn source(&self) -> &M {
        self.listener.source()
    }

    /// Feed a viewport size to the rotate hint. Records
    /// `orientation_prompt` each time the hint appears. Returns whether
    /// the hint is visible.
    pub fn observe_viewport(&mut self, width: f64, height: f64) -> bool {
        if self.orientation.observe(width, height) {
            self.analytics.record(names::ORIENTATION_PROMPT, Attributes::new());
        }
        self.orientation.is_visible()
    }
}

/// Reporting channels for this build: the page's gtag, plus the server
/// beacon when the `beacon` feature is on.
pub fn reporting_channels() -> Fanout {
    let mut channels = Fanout::new().with(GtagChannel);
    if cfg!(feature = "beacon") {
        channels = channels.with(BeaconChannel::default());
    }
    channels
}

thread_local! {
    static PAGE: RefCell<Option<Page>> = const { RefCell::new(None) };
}

/// WASM entry point.
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(target_family = "wasm")]
    console_error_panic_hook::set_once();
    diag::init_logging();

    let first_start = PAGE.with_borrow(Option::is_none);
    PAGE.with_borrow_mut(|slot| {
        let page = slot.get_or_insert_with(|| {
            let page = Page::new(WindowMessageSource::new(), reporting_channels());
            mute::attach_mute_hook(page.mute());
            page
        });
        if page.start() {
            diag::console_log!("game bridge listening for {TRUSTED_ORIGIN}");
        }
    });
    if first_start {
        orientation::watch_orientation(|width, height| {
            PAGE.with_borrow_mut(|slot| {
                slot.as_mut().is_some_and(|page| page.observe_viewport(width, height))
            })
        });
    }
}

/// Re-attach the game bridge after [`stop_game_bridge`]. No-op when
/// already listening.
#[wasm_bindgen]
pub fn start_game_bridge() -> bool {
    PAGE.with_borrow_mut(|slot| slot.as_mut().is_some_and(Page::start))
}

/// Detach the game bridge, e.g. when the page navigates away from a game.
#[wasm_bindgen]
pub fn stop_game_bridge() -> bool {
    PAGE.with_borrow_mut(|slot| slot.as_mut().is_some_and(Page::stop))
}
