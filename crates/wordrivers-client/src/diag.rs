/// Console macros: browser console in WASM, no-ops in native/test builds.
/// Called as `diag::console_warn!("msg: {e}")` from sibling modules.

#[cfg(target_family = "wasm")]
macro_rules! console_warn {
    ($($arg:tt)*) => {
        web_sys::console::warn_1(&format!($($arg)*).into())
    };
}

#[cfg(not(target_family = "wasm"))]
macro_rules! console_warn {
    ($($arg:tt)*) => {
        if false { let _ = format_args!($($arg)*); }
    };
}

#[cfg(target_family = "wasm")]
macro_rules! console_log {
    ($($arg:tt)*) => {
        web_sys::console::log_1(&format!($($arg)*).into())
    };
}

#[cfg(not(target_family = "wasm"))]
macro_rules! console_log {
    ($($arg:tt)*) => {
        if false { let _ = format_args!($($arg)*); }
    };
}

pub(crate) use {console_log, console_warn};

/// Route `tracing` output from the core (bridge diagnostics, the analytics
/// log) to the browser console. Safe to call more than once.
#[cfg(target_family = "wasm")]
pub fn init_logging() {
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::prelude::*;
    use tracing_web::MakeWebConsoleWriter;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(MakeWebConsoleWriter::new());
    let installed = tracing_subscriber::registry()
        .with(fmt_layer)
        .with(LevelFilter::INFO)
        .try_init();
    if installed.is_err() {
        console_warn!("tracing subscriber already installed");
    }
}

#[cfg(not(target_family = "wasm"))]
pub fn init_logging() {}
