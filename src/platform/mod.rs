//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Logging and panic reporting
//! - The JS-facing scene handle (web only)

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Route `log` output to the browser console and panics to `console.error`
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    // A second init (e.g. a second handle) is harmless
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Route `log` output to stderr, filtered by `RUST_LOG` (default `info`)
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    if let Err(e) = env_logger::Builder::from_env(env).try_init() {
        log::debug!("env_logger already initialized: {}", e);
    }
}
