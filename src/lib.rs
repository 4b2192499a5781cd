//! Portfolio FX core crate.
//!
//! Client-side behaviour for the single-page portfolio: typing animation,
//! pinned header styling, persisted dark mode, back-to-top, scroll reveals,
//! anchor navigation and a couple of easter eggs.
//!
//! Component logic lives in plain modules that depend only on the capability
//! traits in [`page`] and the timer abstraction in [`scheduler`], so it runs
//! under native `cargo test` with the in-memory [`fake`] implementations.
//! [`browser`] is the `web_sys` wiring used by the exported entry points.

use wasm_bindgen::prelude::*;

pub mod browser;
pub mod config;
pub mod easter;
pub mod effects;
pub mod error;
pub mod fake;
pub mod header;
pub mod logging;
pub mod nav;
pub mod page;
pub mod scheduler;
pub mod theme;
pub mod typing;

pub use config::PortfolioConfig;
pub use error::PortfolioError;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init(log::LevelFilter::Info);
}

// -----------------------------------------------------------------------------
// Entry points
// -----------------------------------------------------------------------------

/// Attach every behaviour, reading overrides from the inline config element.
#[wasm_bindgen]
pub fn start_portfolio() -> Result<(), JsValue> {
    browser::start(browser::inline_config())?;
    Ok(())
}

/// Attach with an explicit JSON config. Invalid JSON is an error.
#[wasm_bindgen]
pub fn start_portfolio_with_config(json: &str) -> Result<(), JsValue> {
    let config = PortfolioConfig::from_json(json)?;
    browser::start(config)?;
    Ok(())
}
