//! Runtime configuration.
//!
//! Every field has a default matching the live site, so an empty JSON object
//! (or no config element at all) yields the stock behaviour. The page may ship
//! overrides in `<script type="application/json" id="portfolio-config">`.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Id of the optional inline JSON config element.
pub const CONFIG_ELEMENT_ID: &str = "portfolio-config";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioConfig {
    pub typing: TypingConfig,
    pub header: HeaderConfig,
    /// Scroll offset above which the back-to-top control shows.
    pub back_to_top_threshold: f64,
    /// Key under which the dark-mode flag is persisted.
    pub storage_key: String,
    /// One of `error`, `warn`, `info`, `debug`, `trace`, `off`.
    pub log_level: String,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            typing: TypingConfig::default(),
            header: HeaderConfig::default(),
            back_to_top_threshold: crate::effects::BACK_TO_TOP_THRESHOLD,
            storage_key: "darkMode".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl PortfolioConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parsed log level; unknown names fall back to `Info`.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingConfig {
    pub phrases: Vec<String>,
    pub type_ms: u32,
    pub delete_ms: u32,
    pub pause_ms: u32,
    pub gap_ms: u32,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            phrases: [
                "responsive web applications",
                "efficient Python solutions",
                "cloud-ready architectures",
                "user-friendly interfaces",
                "scalable software systems",
                "modern digital experiences",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            type_ms: 100,
            delete_ms: 50,
            pause_ms: 2000,
            gap_ms: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    /// Offset strictly above which the header uses its scrolled treatment.
    pub scroll_threshold: f64,
    /// Period of the mobile stability re-assertion.
    pub stability_interval_ms: u32,
    /// Widths at or below this get the stability timer.
    pub stability_max_width: f64,
    /// Delay after `orientationchange` before refreshing.
    pub orientation_settle_ms: u32,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            scroll_threshold: 30.0,
            stability_interval_ms: 100,
            stability_max_width: 768.0,
            orientation_settle_ms: 300,
        }
    }
}
