//! Pinned header styling.
//!
//! The header's inline style is a pure function of (dark mode, scroll offset,
//! viewport size). [`HeaderStyleController::refresh`] recomputes and overwrites
//! it; every trigger (scroll, resize, touch, the mobile stability timer, theme
//! toggle) goes through that one call.

use std::rc::Rc;

use crate::config::HeaderConfig;
use crate::page::{StyleTarget, Viewport};
use crate::scheduler::{RepeatingTask, Scheduler};
use crate::theme::ThemeState;

/// Viewport size classes, smallest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ViewportTier {
    VerySmall,
    Small,
    Mobile,
    Desktop,
}

const VERY_SMALL_MAX_WIDTH: f64 = 375.0;
const VERY_SMALL_MAX_HEIGHT: f64 = 667.0;
const SMALL_MAX_WIDTH: f64 = 480.0;
const MOBILE_MAX_WIDTH: f64 = 768.0;

impl ViewportTier {
    /// First match wins, smallest tier first.
    pub fn classify(width: f64, height: f64) -> Self {
        if width <= VERY_SMALL_MAX_WIDTH && height <= VERY_SMALL_MAX_HEIGHT {
            ViewportTier::VerySmall
        } else if width <= SMALL_MAX_WIDTH {
            ViewportTier::Small
        } else if width <= MOBILE_MAX_WIDTH {
            ViewportTier::Mobile
        } else {
            ViewportTier::Desktop
        }
    }

    /// Header (and nav) min-height in px.
    pub fn header_height(self) -> u32 {
        match self {
            ViewportTier::VerySmall => 60,
            ViewportTier::Small => 65,
            ViewportTier::Mobile => 70,
            ViewportTier::Desktop => 80,
        }
    }

    pub fn nav_padding(self) -> &'static str {
        match self {
            ViewportTier::VerySmall => "0.5rem 0.8rem",
            ViewportTier::Small => "0.6rem 0.8rem",
            ViewportTier::Mobile => "0.8rem 1rem",
            ViewportTier::Desktop => "1rem 2rem",
        }
    }
}

/// Live inputs to the header style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderSignals {
    pub dark_mode: bool,
    pub scroll_offset: f64,
    pub width: f64,
    pub height: f64,
}

const LIGHT_BG: &str = "rgba(255, 255, 255, 0.95)";
const LIGHT_BG_SCROLLED: &str = "rgba(255, 255, 255, 0.99)";
const DARK_BG: &str = "rgba(30, 30, 46, 0.98)";
const DARK_BG_SCROLLED: &str = "rgba(30, 30, 46, 0.99)";
const DARK_BORDER: &str = "1px solid rgba(255, 255, 255, 0.1)";

/// Pinned-position declarations re-asserted on every refresh.
const PINNED: &[(&str, &str)] = &[
    ("position", "fixed"),
    ("top", "0"),
    ("left", "0"),
    ("right", "0"),
    ("width", "100%"),
    ("max-width", "100%"),
    ("z-index", "1000"),
    ("transform", "none"),
];

/// Computed header appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderStyle {
    pub tier: ViewportTier,
    pub scrolled: bool,
    pub background: &'static str,
    pub box_shadow: &'static str,
    pub backdrop_filter: &'static str,
    pub border_bottom: &'static str,
}

impl HeaderStyle {
    pub fn compute(signals: &HeaderSignals, scroll_threshold: f64) -> Self {
        let tier = ViewportTier::classify(signals.width, signals.height);
        let scrolled = signals.scroll_offset > scroll_threshold;
        let background = match (signals.dark_mode, scrolled) {
            (false, false) => LIGHT_BG,
            (false, true) => LIGHT_BG_SCROLLED,
            (true, false) => DARK_BG,
            (true, true) => DARK_BG_SCROLLED,
        };
        let (box_shadow, backdrop_filter) = if scrolled {
            ("0 2px 25px rgba(0, 0, 0, 0.2)", "blur(20px)")
        } else {
            ("0 2px 20px rgba(0, 0, 0, 0.1)", "blur(15px)")
        };
        Self {
            tier,
            scrolled,
            background,
            box_shadow,
            backdrop_filter,
            border_bottom: if signals.dark_mode { DARK_BORDER } else { "none" },
        }
    }

    pub fn height_px(&self) -> String {
        format!("{}px", self.tier.header_height())
    }

    /// Every declaration for the header element, in application order.
    pub fn declarations(&self) -> Vec<(&'static str, String)> {
        let mut out: Vec<(&'static str, String)> =
            PINNED.iter().map(|(k, v)| (*k, v.to_string())).collect();
        let height = self.height_px();
        out.extend([
            ("transition", "background-color 0.3s ease, box-shadow 0.3s ease".to_string()),
            ("will-change", "background-color, box-shadow".to_string()),
            ("background", self.background.to_string()),
            ("box-shadow", self.box_shadow.to_string()),
            ("backdrop-filter", self.backdrop_filter.to_string()),
            ("border-bottom", self.border_bottom.to_string()),
            ("min-height", height.clone()),
            ("height", height),
        ]);
        out
    }
}

pub struct HeaderStyleController {
    header: Option<Rc<dyn StyleTarget>>,
    nav: Option<Rc<dyn StyleTarget>>,
    viewport: Rc<dyn Viewport>,
    theme: Rc<ThemeState>,
    config: HeaderConfig,
}

impl HeaderStyleController {
    pub fn new(
        header: Option<Rc<dyn StyleTarget>>,
        nav: Option<Rc<dyn StyleTarget>>,
        viewport: Rc<dyn Viewport>,
        theme: Rc<ThemeState>,
        config: HeaderConfig,
    ) -> Self {
        Self {
            header,
            nav,
            viewport,
            theme,
            config,
        }
    }

    pub fn signals(&self) -> HeaderSignals {
        HeaderSignals {
            dark_mode: self.theme.is_dark(),
            scroll_offset: self.viewport.scroll_offset(),
            width: self.viewport.width(),
            height: self.viewport.height(),
        }
    }

    pub fn current_style(&self) -> HeaderStyle {
        HeaderStyle::compute(&self.signals(), self.config.scroll_threshold)
    }

    /// Recompute and overwrite the header style. No-op without a header.
    pub fn refresh(&self) {
        let Some(header) = &self.header else {
            return;
        };
        let style = self.current_style();
        for (name, value) in style.declarations() {
            header.set_style_important(name, &value);
        }
        if let Some(nav) = &self.nav {
            nav.set_style("min-height", &style.height_px());
            nav.set_style("padding", style.tier.nav_padding());
        }
    }

    /// Rendered header height, used to offset anchor scrolling.
    pub fn header_height(&self) -> Option<f64> {
        self.header.as_ref().map(|h| h.height())
    }

    /// Whether the current viewport needs the periodic stability re-assertion.
    pub fn needs_stability_timer(&self) -> bool {
        self.header.is_some() && self.viewport.width() <= self.config.stability_max_width
    }

    /// Repeating task that calls `refresh` every stability interval while the
    /// viewport is narrow. Some mobile browsers drift a fixed header out of
    /// place without any event firing; this re-pins it. Returns `None` on wide
    /// viewports. Ticks after a resize to a wide viewport write nothing.
    pub fn stability_task(
        controller: &Rc<Self>,
        scheduler: Rc<dyn Scheduler>,
    ) -> Option<RepeatingTask> {
        if !controller.needs_stability_timer() {
            return None;
        }
        let this = controller.clone();
        let period = controller.config.stability_interval_ms;
        let mut task = RepeatingTask::new(scheduler, period, move || {
            if this.viewport.width() <= this.config.stability_max_width {
                this.refresh();
            }
        });
        task.start();
        Some(task)
    }

    /// Refresh once the orientation change has settled.
    pub fn refresh_after_orientation_change(controller: &Rc<Self>, scheduler: &dyn Scheduler) {
        let this = controller.clone();
        scheduler.schedule_once(
            controller.config.orientation_settle_ms,
            Box::new(move || this.refresh()),
        );
    }
}
