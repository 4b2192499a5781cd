//! Scroll-driven page effects: back-to-top, reveal-on-scroll, skill bars.
//!
//! Visibility is computed from element rectangles on scroll instead of an
//! `IntersectionObserver`; the thresholds match what the observer setup would
//! use (10 % with a 50 px bottom margin for reveals, 50 % for skills).

use std::cell::Cell;
use std::rc::Rc;

use crate::page::{Placed, StyleTarget, Viewport};

/// Back-to-top shows strictly above this offset by default.
pub const BACK_TO_TOP_THRESHOLD: f64 = 300.0;

pub const REVEAL_SELECTOR: &str = ".project-card, .timeline-item, .skill-category, .contact-card";
pub const REVEAL_MIN_FRACTION: f64 = 0.1;
pub const REVEAL_BOTTOM_MARGIN: f64 = 50.0;
pub const SKILLS_MIN_FRACTION: f64 = 0.5;

pub fn back_to_top_visible(scroll_offset: f64, threshold: f64) -> bool {
    scroll_offset > threshold
}

/// Back-to-top control: shown past the threshold, scrolls to origin.
pub struct BackToTop {
    button: Rc<dyn StyleTarget>,
    viewport: Rc<dyn Viewport>,
    threshold: f64,
}

impl BackToTop {
    pub fn new(button: Rc<dyn StyleTarget>, viewport: Rc<dyn Viewport>, threshold: f64) -> Self {
        Self {
            button,
            viewport,
            threshold,
        }
    }

    pub fn on_scroll(&self) {
        let shown = back_to_top_visible(self.viewport.scroll_offset(), self.threshold);
        self.button.set_style("display", if shown { "flex" } else { "none" });
    }

    pub fn activate(&self) {
        self.viewport.scroll_to(0.0, true);
    }
}

/// Fraction of `[top, bottom)` (viewport coordinates) that lies inside the
/// viewport shrunk by `bottom_margin` at the bottom.
pub fn visible_fraction(top: f64, bottom: f64, viewport_height: f64, bottom_margin: f64) -> f64 {
    let size = bottom - top;
    if size <= 0.0 {
        return 0.0;
    }
    let visible_bottom = (viewport_height - bottom_margin).max(0.0);
    let overlap = bottom.min(visible_bottom) - top.max(0.0);
    (overlap / size).clamp(0.0, 1.0)
}

/// Reveals each tracked block the first time it scrolls into view. A revealed
/// block is never hidden again.
pub struct RevealTracker {
    blocks: Vec<(Rc<dyn Placed>, Cell<bool>)>,
    viewport: Rc<dyn Viewport>,
}

impl RevealTracker {
    /// Hides every block and starts tracking it.
    pub fn new(blocks: Vec<Rc<dyn Placed>>, viewport: Rc<dyn Viewport>) -> Self {
        for block in &blocks {
            block.set_style("opacity", "0");
            block.set_style("transform", "translateY(30px)");
            block.set_style("transition", "opacity 0.6s ease, transform 0.6s ease");
        }
        Self {
            blocks: blocks.into_iter().map(|b| (b, Cell::new(false))).collect(),
            viewport,
        }
    }

    /// Reveal newly visible blocks. Returns how many were revealed now.
    pub fn check(&self) -> usize {
        let vh = self.viewport.height();
        let mut revealed = 0;
        for (block, done) in &self.blocks {
            if done.get() {
                continue;
            }
            let (top, bottom) = block.rect();
            if visible_fraction(top, bottom, vh, REVEAL_BOTTOM_MARGIN) >= REVEAL_MIN_FRACTION {
                block.set_style("opacity", "1");
                block.set_style("transform", "translateY(0)");
                done.set(true);
                revealed += 1;
            }
        }
        revealed
    }

    pub fn revealed_count(&self) -> usize {
        self.blocks.iter().filter(|(_, d)| d.get()).count()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// A skill bar and its `data-level` percentage.
pub struct SkillBar {
    pub target: Rc<dyn StyleTarget>,
    pub level: Option<String>,
}

/// Fills every skill bar the first time the skills section is half visible,
/// then stops checking.
pub struct SkillBars {
    section: Option<Rc<dyn Placed>>,
    bars: Vec<SkillBar>,
    viewport: Rc<dyn Viewport>,
    fired: Cell<bool>,
}

impl SkillBars {
    pub fn new(
        section: Option<Rc<dyn Placed>>,
        bars: Vec<SkillBar>,
        viewport: Rc<dyn Viewport>,
    ) -> Self {
        Self {
            section,
            bars,
            viewport,
            fired: Cell::new(false),
        }
    }

    /// Returns true on the one call that filled the bars.
    pub fn check(&self) -> bool {
        if self.fired.get() {
            return false;
        }
        let Some(section) = &self.section else {
            return false;
        };
        let (top, bottom) = section.rect();
        if visible_fraction(top, bottom, self.viewport.height(), 0.0) < SKILLS_MIN_FRACTION {
            return false;
        }
        for bar in &self.bars {
            if let Some(level) = bar.level.as_deref().filter(|l| !l.is_empty()) {
                bar.target.set_style("--level", &format!("{level}%"));
            }
        }
        self.fired.set(true);
        true
    }

    pub fn has_fired(&self) -> bool {
        self.fired.get()
    }
}
