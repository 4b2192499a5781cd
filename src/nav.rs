//! In-page navigation: anchor smooth scrolling and the mobile menu.

use std::rc::Rc;

use crate::header::HeaderStyleController;
use crate::page::{ClassTarget, Viewport};

/// Used for the anchor offset when the page has no header.
pub const DEFAULT_HEADER_HEIGHT: f64 = 80.0;

pub const ACTIVE_CLASS: &str = "active";

/// Id targeted by a same-page link (`"#about"` -> `"about"`).
pub fn fragment_target(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

/// Scroll position that puts a section's top just under the header.
pub fn anchor_scroll_top(section_top: f64, header_height: Option<f64>) -> f64 {
    section_top - header_height.unwrap_or(DEFAULT_HEADER_HEIGHT)
}

/// Hamburger button plus the collapsible link list. Does nothing unless both
/// are on the page.
pub struct MobileMenu {
    hamburger: Option<Rc<dyn ClassTarget>>,
    links: Option<Rc<dyn ClassTarget>>,
}

impl MobileMenu {
    pub fn new(hamburger: Option<Rc<dyn ClassTarget>>, links: Option<Rc<dyn ClassTarget>>) -> Self {
        Self { hamburger, links }
    }

    pub fn toggle(&self) {
        if let (Some(hamburger), Some(links)) = (&self.hamburger, &self.links) {
            hamburger.toggle_class(ACTIVE_CLASS);
            links.toggle_class(ACTIVE_CLASS);
        }
    }

    pub fn close(&self) {
        if let (Some(hamburger), Some(links)) = (&self.hamburger, &self.links) {
            hamburger.remove_class(ACTIVE_CLASS);
            links.remove_class(ACTIVE_CLASS);
        }
    }

    pub fn is_open(&self) -> bool {
        self.links
            .as_ref()
            .is_some_and(|links| links.has_class(ACTIVE_CLASS))
    }
}

pub struct AnchorNav {
    viewport: Rc<dyn Viewport>,
    header: Rc<HeaderStyleController>,
    menu: Rc<MobileMenu>,
}

impl AnchorNav {
    pub fn new(
        viewport: Rc<dyn Viewport>,
        header: Rc<HeaderStyleController>,
        menu: Rc<MobileMenu>,
    ) -> Self {
        Self {
            viewport,
            header,
            menu,
        }
    }

    /// Smooth-scroll to a section's document offset, clearing the header's
    /// current height, then collapse the mobile menu. `None` (no such
    /// section) does nothing.
    pub fn navigate(&self, section_top: Option<f64>) -> bool {
        let Some(section_top) = section_top else {
            return false;
        };
        let top = anchor_scroll_top(section_top, self.header.header_height());
        self.viewport.scroll_to(top, true);
        self.menu.close();
        true
    }
}
