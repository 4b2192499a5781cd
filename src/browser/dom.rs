//! `web_sys` implementations of the page capabilities.

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, ScrollBehavior, ScrollToOptions, Storage, Window};

use crate::error::{PortfolioError, Result};
use crate::page::{ClassTarget, Detach, KeyValueStore, Placed, StyleTarget, TextSink, Viewport};

#[derive(Clone)]
pub struct DomElement(pub HtmlElement);

impl DomElement {
    pub fn by_id(doc: &Document, id: &str) -> Option<Self> {
        doc.get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            .map(DomElement)
    }

    pub fn query(doc: &Document, selector: &str) -> Option<Self> {
        doc.query_selector(selector)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            .map(DomElement)
    }

    /// All matches in document order. An invalid selector yields nothing.
    pub fn query_all(doc: &Document, selector: &str) -> Vec<Self> {
        let Ok(list) = doc.query_selector_all(selector) else {
            log::debug!("bad selector {selector}");
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            .map(DomElement)
            .collect()
    }

    pub fn create(doc: &Document, tag: &str) -> Result<Self> {
        let el: HtmlElement = doc
            .create_element(tag)?
            .dyn_into()
            .map_err(|_| PortfolioError::Js(format!("<{tag}> is not an HTML element")))?;
        Ok(DomElement(el))
    }

    pub fn attr(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }
}

impl TextSink for DomElement {
    fn set_text(&self, text: &str) {
        self.0.set_text_content(Some(text));
    }
}

impl StyleTarget for DomElement {
    fn set_style(&self, name: &str, value: &str) {
        let _ = self.0.style().set_property(name, value);
    }

    fn set_style_important(&self, name: &str, value: &str) {
        let _ = self
            .0
            .style()
            .set_property_with_priority(name, value, "important");
    }

    fn height(&self) -> f64 {
        f64::from(self.0.offset_height())
    }
}

impl ClassTarget for DomElement {
    fn add_class(&self, class: &str) {
        let _ = self.0.class_list().add_1(class);
    }

    fn remove_class(&self, class: &str) {
        let _ = self.0.class_list().remove_1(class);
    }

    fn toggle_class(&self, class: &str) {
        let _ = self.0.class_list().toggle(class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }
}

impl Detach for DomElement {
    fn detach(&self) {
        self.0.remove();
    }
}

impl Placed for DomElement {
    fn rect(&self) -> (f64, f64) {
        let r = self.0.get_bounding_client_rect();
        (r.top(), r.bottom())
    }
}

pub struct BrowserViewport(pub Window);

impl Viewport for BrowserViewport {
    fn width(&self) -> f64 {
        self.0
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
    }

    fn height(&self) -> f64 {
        self.0
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
    }

    fn scroll_offset(&self) -> f64 {
        self.0.page_y_offset().unwrap_or(0.0)
    }

    fn scroll_to(&self, top: f64, smooth: bool) {
        let opts = ScrollToOptions::new();
        opts.set_top(top);
        opts.set_behavior(if smooth {
            ScrollBehavior::Smooth
        } else {
            ScrollBehavior::Instant
        });
        self.0.scroll_to_with_scroll_to_options(&opts);
    }
}

/// `localStorage`. Write failures (quota, private mode) are dropped.
pub struct LocalStore(pub Storage);

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if self.0.set_item(key, value).is_err() {
            log::warn!("could not persist {key}");
        }
    }
}
