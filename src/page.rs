//! Capabilities the components need from the host page.
//!
//! Resolved once at startup and injected; components never query the DOM.
//! `browser` implements these over `web_sys`, `fake` in memory.

/// Something whose visible text can be replaced.
pub trait TextSink {
    fn set_text(&self, text: &str);
}

/// Inline style access for one element.
pub trait StyleTarget {
    fn set_style(&self, name: &str, value: &str);

    /// Set with `!important` priority where the host supports it.
    fn set_style_important(&self, name: &str, value: &str) {
        self.set_style(name, value);
    }

    /// Rendered height in px.
    fn height(&self) -> f64;
}

/// An element that can report where it currently sits in the viewport.
pub trait Placed: StyleTarget {
    /// `(top, bottom)` relative to the viewport's top edge.
    fn rect(&self) -> (f64, f64);
}

/// A transient element that can take itself out of the page.
pub trait Detach {
    fn detach(&self);
}

pub trait ClassTarget {
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);
    fn toggle_class(&self, class: &str);
    fn has_class(&self, class: &str) -> bool;
}

/// Live window geometry and scrolling.
pub trait Viewport {
    fn width(&self) -> f64;
    fn height(&self) -> f64;
    fn scroll_offset(&self) -> f64;
    fn scroll_to(&self, top: f64, smooth: bool);
}

/// Durable string key-value storage (`localStorage` in the browser).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}
