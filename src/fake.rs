//! In-memory page capabilities for hosts without a DOM (native tests,
//! previews). Everything records what was applied so callers can inspect it.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::page::{ClassTarget, Detach, KeyValueStore, Placed, StyleTarget, TextSink, Viewport};

#[derive(Debug, Default)]
pub struct FakeElement {
    text: RefCell<String>,
    styles: RefCell<BTreeMap<String, String>>,
    important: RefCell<BTreeSet<String>>,
    classes: RefCell<BTreeSet<String>>,
    height: Cell<f64>,
    rect: Cell<(f64, f64)>,
    text_writes: Cell<usize>,
    style_writes: Cell<usize>,
    detached: Cell<bool>,
}

impl FakeElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_height(height: f64) -> Self {
        let el = Self::default();
        el.height.set(height);
        el
    }

    /// Position relative to the viewport top, as `(top, bottom)`.
    pub fn set_rect(&self, top: f64, bottom: f64) {
        self.rect.set((top, bottom));
    }

    pub fn is_detached(&self) -> bool {
        self.detached.get()
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    pub fn style(&self, name: &str) -> Option<String> {
        self.styles.borrow().get(name).cloned()
    }

    pub fn is_important(&self, name: &str) -> bool {
        self.important.borrow().contains(name)
    }

    pub fn text_writes(&self) -> usize {
        self.text_writes.get()
    }

    pub fn style_writes(&self) -> usize {
        self.style_writes.get()
    }

    /// Simulate layout drift: drop an inline style as if something else
    /// rewrote it.
    pub fn clear_style(&self, name: &str) {
        self.styles.borrow_mut().remove(name);
        self.important.borrow_mut().remove(name);
    }
}

impl TextSink for FakeElement {
    fn set_text(&self, text: &str) {
        self.text_writes.set(self.text_writes.get() + 1);
        *self.text.borrow_mut() = text.to_string();
    }
}

impl StyleTarget for FakeElement {
    fn set_style(&self, name: &str, value: &str) {
        self.style_writes.set(self.style_writes.get() + 1);
        self.important.borrow_mut().remove(name);
        self.styles.borrow_mut().insert(name.to_string(), value.to_string());
    }

    fn set_style_important(&self, name: &str, value: &str) {
        self.set_style(name, value);
        self.important.borrow_mut().insert(name.to_string());
    }

    fn height(&self) -> f64 {
        self.height.get()
    }
}

impl Detach for FakeElement {
    fn detach(&self) {
        self.detached.set(true);
    }
}

impl Placed for FakeElement {
    fn rect(&self) -> (f64, f64) {
        self.rect.get()
    }
}

impl ClassTarget for FakeElement {
    fn add_class(&self, class: &str) {
        self.classes.borrow_mut().insert(class.to_string());
    }

    fn remove_class(&self, class: &str) {
        self.classes.borrow_mut().remove(class);
    }

    fn toggle_class(&self, class: &str) {
        let mut classes = self.classes.borrow_mut();
        if !classes.remove(class) {
            classes.insert(class.to_string());
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.borrow().contains(class)
    }
}

/// Window geometry under test control.
#[derive(Debug)]
pub struct FakeViewport {
    width: Cell<f64>,
    height: Cell<f64>,
    scroll: Cell<f64>,
    scrolls: RefCell<Vec<(f64, bool)>>,
}

impl FakeViewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: Cell::new(width),
            height: Cell::new(height),
            scroll: Cell::new(0.0),
            scrolls: RefCell::new(Vec::new()),
        }
    }

    pub fn resize(&self, width: f64, height: f64) {
        self.width.set(width);
        self.height.set(height);
    }

    pub fn set_scroll(&self, offset: f64) {
        self.scroll.set(offset);
    }

    /// Every `scroll_to` request as `(top, smooth)`.
    pub fn scroll_requests(&self) -> Vec<(f64, bool)> {
        self.scrolls.borrow().clone()
    }
}

impl Viewport for FakeViewport {
    fn width(&self) -> f64 {
        self.width.get()
    }

    fn height(&self) -> f64 {
        self.height.get()
    }

    fn scroll_offset(&self) -> f64 {
        self.scroll.get()
    }

    fn scroll_to(&self, top: f64, smooth: bool) {
        self.scrolls.borrow_mut().push((top, smooth));
        self.scroll.set(top.max(0.0));
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
    writes: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.writes.set(self.writes.get() + 1);
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}
