//! Persisted dark-mode flag and the toggle control.

use std::cell::Cell;
use std::rc::Rc;

use crate::header::HeaderStyleController;
use crate::page::{ClassTarget, KeyValueStore, StyleTarget};
use crate::scheduler::Scheduler;

/// Body class that switches the stylesheet to the dark palette.
pub const DARK_THEME_CLASS: &str = "dark-theme";

/// How long the toggle button stays shrunk after a click.
pub const PRESS_MS: u32 = 150;
const PRESSED_TRANSFORM: &str = "scale(0.9)";
const RELEASED_TRANSFORM: &str = "scale(1)";

const LABEL_WHEN_LIGHT: &str = r#"<i class="fas fa-moon"></i> Dark Mode"#;
const LABEL_WHEN_DARK: &str = r#"<i class="fas fa-sun"></i> Light Mode"#;

/// Dark-mode flag backed by a key-value store. Only the literal `"true"` means
/// dark; a missing or unreadable entry is light.
pub struct ThemeState {
    store: Rc<dyn KeyValueStore>,
    key: String,
    dark: Cell<bool>,
}

impl ThemeState {
    pub fn load(store: Rc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let dark = store.get(&key).as_deref() == Some("true");
        Self {
            store,
            key,
            dark: Cell::new(dark),
        }
    }

    pub fn is_dark(&self) -> bool {
        self.dark.get()
    }

    /// Flip the flag and persist it. Returns the new value.
    pub fn toggle(&self) -> bool {
        let dark = !self.dark.get();
        self.dark.set(dark);
        self.store.set(&self.key, if dark { "true" } else { "false" });
        dark
    }
}

/// Wires the flag to the page: body class, header colours, button label.
pub struct ThemeToggle {
    theme: Rc<ThemeState>,
    body: Option<Rc<dyn ClassTarget>>,
    header: Rc<HeaderStyleController>,
}

impl ThemeToggle {
    pub fn new(
        theme: Rc<ThemeState>,
        body: Option<Rc<dyn ClassTarget>>,
        header: Rc<HeaderStyleController>,
    ) -> Self {
        Self {
            theme,
            body,
            header,
        }
    }

    /// Apply the current flag to the page. Returns the button label markup.
    pub fn sync(&self) -> &'static str {
        let dark = self.theme.is_dark();
        if let Some(body) = &self.body {
            if dark {
                body.add_class(DARK_THEME_CLASS);
            } else {
                body.remove_class(DARK_THEME_CLASS);
            }
        }
        self.header.refresh();
        Self::label(dark)
    }

    /// Flip, persist, re-apply. Returns the new button label markup.
    pub fn toggle(&self) -> &'static str {
        let dark = self.theme.toggle();
        log::debug!("theme toggled, dark={dark}");
        self.sync()
    }

    pub fn label(dark: bool) -> &'static str {
        if dark { LABEL_WHEN_DARK } else { LABEL_WHEN_LIGHT }
    }
}

/// Click feedback for the toggle button: shrink now, restore after
/// [`PRESS_MS`].
pub fn press(button: &Rc<dyn StyleTarget>, scheduler: &dyn Scheduler) {
    button.set_style("transform", PRESSED_TRANSFORM);
    let release = button.clone();
    scheduler.schedule_once(
        PRESS_MS,
        Box::new(move || release.set_style("transform", RELEASED_TRANSFORM)),
    );
}
