//! Browser wiring: resolves the page once, builds every component with its
//! capabilities, and attaches listeners and timers.
//!
//! Listener closures are leaked with `forget()` and live as long as the page.
//! Anything optional that is missing from the markup is skipped, and a JS
//! failure while attaching one behaviour is logged without stopping the rest.

mod dom;
mod timers;

pub use dom::{BrowserViewport, DomElement, LocalStore};
pub use timers::BrowserScheduler;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, EventTarget, KeyboardEvent, Window, window};

use crate::config::{CONFIG_ELEMENT_ID, PortfolioConfig};
use crate::easter::{self, KonamiDetector, LogoEgg, LogoReaction};
use crate::effects::{BackToTop, REVEAL_SELECTOR, RevealTracker, SkillBar, SkillBars};
use crate::error::{PortfolioError, Result};
use crate::fake::MemoryStore;
use crate::header::HeaderStyleController;
use crate::nav::{AnchorNav, MobileMenu, fragment_target};
use crate::page::{ClassTarget, KeyValueStore, Placed, StyleTarget, TextSink, Viewport};
use crate::scheduler::{RepeatingTask, Scheduler};
use crate::theme::{self, ThemeState, ThemeToggle};
use crate::typing::{TypingAnimator, TypingLoop};

const TYPING_TARGET_ID: &str = "typing-words";
const NAV_LINK_SELECTOR: &str = "nav ul li a[href^='#']";

/// Components that must outlive `boot`. Present once `boot` has begun.
#[derive(Default)]
struct Page {
    _typing: Option<TypingLoop>,
    _stability: Option<RepeatingTask>,
}

thread_local! {
    static PAGE: RefCell<Option<Page>> = const { RefCell::new(None) };
}

fn document() -> Result<(Window, Document)> {
    let win = window().ok_or(PortfolioError::NoWindow)?;
    let doc = win.document().ok_or(PortfolioError::NoDocument)?;
    Ok((win, doc))
}

/// Config from the inline JSON element, or defaults.
pub fn inline_config() -> PortfolioConfig {
    let Ok((_, doc)) = document() else {
        return PortfolioConfig::default();
    };
    let Some(text) = doc
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
    else {
        return PortfolioConfig::default();
    };
    PortfolioConfig::from_json(&text).unwrap_or_else(|err| {
        log::warn!("ignoring #{CONFIG_ELEMENT_ID}: {err}");
        PortfolioConfig::default()
    })
}

/// Attach once the document is parsed.
pub fn start(config: PortfolioConfig) -> Result<()> {
    let (_, doc) = document()?;
    if doc.ready_state() != "loading" {
        return boot(config);
    }
    let mut pending = Some(config);
    on_event(&doc, "DOMContentLoaded", move |_| {
        if let Some(config) = pending.take() {
            if let Err(err) = boot(config) {
                log::error!("startup failed: {err}");
            }
        }
    })
}

fn on_event(target: &EventTarget, name: &str, handler: impl FnMut(Event) + 'static) -> Result<()> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Log a failed optional step and carry on.
fn best_effort<T>(what: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("{what} not attached: {err}");
            None
        }
    }
}

fn boot(config: PortfolioConfig) -> Result<()> {
    if PAGE.with(|p| p.borrow().is_some()) {
        log::warn!("portfolio behaviours already attached");
        return Ok(());
    }
    log::set_max_level(config.level_filter());
    let (win, doc) = document()?;
    // Claim the slot before attaching anything so a retry cannot double up.
    PAGE.with(|p| *p.borrow_mut() = Some(Page::default()));

    let scheduler: Rc<dyn Scheduler> = Rc::new(BrowserScheduler::new(win.clone()));
    let viewport: Rc<dyn Viewport> = Rc::new(BrowserViewport(win.clone()));
    let store: Rc<dyn KeyValueStore> = match win.local_storage() {
        Ok(Some(storage)) => Rc::new(LocalStore(storage)),
        _ => {
            log::warn!("localStorage unavailable, theme choice will not persist");
            Rc::new(MemoryStore::new())
        }
    };

    // Typing animation
    let sink = DomElement::by_id(&doc, TYPING_TARGET_ID).map(|el| Rc::new(el) as Rc<dyn TextSink>);
    let typing = match TypingAnimator::from_config(&config.typing) {
        Ok(animator) => TypingLoop::start(animator, sink, scheduler.clone()),
        Err(err) => {
            log::warn!("typing animation disabled: {err}");
            None
        }
    };

    // Header, theme
    let header_el = DomElement::query(&doc, "header");
    let nav_el = DomElement::query(&doc, "nav");
    let theme = Rc::new(ThemeState::load(store, config.storage_key.clone()));
    let header = Rc::new(HeaderStyleController::new(
        header_el.map(|el| Rc::new(el) as Rc<dyn StyleTarget>),
        nav_el.clone().map(|el| Rc::new(el) as Rc<dyn StyleTarget>),
        viewport.clone(),
        theme.clone(),
        config.header.clone(),
    ));
    let body = doc.body().map(|b| Rc::new(DomElement(b)) as Rc<dyn ClassTarget>);
    let toggle = Rc::new(ThemeToggle::new(theme, body, header.clone()));
    let label = toggle.sync();
    if let Some(nav) = &nav_el {
        best_effort(
            "theme toggle",
            attach_theme_button(&doc, nav, label, toggle, scheduler.clone()),
        );
    }

    let back_to_top = best_effort(
        "back-to-top",
        attach_back_to_top(&doc, viewport.clone(), config.back_to_top_threshold),
    )
    .flatten();

    // Reveal + skills
    let blocks: Vec<Rc<dyn Placed>> = DomElement::query_all(&doc, REVEAL_SELECTOR)
        .into_iter()
        .map(|el| Rc::new(el) as Rc<dyn Placed>)
        .collect();
    let reveal = Rc::new(RevealTracker::new(blocks, viewport.clone()));
    let bars = DomElement::query_all(&doc, ".skill-level")
        .into_iter()
        .map(|el| SkillBar {
            level: el.attr("data-level"),
            target: Rc::new(el),
        })
        .collect();
    let skills = Rc::new(SkillBars::new(
        DomElement::query(&doc, "#skills").map(|el| Rc::new(el) as Rc<dyn Placed>),
        bars,
        viewport.clone(),
    ));
    reveal.check();
    skills.check();

    // Scroll / resize / orientation / touch
    {
        let (header, reveal, skills) = (header.clone(), reveal.clone(), skills.clone());
        let attached = on_event(&win, "scroll", move |_| {
            if let Some(b) = &back_to_top {
                b.on_scroll();
            }
            header.refresh();
            reveal.check();
            skills.check();
        });
        best_effort("scroll listener", attached);
    }
    {
        let (header, reveal, skills) = (header.clone(), reveal.clone(), skills.clone());
        let attached = on_event(&win, "resize", move |_| {
            header.refresh();
            reveal.check();
            skills.check();
        });
        best_effort("resize listener", attached);
    }
    {
        let (header, scheduler) = (header.clone(), scheduler.clone());
        let attached = on_event(&win, "orientationchange", move |_| {
            HeaderStyleController::refresh_after_orientation_change(&header, &*scheduler)
        });
        best_effort("orientation listener", attached);
    }
    for name in ["touchstart", "touchmove"] {
        let header = header.clone();
        best_effort(name, on_event(&doc, name, move |_| header.refresh()));
    }
    header.refresh();
    let stability = HeaderStyleController::stability_task(&header, scheduler.clone());
    if stability.is_some() {
        log::debug!("header stability timer running");
    }

    best_effort("navigation", attach_nav(&doc, viewport, header));
    best_effort("easter eggs", attach_easter_eggs(&win, &doc, scheduler));

    let load_log = on_event(&win, "load", {
        let win = win.clone();
        move |_| {
            if let Some(perf) = win.performance() {
                log::info!("portfolio loaded in {:.0}ms", perf.now());
            }
        }
    });
    best_effort("load timing", load_log);

    PAGE.with(|p| {
        *p.borrow_mut() = Some(Page {
            _typing: typing,
            _stability: stability,
        });
    });
    log::info!("portfolio behaviours attached");
    Ok(())
}

fn attach_theme_button(
    doc: &Document,
    nav: &DomElement,
    label: &str,
    toggle: Rc<ThemeToggle>,
    scheduler: Rc<dyn Scheduler>,
) -> Result<()> {
    let button = DomElement::create(doc, "button")?;
    button.0.set_class_name("toggle-btn");
    button.0.set_inner_html(label);
    nav.0.append_child(&button.0)?;
    let target = button.clone();
    let pressed: Rc<dyn StyleTarget> = Rc::new(button.clone());
    on_event(&button.0, "click", move |_| {
        target.0.set_inner_html(toggle.toggle());
        theme::press(&pressed, &*scheduler);
    })
}

fn attach_back_to_top(
    doc: &Document,
    viewport: Rc<dyn Viewport>,
    threshold: f64,
) -> Result<Option<Rc<BackToTop>>> {
    let Some(body) = doc.body() else {
        return Ok(None);
    };
    let button = DomElement::create(doc, "button")?;
    button.0.set_class_name("back-to-top");
    button.0.set_inner_html(r#"<i class="fas fa-arrow-up"></i>"#);
    button.0.set_attribute("aria-label", "Back to top")?;
    body.append_child(&button.0)?;
    let control = Rc::new(BackToTop::new(Rc::new(button.clone()), viewport, threshold));
    control.on_scroll();
    let on_click = control.clone();
    on_event(&button.0, "click", move |_| on_click.activate())?;
    Ok(Some(control))
}

fn attach_nav(
    doc: &Document,
    viewport: Rc<dyn Viewport>,
    header: Rc<HeaderStyleController>,
) -> Result<()> {
    let hamburger = DomElement::query(doc, ".hamburger");
    let links = DomElement::query(doc, ".nav-links");
    let menu = Rc::new(MobileMenu::new(
        hamburger.clone().map(|el| Rc::new(el) as Rc<dyn ClassTarget>),
        links.map(|el| Rc::new(el) as Rc<dyn ClassTarget>),
    ));
    if let Some(hamburger) = &hamburger {
        let menu = menu.clone();
        on_event(&hamburger.0, "click", move |_| menu.toggle())?;
    }

    let nav = Rc::new(AnchorNav::new(viewport, header, menu));
    for link in DomElement::query_all(doc, NAV_LINK_SELECTOR) {
        let Some(href) = link.attr("href") else {
            continue;
        };
        let (nav, doc) = (nav.clone(), doc.clone());
        on_event(&link.0, "click", move |evt| {
            evt.prevent_default();
            let section_top = fragment_target(&href)
                .and_then(|id| DomElement::by_id(&doc, id))
                .map(|section| f64::from(section.0.offset_top()));
            nav.navigate(section_top);
        })?;
    }
    Ok(())
}

/// Add the easter-egg keyframes to `<head>` unless already there. Returns
/// whether a `<style>` element was added.
pub fn inject_keyframes(doc: &Document) -> Result<bool> {
    if doc.get_element_by_id(easter::KEYFRAMES_STYLE_ID).is_some() {
        return Ok(false);
    }
    let Some(head) = doc.head() else {
        return Ok(false);
    };
    let style = doc.create_element("style")?;
    style.set_id(easter::KEYFRAMES_STYLE_ID);
    style.set_text_content(Some(easter::KEYFRAMES_CSS));
    head.append_child(&style)?;
    Ok(true)
}

fn attach_easter_eggs(win: &Window, doc: &Document, scheduler: Rc<dyn Scheduler>) -> Result<()> {
    best_effort("keyframes", inject_keyframes(doc));

    let konami = RefCell::new(KonamiDetector::new());
    {
        let (doc_for_overlay, scheduler) = (doc.clone(), scheduler.clone());
        on_event(doc, "keydown", move |evt| {
            let Some(key) = evt.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if konami.borrow_mut().push(&key.code()) {
                if let Err(err) = celebrate(&doc_for_overlay, &*scheduler) {
                    log::debug!("celebration skipped: {err}");
                }
            }
        })?;
    }

    let Some(logo) = DomElement::query(doc, ".logo") else {
        return Ok(());
    };
    let egg = LogoEgg::new(Rc::new(logo.clone()), scheduler);
    let win = win.clone();
    on_event(&logo.0, "click", move |_| {
        if egg.click() == LogoReaction::Alert {
            let _ = win.alert_with_message(easter::LOGO_ALERT_TEXT);
        }
    })
}

fn celebrate(doc: &Document, scheduler: &dyn Scheduler) -> Result<()> {
    let Some(body) = doc.body() else {
        return Ok(());
    };
    let overlay = DomElement::create(doc, "div")?;
    overlay.0.set_text_content(Some(easter::CELEBRATION_TEXT));
    overlay.0.set_attribute("style", easter::CELEBRATION_STYLE)?;
    body.append_child(&overlay.0)?;
    log::info!("konami code entered");
    easter::dismiss_celebration(Rc::new(overlay), scheduler);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_step_is_skipped_not_fatal() {
        let failed: Result<u8> = Err(PortfolioError::Js("append failed".into()));
        assert_eq!(best_effort("theme toggle", failed), None);
        assert_eq!(best_effort("theme toggle", Ok(7u8)), Some(7));
    }
}
