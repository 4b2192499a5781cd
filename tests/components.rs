// Native integration tests: components wired to in-memory page capabilities
// and a virtual-time scheduler. No wasm or browser APIs involved.

use std::rc::Rc;

use portfolio_fx::config::HeaderConfig;
use portfolio_fx::effects::{BackToTop, RevealTracker, SkillBar, SkillBars};
use portfolio_fx::fake::{FakeElement, FakeViewport, MemoryStore};
use portfolio_fx::header::HeaderStyleController;
use portfolio_fx::nav::{AnchorNav, MobileMenu};
use portfolio_fx::page::{ClassTarget, KeyValueStore, Placed, StyleTarget, TextSink};
use portfolio_fx::scheduler::{ManualScheduler, Scheduler};
use portfolio_fx::theme::{DARK_THEME_CLASS, ThemeState, ThemeToggle};
use portfolio_fx::typing::{TypingAnimator, TypingLoop, TypingPhase, TypingTimings};

struct Rig {
    header: Rc<FakeElement>,
    nav: Rc<FakeElement>,
    viewport: Rc<FakeViewport>,
    store: Rc<MemoryStore>,
    theme: Rc<ThemeState>,
    controller: Rc<HeaderStyleController>,
}

fn rig(width: f64, height: f64) -> Rig {
    let header = Rc::new(FakeElement::with_height(80.0));
    let nav = Rc::new(FakeElement::new());
    let viewport = Rc::new(FakeViewport::new(width, height));
    let store = Rc::new(MemoryStore::new());
    let theme = Rc::new(ThemeState::load(store.clone(), "darkMode"));
    let controller = Rc::new(HeaderStyleController::new(
        Some(header.clone() as Rc<dyn StyleTarget>),
        Some(nav.clone() as Rc<dyn StyleTarget>),
        viewport.clone(),
        theme.clone(),
        HeaderConfig::default(),
    ));
    Rig {
        header,
        nav,
        viewport,
        store,
        theme,
        controller,
    }
}

// --- Typing ------------------------------------------------------------------

fn start_typing(phrases: &[&str]) -> (Rc<ManualScheduler>, Rc<FakeElement>, TypingLoop) {
    let sched = Rc::new(ManualScheduler::new());
    let sink = Rc::new(FakeElement::new());
    let animator = TypingAnimator::new(
        phrases.iter().map(|s| s.to_string()).collect(),
        TypingTimings::default(),
    )
    .unwrap();
    let running = TypingLoop::start(
        animator,
        Some(sink.clone() as Rc<dyn TextSink>),
        sched.clone(),
    )
    .unwrap();
    (sched, sink, running)
}

#[test]
fn typed_length_tracks_ticks_then_holds_for_pause() {
    let (sched, sink, running) = start_typing(&["abcd", "xy"]);
    // first frame is shown immediately
    assert_eq!(sink.text(), "a");
    for n in 2..=4 {
        sched.advance(100);
        assert_eq!(sink.text().chars().count(), n);
    }
    assert_eq!(running.phase(), TypingPhase::Pausing { index: 0 });
    // full phrase holds for the whole pause
    sched.advance(1999);
    assert_eq!(sink.text(), "abcd");
    sched.advance(1);
    assert_eq!(sink.text(), "abc");
    sched.advance(50);
    assert_eq!(sink.text(), "ab");
}

#[test]
fn phrase_index_cycles_back_to_first() {
    let (sched, sink, running) = start_typing(&["ab", "c"]);
    // "a" t=0, "ab" t=100, "a" t=2100, "" t=2150, gap 500 -> "c" at t=2650
    sched.advance(2150);
    assert_eq!(sink.text(), "");
    assert_eq!(running.phase(), TypingPhase::Typing { index: 1, pos: 0 });
    sched.advance(500);
    assert_eq!(sink.text(), "c");
    // "c" pauses 2000, deletes to "" at 4650, next typed char at 5150 is list[0]
    sched.advance(2000);
    assert_eq!(sink.text(), "");
    sched.advance(500);
    assert_eq!(sink.text(), "a");
    assert_eq!(running.phase(), TypingPhase::Typing { index: 0, pos: 1 });
}

#[test]
fn typing_without_sink_never_schedules() {
    let sched = Rc::new(ManualScheduler::new());
    let animator = TypingAnimator::new(vec!["hi".into()], TypingTimings::default()).unwrap();
    assert!(TypingLoop::start(animator, None, sched.clone()).is_none());
    assert_eq!(sched.pending(), 0);
}

#[test]
fn typing_loop_keeps_one_pending_tick() {
    let (sched, sink, _running) = start_typing(&["hello"]);
    sched.advance(60_000);
    assert_eq!(sched.pending(), 1);
    assert!(sink.text_writes() > 50);
}

// --- Header ------------------------------------------------------------------

#[test]
fn dark_scrolled_desktop_header() {
    let r = rig(1200.0, 800.0);
    r.theme.toggle();
    r.viewport.set_scroll(50.0);
    r.controller.refresh();
    assert_eq!(r.header.style("background").as_deref(), Some("rgba(30, 30, 46, 0.99)"));
    assert_eq!(r.header.style("min-height").as_deref(), Some("80px"));
    assert_eq!(r.nav.style("padding").as_deref(), Some("1rem 2rem"));
    assert!(r.header.is_important("position"));
}

#[test]
fn light_unscrolled_very_small_header() {
    let r = rig(320.0, 480.0);
    r.controller.refresh();
    assert_eq!(r.header.style("background").as_deref(), Some("rgba(255, 255, 255, 0.95)"));
    assert_eq!(r.header.style("height").as_deref(), Some("60px"));
    assert_eq!(r.nav.style("min-height").as_deref(), Some("60px"));
    assert_eq!(r.header.style("position").as_deref(), Some("fixed"));
}

#[test]
fn refresh_follows_live_viewport() {
    let r = rig(1200.0, 800.0);
    r.controller.refresh();
    assert_eq!(r.header.style("height").as_deref(), Some("80px"));
    r.viewport.resize(700.0, 1000.0);
    r.controller.refresh();
    assert_eq!(r.header.style("height").as_deref(), Some("70px"));
    r.viewport.resize(400.0, 900.0);
    r.controller.refresh();
    assert_eq!(r.header.style("height").as_deref(), Some("65px"));
}

#[test]
fn refresh_without_header_is_noop() {
    let viewport = Rc::new(FakeViewport::new(375.0, 600.0));
    let nav = Rc::new(FakeElement::new());
    let theme = Rc::new(ThemeState::load(Rc::new(MemoryStore::new()), "darkMode"));
    let controller = Rc::new(HeaderStyleController::new(
        None,
        Some(nav.clone() as Rc<dyn StyleTarget>),
        viewport,
        theme,
        HeaderConfig::default(),
    ));
    controller.refresh();
    assert_eq!(nav.style_writes(), 0);
    assert!(controller.header_height().is_none());
    let sched: Rc<ManualScheduler> = Rc::new(ManualScheduler::new());
    assert!(HeaderStyleController::stability_task(&controller, sched).is_none());
}

#[test]
fn stability_timer_reasserts_pinned_header_on_mobile() {
    let r = rig(390.0, 844.0);
    let sched: Rc<ManualScheduler> = Rc::new(ManualScheduler::new());
    let task = HeaderStyleController::stability_task(&r.controller, sched.clone()).unwrap();
    assert!(task.is_running());
    assert_eq!(task.period_ms(), 100);
    sched.advance(100);
    assert_eq!(r.header.style("position").as_deref(), Some("fixed"));
    // something drops the inline style; no event fires
    r.header.clear_style("position");
    r.header.clear_style("top");
    sched.advance(100);
    assert_eq!(r.header.style("position").as_deref(), Some("fixed"));
    assert_eq!(r.header.style("top").as_deref(), Some("0"));
}

#[test]
fn stability_timer_goes_quiet_after_resize_to_desktop() {
    let r = rig(390.0, 844.0);
    let sched: Rc<ManualScheduler> = Rc::new(ManualScheduler::new());
    let task = HeaderStyleController::stability_task(&r.controller, sched.clone()).unwrap();
    sched.advance(100);
    assert!(r.header.style_writes() > 0);
    r.viewport.resize(1200.0, 800.0);
    let before = r.header.style_writes();
    sched.advance(1000);
    assert!(task.is_running());
    assert_eq!(r.header.style_writes(), before);
    // narrow again: re-pinning resumes
    r.viewport.resize(390.0, 844.0);
    r.header.clear_style("position");
    sched.advance(100);
    assert_eq!(r.header.style("position").as_deref(), Some("fixed"));
}

#[test]
fn no_stability_timer_on_desktop() {
    let r = rig(1024.0, 768.0);
    let sched: Rc<ManualScheduler> = Rc::new(ManualScheduler::new());
    assert!(HeaderStyleController::stability_task(&r.controller, sched.clone()).is_none());
    assert_eq!(sched.pending(), 0);
}

#[test]
fn orientation_change_refreshes_after_settle() {
    let r = rig(800.0, 400.0);
    let sched = Rc::new(ManualScheduler::new());
    HeaderStyleController::refresh_after_orientation_change(&r.controller, &*sched);
    sched.advance(299);
    assert_eq!(r.header.style_writes(), 0);
    sched.advance(1);
    assert_eq!(r.header.style("height").as_deref(), Some("80px"));
}

// --- Theme -------------------------------------------------------------------

#[test]
fn toggling_twice_restores_flag_and_colours() {
    let r = rig(1200.0, 800.0);
    let body = Rc::new(FakeElement::new());
    let toggle = ThemeToggle::new(
        r.theme.clone(),
        Some(body.clone() as Rc<dyn ClassTarget>),
        r.controller.clone(),
    );
    toggle.sync();
    let before_bg = r.header.style("background");
    let before_border = r.header.style("border-bottom");

    let label = toggle.toggle();
    assert!(label.contains("Light Mode"));
    assert!(body.has_class(DARK_THEME_CLASS));
    assert_eq!(r.store.get("darkMode").as_deref(), Some("true"));
    assert_ne!(r.header.style("background"), before_bg);

    toggle.toggle();
    assert!(!body.has_class(DARK_THEME_CLASS));
    assert_eq!(r.store.get("darkMode").as_deref(), Some("false"));
    assert_eq!(r.header.style("background"), before_bg);
    assert_eq!(r.header.style("border-bottom"), before_border);
}

#[test]
fn persisted_dark_mode_survives_reload() {
    let store = Rc::new(MemoryStore::new());
    ThemeState::load(store.clone(), "darkMode").toggle();
    let reloaded = ThemeState::load(store, "darkMode");
    assert!(reloaded.is_dark());
}

// --- Effects -----------------------------------------------------------------

#[test]
fn back_to_top_visibility_and_click() {
    let viewport = Rc::new(FakeViewport::new(1200.0, 800.0));
    let button = Rc::new(FakeElement::new());
    let control = BackToTop::new(button.clone(), viewport.clone(), 300.0);
    for (offset, shown) in [(299.0, "none"), (300.0, "none"), (301.0, "flex")] {
        viewport.set_scroll(offset);
        control.on_scroll();
        assert_eq!(button.style("display").as_deref(), Some(shown), "offset {offset}");
    }
    control.activate();
    assert_eq!(viewport.scroll_requests().last(), Some(&(0.0, true)));
}

#[test]
fn reveal_is_one_shot() {
    let viewport = Rc::new(FakeViewport::new(1200.0, 800.0));
    let near = Rc::new(FakeElement::new());
    let far = Rc::new(FakeElement::new());
    near.set_rect(400.0, 600.0);
    far.set_rect(1500.0, 1700.0);
    let tracker = RevealTracker::new(
        vec![near.clone() as Rc<dyn Placed>, far.clone() as Rc<dyn Placed>],
        viewport,
    );
    assert_eq!(near.style("opacity").as_deref(), Some("0"));
    assert_eq!(tracker.check(), 1);
    assert_eq!(near.style("opacity").as_deref(), Some("1"));
    assert_eq!(far.style("opacity").as_deref(), Some("0"));

    // scroll so near leaves and far enters
    near.set_rect(-900.0, -700.0);
    far.set_rect(200.0, 400.0);
    assert_eq!(tracker.check(), 1);
    assert_eq!(near.style("opacity").as_deref(), Some("1"));
    assert_eq!(near.style("transform").as_deref(), Some("translateY(0)"));
    assert_eq!(tracker.revealed_count(), 2);
    assert_eq!(tracker.check(), 0);
}

#[test]
fn reveal_honours_bottom_margin() {
    let viewport = Rc::new(FakeViewport::new(1200.0, 800.0));
    let block = Rc::new(FakeElement::new());
    // peeks 40px into the viewport, all of it inside the 50px margin
    block.set_rect(760.0, 960.0);
    let tracker = RevealTracker::new(vec![block.clone() as Rc<dyn Placed>], viewport);
    assert_eq!(tracker.check(), 0);
    block.set_rect(700.0, 900.0);
    assert_eq!(tracker.check(), 1);
}

#[test]
fn skill_bars_fill_once() {
    let viewport = Rc::new(FakeViewport::new(1200.0, 800.0));
    let section = Rc::new(FakeElement::new());
    section.set_rect(700.0, 1100.0);
    let bar = Rc::new(FakeElement::new());
    let unlabelled = Rc::new(FakeElement::new());
    let skills = SkillBars::new(
        Some(section.clone() as Rc<dyn Placed>),
        vec![
            SkillBar {
                target: bar.clone(),
                level: Some("85".into()),
            },
            SkillBar {
                target: unlabelled.clone(),
                level: None,
            },
        ],
        viewport,
    );
    assert!(!skills.check());
    section.set_rect(200.0, 600.0);
    assert!(skills.check());
    assert_eq!(bar.style("--level").as_deref(), Some("85%"));
    assert_eq!(unlabelled.style("--level"), None);
    assert!(skills.has_fired());
    assert!(!skills.check());
}

#[test]
fn skill_bars_fire_when_resize_brings_section_into_view() {
    let viewport = Rc::new(FakeViewport::new(1200.0, 400.0));
    let section = Rc::new(FakeElement::new());
    section.set_rect(300.0, 700.0);
    let bar = Rc::new(FakeElement::new());
    let skills = SkillBars::new(
        Some(section.clone() as Rc<dyn Placed>),
        vec![SkillBar {
            target: bar.clone(),
            level: Some("70".into()),
        }],
        viewport.clone(),
    );
    assert!(!skills.check());
    // no scroll, only a taller window
    viewport.resize(1200.0, 900.0);
    assert!(skills.check());
    assert_eq!(bar.style("--level").as_deref(), Some("70%"));
}

#[test]
fn skill_bars_without_section_do_nothing() {
    let viewport = Rc::new(FakeViewport::new(1200.0, 800.0));
    let bar = Rc::new(FakeElement::new());
    let skills = SkillBars::new(
        None,
        vec![SkillBar {
            target: bar.clone(),
            level: Some("50".into()),
        }],
        viewport,
    );
    assert!(!skills.check());
    assert_eq!(bar.style_writes(), 0);
}

// --- Navigation --------------------------------------------------------------

#[test]
fn anchor_scroll_clears_header_and_closes_menu() {
    let r = rig(700.0, 900.0);
    let hamburger = Rc::new(FakeElement::new());
    let links = Rc::new(FakeElement::new());
    let menu = Rc::new(MobileMenu::new(
        Some(hamburger.clone() as Rc<dyn ClassTarget>),
        Some(links.clone() as Rc<dyn ClassTarget>),
    ));
    menu.toggle();
    assert!(menu.is_open());
    assert!(hamburger.has_class("active"));

    let nav = AnchorNav::new(r.viewport.clone(), r.controller.clone(), menu.clone());
    assert!(nav.navigate(Some(1200.0)));
    assert_eq!(r.viewport.scroll_requests(), vec![(1120.0, true)]);
    assert!(!menu.is_open());
    assert!(!hamburger.has_class("active"));

    assert!(!nav.navigate(None));
    assert_eq!(r.viewport.scroll_requests().len(), 1);
}

#[test]
fn menu_needs_both_parts() {
    let hamburger = Rc::new(FakeElement::new());
    let menu = MobileMenu::new(Some(hamburger.clone() as Rc<dyn ClassTarget>), None);
    menu.toggle();
    assert!(!hamburger.has_class("active"));
    assert!(!menu.is_open());
}

#[test]
fn scheduler_trait_object_is_usable() {
    let sched: Rc<dyn Scheduler> = Rc::new(ManualScheduler::new());
    let el = Rc::new(FakeElement::new());
    let target = el.clone();
    let handle = sched.schedule_once(10, Box::new(move || target.set_text("late")));
    sched.cancel(handle);
    assert_eq!(el.text_writes(), 0);
}
