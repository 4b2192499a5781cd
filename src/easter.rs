//! Easter eggs: the Konami code and the logo click counter.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::page::{Detach, StyleTarget};
use crate::scheduler::Scheduler;

pub const KONAMI_SEQUENCE: [&str; 10] = [
    "ArrowUp",
    "ArrowUp",
    "ArrowDown",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "ArrowLeft",
    "ArrowRight",
    "KeyB",
    "KeyA",
];

/// How long the celebration overlay stays up.
pub const CELEBRATION_MS: u32 = 3000;
pub const CELEBRATION_TEXT: &str = "You found the secret! Welcome to the developer community!";
pub const CELEBRATION_STYLE: &str = "position: fixed; top: 50%; left: 50%; \
    transform: translate(-50%, -50%); background: linear-gradient(45deg, #667eea, #764ba2); \
    color: white; padding: 2rem; border-radius: 20px; font-size: 1.2rem; font-weight: bold; \
    z-index: 10000; animation: celebrationPulse 2s ease-in-out; \
    box-shadow: 0 20px 40px rgba(0,0,0,0.3);";

/// Id of the injected `<style>` element, so the keyframes go in once.
pub const KEYFRAMES_STYLE_ID: &str = "portfolio-fx-keyframes";

/// Keyframes the overlay and logo bounce rely on.
pub const KEYFRAMES_CSS: &str = "
@keyframes celebrationPulse {
  0% { transform: translate(-50%, -50%) scale(0.5); opacity: 0; }
  50% { transform: translate(-50%, -50%) scale(1.1); opacity: 1; }
  100% { transform: translate(-50%, -50%) scale(1); opacity: 1; }
}
@keyframes bounce {
  0%, 20%, 50%, 80%, 100% { transform: translateY(0); }
  40% { transform: translateY(-20px); }
  60% { transform: translateY(-10px); }
}
";

/// Watches the last ten key codes for the Konami sequence.
#[derive(Debug, Default)]
pub struct KonamiDetector {
    recent: VecDeque<String>,
}

impl KonamiDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one `KeyboardEvent.code`. True exactly when this key completes
    /// the sequence; the window is cleared afterwards.
    pub fn push(&mut self, code: &str) -> bool {
        if self.recent.len() == KONAMI_SEQUENCE.len() {
            self.recent.pop_front();
        }
        self.recent.push_back(code.to_string());
        let matched = self.recent.len() == KONAMI_SEQUENCE.len()
            && self.recent.iter().zip(KONAMI_SEQUENCE).all(|(k, want)| k == want);
        if matched {
            self.recent.clear();
        }
        matched
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoReaction {
    None,
    /// 5th click.
    Bounce,
    /// 10th click; the counter starts over.
    Alert,
}

pub const LOGO_BOUNCE_AT: u32 = 5;
pub const LOGO_ALERT_AT: u32 = 10;
pub const LOGO_BOUNCE_MS: u32 = 1000;
pub const LOGO_BOUNCE_ANIMATION: &str = "bounce 1s ease-in-out";
pub const LOGO_ALERT_TEXT: &str =
    "You are really persistent! I appreciate that quality in a developer.";

#[derive(Debug, Default)]
pub struct LogoClicks {
    count: u32,
}

impl LogoClicks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn click(&mut self) -> LogoReaction {
        self.count += 1;
        match self.count {
            LOGO_BOUNCE_AT => LogoReaction::Bounce,
            LOGO_ALERT_AT => {
                self.count = 0;
                LogoReaction::Alert
            }
            _ => LogoReaction::None,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

/// Takes the celebration overlay down after [`CELEBRATION_MS`].
pub fn dismiss_celebration(overlay: Rc<dyn Detach>, scheduler: &dyn Scheduler) {
    scheduler.schedule_once(CELEBRATION_MS, Box::new(move || overlay.detach()));
}

/// Logo click counter wired to the logo's style. The bounce clears itself;
/// the alert is left to the caller.
pub struct LogoEgg {
    clicks: RefCell<LogoClicks>,
    logo: Rc<dyn StyleTarget>,
    scheduler: Rc<dyn Scheduler>,
}

impl LogoEgg {
    pub fn new(logo: Rc<dyn StyleTarget>, scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            clicks: RefCell::new(LogoClicks::new()),
            logo,
            scheduler,
        }
    }

    pub fn click(&self) -> LogoReaction {
        let reaction = self.clicks.borrow_mut().click();
        if reaction == LogoReaction::Bounce {
            self.logo.set_style("animation", LOGO_BOUNCE_ANIMATION);
            let settle = self.logo.clone();
            self.scheduler.schedule_once(
                LOGO_BOUNCE_MS,
                Box::new(move || settle.set_style("animation", "")),
            );
        }
        reaction
    }
}
