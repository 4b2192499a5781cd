//! Typing animation: types a phrase, holds it, deletes it, moves to the next
//! phrase, forever.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::TypingConfig;
use crate::error::{PortfolioError, Result};
use crate::page::TextSink;
use crate::scheduler::Scheduler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingPhase {
    /// `pos` characters of phrase `index` are shown, more to type.
    Typing { index: usize, pos: usize },
    /// Phrase `index` is fully shown.
    Pausing { index: usize },
    /// `pos` characters of phrase `index` are shown, deleting.
    Deleting { index: usize, pos: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingTimings {
    pub type_ms: u32,
    pub delete_ms: u32,
    pub pause_ms: u32,
    pub gap_ms: u32,
}

impl Default for TypingTimings {
    fn default() -> Self {
        Self {
            type_ms: 100,
            delete_ms: 50,
            pause_ms: 2000,
            gap_ms: 500,
        }
    }
}

/// Output of one tick: the text to show and how long until the next tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingFrame {
    pub text: String,
    pub next_delay_ms: u32,
}

#[derive(Debug, Clone)]
pub struct TypingAnimator {
    phrases: Vec<String>,
    lens: Vec<usize>, // in chars
    timings: TypingTimings,
    phase: TypingPhase,
}

impl TypingAnimator {
    /// Empty phrases are dropped; at least one must remain.
    pub fn new(phrases: Vec<String>, timings: TypingTimings) -> Result<Self> {
        let phrases: Vec<String> = phrases.into_iter().filter(|p| !p.is_empty()).collect();
        if phrases.is_empty() {
            return Err(PortfolioError::EmptyPhraseList);
        }
        let lens = phrases.iter().map(|p| p.chars().count()).collect();
        Ok(Self {
            phrases,
            lens,
            timings,
            phase: TypingPhase::Typing { index: 0, pos: 0 },
        })
    }

    pub fn from_config(cfg: &TypingConfig) -> Result<Self> {
        Self::new(
            cfg.phrases.clone(),
            TypingTimings {
                type_ms: cfg.type_ms,
                delete_ms: cfg.delete_ms,
                pause_ms: cfg.pause_ms,
                gap_ms: cfg.gap_ms,
            },
        )
    }

    pub fn phase(&self) -> TypingPhase {
        self.phase
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    /// Advance one step and return what to display.
    pub fn tick(&mut self) -> TypingFrame {
        let (index, shown, next_delay_ms, next) = match self.phase {
            TypingPhase::Typing { index, pos } => {
                let shown = pos + 1;
                if shown >= self.lens[index] {
                    (index, shown, self.timings.pause_ms, TypingPhase::Pausing { index })
                } else {
                    (
                        index,
                        shown,
                        self.timings.type_ms,
                        TypingPhase::Typing { index, pos: shown },
                    )
                }
            }
            TypingPhase::Pausing { index } => self.delete_step(index, self.lens[index]),
            TypingPhase::Deleting { index, pos } => self.delete_step(index, pos),
        };
        self.phase = next;
        TypingFrame {
            text: char_prefix(&self.phrases[index], shown).to_string(),
            next_delay_ms,
        }
    }

    fn delete_step(&self, index: usize, pos: usize) -> (usize, usize, u32, TypingPhase) {
        let shown = pos.saturating_sub(1);
        if shown == 0 {
            let next = (index + 1) % self.phrases.len();
            (
                index,
                0,
                self.timings.gap_ms,
                TypingPhase::Typing { index: next, pos: 0 },
            )
        } else {
            (
                index,
                shown,
                self.timings.delete_ms,
                TypingPhase::Deleting { index, pos: shown },
            )
        }
    }
}

fn char_prefix(s: &str, chars: usize) -> &str {
    match s.char_indices().nth(chars) {
        Some((byte, _)) => &s[..byte],
        None => s,
    }
}

/// A running animation bound to a sink. The loop reschedules itself after
/// every tick for the life of the page; there is no restart.
pub struct TypingLoop {
    state: Rc<RefCell<TypingAnimator>>,
}

impl TypingLoop {
    /// Show the first frame immediately and keep ticking. Returns `None`
    /// without scheduling anything when there is no sink.
    pub fn start(
        animator: TypingAnimator,
        sink: Option<Rc<dyn TextSink>>,
        scheduler: Rc<dyn Scheduler>,
    ) -> Option<Self> {
        let Some(sink) = sink else {
            log::debug!("typing target missing, animation not started");
            return None;
        };
        let state = Rc::new(RefCell::new(animator));
        step(state.clone(), sink, scheduler);
        Some(Self { state })
    }

    pub fn phase(&self) -> TypingPhase {
        self.state.borrow().phase()
    }
}

fn step(state: Rc<RefCell<TypingAnimator>>, sink: Rc<dyn TextSink>, scheduler: Rc<dyn Scheduler>) {
    let frame = state.borrow_mut().tick();
    sink.set_text(&frame.text);
    let next_scheduler = scheduler.clone();
    scheduler.schedule_once(
        frame.next_delay_ms,
        Box::new(move || step(state, sink, next_scheduler)),
    );
}
