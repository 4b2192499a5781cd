//! `setTimeout`/`setInterval` behind the `Scheduler` trait.

use std::cell::RefCell;
use std::collections::HashMap;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Window;

use crate::scheduler::{Scheduler, TaskHandle};

const REPEATING_BIT: u64 = 1 << 32;

/// One-shot closures are handed to JS and freed when they fire. Interval
/// closures stay here until cancelled.
pub struct BrowserScheduler {
    window: Window,
    intervals: RefCell<HashMap<i32, Closure<dyn FnMut()>>>,
}

impl BrowserScheduler {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            intervals: RefCell::new(HashMap::new()),
        }
    }
}

fn handle(js_id: i32, repeating: bool) -> TaskHandle {
    let id = u64::from(js_id as u32);
    TaskHandle(if repeating { id | REPEATING_BIT } else { id })
}

impl Scheduler for BrowserScheduler {
    fn schedule_once(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TaskHandle {
        let callback = Closure::once_into_js(move || task());
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                delay_ms.min(i32::MAX as u32) as i32,
            ) {
            Ok(id) => handle(id, false),
            Err(err) => {
                log::warn!("setTimeout failed: {err:?}");
                handle(0, false)
            }
        }
    }

    fn schedule_repeating(&self, period_ms: u32, task: Box<dyn FnMut()>) -> TaskHandle {
        let closure = Closure::wrap(task);
        match self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                period_ms.min(i32::MAX as u32) as i32,
            ) {
            Ok(id) => {
                self.intervals.borrow_mut().insert(id, closure);
                handle(id, true)
            }
            Err(err) => {
                log::warn!("setInterval failed: {err:?}");
                handle(0, true)
            }
        }
    }

    fn cancel(&self, handle: TaskHandle) {
        let js_id = (handle.0 & 0xFFFF_FFFF) as u32 as i32;
        if handle.0 & REPEATING_BIT != 0 {
            self.window.clear_interval_with_handle(js_id);
            self.intervals.borrow_mut().remove(&js_id);
        } else {
            self.window.clear_timeout_with_handle(js_id);
        }
    }
}
