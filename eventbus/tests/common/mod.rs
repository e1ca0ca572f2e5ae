#![allow(dead_code)]

use eventbus::{HandlerResult, UnhandledEvent, UnhandledHandler};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

#[eventbus::event(handler = dyn SimpleHandler, method = handle_simple_event)]
pub struct SimpleEvent {
    pub id: u32,
}

pub trait SimpleHandler: Send + Sync {
    fn handle_simple_event(&self, event: &SimpleEvent) -> HandlerResult;
}

#[eventbus::event(handler = dyn OtherHandler, method = handle_other_event)]
pub struct OtherEvent;

pub trait OtherHandler: Send + Sync {
    fn handle_other_event(&self, event: &OtherEvent) -> HandlerResult;
}

/// 记录调用次数与收到的事件 id
#[derive(Default)]
pub struct CountingHandler {
    calls: AtomicUsize,
    seen: Mutex<Vec<u32>>,
}

impl CountingHandler {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<u32> {
        self.seen.lock().unwrap().clone()
    }
}

impl SimpleHandler for CountingHandler {
    fn handle_simple_event(&self, event: &SimpleEvent) -> HandlerResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(event.id);
        Ok(())
    }
}

impl OtherHandler for CountingHandler {
    fn handle_other_event(&self, _event: &OtherEvent) -> HandlerResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct FailingHandler;

impl SimpleHandler for FailingHandler {
    fn handle_simple_event(&self, event: &SimpleEvent) -> HandlerResult {
        anyhow::bail!("simple event {} rejected", event.id)
    }
}

/// 兜底处理器：记录原始事件的类型名与 SimpleEvent 的 id
#[derive(Default)]
pub struct DeadLetters {
    types: Mutex<Vec<&'static str>>,
    simple_ids: Mutex<Vec<u32>>,
}

impl DeadLetters {
    pub fn count(&self) -> usize {
        self.types.lock().unwrap().len()
    }

    pub fn types(&self) -> Vec<&'static str> {
        self.types.lock().unwrap().clone()
    }

    pub fn simple_ids(&self) -> Vec<u32> {
        self.simple_ids.lock().unwrap().clone()
    }
}

impl UnhandledHandler for DeadLetters {
    fn on_unhandled_event(&self, event: &UnhandledEvent<'_>) -> HandlerResult {
        self.types.lock().unwrap().push(event.original_type().name());
        if let Some(simple) = event.downcast_original::<SimpleEvent>() {
            self.simple_ids.lock().unwrap().push(simple.id);
        }
        Ok(())
    }
}
