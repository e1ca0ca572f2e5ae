//! 兜底事件（UnhandledEvent）
//!
//! 某个事件在 fire 时没有任何处理器，总线会把它包装为 `UnhandledEvent` 再分发一次。
//! `UnhandledEvent` 自身不会再被包装，因此级联最多一跳。
//!
use crate::event::{AnyEvent, Dispatch, Event, EventType, HandlerResult, sealed};

/// 未被处理的事件，只读借用原始事件
#[derive(Debug, Clone, Copy)]
pub struct UnhandledEvent<'a> {
    original: &'a dyn AnyEvent,
}

impl<'a> UnhandledEvent<'a> {
    pub fn new(original: &'a dyn AnyEvent) -> Self {
        Self { original }
    }

    pub fn original(&self) -> &'a dyn AnyEvent {
        self.original
    }

    pub fn original_type(&self) -> EventType {
        self.original.resolve_type()
    }

    /// 还原为具体事件类型；类型不符时返回 `None`
    pub fn downcast_original<E: Event>(&self) -> Option<&'a E> {
        self.original.downcast_ref::<E>()
    }
}

/// 兜底处理器：订阅所有未被处理的事件
pub trait UnhandledHandler: Send + Sync {
    fn on_unhandled_event(&self, event: &UnhandledEvent<'_>) -> HandlerResult;
}

impl sealed::Sealed for UnhandledEvent<'_> {}

impl Dispatch for UnhandledEvent<'_> {
    type Handler = dyn UnhandledHandler;

    fn key() -> EventType {
        EventType::of::<UnhandledEvent<'static>>()
    }

    fn deliver(&self, handler: &Self::Handler) -> HandlerResult {
        handler.on_unhandled_event(self)
    }

    fn as_original(&self) -> Option<&dyn AnyEvent> {
        None
    }
}
