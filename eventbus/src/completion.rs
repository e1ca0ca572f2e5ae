//! 异步分发完成回调
//!
//! 仅在 fire 成功后调用一次，参数为原始事件（而不是兜底包装）。
//! 任何 `Fn(&E) + Send + Sync` 闭包都可以直接作为回调。
//!
pub trait CompletionHandler<E>: Send + Sync {
    fn event_finished(&self, event: &E);
}

impl<E, F> CompletionHandler<E> for F
where
    F: Fn(&E) + Send + Sync,
{
    fn event_finished(&self, event: &E) {
        self(event)
    }
}
