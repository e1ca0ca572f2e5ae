//! 分发器（Dispatcher）
//!
//! 同步 fire：
//! 1. 从注册表取出事件类型对应处理器集合的快照；
//! 2. 在调用线程上逐个调用处理器，任一处理器失败立即中止并返回错误；
//! 3. 没有任何处理器时，若事件本身不是 `UnhandledEvent`，包装为 `UnhandledEvent` 再分发一次。
//!
//! 异步 fire：在线程池中执行同步 fire，完成回调作为 fire 的后续阶段挂接，
//! 只有 fire 成功才会调用。
//!
use crate::completion::CompletionHandler;
use crate::error::{BusError, BusResult};
use crate::event::{Dispatch, Event};
use crate::handle::DispatchHandle;
use crate::pool::WorkerPool;
use crate::registry::Registry;
use crate::unhandled::UnhandledEvent;
use futures_util::FutureExt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

#[derive(Default)]
pub struct Dispatcher {
    registry: Registry,
}

impl Dispatcher {
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// 同步分发：所有匹配的处理器在返回前都已在当前线程上执行
    pub fn fire<E: Dispatch>(&self, event: &E) -> BusResult<()> {
        let event_type = E::key();
        let handlers = self.registry.lookup::<E>()?;
        trace!(
            event = event_type.name(),
            handlers = handlers.len(),
            "firing event"
        );

        for handler in &handlers {
            if let Err(source) = event.deliver(&**handler) {
                warn!(event = event_type.name(), error = %source, "event handler failed");
                return Err(BusError::handler(event_type.name(), source));
            }
        }

        if !handlers.is_empty() || event_type == UnhandledEvent::key() {
            return Ok(());
        }

        match event.as_original() {
            Some(original) => {
                debug!(event = event_type.name(), "no handler registered, firing unhandled event");
                self.fire(&UnhandledEvent::new(original))
            }
            None => Ok(()),
        }
    }

    /// 提交到线程池：先 fire，成功后再调用完成回调
    pub(crate) fn fire_async<E>(
        self: &Arc<Self>,
        pool: &WorkerPool,
        event: Arc<E>,
        callback: Option<Arc<dyn CompletionHandler<E>>>,
    ) -> BusResult<DispatchHandle>
    where
        E: Event,
    {
        let event_type = E::event_type();
        let dispatcher = Arc::clone(self);

        let dispatch = async move {
            trace!(event = event_type.name(), "async dispatch started");
            dispatcher.fire(event.as_ref()).map(|()| event)
        };

        let task = dispatch.map(move |fired: BusResult<Arc<E>>| -> BusResult<()> {
            let event = fired?;
            if let Some(callback) = callback {
                callback.event_finished(&event);
            }
            Ok(())
        });

        let join = pool.spawn(task)?;
        Ok(DispatchHandle::new(
            event_type.name(),
            join,
            pool.handle().clone(),
        ))
    }
}
