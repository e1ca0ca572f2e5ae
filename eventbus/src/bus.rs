//! 事件总线（EventBus）
//!
//! 对外门面：持有一个注册表（经由分发器）与一个固定大小的线程池。
//! - `register` / `unregister` / `clear`：维护事件类型 -> 处理器集合；
//! - `fire`：在调用线程上同步分发；
//! - `fire_async`：提交到线程池分发，可选完成回调；
//! - `shutdown` 之后拒绝新的异步提交，在途任务可通过 `drain` / `shutdown_and_wait` 等待结束。
//!
use crate::completion::CompletionHandler;
use crate::config::EventBusConfig;
use crate::dispatcher::Dispatcher;
use crate::error::BusResult;
use crate::event::{Dispatch, Event};
use crate::handle::DispatchHandle;
use crate::pool::WorkerPool;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub struct EventBus {
    name: String,
    dispatcher: Arc<Dispatcher>,
    pool: WorkerPool,
}

impl EventBus {
    /// 默认配置：随机名称，单个工作线程
    pub fn new() -> BusResult<Self> {
        Self::with_config(EventBusConfig::default())
    }

    pub fn with_config(config: EventBusConfig) -> BusResult<Self> {
        config.validate()?;
        let pool = WorkerPool::new(&config.name, config.threads)?;

        info!(bus = %config.name, threads = config.threads, "event bus started");
        Ok(Self {
            name: config.name,
            dispatcher: Arc::new(Dispatcher::default()),
            pool,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn threads(&self) -> usize {
        self.pool.threads()
    }

    /// 注册处理器
    pub fn register<E: Dispatch>(&self, handler: Arc<E::Handler>) -> BusResult<()> {
        self.dispatcher.registry().register::<E>(handler)
    }

    /// 注销处理器；返回是否确实移除了
    pub fn unregister<E: Dispatch>(&self, handler: &Arc<E::Handler>) -> BusResult<bool> {
        self.dispatcher.registry().unregister::<E>(handler)
    }

    /// 事件 `E` 当前的处理器快照
    pub fn handlers<E: Dispatch>(&self) -> BusResult<Vec<Arc<E::Handler>>> {
        self.dispatcher.registry().lookup::<E>()
    }

    pub fn handler_count<E: Dispatch>(&self) -> usize {
        self.dispatcher.registry().handler_count::<E>()
    }

    pub fn registered_types(&self) -> Vec<&'static str> {
        self.dispatcher.registry().registered_types()
    }

    /// 注销全部处理器
    pub fn clear(&self) {
        self.dispatcher.registry().clear();
    }

    /// 同步分发
    pub fn fire<E: Dispatch>(&self, event: &E) -> BusResult<()> {
        self.dispatcher.fire(event)
    }

    /// 异步分发；`callback` 在 fire 成功后调用一次
    pub fn fire_async<E>(
        &self,
        event: Arc<E>,
        callback: Option<Arc<dyn CompletionHandler<E>>>,
    ) -> BusResult<DispatchHandle>
    where
        E: Event,
    {
        self.dispatcher.fire_async(&self.pool, event, callback)
    }

    /// 以闭包作为完成回调的异步分发
    pub fn fire_async_with<E, F>(&self, event: Arc<E>, callback: F) -> BusResult<DispatchHandle>
    where
        E: Event,
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.fire_async(event, Some(Arc::new(callback)))
    }

    /// 停止接收新的异步分发；在途任务继续执行
    pub fn shutdown(&self) {
        if !self.pool.is_closed() {
            self.pool.close();
            info!(bus = %self.name, in_flight = self.pool.in_flight(), "event bus shutting down");
        }
    }

    pub fn is_shutdown(&self) -> bool {
        self.pool.is_closed()
    }

    /// 在途（已提交未结束）的异步分发数量
    pub fn in_flight(&self) -> usize {
        self.pool.in_flight()
    }

    /// 等待在途任务结束；需先调用 `shutdown`
    pub async fn drain(&self) {
        self.pool.drain().await;
    }

    /// 关闭并阻塞等待在途任务结束，不能在异步上下文中调用
    pub fn shutdown_and_wait(self, timeout: Duration) -> BusResult<()> {
        self.shutdown();
        self.pool.drain_blocking(timeout)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("name", &self.name)
            .field("threads", &self.threads())
            .field("shutdown", &self.is_shutdown())
            .finish()
    }
}
