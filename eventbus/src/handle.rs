//! 异步分发句柄
//!
//! `fire_async` 返回的 [`DispatchHandle`]：
//! - 异步调用方直接 `.await`；
//! - 同步调用方使用 `wait` / `wait_timeout`（不要在异步上下文中调用）；
//! - `cancel` 只能取消尚未开始的分发，已在执行的 fire 总会完成。
//!
use crate::error::{BusError, BusResult};
use crate::pool;
use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::runtime;
use tokio::task::{JoinError, JoinHandle};

#[derive(Debug)]
pub struct DispatchHandle {
    event: &'static str,
    task: JoinHandle<BusResult<()>>,
    runtime: runtime::Handle,
}

impl DispatchHandle {
    pub(crate) fn new(
        event: &'static str,
        task: JoinHandle<BusResult<()>>,
        runtime: runtime::Handle,
    ) -> Self {
        Self {
            event,
            task,
            runtime,
        }
    }

    /// 分发的事件类型名
    pub fn event(&self) -> &'static str {
        self.event
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// 取消尚未开始的分发；句柄随后以 `BusError::Cancelled` 结束
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// 阻塞直到分发（及完成回调）结束
    pub fn wait(self) -> BusResult<()> {
        let runtime = self.runtime.clone();
        runtime.block_on(self)
    }

    /// 阻塞等待，超时返回 `BusError::Timeout`，分发本身仍会继续执行。
    ///
    /// 计时在调用线程上进行，即使线程池的工作线程全部被占用也会按时返回。
    pub fn wait_timeout(self, timeout: Duration) -> BusResult<()> {
        pool::block_on_timeout(timeout, self)?
    }
}

impl Future for DispatchHandle {
    type Output = BusResult<()>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        Pin::new(&mut this.task).poll(cx).map(|joined| match joined {
            Ok(result) => result,
            Err(err) => Err(join_error(err)),
        })
    }
}

fn join_error(err: JoinError) -> BusError {
    if err.is_cancelled() {
        return BusError::Cancelled;
    }

    match err.try_into_panic() {
        Ok(payload) => BusError::Panicked {
            reason: panic_message(payload.as_ref()),
        },
        Err(err) => BusError::Panicked {
            reason: err.to_string(),
        },
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
