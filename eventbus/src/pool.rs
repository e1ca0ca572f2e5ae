//! 异步分发线程池
//!
//! 基于多线程 tokio 运行时，固定 `threads` 个工作线程，线程名为 `{bus}-{n}`。
//! `TaskTracker` 记录在途任务：关闭后拒绝新的提交，并可等待在途任务执行完毕。
//!
use crate::error::{BusError, BusResult};
use parking_lot::RwLock;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::runtime::{self, Runtime};
use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::task::TaskTracker;

pub(crate) struct WorkerPool {
    name: String,
    threads: usize,
    runtime: Option<Runtime>,
    handle: runtime::Handle,
    tracker: TaskTracker,
    // 写锁只在关闭时获取，保证“检查是否关闭 + 提交”之间不会插入关闭
    gate: RwLock<()>,
}

impl WorkerPool {
    pub(crate) fn new(name: &str, threads: usize) -> BusResult<Self> {
        let prefix = name.to_string();
        let next_id = AtomicUsize::new(0);

        let runtime = runtime::Builder::new_multi_thread()
            .worker_threads(threads)
            .thread_name_fn(move || {
                let id = next_id.fetch_add(1, Ordering::Relaxed);
                format!("{prefix}-{id}")
            })
            .enable_time()
            .build()?;

        Ok(Self {
            name: name.to_string(),
            threads,
            handle: runtime.handle().clone(),
            runtime: Some(runtime),
            tracker: TaskTracker::new(),
            gate: RwLock::new(()),
        })
    }

    pub(crate) fn threads(&self) -> usize {
        self.threads
    }

    pub(crate) fn handle(&self) -> &runtime::Handle {
        &self.handle
    }

    /// 提交任务；已关闭时返回 `ShutDown`
    pub(crate) fn spawn<F>(&self, task: F) -> BusResult<JoinHandle<F::Output>>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let _gate = self.gate.read();
        if self.tracker.is_closed() {
            return Err(BusError::ShutDown {
                bus: self.name.clone(),
            });
        }
        Ok(self.tracker.spawn_on(task, &self.handle))
    }

    pub(crate) fn close(&self) {
        let _gate = self.gate.write();
        self.tracker.close();
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.tracker.is_closed()
    }

    pub(crate) fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// 等待关闭后所有在途任务结束；未关闭时会一直等待
    pub(crate) async fn drain(&self) {
        self.tracker.wait().await;
    }

    /// 阻塞等待在途任务结束，不能在异步上下文中调用
    pub(crate) fn drain_blocking(&self, timeout: Duration) -> BusResult<()> {
        block_on_timeout(timeout, self.tracker.wait())
    }
}

/// 在调用线程上阻塞等待 `future`，超过 `timeout` 返回 `BusError::Timeout`。
///
/// 计时器由调用线程上临时的 current-thread 运行时驱动，与线程池是否繁忙无关；
/// 不能在异步上下文中调用。
pub(crate) fn block_on_timeout<F: Future>(timeout: Duration, future: F) -> BusResult<F::Output> {
    let waiter = runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    waiter
        .block_on(async move { time::timeout(timeout, future).await })
        .map_err(|_| BusError::Timeout { timeout })
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.close();
        // 后台关闭，不阻塞当前线程，也允许在异步上下文中析构
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}
