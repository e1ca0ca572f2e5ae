//! 事件总线统一错误定义
//!
//! 覆盖注册表类型校验、处理器失败（fail-fast）、异步投递与线程池生命周期，
//! 同步调用方直接拿到 `Err`，异步调用方通过 [`DispatchHandle`](crate::DispatchHandle) 观察结果。
//!
use std::time::Duration;
use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BusError {
    // --- 分发 ---
    /// 处理器返回错误；同一次 fire 中剩余的处理器不再执行
    #[error("event handler error: event={event}, reason={source}")]
    Handler {
        event: &'static str,
        #[source]
        source: anyhow::Error,
    },

    // --- 注册表 ---
    #[error("type mismatch: event={event}, expected={expected}")]
    TypeMismatch {
        event: &'static str,
        expected: &'static str,
    },

    // --- 配置/线程池 ---
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },
    #[error("worker pool error: {source}")]
    WorkerPool {
        #[from]
        source: std::io::Error,
    },
    #[error("event bus is shut down: bus={bus}")]
    ShutDown { bus: String },

    // --- 异步结果 ---
    #[error("dispatch cancelled before it started")]
    Cancelled,
    #[error("dispatch panicked: {reason}")]
    Panicked { reason: String },
    #[error("timed out after {timeout:?}")]
    Timeout { timeout: Duration },
}

impl BusError {
    pub fn handler(event: &'static str, source: anyhow::Error) -> Self {
        Self::Handler { event, source }
    }

    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// 是否为处理器自身的失败（而非总线/线程池问题）
    pub fn is_handler_failure(&self) -> bool {
        matches!(self, Self::Handler { .. } | Self::Panicked { .. })
    }
}

/// 统一 Result 类型别名
pub type BusResult<T> = Result<T, BusError>;
