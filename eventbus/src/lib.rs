//! 进程内事件总线（eventbus）
//!
//! 生产者触发带类型的事件，零个或多个已注册的处理器消费它们：
//! - 同步 `fire`：在调用线程上依次调用全部处理器；
//! - 异步 `fire_async`：提交到固定大小的线程池执行，并可在完成后通知回调；
//! - 没有处理器的事件会被包装为 [`UnhandledEvent`] 再分发一次（只此一跳）。
//!
//! 组成：
//! - `registry`：事件类型 -> 处理器集合，支持并发注册/注销/查询/清空；
//! - `dispatcher`：同步扇出、兜底事件与异步提交；
//! - `bus`：对外门面，持有注册表与线程池；
//! - `event` / `unhandled` / `completion`：宿主需要实现的能力接口。
//!
//! 典型用法：
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use eventbus::{EventBus, HandlerResult};
//!
//! #[eventbus::event(handler = dyn GreetingHandler, method = on_greeting)]
//! struct Greeting {
//!     name: String,
//! }
//!
//! trait GreetingHandler: Send + Sync {
//!     fn on_greeting(&self, event: &Greeting) -> HandlerResult;
//! }
//!
//! struct Printer;
//!
//! impl GreetingHandler for Printer {
//!     fn on_greeting(&self, event: &Greeting) -> HandlerResult {
//!         println!("hello, {}", event.name);
//!         Ok(())
//!     }
//! }
//!
//! let bus = EventBus::new()?;
//! bus.register::<Greeting>(Arc::new(Printer))?;
//! bus.fire(&Greeting { name: "bus".into() })?;
//!
//! let handle = bus.fire_async(Arc::new(Greeting { name: "pool".into() }), None)?;
//! handle.wait_timeout(Duration::from_secs(1))?;
//! # Ok::<(), eventbus::BusError>(())
//! ```
//!
pub mod bus;
pub mod completion;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod handle;
pub mod registry;
pub mod unhandled;

mod pool;

pub use bus::EventBus;
pub use completion::CompletionHandler;
pub use config::EventBusConfig;
pub use error::{BusError, BusResult};
pub use event::{AnyEvent, Dispatch, Event, EventType, HandlerResult};
pub use handle::DispatchHandle;
pub use registry::Registry;
pub use unhandled::{UnhandledEvent, UnhandledHandler};

#[cfg(feature = "macros")]
pub use eventbus_macros::event;

// 允许在本 crate 内部通过 ::eventbus 进行自引用，
// 以便过程宏在本 crate 的单元测试中也能解析到 ::eventbus 路径。
extern crate self as eventbus;
