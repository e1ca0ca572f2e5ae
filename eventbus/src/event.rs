//! 事件（Event）与事件类型（EventType）
//!
//! 事件通过 `dispatch` 自行选择处理器上的方法（双分派），总线只依赖：
//! - `Event::event_type()`：定位注册表中的处理器集合；
//! - `Event::dispatch(handler)`：调用对应能力。
//!
//! 无人处理时是否包装为 [`UnhandledEvent`] 由分发器决定，事件本身无法干预：
//! 除 `UnhandledEvent` 外的所有事件都会被包装一次。
//!
//! [`UnhandledEvent`]: crate::unhandled::UnhandledEvent
use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

/// 处理器方法的返回值；`Err` 会中止本次 fire 并向上传播
pub type HandlerResult = anyhow::Result<()>;

/// 事件类型标识：以 `TypeId` 判等，附带类型名用于日志与诊断
#[derive(Clone, Copy, Debug)]
pub struct EventType {
    id: TypeId,
    name: &'static str,
}

impl EventType {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for EventType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EventType {}

impl Hash for EventType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// 事件
///
/// - `Handler`：处理该事件所需的能力，通常是 `dyn XxxHandler`；
/// - 构造后不可变，总线仅在一次 fire 期间借用；
/// - 一般通过 `#[eventbus::event(handler = dyn XxxHandler, method = on_xxx)]` 生成实现。
///
/// ```
/// use eventbus::{Event, EventType, HandlerResult};
///
/// #[derive(Debug)]
/// struct Ping;
///
/// trait PingHandler: Send + Sync {
///     fn on_ping(&self, event: &Ping) -> HandlerResult;
/// }
///
/// impl Event for Ping {
///     type Handler = dyn PingHandler;
///
///     fn event_type() -> EventType {
///         EventType::of::<Self>()
///     }
///
///     fn dispatch(&self, handler: &Self::Handler) -> HandlerResult {
///         handler.on_ping(self)
///     }
/// }
/// ```
pub trait Event: fmt::Debug + Send + Sync + 'static {
    type Handler: ?Sized + Send + Sync + 'static;

    /// 注册表中的键；同一 `EventType` 只能对应一种 `Handler`
    fn event_type() -> EventType
    where
        Self: Sized;

    /// 调用处理器上与本事件对应的方法
    fn dispatch(&self, handler: &Self::Handler) -> HandlerResult;
}

/// 可被总线注册与分发的类型：所有 [`Event`]，以及 `UnhandledEvent`。
///
/// 该 trait 是封闭的，只在本 crate 内实现；宿主只需实现 [`Event`]。
pub trait Dispatch: sealed::Sealed {
    type Handler: ?Sized + Send + Sync + 'static;

    fn key() -> EventType;

    fn deliver(&self, handler: &Self::Handler) -> HandlerResult;

    /// 普通事件返回自身的擦除视图，用于包装为 `UnhandledEvent`；
    /// `UnhandledEvent` 返回 `None`，因此级联最多一跳
    fn as_original(&self) -> Option<&dyn AnyEvent>;
}

impl<E: Event> Dispatch for E {
    type Handler = <E as Event>::Handler;

    fn key() -> EventType {
        E::event_type()
    }

    fn deliver(&self, handler: &<E as Event>::Handler) -> HandlerResult {
        self.dispatch(handler)
    }

    fn as_original(&self) -> Option<&dyn AnyEvent> {
        Some(self as &dyn AnyEvent)
    }
}

pub(crate) mod sealed {
    pub trait Sealed {}

    impl<E: super::Event> Sealed for E {}
}

/// 类型擦除后的事件视图，供 [`UnhandledEvent`](crate::UnhandledEvent) 只读引用原始事件
pub trait AnyEvent: fmt::Debug + Send + Sync {
    fn resolve_type(&self) -> EventType;

    fn as_any(&self) -> &dyn Any;
}

impl<E: Event> AnyEvent for E {
    fn resolve_type(&self) -> EventType {
        <E as Event>::event_type()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl dyn AnyEvent + '_ {
    pub fn is<E: Event>(&self) -> bool {
        self.as_any().is::<E>()
    }

    pub fn downcast_ref<E: Event>(&self) -> Option<&E> {
        self.as_any().downcast_ref::<E>()
    }
}
