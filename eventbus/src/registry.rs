//! 处理器注册表（Registry）
//!
//! - 通过 `EventType` 的 `TypeId` 索引各事件类型的处理器集合；
//! - 不同事件的集合元素类型不同（`Arc<dyn XxxHandler>`），表内以 `Any` 擦除存放，
//!   取用时做受检的向下转型；
//! - 集合在首次注册时惰性创建（`entry` 保证并发下只有一个胜出），除 `clear` 外不会被移除；
//! - 每个集合持有独立的读写锁，分发时只拷贝快照，不在遍历期间持锁。
//!
use crate::error::{BusError, BusResult};
use crate::event::Dispatch;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::any::{Any, TypeId, type_name};
use std::sync::Arc;
use tracing::debug;

type ErasedSet = Arc<dyn Any + Send + Sync>;

/// 单个事件类型的处理器集合（按 `Arc` 指针判重）
pub(crate) struct HandlerSet<H: ?Sized> {
    handlers: RwLock<Vec<Arc<H>>>,
}

impl<H: ?Sized> Default for HandlerSet<H> {
    fn default() -> Self {
        Self {
            handlers: RwLock::new(Vec::new()),
        }
    }
}

impl<H: ?Sized> HandlerSet<H> {
    fn insert(&self, handler: Arc<H>) -> bool {
        let mut handlers = self.handlers.write();
        if handlers.iter().any(|h| Arc::ptr_eq(h, &handler)) {
            return false;
        }
        handlers.push(handler);
        true
    }

    fn remove(&self, handler: &Arc<H>) -> bool {
        let mut handlers = self.handlers.write();
        let before = handlers.len();
        handlers.retain(|h| !Arc::ptr_eq(h, handler));
        handlers.len() != before
    }

    fn snapshot(&self) -> Vec<Arc<H>> {
        self.handlers.read().clone()
    }

    fn len(&self) -> usize {
        self.handlers.read().len()
    }
}

/// 事件类型 -> 处理器集合
#[derive(Default)]
pub struct Registry {
    // 值中保留事件类型名，便于诊断输出
    sets: DashMap<TypeId, (&'static str, ErasedSet)>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为事件 `E` 注册处理器；同一 `Arc` 重复注册只保留一份
    pub fn register<E: Dispatch>(&self, handler: Arc<E::Handler>) -> BusResult<()> {
        let ty = E::key();
        let erased = self
            .sets
            .entry(ty.id())
            .or_insert_with(|| {
                let set: ErasedSet = Arc::new(HandlerSet::<E::Handler>::default());
                (ty.name(), set)
            })
            .1
            .clone();

        let set = downcast_set::<E>(erased)?;
        if set.insert(handler) {
            debug!(event = ty.name(), "handler registered");
        } else {
            debug!(event = ty.name(), "handler already registered");
        }
        Ok(())
    }

    /// 注销处理器；未注册过的处理器或未知事件类型返回 `Ok(false)`
    pub fn unregister<E: Dispatch>(&self, handler: &Arc<E::Handler>) -> BusResult<bool> {
        let Some(set) = self.existing_set::<E>()? else {
            return Ok(false);
        };

        let removed = set.remove(handler);
        if removed {
            debug!(event = E::key().name(), "handler unregistered");
        }
        Ok(removed)
    }

    /// 当前处理器集合的快照；未注册时为空
    pub fn lookup<E: Dispatch>(&self) -> BusResult<Vec<Arc<E::Handler>>> {
        Ok(self
            .existing_set::<E>()?
            .map(|set| set.snapshot())
            .unwrap_or_default())
    }

    pub fn handler_count<E: Dispatch>(&self) -> usize {
        match self.existing_set::<E>() {
            Ok(Some(set)) => set.len(),
            _ => 0,
        }
    }

    /// 已出现过的事件类型名列表（只读视图，集合可能为空）
    pub fn registered_types(&self) -> Vec<&'static str> {
        self.sets.iter().map(|e| e.value().0).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// 移除全部事件类型及其处理器集合
    pub fn clear(&self) {
        self.sets.clear();
        debug!("registry cleared");
    }

    fn existing_set<E: Dispatch>(&self) -> BusResult<Option<Arc<HandlerSet<E::Handler>>>> {
        let Some(erased) = self
            .sets
            .get(&E::key().id())
            .map(|e| e.value().1.clone())
        else {
            return Ok(None);
        };

        downcast_set::<E>(erased).map(Some)
    }
}

fn downcast_set<E: Dispatch>(erased: ErasedSet) -> BusResult<Arc<HandlerSet<E::Handler>>> {
    // 正常情况下不会失败；只有两个事件声明了同一个 EventType 但处理器不同才会走到这里
    erased
        .downcast::<HandlerSet<E::Handler>>()
        .map_err(|_| BusError::TypeMismatch {
            event: E::key().name(),
            expected: type_name::<E::Handler>(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Event, EventType, HandlerResult};
    use std::sync::Barrier;
    use std::thread;

    #[derive(Debug)]
    struct Created;

    trait CreatedHandler: Send + Sync {
        fn on_created(&self, event: &Created) -> HandlerResult;
    }

    impl Event for Created {
        type Handler = dyn CreatedHandler;

        fn event_type() -> EventType {
            EventType::of::<Self>()
        }

        fn dispatch(&self, handler: &Self::Handler) -> HandlerResult {
            handler.on_created(self)
        }
    }

    // 故意复用 Created 的 EventType，但处理器类型不同
    #[derive(Debug)]
    struct Impostor;

    trait ImpostorHandler: Send + Sync {
        fn on_impostor(&self, event: &Impostor) -> HandlerResult;
    }

    impl Event for Impostor {
        type Handler = dyn ImpostorHandler;

        fn event_type() -> EventType {
            EventType::of::<Created>()
        }

        fn dispatch(&self, handler: &Self::Handler) -> HandlerResult {
            handler.on_impostor(self)
        }
    }

    struct Noop;

    impl CreatedHandler for Noop {
        fn on_created(&self, _event: &Created) -> HandlerResult {
            Ok(())
        }
    }

    impl ImpostorHandler for Noop {
        fn on_impostor(&self, _event: &Impostor) -> HandlerResult {
            Ok(())
        }
    }

    #[test]
    fn register_is_idempotent_per_instance() {
        let registry = Registry::new();
        let handler: Arc<dyn CreatedHandler> = Arc::new(Noop);

        registry.register::<Created>(handler.clone()).unwrap();
        registry.register::<Created>(handler.clone()).unwrap();
        assert_eq!(registry.handler_count::<Created>(), 1);

        // 不同实例即使类型相同也是不同的处理器
        registry.register::<Created>(Arc::new(Noop)).unwrap();
        assert_eq!(registry.handler_count::<Created>(), 2);
    }

    #[test]
    fn unregister_unknown_is_noop() {
        let registry = Registry::new();
        let handler: Arc<dyn CreatedHandler> = Arc::new(Noop);

        assert!(!registry.unregister::<Created>(&handler).unwrap());

        registry.register::<Created>(Arc::new(Noop)).unwrap();
        assert!(!registry.unregister::<Created>(&handler).unwrap());
        assert_eq!(registry.handler_count::<Created>(), 1);
    }

    #[test]
    fn unregister_keeps_empty_set() {
        let registry = Registry::new();
        let handler: Arc<dyn CreatedHandler> = Arc::new(Noop);

        registry.register::<Created>(handler.clone()).unwrap();
        assert!(registry.unregister::<Created>(&handler).unwrap());

        assert_eq!(registry.handler_count::<Created>(), 0);
        assert!(registry.lookup::<Created>().unwrap().is_empty());
        assert_eq!(registry.registered_types().len(), 1);
    }

    #[test]
    fn lookup_unknown_type_is_empty_and_does_not_insert() {
        let registry = Registry::new();
        assert!(registry.lookup::<Created>().unwrap().is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn mismatched_set_is_rejected_without_mutation() {
        let registry = Registry::new();
        registry.register::<Created>(Arc::new(Noop)).unwrap();

        let err = registry.register::<Impostor>(Arc::new(Noop)).unwrap_err();
        match err {
            BusError::TypeMismatch { expected, .. } => assert!(expected.contains("ImpostorHandler")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(
            registry.lookup::<Impostor>(),
            Err(BusError::TypeMismatch { .. })
        ));
        assert_eq!(registry.handler_count::<Created>(), 1);
    }

    #[test]
    fn clear_drops_every_type() {
        let registry = Registry::new();
        registry.register::<Created>(Arc::new(Noop)).unwrap();
        assert!(!registry.is_empty());

        registry.clear();

        assert!(registry.is_empty());
        assert!(registry.registered_types().is_empty());
        assert_eq!(registry.handler_count::<Created>(), 0);
    }

    #[test]
    fn concurrent_first_registrations_converge_on_one_set() {
        const THREADS: usize = 16;
        let registry = Registry::new();
        let barrier = Barrier::new(THREADS);

        thread::scope(|s| {
            for _ in 0..THREADS {
                s.spawn(|| {
                    barrier.wait();
                    registry.register::<Created>(Arc::new(Noop)).unwrap();
                });
            }
        });

        assert_eq!(registry.handler_count::<Created>(), THREADS);
        assert_eq!(registry.registered_types().len(), 1);
    }
}
