use eventbus::{
    EventBus, EventBusConfig, HandlerResult, UnhandledEvent, UnhandledHandler, event,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[event(handler = dyn OrderHandler, method = on_order_placed)]
struct OrderPlaced {
    order_id: String,
    amount: u64,
}

#[event(handler = dyn CancelHandler, method = on_order_cancelled)]
struct OrderCancelled {
    order_id: String,
}

trait OrderHandler: Send + Sync {
    fn on_order_placed(&self, event: &OrderPlaced) -> HandlerResult;
}

trait CancelHandler: Send + Sync {
    fn on_order_cancelled(&self, event: &OrderCancelled) -> HandlerResult;
}

/// 累计订单金额
#[derive(Default)]
struct Ledger {
    total: AtomicU64,
}

impl OrderHandler for Ledger {
    fn on_order_placed(&self, event: &OrderPlaced) -> HandlerResult {
        let total = self.total.fetch_add(event.amount, Ordering::SeqCst) + event.amount;
        info!(order = %event.order_id, amount = event.amount, total, "ledger updated");
        Ok(())
    }
}

struct Mailer;

impl OrderHandler for Mailer {
    fn on_order_placed(&self, event: &OrderPlaced) -> HandlerResult {
        if event.amount == 0 {
            anyhow::bail!("refusing to confirm empty order {}", event.order_id);
        }
        info!(order = %event.order_id, "confirmation mail queued");
        Ok(())
    }
}

struct DeadLetters;

impl UnhandledHandler for DeadLetters {
    fn on_unhandled_event(&self, event: &UnhandledEvent<'_>) -> HandlerResult {
        match event.downcast_original::<OrderCancelled>() {
            Some(cancelled) => warn!(order = %cancelled.order_id, "cancellation not handled"),
            None => warn!(event = %event.original_type(), "event not handled"),
        }
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let bus = EventBus::with_config(
        EventBusConfig::builder()
            .name("orders")
            .threads(2)
            .build(),
    )?;

    let ledger = Arc::new(Ledger::default());
    let mailer: Arc<dyn OrderHandler> = Arc::new(Mailer);
    bus.register::<OrderPlaced>(ledger.clone())?;
    bus.register::<OrderPlaced>(mailer.clone())?;
    bus.register::<UnhandledEvent<'static>>(Arc::new(DeadLetters))?;

    // 同步分发
    bus.fire(&OrderPlaced {
        order_id: "o-1".into(),
        amount: 120,
    })?;
    bus.fire(&OrderCancelled {
        order_id: "o-1".into(),
    })?;

    // 处理器失败：剩余处理器不再执行
    if let Err(err) = bus.fire(&OrderPlaced {
        order_id: "o-0".into(),
        amount: 0,
    }) {
        warn!(error = %err, "dispatch failed");
    }

    // 异步分发，完成后回调
    let handles = (2..=4)
        .map(|n| {
            let order = OrderPlaced {
                order_id: format!("o-{n}"),
                amount: n * 10,
            };
            bus.fire_async_with(Arc::new(order), |done: &OrderPlaced| {
                info!(order = %done.order_id, "async dispatch finished");
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    for handle in handles {
        handle.wait_timeout(Duration::from_secs(1))?;
    }

    bus.unregister::<OrderPlaced>(&mailer)?;
    info!(
        handlers = bus.handler_count::<OrderPlaced>(),
        types = ?bus.registered_types(),
        "registry state"
    );

    bus.shutdown_and_wait(Duration::from_secs(5))?;
    info!(total = ledger.total.load(Ordering::SeqCst), "done");
    Ok(())
}
