use eventbus::{Event, EventType, HandlerResult};

#[eventbus::event(handler = dyn OrderHandler, method = on_order_placed)]
#[derive(Clone)]
struct OrderPlaced {
    order_id: u64,
}

trait OrderHandler: Send + Sync {
    fn on_order_placed(&self, event: &OrderPlaced) -> HandlerResult;
}

struct Checker;

impl OrderHandler for Checker {
    fn on_order_placed(&self, event: &OrderPlaced) -> HandlerResult {
        anyhow::ensure!(event.order_id == 7, "unexpected order {}", event.order_id);
        Ok(())
    }
}

fn main() {
    let event = OrderPlaced { order_id: 7 };
    assert_eq!(OrderPlaced::event_type(), EventType::of::<OrderPlaced>());
    assert!(event.dispatch(&Checker).is_ok());
    let _ = format!("{event:?}");
}
