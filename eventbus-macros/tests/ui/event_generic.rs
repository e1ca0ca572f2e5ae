use eventbus::{Event, HandlerResult};
use std::fmt::Debug;

#[eventbus::event(handler = dyn PayloadHandler<T>, method = on_payload)]
struct Payload<T: Debug + Send + Sync + 'static> {
    value: T,
}

trait PayloadHandler<T: Debug + Send + Sync + 'static>: Send + Sync {
    fn on_payload(&self, event: &Payload<T>) -> HandlerResult;
}

struct Sum;

impl PayloadHandler<u32> for Sum {
    fn on_payload(&self, event: &Payload<u32>) -> HandlerResult {
        assert_eq!(event.value, 3);
        Ok(())
    }
}

fn main() {
    let payload = Payload { value: 3u32 };
    assert!(payload.dispatch(&Sum).is_ok());
    assert_ne!(Payload::<u32>::event_type(), Payload::<u64>::event_type());
}
