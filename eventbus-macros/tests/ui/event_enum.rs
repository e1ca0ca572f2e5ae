use eventbus::{Event, HandlerResult};

#[eventbus::event(handler = dyn AuditHandler, method = on_audit)]
enum Audit {
    Login { user: String },
    Logout,
}

trait AuditHandler: Send + Sync {
    fn on_audit(&self, event: &Audit) -> HandlerResult;
}

struct Noop;

impl AuditHandler for Noop {
    fn on_audit(&self, event: &Audit) -> HandlerResult {
        match event {
            Audit::Login { user } => assert!(!user.is_empty()),
            Audit::Logout => {}
        }
        Ok(())
    }
}

fn main() {
    let login = Audit::Login { user: "alice".into() };
    assert!(login.dispatch(&Noop).is_ok());
    assert!(Audit::Logout.dispatch(&Noop).is_ok());
    assert!(format!("{login:?}").starts_with("Login"));
}
