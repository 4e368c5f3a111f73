use crate::application::ports::Notifier;

pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str) {
        tracing::warn!(notice = %message, "User notice");
    }
}
