mod collecting_notifier;
mod tracing_notifier;

pub use collecting_notifier::CollectingNotifier;
pub use tracing_notifier::TracingNotifier;
