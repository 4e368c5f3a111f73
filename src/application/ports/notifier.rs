/// User-facing advisory channel. Notices are informational; callers never
/// branch on them.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}
