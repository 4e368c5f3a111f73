use crate::domain::TextChunk;

pub trait TextSplitter: Send + Sync {
    /// Splits `text` into ordered chunks. Never fails: oversized fragments
    /// are emitted whole rather than dropped.
    fn split(&self, text: &str) -> Vec<TextChunk>;
}
