use async_trait::async_trait;

#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Text of the active document, or `None` when there is nothing to read.
    async fn current_text(&self) -> Option<String>;
}
