use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{DocumentSource, Notifier};

pub const NOT_MARKDOWN_NOTICE: &str = "The file type should be markdown";
pub const READ_FAILED_NOTICE: &str = "The note could not be read";

pub struct MarkdownFileSource {
    path: PathBuf,
    notifier: Option<Arc<dyn Notifier>>,
}

impl MarkdownFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            notifier: None,
        }
    }

    /// Reports rejected or unreadable files to the user as well as the log.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Quiz title derived from the file stem, e.g. `Biology Quiz`.
    pub fn quiz_title(&self) -> String {
        match self.path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) if !stem.is_empty() => format!("{} Quiz", stem),
            _ => "NewQuiz".to_string(),
        }
    }

    fn notify(&self, message: &str) {
        if let Some(notifier) = &self.notifier {
            notifier.notify(message);
        }
    }
}

#[async_trait]
impl DocumentSource for MarkdownFileSource {
    async fn current_text(&self) -> Option<String> {
        let is_markdown = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("md") || e.eq_ignore_ascii_case("markdown"));
        if !is_markdown {
            tracing::warn!(path = %self.path.display(), "The file type should be markdown");
            self.notify(NOT_MARKDOWN_NOTICE);
            return None;
        }

        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to read document"
                );
                self.notify(READ_FAILED_NOTICE);
                None
            }
        }
    }
}
