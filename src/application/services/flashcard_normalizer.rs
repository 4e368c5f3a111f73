use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{Flashcard, QuizEntry, StructuredQuiz};

static LINE_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\(\s*lines?\s+[\d\s,-]+\)").unwrap());

const ELLIPSES: [&str; 3] = ["[...]", "...", "\u{2026}"];

#[derive(Debug, Clone, Copy, Default)]
pub struct FlashcardNormalizer;

impl FlashcardNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, quiz: StructuredQuiz) -> Vec<Flashcard> {
        self.normalize_entries(quiz, None)
    }

    /// Like [`normalize`](Self::normalize), but quotes that cannot be found
    /// in `source` are replaced by the not-available sentinel.
    pub fn normalize_grounded(&self, quiz: StructuredQuiz, source: &str) -> Vec<Flashcard> {
        self.normalize_entries(quiz, Some(source))
    }

    fn normalize_entries(&self, quiz: StructuredQuiz, source: Option<&str>) -> Vec<Flashcard> {
        let folded_source = source.map(fold);
        quiz.questions
            .into_iter()
            .filter_map(|entry| to_flashcard(entry, folded_source.as_deref()))
            .collect()
    }
}

fn to_flashcard(entry: QuizEntry, folded_source: Option<&str>) -> Option<Flashcard> {
    let Some(question) = entry.question.as_deref().map(unescape_doubled_backslashes) else {
        tracing::debug!("Dropping quiz entry without question");
        return None;
    };
    let Some(answer) = entry.answer.as_deref().map(unescape_doubled_backslashes) else {
        tracing::debug!("Dropping quiz entry without answer");
        return None;
    };

    let quote = entry
        .quote
        .filter(|q| !q.trim().is_empty())
        .or(entry.key_info)
        .map(|q| unescape_doubled_backslashes(&q))
        .filter(|q| match folded_source {
            Some(source) => is_grounded(q, source),
            None => true,
        });

    match Flashcard::new(question, answer, quote) {
        Ok(card) => Some(card),
        Err(e) => {
            tracing::debug!(error = %e, "Dropping invalid quiz entry");
            None
        }
    }
}

pub fn unescape_doubled_backslashes(text: &str) -> String {
    text.replace("\\\\", "\\")
}

/// Best-effort check that `quote` comes from the already folded source.
/// Every ellipsis-separated fragment of the quote must appear in it.
fn is_grounded(quote: &str, folded_source: &str) -> bool {
    let without_refs = LINE_REFERENCE.replace_all(quote, " ");
    let mut fragments = vec![without_refs.into_owned()];
    for ellipsis in ELLIPSES {
        fragments = fragments
            .iter()
            .flat_map(|f| f.split(ellipsis).map(str::to_string).collect::<Vec<_>>())
            .collect();
    }

    let folded: Vec<String> = fragments
        .iter()
        .map(|f| fold(f))
        .filter(|f| !f.is_empty())
        .collect();

    !folded.is_empty() && folded.iter().all(|f| folded_source.contains(f.as_str()))
}

/// Lowercases, drops markdown emphasis and quoting characters, and
/// collapses whitespace.
fn fold(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_was_space = true;

    for ch in text.chars() {
        if matches!(ch, '*' | '_' | '`' | '#' | '>' | '"' | '\u{201C}' | '\u{201D}') {
            continue;
        }
        if ch.is_whitespace() {
            if !prev_was_space {
                out.push(' ');
                prev_was_space = true;
            }
        } else {
            out.extend(ch.to_lowercase());
            prev_was_space = false;
        }
    }

    out.trim_end().to_string()
}
