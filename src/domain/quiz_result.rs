use super::{Flashcard, GenerationRunId};

pub const QUIZ_NOTE_HEADER: &str = "# Generated Quiz\n\n#flashcards\n";

#[derive(Debug, Clone, PartialEq)]
pub struct QuizResult {
    pub run_id: GenerationRunId,
    pub flashcards: Vec<Flashcard>,
}

impl QuizResult {
    pub fn new(run_id: GenerationRunId, flashcards: Vec<Flashcard>) -> Self {
        Self { run_id, flashcards }
    }

    pub fn empty(run_id: GenerationRunId) -> Self {
        Self::new(run_id, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.flashcards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flashcards.is_empty()
    }

    pub fn rendered_cards(&self) -> Vec<String> {
        self.flashcards.iter().map(Flashcard::render).collect()
    }

    pub fn to_markdown(&self) -> String {
        let mut note = String::from(QUIZ_NOTE_HEADER);
        for card in self.rendered_cards() {
            note.push('\n');
            note.push_str(&card);
            note.push('\n');
        }
        note
    }
}
