#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    pub index: usize,
    pub text: String,
}

impl TextChunk {
    pub fn new(index: usize, text: String) -> Self {
        Self { index, text }
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}
