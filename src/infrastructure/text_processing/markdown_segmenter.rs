use unicode_segmentation::UnicodeSegmentation;

use crate::application::ports::TextSplitter;
use crate::domain::TextChunk;

pub const DEFAULT_CHUNK_SIZE: usize = 2000;

/// Greedy heading/line/sentence packer. Sizes are counted in characters.
pub struct MarkdownSegmenter {
    max_chunk_size: usize,
}

impl Default for MarkdownSegmenter {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

impl MarkdownSegmenter {
    pub fn new(max_chunk_size: usize) -> Self {
        Self {
            max_chunk_size: max_chunk_size.max(1),
        }
    }

    pub fn max_chunk_size(&self) -> usize {
        self.max_chunk_size
    }

    pub fn segment(&self, text: &str) -> Vec<TextChunk> {
        let mut chunks = Vec::new();
        let mut buffer = ChunkBuffer::new();

        for section in Self::split_into_sections(text) {
            let fragments: Vec<(&str, usize)> = Self::split_into_fragments(&section)
                .into_iter()
                .map(|f| (f, f.chars().count()))
                .collect();
            if fragments.is_empty() {
                continue;
            }

            // A section that fits in a chunk of its own starts one rather
            // than straddling two.
            let section_chars =
                fragments.iter().map(|(_, n)| n).sum::<usize>() + fragments.len() - 1;
            if section_chars <= self.max_chunk_size
                && buffer.len_with(section_chars) > self.max_chunk_size
            {
                buffer.flush_into(&mut chunks);
            }

            for (fragment, fragment_chars) in fragments {
                if !buffer.is_empty() && buffer.len_with(fragment_chars) > self.max_chunk_size {
                    buffer.flush_into(&mut chunks);
                }
                buffer.push(fragment, fragment_chars);
            }
        }

        buffer.flush_into(&mut chunks);
        tracing::debug!(
            chunks = chunks.len(),
            max_chunk_size = self.max_chunk_size,
            "Segmented markdown"
        );
        chunks
    }

    fn split_into_sections(text: &str) -> Vec<Vec<&str>> {
        let mut sections: Vec<Vec<&str>> = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for line in text.lines() {
            if line.starts_with('#') && !current.is_empty() {
                sections.push(std::mem::take(&mut current));
            }
            current.push(line);
        }

        if !current.is_empty() {
            sections.push(current);
        }

        sections
    }

    fn split_into_fragments<'a>(lines: &[&'a str]) -> Vec<&'a str> {
        lines
            .iter()
            .copied()
            .flat_map(|line| line.split_sentence_bounds())
            .map(str::trim)
            .filter(|fragment| !fragment.is_empty())
            .collect()
    }
}

struct ChunkBuffer {
    text: String,
    chars: usize,
}

impl ChunkBuffer {
    fn new() -> Self {
        Self {
            text: String::new(),
            chars: 0,
        }
    }

    fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn len_with(&self, extra_chars: usize) -> usize {
        if self.is_empty() {
            extra_chars
        } else {
            self.chars + 1 + extra_chars
        }
    }

    fn push(&mut self, fragment: &str, fragment_chars: usize) {
        if !self.is_empty() {
            self.text.push(' ');
            self.chars += 1;
        }
        self.text.push_str(fragment);
        self.chars += fragment_chars;
    }

    fn flush_into(&mut self, chunks: &mut Vec<TextChunk>) {
        if self.is_empty() {
            return;
        }
        let index = chunks.len();
        chunks.push(TextChunk::new(index, std::mem::take(&mut self.text)));
        self.chars = 0;
    }
}

impl TextSplitter for MarkdownSegmenter {
    fn split(&self, text: &str) -> Vec<TextChunk> {
        self.segment(text)
    }
}
