mod markdown_segmenter;

pub use markdown_segmenter::{DEFAULT_CHUNK_SIZE, MarkdownSegmenter};
