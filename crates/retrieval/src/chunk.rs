/// Recursive-ish character chunking: splits text into overlapping windows
/// of a target size. Every retrieval source (tone mail, knowledge-base
/// files, uploaded documents) goes through the same chunker and the same
/// chunk/overlap configuration (§4.3, §4.4, §4.6 — standardized per
/// SPEC_FULL.md's open-question resolution).
#[derive(Clone, Copy, Debug)]
pub struct Chunker {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl Chunker {
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        assert!(chunk_size > 0, "chunk_size must be positive");
        assert!(overlap < chunk_size, "overlap must be smaller than chunk_size");
        Self {
            chunk_size,
            overlap,
        }
    }

    /// Splits `text` into chunks of at most `chunk_size` characters, each
    /// subsequent chunk starting `chunk_size - overlap` characters after
    /// the previous one. Empty input yields no chunks.
    pub fn split(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return Vec::new();
        }

        let stride = self.chunk_size - self.overlap;
        let mut chunks = Vec::new();
        let mut start = 0;
        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            let chunk: String = chars[start..end].iter().collect();
            if !chunk.trim().is_empty() {
                chunks.push(chunk);
            }
            if end == chars.len() {
                break;
            }
            start += stride;
        }
        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_short_text_into_a_single_chunk() {
        let chunker = Chunker::new(1000, 100);
        let chunks = chunker.split("a short document");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], "a short document");
    }

    #[test]
    fn splits_long_text_into_overlapping_chunks() {
        let chunker = Chunker::new(10, 2);
        let text = "a".repeat(25);
        let chunks = chunker.split(&text);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.len() <= 10);
        }
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        let chunker = Chunker::new(1000, 100);
        assert!(chunker.split("").is_empty());
        assert!(chunker.split("   ").is_empty());
    }

    #[test]
    fn consecutive_chunks_overlap_by_the_configured_amount() {
        let chunker = Chunker::new(10, 3);
        let text: String = ('a'..='z').collect();
        let chunks = chunker.split(&text);
        assert_eq!(&chunks[0][7..], &chunks[1][..3]);
    }
}
