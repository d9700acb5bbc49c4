//! Word-window chunking for embedding and retrieval.
//!
//! Transcript text is split into overlapping runs of whole words; each
//! chunk's time range is derived from the transcript segments its words
//! came from, so timestamps stay accurate regardless of speech rate.

use crate::error::{LekseError, Result};
use crate::transcript::TranscriptSegment;
use serde::{Deserialize, Serialize};

/// A chunk of transcript text with the time range its words cover.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimedChunk {
    /// Text content of this chunk.
    pub text: String,
    /// Start time in seconds.
    pub start_seconds: f64,
    /// End time in seconds.
    pub end_seconds: f64,
    /// Order of this chunk in the video.
    pub order: usize,
}

/// Split text into overlapping word windows.
///
/// Each chunk is a run of `size` words; the window advances by
/// `size - overlap` words, so adjacent chunks share exactly `overlap`
/// words. The final chunk may be shorter than `size`.
pub fn chunk_text(text: &str, size: usize, overlap: usize) -> Result<Vec<String>> {
    validate_window(size, overlap)?;

    let words: Vec<&str> = text.split_whitespace().collect();
    let mut chunks = Vec::new();

    let mut i = 0;
    while i < words.len() {
        let end = (i + size).min(words.len());
        chunks.push(words[i..end].join(" "));
        i += size - overlap;
    }

    Ok(chunks)
}

/// Chunk a transcript into timed word windows.
///
/// Word positions are mapped back to the segments that produced them, so a
/// chunk's `[start_seconds, end_seconds)` reflects the actual subtitle
/// timing of its first and last word.
pub fn chunk_transcript(
    segments: &[TranscriptSegment],
    size: usize,
    overlap: usize,
) -> Result<Vec<TimedChunk>> {
    validate_window(size, overlap)?;

    // Per-word (text, segment start, segment end) in transcript order.
    let mut words: Vec<(&str, f64, f64)> = Vec::new();
    for segment in segments {
        for word in segment.text.split_whitespace() {
            words.push((word, segment.start, segment.end()));
        }
    }

    let mut chunks = Vec::new();
    let mut i = 0;
    let mut order = 0;

    while i < words.len() {
        let end = (i + size).min(words.len());
        let window = &words[i..end];

        chunks.push(TimedChunk {
            text: window
                .iter()
                .map(|(w, _, _)| *w)
                .collect::<Vec<_>>()
                .join(" "),
            start_seconds: window[0].1,
            end_seconds: window[window.len() - 1].2,
            order,
        });

        order += 1;
        i += size - overlap;
    }

    Ok(chunks)
}

fn validate_window(size: usize, overlap: usize) -> Result<()> {
    if size == 0 {
        return Err(LekseError::InvalidInput(
            "chunk size must be greater than zero".to_string(),
        ));
    }
    if overlap >= size {
        return Err(LekseError::InvalidInput(format!(
            "chunk overlap ({}) must be less than chunk size ({})",
            overlap, size
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_words(n: usize) -> String {
        (0..n).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_chunk_text_covers_every_word_with_exact_overlap() {
        let text = numbered_words(123);
        let size = 50;
        let overlap = 10;
        let chunks = chunk_text(&text, size, overlap).unwrap();

        // Every word appears, in order, with windows advancing by size - overlap.
        let all_words: Vec<&str> = text.split_whitespace().collect();
        for (c, chunk) in chunks.iter().enumerate() {
            let words: Vec<&str> = chunk.split_whitespace().collect();
            let start = c * (size - overlap);
            assert_eq!(words, &all_words[start..(start + words.len())]);
            assert!(words.len() <= size);
        }

        // Adjacent chunks overlap by exactly `overlap` words (final chunk may be short).
        for pair in chunks.windows(2) {
            let left: Vec<&str> = pair[0].split_whitespace().collect();
            let right: Vec<&str> = pair[1].split_whitespace().collect();
            let shared = overlap.min(right.len());
            assert_eq!(&left[left.len() - shared..], &right[..shared]);
        }

        // Last word is covered.
        assert!(chunks.last().unwrap().ends_with("w122"));
    }

    #[test]
    fn test_chunk_text_short_input_yields_single_chunk() {
        let chunks = chunk_text("one two three", 50, 10).unwrap();
        assert_eq!(chunks, vec!["one two three".to_string()]);
    }

    #[test]
    fn test_chunk_text_rejects_bad_window() {
        assert!(chunk_text("a b c", 10, 10).is_err());
        assert!(chunk_text("a b c", 10, 15).is_err());
        assert!(chunk_text("a b c", 0, 0).is_err());
    }

    #[test]
    fn test_chunk_text_empty_input() {
        let chunks = chunk_text("", 50, 10).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_chunk_transcript_times_come_from_segments() {
        // Three segments, 4 words each; chunk size 6 overlap 2 -> windows
        // advance by 4 words.
        let segments = vec![
            TranscriptSegment::new("a b c d", 0.0, 10.0),
            TranscriptSegment::new("e f g h", 10.0, 10.0),
            TranscriptSegment::new("i j k l", 20.0, 10.0),
        ];

        let chunks = chunk_transcript(&segments, 6, 2).unwrap();
        assert_eq!(chunks.len(), 3);

        // First chunk spans words a..f: segments 1-2.
        assert_eq!(chunks[0].text, "a b c d e f");
        assert_eq!(chunks[0].start_seconds, 0.0);
        assert_eq!(chunks[0].end_seconds, 20.0);

        // Second chunk starts at word e (segment 2).
        assert_eq!(chunks[1].text, "e f g h i j");
        assert_eq!(chunks[1].start_seconds, 10.0);
        assert_eq!(chunks[1].end_seconds, 30.0);

        // Final short chunk.
        assert_eq!(chunks[2].text, "i j k l");
        assert_eq!(chunks[2].start_seconds, 20.0);
        assert_eq!(chunks[2].order, 2);
    }
}
