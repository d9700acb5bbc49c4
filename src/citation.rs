//! Timestamp citation link parsing.
//!
//! The answer prompt instructs the model to cite video moments as markdown
//! links of the exact shape `[<seconds>](?v=<videoId>&t=<seconds>)`. This
//! module is the other half of that wire format: it recognizes those links
//! in (possibly partial) streamed markdown and classifies everything else
//! as inert, so generated content can never smuggle in a live external
//! link.

use regex::Regex;
use std::sync::OnceLock;

/// A parsed citation: where to seek in which video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeekTarget {
    pub video_id: String,
    /// Whole seconds; fractional source values are floored.
    pub seconds: u64,
}

/// How a markdown link should be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkKind {
    /// A citation link: render an interactive control that seeks the player.
    Seek(SeekTarget),
    /// Anything else: render the text with navigation stripped.
    Inert,
}

/// A markdown link found in the input, with byte offsets into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSpan {
    /// Byte offset of `[` in the input.
    pub start: usize,
    /// Byte offset one past `)` in the input.
    pub end: usize,
    /// The link's visible text.
    pub text: String,
    pub kind: LinkKind,
}

fn link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Complete links only; an unterminated trailing link simply doesn't match.
    RE.get_or_init(|| Regex::new(r"\[([^\[\]]*)\]\(([^()\s]*)\)").expect("Invalid regex"))
}

fn target_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\?v=([A-Za-z0-9_-]+)&t=(\d+(?:\.\d+)?)$").expect("Invalid regex")
    })
}

/// Parse a citation from a link's visible text and target.
///
/// Returns None unless the target is exactly `?v=<id>&t=<seconds>`, the
/// visible text is itself a plain seconds value (the legacy MM:SS display
/// variant is rejected), and both agree on the whole-second value. A link
/// whose label and target disagree would seek somewhere other than it
/// claims, so it renders inert. Fractional seconds are floored.
pub fn parse_citation(text: &str, target: &str) -> Option<SeekTarget> {
    // Visible text must be a bare number of seconds.
    let shown = text
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|s| s.is_finite() && *s >= 0.0)?;

    let caps = target_regex().captures(target.trim())?;
    let video_id = caps.get(1)?.as_str().to_string();
    let seconds = caps.get(2)?.as_str().parse::<f64>().ok()?;

    if shown.floor() as u64 != seconds.floor() as u64 {
        return None;
    }

    Some(SeekTarget {
        video_id,
        seconds: seconds.floor() as u64,
    })
}

/// Scan markdown for links and classify each one.
///
/// Safe to re-run against a growing string: malformed or incomplete
/// trailing syntax is ignored rather than an error, so a streaming consumer
/// can annotate after every appended fragment.
pub fn annotate(markdown: &str) -> Vec<LinkSpan> {
    link_regex()
        .captures_iter(markdown)
        .map(|caps| {
            let whole = caps.get(0).expect("capture 0 always present");
            let text = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            let target = caps.get(2).map(|m| m.as_str()).unwrap_or_default();

            let kind = match parse_citation(text, target) {
                Some(seek) => LinkKind::Seek(seek),
                None => LinkKind::Inert,
            };

            LinkSpan {
                start: whole.start(),
                end: whole.end(),
                text: text.to_string(),
                kind,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_citation_basic() {
        let seek = parse_citation("42", "?v=abc123&t=42").unwrap();
        assert_eq!(seek.video_id, "abc123");
        assert_eq!(seek.seconds, 42);
    }

    #[test]
    fn test_parse_citation_floors_fractional_seconds() {
        let seek = parse_citation("569.16", "?v=abc123&t=569.16").unwrap();
        assert_eq!(seek.seconds, 569);
    }

    #[test]
    fn test_parse_citation_rejects_mmss_text() {
        // Legacy display variant: target matches but text is MM:SS.
        assert!(parse_citation("3:21", "?v=abc123&t=201").is_none());
    }

    #[test]
    fn test_parse_citation_rejects_label_target_mismatch() {
        // The label claims one moment, the target another.
        assert!(parse_citation("42", "?v=abc123&t=999").is_none());
        // Agreement is on whole seconds, so a fractional target still matches.
        let seek = parse_citation("569", "?v=abc123&t=569.16").unwrap();
        assert_eq!(seek.seconds, 569);
    }

    #[test]
    fn test_parse_citation_rejects_foreign_targets() {
        assert!(parse_citation("42", "https://example.com/?v=abc123&t=42").is_none());
        assert!(parse_citation("42", "?video=abc123&time=42").is_none());
        assert!(parse_citation("42", "?v=abc123").is_none());
        assert!(parse_citation("42", "?v=abc123&t=42&x=1").is_none());
    }

    #[test]
    fn test_annotate_interactive_link() {
        let spans = annotate("See the explanation here. [42](?v=abc123&t=42)");
        assert_eq!(spans.len(), 1);
        assert_eq!(
            spans[0].kind,
            LinkKind::Seek(SeekTarget {
                video_id: "abc123".to_string(),
                seconds: 42
            })
        );
    }

    #[test]
    fn test_annotate_inert_links() {
        let spans = annotate("Legacy [3:21](?v=abc123&t=201) and external [docs](https://example.com)");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].kind, LinkKind::Inert);
        assert_eq!(spans[1].kind, LinkKind::Inert);
    }

    #[test]
    fn test_annotate_partial_stream_is_tolerated() {
        // The trailing link is incomplete; it is skipped, not an error.
        let partial = "First point. [135](?v=dpw9EHDh2bM&t=135)\n\nSecond point. [14";
        let spans = annotate(partial);
        assert_eq!(spans.len(), 1);
        assert!(matches!(spans[0].kind, LinkKind::Seek(_)));

        // Re-running on the grown string picks up the completed link.
        let grown = format!("{}0](?v=dpw9EHDh2bM&t=140)", partial);
        let spans = annotate(&grown);
        assert_eq!(spans.len(), 2);
        assert_eq!(
            spans[1].kind,
            LinkKind::Seek(SeekTarget {
                video_id: "dpw9EHDh2bM".to_string(),
                seconds: 140
            })
        );
    }

    #[test]
    fn test_annotate_empty_and_linkless() {
        assert!(annotate("").is_empty());
        assert!(annotate("no links at all").is_empty());
    }

    #[test]
    fn test_span_offsets() {
        let input = "x [42](?v=a1&t=42) y";
        let spans = annotate(input);
        assert_eq!(&input[spans[0].start..spans[0].end], "[42](?v=a1&t=42)");
    }
}
