//! Context assembly for answer generation.
//!
//! Vector search with a small top-k under-covers long videos, producing
//! truncated, overly narrow answers. The assembler therefore always
//! includes the full transcript when it is available, bounded by a
//! character budget, with the relevance-ranked excerpts kept alongside it.

use crate::index::VectorMatch;

/// Fallback context when neither transcript nor excerpts are available.
/// The generation step still runs so the caller gets a real answer.
pub const NO_CONTENT_FALLBACK: &str = "No transcript content is available for this video.";

const TRANSCRIPT_LABEL: &str = "Full transcript:";
const EXCERPTS_LABEL: &str = "Relevant excerpts:";

/// Assembles retrieval results and the transcript into a prompt-ready
/// context string within a character budget.
pub struct ContextAssembler {
    max_context_chars: usize,
}

impl ContextAssembler {
    pub fn new(max_context_chars: usize) -> Self {
        Self { max_context_chars }
    }

    /// Build the context string.
    ///
    /// Budgeting: excerpts are kept in full (they are already
    /// relevance-ranked) and the transcript is truncated from the end, so
    /// the earliest framing of the video survives. Excerpts whose text is
    /// already covered by the included transcript span are omitted; no
    /// chunk text appears twice. The output never exceeds the budget.
    pub fn assemble(&self, matches: &[VectorMatch], transcript: Option<&str>) -> String {
        let transcript = transcript.map(str::trim).filter(|t| !t.is_empty());

        // Drop empty and mutually duplicated excerpts up front.
        let mut excerpts: Vec<&str> = Vec::new();
        for m in matches {
            let text = m.text.trim();
            if !text.is_empty() && !excerpts.contains(&text) {
                excerpts.push(text);
            }
        }

        if transcript.is_none() && excerpts.is_empty() {
            return truncate_chars(NO_CONTENT_FALLBACK, self.max_context_chars);
        }

        // The included transcript span depends on how much room the
        // excerpts take, and which excerpts are redundant depends on the
        // span. Dropping an excerpt only grows the span, so iterating to a
        // fixpoint terminates.
        let mut span = String::new();
        if let Some(full) = transcript {
            loop {
                span = self.transcript_span(full, &excerpts);
                let before = excerpts.len();
                excerpts.retain(|e| !span.contains(e));
                if excerpts.len() == before {
                    break;
                }
            }
        }

        let mut sections: Vec<String> = Vec::new();
        if !span.is_empty() {
            sections.push(format!("{}\n{}", TRANSCRIPT_LABEL, span));
        }
        if !excerpts.is_empty() {
            sections.push(format!(
                "{}\n{}",
                EXCERPTS_LABEL,
                excerpts
                    .iter()
                    .enumerate()
                    .map(|(i, e)| format!("[{}] {}", i + 1, e))
                    .collect::<Vec<_>>()
                    .join("\n\n")
            ));
        }

        let context = sections.join("\n\n");
        if context.is_empty() {
            return truncate_chars(NO_CONTENT_FALLBACK, self.max_context_chars);
        }

        // Excerpt text alone can exceed a tight budget; the cap always wins.
        truncate_chars(&context, self.max_context_chars)
    }

    /// Transcript characters that fit after the excerpt section is paid for.
    fn transcript_span(&self, full: &str, excerpts: &[&str]) -> String {
        let excerpt_cost = if excerpts.is_empty() {
            0
        } else {
            let entries: usize = excerpts
                .iter()
                .enumerate()
                .map(|(i, e)| format!("[{}] ", i + 1).chars().count() + e.chars().count())
                .sum();
            // label + newline, blank lines between entries, section separator
            EXCERPTS_LABEL.chars().count() + 1 + entries + 2 * excerpts.len().saturating_sub(1) + 2
        };

        let label_cost = TRANSCRIPT_LABEL.chars().count() + 1;
        let budget = self
            .max_context_chars
            .saturating_sub(excerpt_cost)
            .saturating_sub(label_cost);

        if budget == 0 {
            return String::new();
        }
        truncate_chars(full, budget)
    }
}

/// Truncate to at most `max` characters (not bytes).
fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches_from(texts: &[&str]) -> Vec<VectorMatch> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| VectorMatch {
                id: format!("abc123XYZ0:{}", i),
                score: 1.0 - i as f32 * 0.1,
                text: t.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_includes_transcript_and_labels() {
        let assembler = ContextAssembler::new(10_000);
        let context = assembler.assemble(&[], Some("A video about cats."));
        assert!(context.starts_with(TRANSCRIPT_LABEL));
        assert!(context.contains("A video about cats."));
    }

    #[test]
    fn test_excerpts_covered_by_transcript_are_omitted() {
        let assembler = ContextAssembler::new(10_000);
        let transcript = "Hello world. This is a test video about cats.";
        let matches = matches_from(&["test video about cats.", "Hello world."]);

        let context = assembler.assemble(&matches, Some(transcript));

        // The transcript fits in full, so every excerpt is redundant.
        assert!(!context.contains(EXCERPTS_LABEL));
        assert_eq!(context.matches("Hello world.").count(), 1);
        assert_eq!(context.matches("test video about cats.").count(), 1);
    }

    #[test]
    fn test_uncovered_excerpts_are_kept() {
        let assembler = ContextAssembler::new(10_000);
        let matches = matches_from(&["something retrieval found elsewhere"]);
        let context = assembler.assemble(&matches, Some("A short transcript."));

        assert!(context.contains(TRANSCRIPT_LABEL));
        assert!(context.contains(EXCERPTS_LABEL));
        assert!(context.contains("[1] something retrieval found elsewhere"));
    }

    #[test]
    fn test_transcript_truncated_from_end_keeps_opening() {
        let assembler = ContextAssembler::new(120);
        let transcript = format!("OPENING FRAMING. {}", "filler sentence. ".repeat(50));
        let context = assembler.assemble(&[], Some(&transcript));

        assert!(context.contains("OPENING FRAMING."));
        assert!(context.chars().count() <= 120);
    }

    #[test]
    fn test_budget_holds_for_any_cap() {
        let transcript = "word ".repeat(500);
        let matches = matches_from(&["excerpt one text", "excerpt two text", "unrelated third"]);

        for cap in [0, 1, 10, 50, 100, 1_000, 10_000] {
            let assembler = ContextAssembler::new(cap);
            let context = assembler.assemble(&matches, Some(&transcript));
            assert!(
                context.chars().count() <= cap,
                "cap {} exceeded: {}",
                cap,
                context.chars().count()
            );
        }
    }

    #[test]
    fn test_no_chunk_text_appears_twice() {
        let assembler = ContextAssembler::new(10_000);
        let matches = matches_from(&["duplicate text", "duplicate text", "unique text"]);
        let context = assembler.assemble(&matches, None);

        assert_eq!(context.matches("duplicate text").count(), 1);
        assert_eq!(context.matches("unique text").count(), 1);
    }

    #[test]
    fn test_fallback_when_nothing_available() {
        let assembler = ContextAssembler::new(10_000);
        assert_eq!(assembler.assemble(&[], None), NO_CONTENT_FALLBACK);
        assert_eq!(assembler.assemble(&matches_from(&[]), Some("   ")), NO_CONTENT_FALLBACK);
    }

    #[test]
    fn test_excerpts_only_when_transcript_failed() {
        let assembler = ContextAssembler::new(10_000);
        let matches = matches_from(&["the only retrieved text"]);
        let context = assembler.assemble(&matches, None);

        assert!(!context.contains(TRANSCRIPT_LABEL));
        assert!(context.contains(EXCERPTS_LABEL));
        assert!(context.contains("the only retrieved text"));
    }
}
