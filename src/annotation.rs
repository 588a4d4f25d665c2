//! Annotation protocol: extraction of teaching notes from model replies
//!
//! The tutor model is instructed to wrap grammar explanations, corrections,
//! and key vocabulary in `<nota>...</nota>` tags. This module splits a raw
//! reply into the conversational text shown in the chat column and the list
//! of notes shown on the grammar board.

use regex::Regex;
use std::sync::OnceLock;

/// Reserved marker pair. Must not otherwise appear in model output; the
/// technical directive in [`crate::system_prompt`] reserves it.
pub const OPEN_MARKER: &str = "<nota>";
pub const CLOSE_MARKER: &str = "</nota>";

/// Result of parsing one raw model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    /// Input with every complete marker span removed, then trimmed.
    pub display_text: String,
    /// Note bodies in left-to-right extraction order.
    pub notes: Vec<String>,
}

fn note_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // (?s) so note bodies may span lines; non-greedy so adjacent notes
        // don't merge into one span.
        Regex::new(&format!(r"(?s){OPEN_MARKER}(.*?){CLOSE_MARKER}")).unwrap_or_else(|e| {
            unreachable!("invalid note pattern: {e}");
        })
    })
}

/// Split `text` into display text and extracted notes.
///
/// Best-effort by contract: an unclosed `<nota>` or a stray `</nota>` is
/// left in the display text untouched, and this function never fails. Pure
/// and deterministic; no I/O.
pub fn parse(text: &str) -> Parsed {
    let pattern = note_pattern();

    let notes = pattern
        .captures_iter(text)
        .map(|cap| cap[1].to_string())
        .collect();

    let display_text = pattern.replace_all(text, "").trim().to_string();

    Parsed {
        display_text,
        notes,
    }
}

#[cfg(test)]
mod proptests;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_single_note() {
        let parsed = parse("It's blue.<nota>'Cielo' means sky.</nota> Any questions?");
        assert_eq!(parsed.display_text, "It's blue. Any questions?");
        assert_eq!(parsed.notes, vec!["'Cielo' means sky.".to_string()]);
    }

    #[test]
    fn span_removal_is_exact() {
        // Only the span itself is removed; surrounding whitespace survives,
        // so the removed spans can be re-inserted to reconstruct the input.
        let parsed = parse("It's blue. <nota>'Cielo' means sky.</nota> Any questions?");
        assert_eq!(parsed.display_text, "It's blue.  Any questions?");
    }

    #[test]
    fn extracts_multiple_notes_in_order() {
        let parsed = parse("a<nota>first</nota>b<nota>second</nota>c");
        assert_eq!(parsed.display_text, "abc");
        assert_eq!(parsed.notes, vec!["first", "second"]);
    }

    #[test]
    fn note_body_may_span_lines() {
        let parsed = parse("Hola.\n<nota>Line one.\nLine two.</nota>\nAdiós.");
        assert_eq!(parsed.display_text, "Hola.\n\nAdiós.");
        assert_eq!(parsed.notes, vec!["Line one.\nLine two."]);
    }

    #[test]
    fn no_markers_is_trim_only() {
        let parsed = parse("  just a plain reply \n");
        assert_eq!(parsed.display_text, "just a plain reply");
        assert!(parsed.notes.is_empty());
    }

    #[test]
    fn unclosed_open_marker_left_in_place() {
        let parsed = parse("Muy bien. <nota>dangling explanation");
        assert_eq!(parsed.display_text, "Muy bien. <nota>dangling explanation");
        assert!(parsed.notes.is_empty());
    }

    #[test]
    fn stray_close_marker_left_in_place() {
        let parsed = parse("text</nota> more");
        assert_eq!(parsed.display_text, "text</nota> more");
        assert!(parsed.notes.is_empty());
    }

    #[test]
    fn empty_note_body() {
        let parsed = parse("before<nota></nota>after");
        assert_eq!(parsed.display_text, "beforeafter");
        assert_eq!(parsed.notes, vec![String::new()]);
    }

    #[test]
    fn trailing_unclosed_after_complete_note() {
        let parsed = parse("a<nota>ok</nota>b<nota>oops");
        assert_eq!(parsed.display_text, "ab<nota>oops");
        assert_eq!(parsed.notes, vec!["ok"]);
    }

    #[test]
    fn parse_is_idempotent_on_display_text() {
        let first = parse("x<nota>n1</nota>y<nota>n2</nota>");
        let second = parse(&first.display_text);
        assert!(second.notes.is_empty());
        assert_eq!(second.display_text, first.display_text);
    }
}
