//! Property-based tests for the annotation protocol
//!
//! These verify the parser's contract over generated inputs:
//! - Balanced input yields one note per marker pair, and the original text
//!   can be reconstructed by re-inserting the removed spans in position
//! - Marker-free input is returned trimmed with no notes
//! - An unmatched open marker passes through untouched
//! - Parsing the display text a second time yields no notes

use super::{parse, CLOSE_MARKER, OPEN_MARKER};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// Text fragment that cannot contain (part of) a marker
fn arb_plain_fragment() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ,.!?'\n]{0,40}"
}

/// Note body: marker-free, may span lines
fn arb_note_body() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ,.'\n]{0,40}"
}

/// Alternating plain text and complete note spans, starting and ending with
/// plain text. Returns the assembled input plus the expected note bodies.
fn arb_balanced_input() -> impl Strategy<Value = (String, Vec<String>)> {
    (
        arb_plain_fragment(),
        proptest::collection::vec((arb_note_body(), arb_plain_fragment()), 0..5),
    )
        .prop_map(|(head, segments)| {
            let mut text = head;
            let mut notes = Vec::new();
            for (body, tail) in segments {
                text.push_str(OPEN_MARKER);
                text.push_str(&body);
                text.push_str(CLOSE_MARKER);
                text.push_str(&tail);
                notes.push(body);
            }
            (text, notes)
        })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn balanced_markers_yield_one_note_per_pair((text, expected) in arb_balanced_input()) {
        let parsed = parse(&text);
        prop_assert_eq!(&parsed.notes, &expected);

        // Reconstruction: re-inserting each removed span (markers included)
        // at its original position recovers the input. Since spans are
        // removed in order and only whitespace trimming follows, splicing
        // the spans back between the surviving fragments must reproduce
        // `text` up to the outer trim.
        let mut rebuilt = String::new();
        let mut survivors = String::new();
        let mut rest = text.as_str();
        for note in &expected {
            let span = format!("{OPEN_MARKER}{note}{CLOSE_MARKER}");
            let idx = rest.find(&span).expect("span present in input");
            rebuilt.push_str(&rest[..idx]);
            survivors.push_str(&rest[..idx]);
            rebuilt.push_str(&span);
            rest = &rest[idx + span.len()..];
        }
        rebuilt.push_str(rest);
        survivors.push_str(rest);
        prop_assert_eq!(rebuilt, text);
        prop_assert_eq!(parsed.display_text, survivors.trim());
    }

    #[test]
    fn marker_free_input_is_trimmed_identity(text in arb_plain_fragment()) {
        let parsed = parse(&text);
        prop_assert!(parsed.notes.is_empty());
        prop_assert_eq!(parsed.display_text, text.trim());
    }

    #[test]
    fn unmatched_open_marker_passes_through(
        before in arb_plain_fragment(),
        after in arb_note_body(),
    ) {
        let text = format!("{before}{OPEN_MARKER}{after}");
        let parsed = parse(&text);
        prop_assert!(parsed.notes.is_empty());
        prop_assert!(parsed.display_text.contains(OPEN_MARKER));
        prop_assert_eq!(parsed.display_text, text.trim());
    }

    #[test]
    fn second_pass_extracts_nothing((text, _) in arb_balanced_input()) {
        let once = parse(&text);
        let twice = parse(&once.display_text);
        prop_assert!(twice.notes.is_empty());
        prop_assert_eq!(twice.display_text, once.display_text);
    }
}
