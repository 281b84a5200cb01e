//! Tests for the parse context: frames, offset bookkeeping, and the
//! failure-capture/replay machinery that drives error recovery.

use relent::{MatchMode, Memento, ParseContext, Token};

#[test]
fn accept_produces_a_token_with_the_matched_text() {
    let mut context = ParseContext::new("dummy");
    context.begin_parse(None, None);

    assert_eq!(context.accept(0), Token::new().adopting(""));
    assert_eq!(context.accept(1), Token::new().adopting("d"));
    assert_eq!(context.accept(2), Token::new().adopting("um"));
}

#[test]
fn accept_skipping_keeps_the_skipped_span_as_a_leading_child() {
    let mut context = ParseContext::new("dummy");
    context.begin_parse(None, None);

    assert_eq!(
        context.accept_skipping(1, 0),
        Token::new().adopting("d").adopting("")
    );
    assert_eq!(
        context.accept_skipping(1, 2),
        Token::new().adopting("u").adopting("mm")
    );
}

#[test]
fn reject_produces_an_error_token_without_moving_the_offset() {
    let mut context = ParseContext::new("dummy");
    context.begin_parse(None, None);

    assert!(context.reject().is_error());
    assert_eq!(context.offset(), 0);
}

#[test]
fn end_parse_tags_the_token_with_the_frame_production() {
    let mut context = ParseContext::new("abc");

    context.begin_parse(Some("A"), None);
    assert_eq!(context.end_parse(true).production(), Some("A"));

    context.begin_parse(Some("A"), None);
    assert_eq!(context.end_parse(false).production(), Some("A"));
}

#[test]
fn end_parse_returns_the_accepted_children() {
    let mut context = ParseContext::new("abc");

    context.begin_parse(None, None);
    let child = context.accept(2);
    context.accept_child(child);
    let token = context.end_parse(true);

    assert_eq!(token, Token::new().adopting("ab"));
    assert!(!token.is_error());
}

#[test]
fn end_parse_rejected_produces_an_error_token() {
    let mut context = ParseContext::new("abc");

    context.begin_parse(None, None);
    assert!(context.end_parse(false).is_error());
}

#[test]
fn end_parse_keeps_the_offset_when_accepted_with_children() {
    let mut context = ParseContext::new("abc");

    context.begin_parse(None, None);
    let child = context.accept(1);
    context.accept_child(child);
    context.end_parse(true);

    assert_eq!(context.offset(), 1);
}

#[test]
fn end_parse_rolls_back_when_rejected_or_accepted_without_children() {
    let mut context = ParseContext::new("abc");

    // Accepted, but the consumed text was never adopted.
    context.begin_parse(None, None);
    context.accept(1);
    context.end_parse(true);
    assert_eq!(context.offset(), 0);

    // Adopted, but the frame was rejected.
    context.begin_parse(None, None);
    let child = context.accept(1);
    context.accept_child(child);
    context.end_parse(false);
    assert_eq!(context.offset(), 0);
}

#[test]
fn accept_advances_the_offset_by_the_matched_length() {
    let mut context = ParseContext::new("dummy");
    context.begin_parse(None, None);

    context.accept(0);
    assert_eq!(context.offset(), 0);
    context.accept(1);
    assert_eq!(context.offset(), 1);
    context.accept(2);
    assert_eq!(context.offset(), 3);
}

#[test]
fn nested_frames_restore_state_as_they_pop() {
    let mut context = ParseContext::new("dummy");

    context.begin_parse(None, None);
    let child = context.accept(1);
    context.accept_child(child);
    context.begin_parse(None, None);
    let child = context.accept(2);
    context.accept_child(child);
    context.begin_parse(None, None);
    let child = context.accept(1);
    context.accept_child(child);
    assert_eq!(context.offset(), 4);

    assert!(context.end_parse(false).is_error());
    assert_eq!(context.offset(), 3);
    assert!(context.end_parse(false).is_error());
    assert_eq!(context.offset(), 1);
    assert!(context.end_parse(false).is_error());
    assert_eq!(context.offset(), 0);
}

#[test]
fn begin_parse_returns_no_memento_outside_replay() {
    let mut context = ParseContext::new("a");
    assert_eq!(context.begin_parse(None, None), None);
}

#[test]
fn rejecting_with_an_empty_stack_arms_recovery() {
    let mut context = ParseContext::new("a");
    context.begin_parse(None, None);

    assert_eq!(context.recovery_index(), None);
    context.end_parse(false);
    assert_eq!(context.recovery_index(), Some(0));
}

#[test]
fn a_further_failure_replaces_the_captured_stack() {
    let mut context = ParseContext::new("ab");
    context.begin_parse(None, None);

    context.begin_parse(None, None);
    context.end_parse(false);
    assert_eq!(context.error_offset(), Some(0));

    let child = context.accept(1);
    context.accept_child(child);
    context.begin_parse(None, None);
    context.end_parse(false);
    assert_eq!(context.error_offset(), Some(1));
}

#[test]
fn a_failure_no_further_keeps_the_earlier_capture() {
    let mut context = ParseContext::new("a");
    context.begin_parse(None, None);

    context.begin_parse(None, None);
    context.end_parse(false);

    context.begin_parse(None, None);
    context.end_parse(false);

    assert_eq!(context.error_offset(), Some(0));
}

#[test]
fn replay_restores_offsets_and_partial_tokens_from_the_captured_stack() {
    let mut context = ParseContext::new("ab");

    context.begin_parse(None, None);
    context.begin_parse(None, None);
    let child = context.accept(1);
    context.accept_child(child);
    context.end_parse(true);
    context.begin_parse(None, None);
    let child = context.accept(1);
    context.accept_child(child);
    context.end_parse(false);
    context.end_parse(false);

    assert_eq!(context.offset(), 0);
    assert_eq!(context.recovery_index(), Some(0));

    context.begin_parse(None, None);
    assert_eq!(context.offset(), 0);
    assert_eq!(context.recovery_index(), Some(1));

    context.begin_parse(None, None);
    assert_eq!(context.offset(), 1);
    assert_eq!(context.recovery_index(), None);

    // The replayed frame still holds the child it had adopted before the
    // failure was captured.
    assert_eq!(context.end_parse(true), Token::new().adopting("b"));
}

#[test]
fn replay_returns_the_mementos_saved_with_the_captured_frames() {
    let mut context = ParseContext::new("a");
    let outer = Memento { index: 1, offset: 9 };
    let inner = Memento { index: 2, offset: 7 };

    context.begin_parse(None, Some(outer));
    context.begin_parse(None, None);
    let child = context.accept(1);
    context.accept_child(child);
    context.end_parse(true);
    context.begin_parse(None, Some(inner));
    context.end_parse(false);
    context.end_parse(false);

    let replacement = Memento { index: 9, offset: 9 };
    assert_eq!(context.begin_parse(None, Some(replacement)), Some(outer));
    assert_eq!(context.begin_parse(None, Some(replacement)), Some(inner));
}

#[test]
fn replay_returns_no_memento_when_none_was_saved() {
    let mut context = ParseContext::new("a");

    context.begin_parse(None, None);
    context.end_parse(false);

    assert_eq!(
        context.begin_parse(None, Some(Memento { index: 3, offset: 3 })),
        None
    );
}

#[test]
fn exhausting_the_captured_stack_switches_to_missing_matching() {
    let mut context = ParseContext::new("a");

    context.begin_parse(None, None);
    context.end_parse(false);
    assert_eq!(context.match_mode(), MatchMode::Exact);

    context.begin_parse(None, None);
    assert_eq!(context.match_mode(), MatchMode::Missing);
}

#[test]
fn a_missing_acceptance_switches_to_lenient_matching() {
    let mut context = ParseContext::new("a");

    context.begin_parse(None, None);
    context.end_parse(false);
    context.begin_parse(None, None);
    assert_eq!(context.match_mode(), MatchMode::Missing);

    let token = context.accept(0);
    assert!(token.is_missing());
    assert_eq!(context.match_mode(), MatchMode::Lenient);
}

#[test]
fn a_lenient_acceptance_switches_back_to_exact_matching() {
    let mut context = ParseContext::new("a");

    context.begin_parse(None, None);
    context.end_parse(false);
    context.begin_parse(None, None);
    context.accept(0);
    assert_eq!(context.match_mode(), MatchMode::Lenient);

    let token = context.accept(0);
    assert!(token.is_lenient());
    assert_eq!(context.match_mode(), MatchMode::Exact);
}
