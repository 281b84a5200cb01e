//! Tests for parser construction, validation, parsing, and the
//! error-recovery retry loop.

use relent::{Expr, GrammarError, Parser, Production, Token};

fn two_step_grammar() -> Parser {
    Parser::new(vec![
        Production::new(
            "A",
            Expr::sequence(vec![Expr::reference("B"), Expr::reference("C")]),
        ),
        Production::new("B", Expr::literal("b")),
        Production::new("C", Expr::literal("c")),
    ])
    .expect("the grammar is valid")
}

#[test]
fn rejects_duplicate_definitions() {
    let result = Parser::new(vec![
        Production::new("A", Expr::literal("a")),
        Production::new("A", Expr::literal("b")),
    ]);
    match result {
        Err(GrammarError::DuplicateDefinition(name)) => assert_eq!(name, "A"),
        other => panic!("expected a duplicate-definition error, got {other:?}"),
    }
}

#[test]
fn rejects_unresolvable_references() {
    let result = Parser::new(vec![Production::new("A", Expr::reference("Missing"))]);
    match result {
        Err(GrammarError::UnresolvedReference(name)) => assert_eq!(name, "Missing"),
        other => panic!("expected an unresolved-reference error, got {other:?}"),
    }
}

#[test]
fn rejects_direct_self_reference() {
    let result = Parser::new(vec![Production::new("A", Expr::reference("A"))]);
    match result {
        Err(GrammarError::CircularReference { base, name }) => {
            assert_eq!(base, "A");
            assert_eq!(name, "A");
        }
        other => panic!("expected a circular-reference error, got {other:?}"),
    }
}

#[test]
fn rejects_indirect_zero_consumption_cycles() {
    let result = Parser::new(vec![
        Production::new("A", Expr::reference("B")),
        Production::new("B", Expr::reference("A")),
    ]);
    assert!(matches!(
        result,
        Err(GrammarError::CircularReference { .. })
    ));
}

#[test]
fn rejects_left_recursion_behind_an_optional_prefix() {
    // The optional prefix can match zero-width, so A can re-enter itself
    // without consuming.
    let result = Parser::new(vec![Production::new(
        "A",
        Expr::sequence(vec![
            Expr::optional(Expr::literal("x")),
            Expr::reference("A"),
        ]),
    )]);
    assert!(matches!(
        result,
        Err(GrammarError::CircularReference { .. })
    ));
}

#[test]
fn accepts_recursion_guarded_by_consumption() {
    let result = Parser::new(vec![Production::new(
        "List",
        Expr::sequence(vec![
            Expr::literal("x"),
            Expr::optional(Expr::reference("List")),
        ]),
    )]);
    assert!(result.is_ok());
}

#[test]
fn rejects_an_empty_grammar() {
    assert!(matches!(
        Parser::new(Vec::new()),
        Err(GrammarError::EmptyGrammar)
    ));
}

#[test]
fn parses_with_the_first_production_as_root() {
    let parser = Parser::new(vec![
        Production::new(
            "A",
            Expr::sequence(vec![
                Expr::literal("a"),
                Expr::literal("b"),
                Expr::reference("C"),
            ]),
        ),
        Production::new("C", Expr::literal("c")),
    ])
    .expect("the grammar is valid");

    let tree = parser.parse("abc").expect("the input conforms");
    assert_eq!(
        tree,
        Token::tagged("A")
            .adopting("a")
            .adopting("b")
            .adopting(Token::tagged("C").adopting("c"))
    );
}

#[test]
fn renders_one_definition_per_line() {
    let parser = Parser::new(vec![
        Production::new("A", Expr::literal("a")),
        Production::new("B", Expr::literal("b")),
    ])
    .expect("the grammar is valid");

    assert_eq!(parser.to_string(), "A := 'a'\nB := 'b'\n");
}

#[test]
fn exposes_productions_by_name() {
    let parser = two_step_grammar();
    assert_eq!(parser.production("B").map(Production::name), Some("B"));
    assert_eq!(parser.production("Nope").map(Production::name), None);
}

#[test]
fn a_failed_parse_reports_the_best_recovered_tree() {
    let parser = Parser::new(vec![Production::new("A", Expr::literal("a"))])
        .expect("the grammar is valid");

    let error = parser.parse("b").expect_err("the input is broken");
    assert_eq!(
        error.best_parse.to_string(),
        "{ \"type\": \"A\", \"children\": [ { \"missing\": true, \"children\": [ \"\" ] } ] }"
    );
}

#[test]
fn recovery_synthesizes_a_missing_token_then_resynchronizes() {
    let parser = two_step_grammar();

    let error = parser.parse("dc").expect_err("the input is broken");
    assert_eq!(
        error.best_parse.to_string(),
        "{ \"type\": \"A\", \"children\": [ \
         { \"type\": \"B\", \"children\": [ { \"missing\": true, \"children\": [ \"\" ] } ] }, \
         { \"type\": \"C\", \"children\": [ { \"lenient\": true, \"children\": [ \"d\", \"c\" ] } ] } \
         ] }"
    );
}

#[test]
fn recovery_stops_at_the_error_budget() {
    let parser = Parser::new(vec![
        Production::new(
            "A",
            Expr::sequence(vec![
                Expr::reference("B"),
                Expr::reference("B"),
                Expr::reference("B"),
                Expr::reference("C"),
            ]),
        ),
        Production::new("B", Expr::literal("b")),
        Production::new("C", Expr::literal("c")),
    ])
    .expect("the grammar is valid")
    .with_max_errors(Some(2));

    let error = parser.parse("dc").expect_err("the input is broken");
    assert_eq!(error.best_parse.to_string(), "{ \"type\": \"A\", \"error\": true }");
}

#[test]
fn recovery_stops_when_progress_stalls() {
    let parser = two_step_grammar();

    // No 'c' anywhere: the lenient resynchronization can never succeed, so
    // the furthest failure offset stops advancing and the loop gives up.
    let error = parser.parse("d").expect_err("the input is broken");
    assert!(error.best_parse.is_error());
}

#[test]
fn a_clean_parse_is_returned_directly() {
    let parser = two_step_grammar();
    let tree = parser.parse("bc").expect("the input conforms");
    assert_eq!(
        tree,
        Token::tagged("A")
            .adopting(Token::tagged("B").adopting("b"))
            .adopting(Token::tagged("C").adopting("c"))
    );
}

#[test]
fn trailing_input_is_left_unconsumed() {
    let parser = Parser::new(vec![Production::new("A", Expr::literal("apple"))])
        .expect("the grammar is valid");

    let tree = parser.parse("appleton").expect("the prefix conforms");
    assert_eq!(tree, Token::tagged("A").adopting("apple"));
}

#[test]
fn disabling_memoization_changes_no_result() {
    let with_cache = two_step_grammar();
    let without_cache = two_step_grammar().with_memoization(false);

    // A clean parse, a recovered parse, and a hopeless one.
    for input in ["bc", "dc", "d"] {
        match (with_cache.parse(input), without_cache.parse(input)) {
            (Ok(left), Ok(right)) => assert_eq!(left, right, "trees differ for {input:?}"),
            (Err(left), Err(right)) => {
                assert_eq!(left.best_parse, right.best_parse, "best trees differ for {input:?}");
            }
            (left, right) => {
                panic!("accept/reject disagreement for {input:?}: {left:?} vs {right:?}")
            }
        }
    }
}

#[test]
fn memoization_is_transparent_across_choice_alternatives() {
    // B is evaluated at offset 0 by the first alternative, fails the
    // trailing 'x', and is reused from the memo cache by the second
    // alternative; the subtree must be identical either way.
    let parser = Parser::new(vec![
        Production::new(
            "A",
            Expr::ordered_choice(vec![
                Expr::sequence(vec![Expr::reference("B"), Expr::literal("x")]),
                Expr::sequence(vec![Expr::reference("B"), Expr::literal("y")]),
            ]),
        ),
        Production::new("B", Expr::literal("b")),
    ])
    .expect("the grammar is valid");

    let tree = parser.parse("by").expect("the input conforms");
    assert_eq!(
        tree,
        Token::tagged("A")
            .adopting(Token::tagged("B").adopting("b"))
            .adopting("y")
    );
}
