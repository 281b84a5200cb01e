//! Property-based tests: recovery always terminates, never panics, and
//! round-tripped parsers agree with their originals on arbitrary input.

use proptest::prelude::*;
use relent::{compile_parser, grammar_parser, Parser};

fn statement_parser() -> Parser {
    compile_parser(
        "Statement := Name '=' Value ';' \
         Name := /[a-z]+/ \
         Value := /[0-9]+/",
    )
    .expect("the grammar compiles")
}

proptest! {
    #[test]
    fn parsing_arbitrary_input_terminates(input in "[a-z0-9=; ]{0,24}") {
        let parser = statement_parser().with_max_errors(Some(8));
        // Either outcome is fine; the property is termination without panic.
        let _ = parser.parse(&input);
    }

    #[test]
    fn a_failed_parse_always_carries_a_best_tree(input in "[ab]{1,12}") {
        let parser = compile_parser("Pair := 'a' 'b'\n").expect("the grammar compiles");
        if let Err(error) = parser.parse(&input) {
            // The best tree is either a recovered (annotated) tree or an
            // error-flagged root; it is never empty of information.
            prop_assert!(
                error.best_parse.production().is_some() || error.best_parse.is_error()
            );
        }
    }

    #[test]
    fn the_bootstrap_parser_survives_arbitrary_grammar_text(
        input in "[A-Za-z0-9:=/'|&!?*+() \\n]{0,32}",
    ) {
        // Compiling random text must reject gracefully, never panic.
        let _ = compile_parser(&input);
    }

    #[test]
    fn round_tripped_parsers_agree_on_conforming_input(
        name in "[a-z]{1,6}",
        value in "[0-9]{1,6}",
    ) {
        let original = statement_parser();
        let round_tripped =
            compile_parser(&original.to_string()).expect("the rendering compiles");

        let input = format!("{name}={value};");
        let left = original.parse(&input).expect("the input conforms");
        let right = round_tripped.parse(&input).expect("the input conforms");
        prop_assert_eq!(left, right);
    }
}

#[test]
fn the_bootstrap_parser_is_shared_and_reusable() {
    let first = grammar_parser();
    let second = grammar_parser();
    assert!(std::ptr::eq(first, second));
}
