//! The bootstrap parser for the grammar notation.
//!
//! Built directly from expression objects rather than compiled from text, so
//! the engine can parse its own notation from a standing start. Its rendering
//! is the canonical grammar of the notation and is itself accepted by this
//! parser, which is what the self-hosting tests rely on.

use once_cell::sync::Lazy;

use crate::error::GrammarError;
use crate::grammar::{Expr, Production};
use crate::parser::Parser;

/// `Name := ('sym' Ignorable?)`, a punctuation token that eats trailing
/// trivia.
fn symbol(name: &str, value: &str) -> Production {
    Production::new(
        name,
        Expr::sequence(vec![Expr::literal(value), optional_ignorable()]),
    )
}

fn optional_ignorable() -> Expr {
    Expr::optional(Expr::reference("Ignorable"))
}

fn build() -> Result<Parser, GrammarError> {
    Parser::new(vec![
        Production::new(
            "Grammar",
            Expr::sequence(vec![
                optional_ignorable(),
                Expr::one_or_more(Expr::reference("Definition")),
                Expr::reference("EndOfInput"),
            ]),
        ),
        Production::new(
            "Definition",
            Expr::sequence(vec![
                Expr::reference("Identifier"),
                Expr::reference("ASSIGN"),
                Expr::reference("Expression"),
            ]),
        ),
        Production::new(
            "Primary",
            Expr::ordered_choice(vec![
                Expr::sequence(vec![
                    Expr::reference("Identifier"),
                    Expr::not_predicate(Expr::reference("ASSIGN")),
                ]),
                Expr::sequence(vec![
                    Expr::reference("OPEN"),
                    Expr::reference("Expression"),
                    Expr::reference("CLOSE"),
                ]),
                Expr::reference("Literal"),
            ]),
        ),
        Production::new(
            "Expression",
            Expr::ordered_choice(vec![
                Expr::reference("OrderedChoice"),
                Expr::reference("Sequence"),
            ]),
        ),
        Production::new(
            "OrderedChoice",
            Expr::sequence(vec![
                Expr::reference("Sequence"),
                Expr::one_or_more(Expr::sequence(vec![
                    Expr::reference("OR"),
                    Expr::reference("Sequence"),
                ])),
            ]),
        ),
        Production::new("Sequence", Expr::one_or_more(Expr::reference("Prefix"))),
        Production::new(
            "Prefix",
            Expr::sequence(vec![
                Expr::optional(Expr::ordered_choice(vec![
                    Expr::reference("AND"),
                    Expr::reference("NOT"),
                ])),
                Expr::reference("Suffix"),
            ]),
        ),
        Production::new(
            "Suffix",
            Expr::sequence(vec![
                Expr::reference("Primary"),
                Expr::optional(Expr::ordered_choice(vec![
                    Expr::reference("QUESTION"),
                    Expr::reference("STAR"),
                    Expr::reference("PLUS"),
                ])),
            ]),
        ),
        Production::new(
            "Identifier",
            Expr::sequence(vec![Expr::regex(r"\w+")?, optional_ignorable()]),
        ),
        Production::new(
            "Literal",
            Expr::ordered_choice(vec![
                Expr::reference("BasicLiteral"),
                Expr::reference("RegexLiteral"),
            ]),
        ),
        Production::new(
            "BasicLiteral",
            Expr::sequence(vec![
                Expr::regex(r"'(\\\\|\\'|[^'])*'")?,
                optional_ignorable(),
            ]),
        ),
        Production::new(
            "RegexLiteral",
            Expr::sequence(vec![
                Expr::regex(r"\/(\\\\|\\\/|[^\/])*\/")?,
                optional_ignorable(),
            ]),
        ),
        symbol("ASSIGN", ":="),
        symbol("OR", "||"),
        symbol("AND", "&"),
        symbol("NOT", "!"),
        symbol("QUESTION", "?"),
        symbol("STAR", "*"),
        symbol("PLUS", "+"),
        symbol("OPEN", "("),
        symbol("CLOSE", ")"),
        Production::new(
            "Ignorable",
            Expr::one_or_more(Expr::ordered_choice(vec![
                Expr::reference("Spacing"),
                Expr::reference("LineComment"),
                Expr::reference("BlockComment"),
            ])),
        ),
        Production::new("Spacing", Expr::regex(r"\s+")?),
        Production::new(
            "LineComment",
            Expr::sequence(vec![
                Expr::literal("//"),
                Expr::zero_or_more(Expr::sequence(vec![
                    Expr::not_predicate(Expr::reference("EndOfLine")),
                    Expr::regex(r"[\s\S]")?,
                ])),
                Expr::reference("EndOfLine"),
            ]),
        ),
        Production::new(
            "BlockComment",
            Expr::sequence(vec![
                Expr::literal("/*"),
                Expr::zero_or_more(Expr::sequence(vec![
                    Expr::not_predicate(Expr::literal("*/")),
                    Expr::regex(r"[\s\S]")?,
                ])),
                Expr::literal("*/"),
            ]),
        ),
        Production::new(
            "EndOfLine",
            Expr::ordered_choice(vec![
                Expr::regex(r"\r?\n")?,
                Expr::reference("EndOfInput"),
            ]),
        ),
        Production::new("EndOfInput", Expr::regex(r"$")?),
    ])
}

/// The shared bootstrap parser for the grammar notation.
pub fn grammar_parser() -> &'static Parser {
    static PARSER: Lazy<Parser> =
        Lazy::new(|| build().expect("the bootstrap grammar is well-formed by construction"));
    &PARSER
}
