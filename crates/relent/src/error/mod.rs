//! # Error Types
//!
//! Error types for grammar construction, grammar compilation, and parsing.
//!
//! Construction-time problems (duplicate production names, dangling
//! references, zero-consumption cycles, malformed regex literals) are fatal
//! and surface as [`GrammarError`] before a [`Parser`](crate::Parser) exists.
//!
//! Parse-time failures are never surfaced on the first attempt: the engine
//! always runs its recovery loop first. Only when no further progress is
//! possible (or the error budget is spent) does
//! [`Parser::parse`](crate::Parser::parse) return a [`ParseError`], which
//! carries the furthest-progressing token tree so callers can render
//! diagnostics from its `missing`/`lenient` subtrees.

use compact_str::CompactString;
use thiserror::Error;

use crate::token::Token;

#[cfg(feature = "diagnostics")]
use miette::Diagnostic;

/// Fatal errors raised while building a [`Parser`](crate::Parser).
///
/// A malformed grammar is a programming error; none of these are recovered
/// from.
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum GrammarError {
    /// Two productions share a name.
    #[error("duplicate definition of '{0}'")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(relent::duplicate_definition)))]
    DuplicateDefinition(CompactString),

    /// A production reference names no known production.
    #[error("unresolvable reference to '{0}'")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(relent::unresolved_reference)))]
    UnresolvedReference(CompactString),

    /// A production can reach itself without consuming any input, so parsing
    /// it could recurse forever.
    #[error("'{base}' circularly references '{name}'")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(relent::circular_reference)))]
    CircularReference {
        /// The production whose well-formedness check found the cycle.
        base: CompactString,
        /// The production that was re-entered without consuming input.
        name: CompactString,
    },

    /// A regex pattern does not compile.
    #[error("invalid regex literal: {0}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(relent::invalid_regex)))]
    InvalidRegex(#[from] regex::Error),

    /// A parser needs at least one production to act as the root.
    #[error("grammar defines no productions")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(relent::empty_grammar)))]
    EmptyGrammar,
}

/// The input did not conform to the grammar, even after error recovery.
///
/// `best_parse` is the token tree from the furthest-progressing attempt.
/// When recovery managed to synthesize its way to the end of the input, the
/// tree is complete but annotated with `missing`/`lenient` tokens; when it
/// gave up earlier, the tree's root carries the `error` flag.
#[derive(Debug, Clone, Error)]
#[error("parse error at offset {furthest_offset}")]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
#[cfg_attr(feature = "diagnostics", diagnostic(code(relent::parse_error)))]
pub struct ParseError {
    /// The furthest-progressing token tree produced by any attempt.
    pub best_parse: Token,
    /// Byte offset of the furthest failure encountered.
    pub furthest_offset: usize,
}

/// Errors raised by [`compile_parser`](crate::compile_parser) when turning
/// grammar text into a [`Parser`](crate::Parser).
#[derive(Debug, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum CompileError {
    /// The grammar text does not conform to the grammar notation.
    #[error("grammar text does not conform to the grammar notation")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(relent::grammar_syntax)))]
    Syntax(#[from] ParseError),

    /// The grammar parsed but describes an invalid parser.
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    /// The grammar parse tree is missing an expected node.
    #[error("unexpected shape at {context} in the grammar parse tree")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(relent::malformed_tree)))]
    MalformedTree {
        /// Which translation step found the tree malformed.
        context: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grammar_error_messages() {
        let error = GrammarError::DuplicateDefinition("A".into());
        assert_eq!(format!("{error}"), "duplicate definition of 'A'");

        let error = GrammarError::UnresolvedReference("Missing".into());
        assert_eq!(format!("{error}"), "unresolvable reference to 'Missing'");

        let error = GrammarError::CircularReference {
            base: "A".into(),
            name: "B".into(),
        };
        assert_eq!(format!("{error}"), "'A' circularly references 'B'");
    }

    #[test]
    fn parse_error_carries_best_parse() {
        let error = ParseError {
            best_parse: Token::tagged("A").with_error(),
            furthest_offset: 3,
        };
        assert_eq!(format!("{error}"), "parse error at offset 3");
        assert!(error.best_parse.is_error());
    }
}
