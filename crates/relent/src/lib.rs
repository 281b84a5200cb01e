//! # Relent
//!
//! An error-recovering PEG engine: it compiles a textual grammar into an
//! executable recursive-descent parser, and that parser does not stop at the
//! first syntax error. On failure it retries with a synonym-insertion /
//! skip-ahead heuristic (locate the furthest failure, pretend exactly one
//! expected token was there, resynchronize by searching forward for the next
//! recognizable text) and repeats until the whole input parses or the error
//! budget is spent, always able to hand back the furthest-progressing tree.
//!
//! ## Quick Start
//!
//! ```rust
//! use relent::compile_parser;
//!
//! let parser = compile_parser(
//!     "Greeting := 'hello' ' ' Name\n\
//!      Name := /\\w+/\n",
//! )
//! .expect("the grammar is valid");
//!
//! let tree = parser.parse("hello world").expect("the input conforms");
//! assert_eq!(
//!     tree.to_string(),
//!     "{ \"type\": \"Greeting\", \"children\": [ \"hello\", \" \", \
//!      { \"type\": \"Name\", \"children\": [ \"world\" ] } ] }"
//! );
//!
//! // A failed parse still yields the best recovered tree for diagnostics.
//! let error = parser.parse("hello_world").expect_err("the input is broken");
//! assert!(error.best_parse.to_string().contains("\"missing\": true"));
//! ```
//!
//! ## Modules
//!
//! - [`token`] - parse-tree nodes and their canonical rendering
//! - [`grammar`] - the pattern-expression algebra, productions, validation
//! - [`parser`] - the parse context, evaluation, and the retry loop
//! - [`compiler`] - the bootstrap parser and the grammar-text compiler
//! - [`error`] - error types
//!
//! ## Guarantees
//!
//! Evaluation is single-threaded, synchronous, and purely recursive; a
//! compiled [`Parser`] is immutable and can be shared across any number of
//! `parse` calls, each of which owns its own [`ParseContext`]. Repetition
//! operators stop on zero-width matches and the retry loop demands strict
//! progress, so parsing always terminates on finite input.

pub mod compiler;
pub mod error;
pub mod grammar;
pub mod parser;
pub mod token;

pub use compiler::{compile_parser, grammar_parser};
pub use error::{CompileError, GrammarError, ParseError};
pub use grammar::{Expr, LiteralPattern, Production, ProductionRef, RegexPattern};
pub use parser::context::{MatchMode, Memento, ParseContext};
pub use parser::Parser;
pub use token::{Child, Token};
