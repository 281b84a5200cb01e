//! # Parser
//!
//! [`Parser`] owns a compiled set of [`Production`]s and drives the top-level
//! parse-and-retry loop.
//!
//! Construction indexes productions by name, links every reference, and
//! validates well-formedness; all three can fail with a
//! [`GrammarError`](crate::GrammarError) and none are recovered from. The
//! compiled parser is immutable and can be shared freely: all per-invocation
//! state lives in the [`ParseContext`] each [`parse`](Parser::parse) call
//! creates for itself.

pub mod context;
mod engine;

use std::fmt;

use compact_str::CompactString;
use hashbrown::HashMap;

use crate::error::{GrammarError, ParseError};
use crate::grammar::{validate, Production};
use crate::parser::context::ParseContext;
use crate::token::Token;

/// An executable recursive-descent parser.
///
/// The first production is the root. `parse` never gives up on the first
/// failure: it retries with one more recovery step per attempt until the
/// input parses, progress stalls, or the error budget is spent.
#[derive(Debug, Clone)]
pub struct Parser {
    productions: Vec<Production>,
    index: HashMap<CompactString, usize, ahash::RandomState>,
    max_errors: Option<usize>,
    memoize: bool,
}

impl Parser {
    /// Build a parser from `productions`; the first is the root.
    ///
    /// # Errors
    ///
    /// - [`GrammarError::EmptyGrammar`] if `productions` is empty,
    /// - [`GrammarError::DuplicateDefinition`] if two productions share a
    ///   name,
    /// - [`GrammarError::UnresolvedReference`] if a reference names no
    ///   production,
    /// - [`GrammarError::CircularReference`] if a production can reach
    ///   itself without consuming input.
    pub fn new(productions: Vec<Production>) -> Result<Self, GrammarError> {
        if productions.is_empty() {
            return Err(GrammarError::EmptyGrammar);
        }

        let mut index = HashMap::with_hasher(ahash::RandomState::new());
        for (position, production) in productions.iter().enumerate() {
            if index
                .insert(CompactString::from(production.name()), position)
                .is_some()
            {
                return Err(GrammarError::DuplicateDefinition(CompactString::from(
                    production.name(),
                )));
            }
        }

        let productions = productions
            .into_iter()
            .map(|production| production.compile(&index))
            .collect::<Result<Vec<_>, _>>()?;

        validate::validate(&productions)?;

        Ok(Self {
            productions,
            index,
            max_errors: None,
            memoize: true,
        })
    }

    /// Limit the number of recovery retries; `None` is unbounded.
    #[must_use]
    pub fn with_max_errors(mut self, max_errors: Option<usize>) -> Self {
        self.max_errors = max_errors;
        self
    }

    /// Set the recovery retry limit in place; `None` is unbounded.
    pub fn set_max_errors(&mut self, max_errors: Option<usize>) {
        self.max_errors = max_errors;
    }

    /// The current recovery retry limit.
    #[must_use]
    pub fn max_errors(&self) -> Option<usize> {
        self.max_errors
    }

    /// Enable or disable packrat memoization. Only performance changes;
    /// every parse result is identical either way.
    #[must_use]
    pub fn with_memoization(mut self, enabled: bool) -> Self {
        self.memoize = enabled;
        self
    }

    /// The parser's productions, root first.
    #[must_use]
    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    /// Look up a production by name.
    #[must_use]
    pub fn production(&self, name: &str) -> Option<&Production> {
        self.index.get(name).map(|&position| &self.productions[position])
    }

    /// Parse `text` with the root production.
    ///
    /// A clean first attempt returns the token tree directly. Otherwise the
    /// retry loop runs while failures keep occurring strictly further into
    /// the input and the error budget allows; each retry clears the memo
    /// cache, replays the captured failure stack, and performs one more
    /// missing/lenient recovery cycle. The outcome of a recovered parse is
    /// reported as a [`ParseError`] whose `best_parse` holds the furthest
    /// tree: fully annotated when recovery reached the end of the input,
    /// `error`-flagged at the root when it gave up earlier.
    ///
    /// # Errors
    ///
    /// [`ParseError`] whenever the first attempt fails, carrying the best
    /// tree any attempt produced.
    pub fn parse(&self, text: &str) -> Result<Token, ParseError> {
        let mut context = ParseContext::new(text);
        context.set_memoization(self.memoize);
        let mut result = self.productions[0].evaluate(&self.productions, &mut context);

        if !result.is_error() {
            return Ok(result);
        }

        let mut error_count = 0usize;
        let mut previous_furthest: Option<usize> = None;

        while result.is_error() {
            error_count += 1;
            if self.max_errors.is_some_and(|max| error_count > max) {
                break;
            }
            // Stop once a retry fails to push the furthest failure forward.
            if previous_furthest.is_some() && context.error_offset() <= previous_furthest {
                break;
            }

            previous_furthest = context.error_offset();
            context.clear_cached_results();
            result = self.productions[0].evaluate(&self.productions, &mut context);
        }

        Err(ParseError {
            best_parse: result,
            furthest_offset: context.error_offset().unwrap_or(0),
        })
    }
}

impl fmt::Display for Parser {
    /// Renders one `Name := Expression` line per production, in definition
    /// order, each newline-terminated.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for production in &self.productions {
            writeln!(f, "{production}")?;
        }
        Ok(())
    }
}
