//! # Evaluation
//!
//! Recursive-descent evaluation of pattern expressions against a
//! [`ParseContext`].
//!
//! The contract for every variant: on success, return a non-error token
//! (possibly flagged `missing`/`lenient` by the matching-mode cycle) with the
//! offset advanced past the match; on failure, return an error token with the
//! offset unchanged. Composite variants restore it through frame rollback.
//!
//! Only the literal and regex primitives are mode-sensitive; composites
//! simply propagate context state. Sequence and ordered choice store a
//! [`Memento`] in their frame so a recovery replay can resume them
//! mid-iteration instead of restarting.

use crate::grammar::{Expr, Production};
use crate::parser::context::{MatchMode, Memento, ParseContext};
use crate::token::Token;

impl Expr {
    /// Attempt to match at the context's current offset.
    ///
    /// `productions` is the compiled production table references resolve
    /// into; expressions without references never consult it.
    pub fn evaluate(&self, productions: &[Production], context: &mut ParseContext<'_>) -> Token {
        match self {
            Expr::Literal(pattern) => match context.match_mode() {
                MatchMode::Exact => {
                    if context.remaining().starts_with(pattern.value()) {
                        context.accept(pattern.value().len())
                    } else {
                        context.reject()
                    }
                }
                MatchMode::Missing => context.accept(0),
                MatchMode::Lenient => match context.remaining().find(pattern.value()) {
                    Some(0) => context.accept(pattern.value().len()),
                    Some(skip) => context.accept_skipping(skip, pattern.value().len()),
                    None => context.reject(),
                },
            },

            Expr::Regex(pattern) => match context.match_mode() {
                MatchMode::Exact => match pattern.match_at_start(context.remaining()) {
                    Some(len) => context.accept(len),
                    None => context.reject(),
                },
                MatchMode::Missing => context.accept(0),
                MatchMode::Lenient => match pattern.search_forward(context.remaining()) {
                    Some((0, len)) => context.accept(len),
                    Some((skip, len)) => context.accept_skipping(skip, len),
                    None => context.reject(),
                },
            },

            Expr::Sequence(exprs) => {
                let mut state = Memento {
                    index: 0,
                    offset: context.offset(),
                };
                if let Some(saved) = context.begin_parse(None, Some(state)) {
                    state = saved;
                    context.set_offset(state.offset);
                }

                while state.index < exprs.len() {
                    state.offset = context.offset();
                    context.set_memento(state);

                    let result = exprs[state.index].evaluate(productions, context);
                    if result.is_error() {
                        return context.end_parse(false);
                    }
                    context.accept_child(result);
                    state.index += 1;
                }

                context.end_parse(true)
            }

            Expr::OrderedChoice(exprs) => {
                let mut state = Memento {
                    index: 0,
                    offset: context.offset(),
                };
                if let Some(saved) = context.begin_parse(None, Some(state)) {
                    state = saved;
                }

                while state.index < exprs.len() {
                    context.set_memento(state);
                    context.begin_parse(None, None);

                    let result = exprs[state.index].evaluate(productions, context);
                    if !result.is_error() {
                        context.accept_child(result);
                        let alternative = context.end_parse(true);
                        context.accept_child(alternative);
                        return context.end_parse(true);
                    }

                    context.end_parse(false);
                    state.index += 1;
                }

                context.end_parse(false)
            }

            Expr::Optional(expr) => {
                let result = expr.evaluate(productions, context);
                if result.is_error() {
                    context.accept_empty()
                } else {
                    result
                }
            }

            Expr::ZeroOrMore(expr) => {
                context.begin_parse(None, None);

                loop {
                    let offset = context.offset();
                    let result = expr.evaluate(productions, context);
                    // A zero-width success terminates the loop unadopted.
                    if result.is_error() || offset == context.offset() {
                        break;
                    }
                    context.accept_child(result);
                }

                context.end_parse(true)
            }

            Expr::OneOrMore(expr) => {
                context.begin_parse(None, None);

                let mut result = expr.evaluate(productions, context);
                if result.is_error() {
                    return context.end_parse(false);
                }

                loop {
                    context.accept_child(result);
                    let offset = context.offset();
                    result = expr.evaluate(productions, context);
                    if result.is_error() || offset == context.offset() {
                        break;
                    }
                }

                context.end_parse(true)
            }

            Expr::Match(expr) => {
                context.begin_parse(None, None);
                let result = expr.evaluate(productions, context);
                context.end_parse(!result.is_error())
            }

            Expr::NotMatch(expr) => {
                context.begin_parse(None, None);
                let result = expr.evaluate(productions, context);
                context.end_parse(result.is_error())
            }

            Expr::Reference(reference) => {
                let target = reference.target().or_else(|| {
                    productions
                        .iter()
                        .position(|production| production.name() == reference.name())
                });
                match target {
                    Some(index) => productions[index].evaluate(productions, context),
                    None => context.reject(),
                }
            }
        }
    }
}

impl Production {
    /// Evaluate this production at the context's current offset.
    ///
    /// The memo cache is consulted first; on a miss the expression is
    /// evaluated inside a frame tagged with this production, and the fresh
    /// result (success or failure) is written back keyed at the entry
    /// offset.
    pub fn evaluate(&self, productions: &[Production], context: &mut ParseContext<'_>) -> Token {
        let start_offset = context.offset();

        if let Some(cached) = context.use_cached_result(self.name()) {
            return cached;
        }

        context.begin_parse(Some(self.name()), None);

        let inner = self.expression().evaluate(productions, context);
        let result = if inner.is_error() {
            context.end_parse(false)
        } else {
            context.accept_child(inner);
            context.end_parse(true)
        };

        context.cache_result(self.name(), start_offset, &result);
        result
    }
}
