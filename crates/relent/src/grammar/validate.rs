//! Well-formedness checking.
//!
//! A grammar is ill-formed when some production can re-enter itself without
//! consuming any input (true left recursion or an always-optional cycle),
//! which would make evaluation recurse forever. The check computes each
//! expression's *optionality* (whether it may match zero-width) and walks
//! every zero-consumption path from each production, carrying the set of
//! production names reached so far. Re-entering a name already in the set is
//! a [`GrammarError::CircularReference`].
//!
//! Each sibling branch receives its own copy of the incoming name set, so
//! alternatives never cross-contaminate. Sequences merge back only the name
//! registrations of their first non-optional child; the walk stops there
//! because anything later is preceded by guaranteed consumption.

use compact_str::CompactString;
use hashbrown::HashSet;

use crate::error::GrammarError;
use crate::grammar::{Expr, Production};

type NameSet = HashSet<CompactString, ahash::RandomState>;

/// Check every production of a compiled grammar.
///
/// # Errors
///
/// Returns [`GrammarError::CircularReference`] if any production is reachable
/// from itself without consuming input.
pub(crate) fn validate(productions: &[Production]) -> Result<(), GrammarError> {
    for production in productions {
        let mut names = NameSet::with_hasher(ahash::RandomState::new());
        names.insert(CompactString::from(production.name()));
        check_expr(productions, production.name(), production.expression(), &mut names)?;
    }
    Ok(())
}

/// Walk `expr`, returning whether it is optional (may match zero-width) and
/// registering into `names` every production reachable from here without
/// consuming input.
fn check_expr(
    productions: &[Production],
    base: &str,
    expr: &Expr,
    names: &mut NameSet,
) -> Result<bool, GrammarError> {
    match expr {
        Expr::Literal(_) | Expr::Regex(_) => Ok(false),

        Expr::Sequence(exprs) => {
            for expr in exprs {
                let mut branch = names.clone();
                if !check_expr(productions, base, expr, &mut branch)? {
                    *names = branch;
                    return Ok(false);
                }
            }
            Ok(true)
        }

        Expr::OrderedChoice(exprs) => {
            let mut optional = true;
            let incoming = names.clone();
            let mut merged = incoming.clone();
            for expr in exprs {
                let mut branch = incoming.clone();
                if !check_expr(productions, base, expr, &mut branch)? {
                    optional = false;
                }
                merged.extend(branch);
            }
            *names = merged;
            Ok(optional)
        }

        Expr::Optional(expr) | Expr::ZeroOrMore(expr) => {
            check_expr(productions, base, expr, names)?;
            Ok(true)
        }

        Expr::OneOrMore(expr) | Expr::Match(expr) | Expr::NotMatch(expr) => {
            check_expr(productions, base, expr, names)
        }

        Expr::Reference(reference) => {
            if names.contains(reference.name()) {
                return Err(GrammarError::CircularReference {
                    base: CompactString::from(base),
                    name: CompactString::from(reference.name()),
                });
            }
            names.insert(CompactString::from(reference.name()));

            let target = reference
                .target()
                .or_else(|| {
                    productions
                        .iter()
                        .position(|production| production.name() == reference.name())
                })
                .ok_or_else(|| {
                    GrammarError::UnresolvedReference(CompactString::from(reference.name()))
                })?;

            check_expr(productions, base, productions[target].expression(), names)
        }
    }
}
