//! # Grammar Definition
//!
//! The pattern-expression algebra and its compilation.
//!
//! An [`Expr`] is an immutable structural description of a matching rule; a
//! [`Production`] names an expression tree and is the unit of recursive
//! reference and memoization. Compiling a grammar rebuilds each expression
//! tree with every [`Expr::Reference`] resolved to the index of its target
//! production, so evaluation never searches by name.
//!
//! Every expression renders back to the canonical grammar notation via
//! [`Display`](std::fmt::Display); composite forms are fully parenthesized,
//! which is what lets a parser's rendering be compiled again into an
//! equivalent parser.

pub mod validate;

use std::fmt;

use compact_str::CompactString;
use hashbrown::HashMap;
use regex::Regex;

use crate::error::GrammarError;

/// Matches an exact string at the current offset.
#[derive(Debug, Clone)]
pub struct LiteralPattern {
    value: CompactString,
}

impl LiteralPattern {
    /// Create a literal pattern matching `value`.
    #[must_use]
    pub fn new(value: impl Into<CompactString>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// The string this pattern matches.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for LiteralPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let escaped = self.value.replace('\\', "\\\\").replace('\'', "\\'");
        write!(f, "'{escaped}'")
    }
}

/// Matches a regular expression.
///
/// The pattern is compiled once into two immutable query forms: an anchored
/// variant answering "how much matches starting exactly here", and a search
/// variant answering "where is the next occurrence". Both are pure queries;
/// no matcher state is shared between calls.
#[derive(Debug, Clone)]
pub struct RegexPattern {
    source: String,
    anchored: Regex,
    search: Regex,
}

impl RegexPattern {
    /// Compile `source` into a pattern.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::InvalidRegex`] if `source` is not a valid
    /// regular expression.
    pub fn new(source: &str) -> Result<Self, GrammarError> {
        Ok(Self {
            source: source.to_owned(),
            anchored: Regex::new(&format!("^(?:{source})"))?,
            search: Regex::new(source)?,
        })
    }

    /// The regex source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Length of the match anchored at the start of `text`, if any.
    #[must_use]
    pub fn match_at_start(&self, text: &str) -> Option<usize> {
        self.anchored.find(text).map(|found| found.end())
    }

    /// `(skipped, matched)` byte lengths of the next occurrence in `text`.
    #[must_use]
    pub fn search_forward(&self, text: &str) -> Option<(usize, usize)> {
        self.search
            .find(text)
            .map(|found| (found.start(), found.end() - found.start()))
    }
}

impl fmt::Display for RegexPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.source)
    }
}

/// A by-name reference to another production, resolved to a production index
/// during compilation.
#[derive(Debug, Clone)]
pub struct ProductionRef {
    name: CompactString,
    target: Option<usize>,
}

impl ProductionRef {
    /// The referenced production's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn target(&self) -> Option<usize> {
        self.target
    }
}

/// A pattern expression: the structural description of a matching rule.
///
/// The ten variants form a closed algebra; evaluation, compilation,
/// well-formedness checking, and rendering all match exhaustively over them.
#[derive(Debug, Clone)]
pub enum Expr {
    /// Exact prefix match of a string.
    Literal(LiteralPattern),
    /// Anchored regular-expression match.
    Regex(RegexPattern),
    /// All children must match in order, consuming cumulatively.
    Sequence(Vec<Expr>),
    /// The first matching child wins; no backtracking across consumed
    /// siblings.
    OrderedChoice(Vec<Expr>),
    /// Always succeeds, with the child's result or an empty success.
    Optional(Box<Expr>),
    /// Repeats while the child matches and makes progress.
    ZeroOrMore(Box<Expr>),
    /// Like [`Expr::ZeroOrMore`] but requires at least one match.
    OneOrMore(Box<Expr>),
    /// Positive lookahead (`&`): succeeds without consuming iff the child
    /// matches.
    Match(Box<Expr>),
    /// Negative lookahead (`!`): succeeds without consuming iff the child
    /// fails.
    NotMatch(Box<Expr>),
    /// Delegates to a named production.
    Reference(ProductionRef),
}

impl Expr {
    /// A literal string pattern.
    #[must_use]
    pub fn literal(value: impl Into<CompactString>) -> Self {
        Expr::Literal(LiteralPattern::new(value))
    }

    /// A regex pattern.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::InvalidRegex`] if `source` does not compile.
    pub fn regex(source: &str) -> Result<Self, GrammarError> {
        Ok(Expr::Regex(RegexPattern::new(source)?))
    }

    /// A sequence of expressions.
    #[must_use]
    pub fn sequence(exprs: impl IntoIterator<Item = Expr>) -> Self {
        Expr::Sequence(exprs.into_iter().collect())
    }

    /// An ordered choice between expressions.
    #[must_use]
    pub fn ordered_choice(exprs: impl IntoIterator<Item = Expr>) -> Self {
        Expr::OrderedChoice(exprs.into_iter().collect())
    }

    /// An optional expression (`?`).
    #[must_use]
    pub fn optional(expr: Expr) -> Self {
        Expr::Optional(Box::new(expr))
    }

    /// Zero or more repetitions (`*`).
    #[must_use]
    pub fn zero_or_more(expr: Expr) -> Self {
        Expr::ZeroOrMore(Box::new(expr))
    }

    /// One or more repetitions (`+`).
    #[must_use]
    pub fn one_or_more(expr: Expr) -> Self {
        Expr::OneOrMore(Box::new(expr))
    }

    /// A positive lookahead (`&`).
    #[must_use]
    pub fn and_predicate(expr: Expr) -> Self {
        Expr::Match(Box::new(expr))
    }

    /// A negative lookahead (`!`).
    #[must_use]
    pub fn not_predicate(expr: Expr) -> Self {
        Expr::NotMatch(Box::new(expr))
    }

    /// A reference to the production named `name`.
    #[must_use]
    pub fn reference(name: impl Into<CompactString>) -> Self {
        Expr::Reference(ProductionRef {
            name: name.into(),
            target: None,
        })
    }

    /// Rebuild this tree with every reference resolved against `index`.
    ///
    /// This is the one-time linking pass run during parser construction.
    pub(crate) fn compile(
        self,
        index: &HashMap<CompactString, usize, ahash::RandomState>,
    ) -> Result<Expr, GrammarError> {
        match self {
            Expr::Reference(reference) => {
                let target = index
                    .get(&reference.name)
                    .copied()
                    .ok_or_else(|| GrammarError::UnresolvedReference(reference.name.clone()))?;
                Ok(Expr::Reference(ProductionRef {
                    name: reference.name,
                    target: Some(target),
                }))
            }
            Expr::Sequence(exprs) => Ok(Expr::Sequence(Self::compile_all(exprs, index)?)),
            Expr::OrderedChoice(exprs) => {
                Ok(Expr::OrderedChoice(Self::compile_all(exprs, index)?))
            }
            Expr::Optional(expr) => Ok(Expr::Optional(Box::new(expr.compile(index)?))),
            Expr::ZeroOrMore(expr) => Ok(Expr::ZeroOrMore(Box::new(expr.compile(index)?))),
            Expr::OneOrMore(expr) => Ok(Expr::OneOrMore(Box::new(expr.compile(index)?))),
            Expr::Match(expr) => Ok(Expr::Match(Box::new(expr.compile(index)?))),
            Expr::NotMatch(expr) => Ok(Expr::NotMatch(Box::new(expr.compile(index)?))),
            leaf @ (Expr::Literal(_) | Expr::Regex(_)) => Ok(leaf),
        }
    }

    fn compile_all(
        exprs: Vec<Expr>,
        index: &HashMap<CompactString, usize, ahash::RandomState>,
    ) -> Result<Vec<Expr>, GrammarError> {
        exprs.into_iter().map(|expr| expr.compile(index)).collect()
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(pattern) => write!(f, "{pattern}"),
            Expr::Regex(pattern) => write!(f, "{pattern}"),
            Expr::Sequence(exprs) => {
                write!(f, "(")?;
                for (index, expr) in exprs.iter().enumerate() {
                    if index > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{expr}")?;
                }
                write!(f, ")")
            }
            Expr::OrderedChoice(exprs) => {
                write!(f, "(")?;
                for (index, expr) in exprs.iter().enumerate() {
                    if index > 0 {
                        write!(f, " || ")?;
                    }
                    write!(f, "{expr}")?;
                }
                write!(f, ")")
            }
            Expr::Optional(expr) => write!(f, "{expr}?"),
            Expr::ZeroOrMore(expr) => write!(f, "{expr}*"),
            Expr::OneOrMore(expr) => write!(f, "{expr}+"),
            Expr::Match(expr) => write!(f, "&{expr}"),
            Expr::NotMatch(expr) => write!(f, "!{expr}"),
            Expr::Reference(reference) => write!(f, "{}", reference.name),
        }
    }
}

/// A named expression tree: the unit of reference resolution and
/// memoization.
#[derive(Debug, Clone)]
pub struct Production {
    name: CompactString,
    expression: Expr,
}

impl Production {
    /// Create a production binding `name` to `expression`.
    #[must_use]
    pub fn new(name: impl Into<CompactString>, expression: Expr) -> Self {
        Self {
            name: name.into(),
            expression,
        }
    }

    /// The production's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The production's expression tree.
    #[must_use]
    pub fn expression(&self) -> &Expr {
        &self.expression
    }

    pub(crate) fn compile(
        self,
        index: &HashMap<CompactString, usize, ahash::RandomState>,
    ) -> Result<Production, GrammarError> {
        Ok(Production {
            name: self.name,
            expression: self.expression.compile(index)?,
        })
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} := {}", self.name, self.expression)
    }
}
