//! # Token Trees
//!
//! [`Token`] is the parse-tree node type. A token produced by a named
//! production carries that production's name as its type tag; tokens built by
//! the matching machinery itself (sequence frames, lookahead frames) carry no
//! tag and are *structurally transparent*: when adopted into a parent their
//! children are spliced in directly, so finished trees contain only named
//! productions and matched text, never bookkeeping nodes.
//!
//! Three independent flags annotate recovery outcomes:
//!
//! - `error` - the token records a failed match,
//! - `missing` - the expected text was absent and synthesized empty,
//! - `lenient` - the expected text was found by skipping ahead; the skipped
//!   span is kept as a leading child.

use std::fmt;

use compact_str::CompactString;
use smallvec::SmallVec;

/// One entry in a token's ordered child list: either a raw span of matched
/// input text or a nested token.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Child {
    /// A raw substring of the input.
    Text(String),
    /// A nested parse-tree node.
    Token(Token),
}

impl Child {
    /// The raw text of this child, if it is one.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Child::Text(text) => Some(text),
            Child::Token(_) => None,
        }
    }

    /// The nested token of this child, if it is one.
    #[must_use]
    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Child::Text(_) => None,
            Child::Token(token) => Some(token),
        }
    }
}

impl From<&str> for Child {
    fn from(text: &str) -> Self {
        Child::Text(text.to_owned())
    }
}

impl From<String> for Child {
    fn from(text: String) -> Self {
        Child::Text(text)
    }
}

impl From<Token> for Child {
    fn from(token: Token) -> Self {
        Child::Token(token)
    }
}

/// A parse-tree node.
///
/// The child list distinguishes "never adopted anything" (`None`) from "all
/// adopted children were dropped" (`Some` but empty); the matching engine
/// relies on that distinction to decide whether an accepted frame consumed
/// input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    production: Option<CompactString>,
    error: bool,
    missing: bool,
    lenient: bool,
    children: Option<SmallVec<[Child; 4]>>,
}

impl Token {
    /// Create an anonymous (structurally transparent) token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a token tagged with a production name.
    #[must_use]
    pub fn tagged(production: impl Into<CompactString>) -> Self {
        Self {
            production: Some(production.into()),
            ..Self::default()
        }
    }

    pub(crate) fn maybe_tagged(production: Option<CompactString>) -> Self {
        Self {
            production,
            ..Self::default()
        }
    }

    /// Mark this token as recording a failed match.
    #[must_use]
    pub fn with_error(mut self) -> Self {
        self.error = true;
        self
    }

    /// Mark this token as synthesized for text that was absent.
    #[must_use]
    pub fn with_missing(mut self) -> Self {
        self.missing = true;
        self
    }

    /// Mark this token as matched by skipping ahead.
    #[must_use]
    pub fn with_lenient(mut self) -> Self {
        self.lenient = true;
        self
    }

    /// Adopt a child, consuming `self`; convenient for building trees.
    #[must_use]
    pub fn adopting(mut self, child: impl Into<Child>) -> Self {
        self.adopt(child);
        self
    }

    /// Adopt a child in place.
    ///
    /// An anonymous, flagless token's children are spliced in directly rather
    /// than nested. A childless token contributes nothing, but adopting it
    /// still materializes this token's (possibly empty) child list.
    pub fn adopt(&mut self, child: impl Into<Child>) {
        let children = self.children.get_or_insert_with(SmallVec::new);
        match child.into() {
            Child::Token(mut token) => match token.children.take() {
                Some(grandchildren) if token.is_transparent() => {
                    children.extend(grandchildren);
                }
                Some(grandchildren) => {
                    token.children = Some(grandchildren);
                    children.push(Child::Token(token));
                }
                None => {}
            },
            Child::Text(text) => children.push(Child::Text(text)),
        }
    }

    fn is_transparent(&self) -> bool {
        self.production.is_none() && !self.missing && !self.lenient
    }

    /// The production name this token was produced by, if any.
    #[must_use]
    pub fn production(&self) -> Option<&str> {
        self.production.as_deref()
    }

    /// Whether this token records a failed match.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error
    }

    /// Whether this token was synthesized for absent text.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.missing
    }

    /// Whether this token was matched by skipping ahead.
    #[must_use]
    pub fn is_lenient(&self) -> bool {
        self.lenient
    }

    /// Whether any child was ever adopted.
    #[must_use]
    pub fn has_children(&self) -> bool {
        self.children.is_some()
    }

    /// The ordered children of this token; empty when none were adopted.
    #[must_use]
    pub fn children(&self) -> &[Child] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Iterate over the nested tokens among this token's children.
    pub fn child_tokens(&self) -> impl Iterator<Item = &Token> {
        self.children().iter().filter_map(Child::as_token)
    }

    /// The first child token produced by the named production.
    #[must_use]
    pub fn find(&self, production: &str) -> Option<&Token> {
        self.child_tokens()
            .find(|token| token.production() == Some(production))
    }

    /// Reconstruct the matched input text covered by this token.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in self.children() {
            match child {
                Child::Text(text) => out.push_str(text),
                Child::Token(token) => token.collect_text(out),
            }
        }
    }
}

impl fmt::Display for Token {
    /// Renders the fixed JSON-like shape
    /// `{ "type": …, "error": true, "lenient": true, "missing": true,
    /// "children": [ … ] }`, each field emitted in that order and only when
    /// present.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        let mut comma = false;

        if let Some(production) = &self.production {
            write!(f, " \"type\": \"{production}\"")?;
            comma = true;
        }

        if self.error {
            write!(f, "{} \"error\": true", if comma { "," } else { "" })?;
            comma = true;
        }

        if self.lenient {
            write!(f, "{} \"lenient\": true", if comma { "," } else { "" })?;
            comma = true;
        }

        if self.missing {
            write!(f, "{} \"missing\": true", if comma { "," } else { "" })?;
            comma = true;
        }

        if let Some(children) = &self.children {
            if comma {
                write!(f, ",")?;
            }
            write!(f, " \"children\": [")?;
            for (index, child) in children.iter().enumerate() {
                if index > 0 {
                    write!(f, ",")?;
                }
                match child {
                    Child::Text(text) => write!(f, " \"{text}\"")?,
                    Child::Token(token) => write!(f, " {token}")?,
                }
            }
            write!(f, " ]")?;
        }

        write!(f, " }}")
    }
}
