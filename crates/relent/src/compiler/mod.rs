//! # Grammar Compiler
//!
//! Turns grammar text in the engine's own notation into a [`Parser`].
//!
//! The notation is a set of `Name := Expression` definitions. Operator
//! precedence, highest to lowest: primary (identifier, parenthesized
//! expression, `'…'` literal, `/…/` regex) → suffix (`?` `*` `+`) → prefix
//! (`&` `!`) → sequence (space-separated) → ordered choice (`||`).
//! Whitespace, `//` line comments, and `/* */` block comments are
//! insignificant between tokens.
//!
//! The text is parsed by the [`bootstrap`] parser into a token tree, and the
//! tree is translated node by node into the same expression objects the
//! bootstrap parser itself is built from; the engine hosts its own grammar
//! language.

pub mod bootstrap;

use crate::error::CompileError;
use crate::grammar::{Expr, Production};
use crate::parser::Parser;
use crate::token::{Child, Token};

pub use bootstrap::grammar_parser;

/// Compile grammar text into a [`Parser`].
///
/// # Errors
///
/// [`CompileError::Syntax`] if the text does not conform to the notation,
/// [`CompileError::Grammar`] if it parses but describes an invalid parser
/// (duplicate names, dangling references, zero-consumption cycles, regex
/// literals that do not compile).
pub fn compile_parser(grammar: &str) -> Result<Parser, CompileError> {
    let tree = grammar_parser().parse(grammar)?;
    compile_grammar(&tree)
}

fn nth_token<'a>(
    token: &'a Token,
    index: usize,
    context: &'static str,
) -> Result<&'a Token, CompileError> {
    token
        .children()
        .get(index)
        .and_then(Child::as_token)
        .ok_or(CompileError::MalformedTree { context })
}

fn nth_text<'a>(
    token: &'a Token,
    index: usize,
    context: &'static str,
) -> Result<&'a str, CompileError> {
    token
        .children()
        .get(index)
        .and_then(Child::as_text)
        .ok_or(CompileError::MalformedTree { context })
}

fn compile_grammar(tree: &Token) -> Result<Parser, CompileError> {
    let mut productions = Vec::new();
    for child in tree.child_tokens() {
        if child.production() == Some("Definition") {
            productions.push(compile_definition(child)?);
        }
    }
    Ok(Parser::new(productions)?)
}

fn compile_definition(token: &Token) -> Result<Production, CompileError> {
    let identifier = nth_token(token, 0, "definition name")?;
    let name = nth_text(identifier, 0, "definition name")?;
    let expression = compile_expression(nth_token(token, 2, "definition body")?)?;
    Ok(Production::new(name, expression))
}

fn compile_expression(token: &Token) -> Result<Expr, CompileError> {
    let first = nth_token(token, 0, "expression")?;
    if first.production() == Some("OrderedChoice") {
        compile_ordered_choice(first)
    } else {
        compile_sequence(first)
    }
}

fn compile_ordered_choice(token: &Token) -> Result<Expr, CompileError> {
    let mut alternatives = Vec::new();
    for child in token.child_tokens() {
        if child.production() == Some("Sequence") {
            alternatives.push(compile_sequence(child)?);
        }
    }
    Ok(Expr::ordered_choice(alternatives))
}

fn compile_sequence(token: &Token) -> Result<Expr, CompileError> {
    let mut elements = Vec::new();
    for index in 0..token.children().len() {
        elements.push(compile_prefix(nth_token(token, index, "sequence element")?)?);
    }
    Ok(Expr::sequence(elements))
}

fn compile_prefix(token: &Token) -> Result<Expr, CompileError> {
    let first = nth_token(token, 0, "prefix")?;
    match first.production() {
        Some("AND") => Ok(Expr::and_predicate(compile_suffix(nth_token(
            token, 1, "prefix operand",
        )?)?)),
        Some("NOT") => Ok(Expr::not_predicate(compile_suffix(nth_token(
            token, 1, "prefix operand",
        )?)?)),
        _ => compile_suffix(first),
    }
}

fn compile_suffix(token: &Token) -> Result<Expr, CompileError> {
    let primary = compile_primary(nth_token(token, 0, "suffix operand")?)?;
    match token.children().get(1).and_then(Child::as_token) {
        Some(op) if op.production() == Some("QUESTION") => Ok(Expr::optional(primary)),
        Some(op) if op.production() == Some("STAR") => Ok(Expr::zero_or_more(primary)),
        Some(_) => Ok(Expr::one_or_more(primary)),
        None => Ok(primary),
    }
}

fn compile_primary(token: &Token) -> Result<Expr, CompileError> {
    let first = nth_token(token, 0, "primary")?;
    match first.production() {
        Some("Identifier") => Ok(Expr::reference(nth_text(first, 0, "identifier")?)),
        Some("OPEN") => compile_expression(nth_token(token, 1, "parenthesized expression")?),
        _ => compile_literal(first),
    }
}

fn compile_literal(token: &Token) -> Result<Expr, CompileError> {
    let first = nth_token(token, 0, "literal")?;
    if first.production() == Some("BasicLiteral") {
        compile_basic_literal(first)
    } else {
        compile_regex_literal(first)
    }
}

fn strip_delimiters<'a>(raw: &'a str, context: &'static str) -> Result<&'a str, CompileError> {
    if raw.len() < 2 {
        return Err(CompileError::MalformedTree { context });
    }
    raw.get(1..raw.len() - 1)
        .ok_or(CompileError::MalformedTree { context })
}

/// Strip the quotes and decode the `\\` and `\'` escapes.
fn compile_basic_literal(token: &Token) -> Result<Expr, CompileError> {
    let raw = nth_text(token, 0, "string literal")?;
    let value = strip_delimiters(raw, "string literal")?
        .replace("\\\\", "\\")
        .replace("\\'", "'");
    Ok(Expr::literal(value))
}

/// Strip the slashes; the source between them is kept verbatim.
fn compile_regex_literal(token: &Token) -> Result<Expr, CompileError> {
    let raw = nth_text(token, 0, "regex literal")?;
    let source = strip_delimiters(raw, "regex literal")?;
    Ok(Expr::regex(source)?)
}
