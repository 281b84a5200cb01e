//! # Parse Context
//!
//! [`ParseContext`] is the mutable engine state for one parse invocation and
//! its recovery retries: the input text, the current byte offset, a stack of
//! backtracking frames mirroring expression evaluation, the packrat memo
//! cache, and the error-recovery state.
//!
//! ## Frames
//!
//! Every composite evaluation that needs isolated rollback opens a frame with
//! [`begin_parse`](ParseContext::begin_parse) and closes it with
//! [`end_parse`](ParseContext::end_parse). A frame records the offset at
//! entry, the in-progress token collecting accepted children, and an optional
//! [`Memento`] letting sequence-like expressions resume mid-iteration during
//! recovery replay. Rejecting a frame rolls the offset back to its entry
//! value; accepting a frame that never adopted a child does the same, which
//! is what makes lookaheads non-consuming.
//!
//! ## Matching modes
//!
//! The context carries a sticky [`MatchMode`]. One recovery step is the cycle
//! `Missing` → `Lenient` → `Exact`: exactly one primitive match is
//! synthesized as missing, the next primitive resynchronizes by searching
//! forward, and matching then returns to normal.
//!
//! ## Failure capture and replay
//!
//! Whenever a frame is rejected at an offset beyond every earlier failure,
//! the whole remaining frame stack (plus the rejected frame) is deep-copied
//! as the recovery target. When rejection empties the stack, replay is armed:
//! the next parse attempt re-enters frames from the captured stack instead of
//! opening fresh ones, and once the capture is exhausted the mode switches to
//! `Missing` so the next primitive performs the synthesized-missing step.

use compact_str::CompactString;
use hashbrown::HashMap;

use crate::token::Token;

/// How primitive patterns (literal, regex) are required to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// The match must occur literally at the current offset.
    Exact,
    /// Every primitive match succeeds by consuming nothing, tagged `missing`.
    Missing,
    /// The primitive searches forward; skipped text is kept as a leading
    /// child and the result is tagged `lenient`.
    Lenient,
}

/// Resumption record for sequence-like expressions: which child to resume at
/// and the offset that child started from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Memento {
    /// Index of the child expression to resume at.
    pub index: usize,
    /// Offset at entry to that child.
    pub offset: usize,
}

#[derive(Debug, Clone)]
struct Frame {
    offset: usize,
    token: Token,
    memento: Option<Memento>,
}

#[derive(Debug, Clone)]
struct CachedResult {
    end_offset: usize,
    token: Token,
}

/// Mutable state for a single parse invocation and its recovery retries.
#[derive(Debug)]
pub struct ParseContext<'t> {
    text: &'t str,
    offset: usize,
    frames: Vec<Frame>,
    match_mode: MatchMode,
    error_offset: Option<usize>,
    error_frames: Vec<Frame>,
    recovery_index: Option<usize>,
    memoize: bool,
    cache: HashMap<(CompactString, usize), CachedResult, ahash::RandomState>,
}

impl<'t> ParseContext<'t> {
    /// Create a context over `text`, positioned at offset zero in `Exact`
    /// mode.
    #[must_use]
    pub fn new(text: &'t str) -> Self {
        Self {
            text,
            offset: 0,
            frames: Vec::new(),
            match_mode: MatchMode::Exact,
            error_offset: None,
            error_frames: Vec::new(),
            recovery_index: None,
            memoize: true,
            cache: HashMap::with_hasher(ahash::RandomState::new()),
        }
    }

    /// Enable or disable the packrat memo cache. Memoization only affects
    /// performance; results are identical either way.
    pub fn set_memoization(&mut self, enabled: bool) {
        self.memoize = enabled;
    }

    /// The current byte offset into the input.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The current matching mode.
    #[must_use]
    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    /// Byte offset of the furthest failure captured so far, if any.
    #[must_use]
    pub fn error_offset(&self) -> Option<usize> {
        self.error_offset
    }

    /// Position of the next frame to replay from the captured failure stack;
    /// `None` when not replaying.
    #[must_use]
    pub fn recovery_index(&self) -> Option<usize> {
        self.recovery_index
    }

    pub(crate) fn remaining(&self) -> &str {
        &self.text[self.offset..]
    }

    pub(crate) fn set_offset(&mut self, offset: usize) {
        self.offset = offset;
    }

    /// Open a backtracking frame.
    ///
    /// While a recovery replay is active this re-enters the next captured
    /// frame instead, restoring its offset and in-progress token, and
    /// returns its saved memento so the caller can resume mid-iteration.
    /// Exhausting the captured stack ends the replay and switches the mode to
    /// `Missing`. Outside replay, a fresh frame capturing the current offset,
    /// a new token tagged with `production`, and `memento` is pushed, and
    /// `None` is returned.
    pub fn begin_parse(
        &mut self,
        production: Option<&str>,
        memento: Option<Memento>,
    ) -> Option<Memento> {
        if let Some(index) = self.recovery_index {
            if let Some(frame) = self.error_frames.get(index).cloned() {
                self.offset = frame.offset;
                let saved = frame.memento;
                self.frames.push(frame);

                if index + 1 >= self.error_frames.len() {
                    self.recovery_index = None;
                    self.match_mode = MatchMode::Missing;
                } else {
                    self.recovery_index = Some(index + 1);
                }

                return saved;
            }
            self.recovery_index = None;
        }

        self.frames.push(Frame {
            offset: self.offset,
            token: Token::maybe_tagged(production.map(CompactString::from)),
            memento,
        });

        None
    }

    /// Close the current frame.
    ///
    /// On acceptance the frame's token is returned; if it never adopted a
    /// child the offset is rolled back to the frame's entry value. On
    /// rejection the offset is always rolled back and an error token tagged
    /// with the frame's production is returned; if this failure is the
    /// furthest reached so far the remaining frame stack is captured as the
    /// new recovery target, and if the stack is now empty, replay is armed
    /// for the next attempt.
    pub fn end_parse(&mut self, accepted: bool) -> Token {
        let Some(frame) = self.frames.pop() else {
            return Token::new().with_error();
        };

        if accepted {
            if !frame.token.has_children() {
                self.offset = frame.offset;
            }
            return frame.token;
        }

        if self.frames.is_empty() {
            self.recovery_index = Some(0);
        }

        if self.error_offset.map_or(true, |furthest| self.offset > furthest) {
            self.error_offset = Some(self.offset);
            self.error_frames = self.frames.clone();
            self.error_frames.push(frame.clone());
        }

        self.offset = frame.offset;

        Token::maybe_tagged(frame.token.production().map(CompactString::from)).with_error()
    }

    /// Record the current iteration state on the current frame so a future
    /// failure capture can resume from it.
    pub(crate) fn set_memento(&mut self, memento: Memento) {
        if let Some(frame) = self.frames.last_mut() {
            frame.memento = Some(memento);
        }
    }

    /// Adopt an accepted child into the current frame's in-progress token.
    pub fn accept_child(&mut self, child: Token) {
        if let Some(frame) = self.frames.last_mut() {
            frame.token.adopt(child);
        }
    }

    /// Accept a primitive match of `matched_len` bytes at the current offset.
    pub fn accept(&mut self, matched_len: usize) -> Token {
        let mut token = Token::new();
        token.adopt(self.take_span(matched_len));
        self.finish_accept(token)
    }

    /// Accept a primitive match found `skip_len` bytes ahead of the current
    /// offset; the skipped span becomes a leading child.
    pub fn accept_skipping(&mut self, skip_len: usize, matched_len: usize) -> Token {
        let mut token = Token::new();
        token.adopt(self.take_span(skip_len));
        token.adopt(self.take_span(matched_len));
        self.finish_accept(token)
    }

    /// Accept without consuming anything and without producing children.
    pub fn accept_empty(&mut self) -> Token {
        self.finish_accept(Token::new())
    }

    /// Produce an error token; the offset is untouched.
    #[must_use]
    pub fn reject(&self) -> Token {
        Token::new().with_error()
    }

    fn take_span(&mut self, len: usize) -> &'t str {
        let text: &'t str = self.text;
        let end = (self.offset + len).min(text.len());
        let span = text.get(self.offset..end).unwrap_or("");
        self.offset = end;
        span
    }

    /// Apply the matching-mode cycle: a `Missing` acceptance tags the token
    /// and moves to `Lenient`; a `Lenient` acceptance tags the token and
    /// returns to `Exact`.
    fn finish_accept(&mut self, token: Token) -> Token {
        match self.match_mode {
            MatchMode::Missing => {
                self.match_mode = MatchMode::Lenient;
                token.with_missing()
            }
            MatchMode::Lenient => {
                self.match_mode = MatchMode::Exact;
                token.with_lenient()
            }
            MatchMode::Exact => token,
        }
    }

    /// Look up a memoized result for `production` at the current offset.
    ///
    /// Memoized results are only valid in `Exact` mode; missing/lenient
    /// passes are one-off syntheses and never reuse them. A hit advances the
    /// offset to the recorded end.
    pub(crate) fn use_cached_result(&mut self, production: &str) -> Option<Token> {
        if !self.memoize || self.match_mode != MatchMode::Exact {
            return None;
        }

        let entry = self
            .cache
            .get(&(CompactString::from(production), self.offset))?;
        self.offset = entry.end_offset;
        Some(entry.token.clone())
    }

    /// Record the result of evaluating `production` from `start_offset`; the
    /// current offset is stored as the end position.
    pub(crate) fn cache_result(&mut self, production: &str, start_offset: usize, result: &Token) {
        self.cache.insert(
            (CompactString::from(production), start_offset),
            CachedResult {
                end_offset: self.offset,
                token: result.clone(),
            },
        );
    }

    /// Drop all memoized results. Called between recovery retries, since a
    /// new recovery pass changes which offsets are reachable.
    pub fn clear_cached_results(&mut self) {
        self.cache.clear();
    }
}
