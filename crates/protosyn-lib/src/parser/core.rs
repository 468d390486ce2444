//! Parser state and token-level operations.

use std::cell::Cell;

use protosyn_core::Token;
use rowan::{TextRange, TextSize};

use crate::ast::{ErrorNode, IdentNode, KeywordNode, RuneNode};
use crate::diagnostics::{DiagnosticKind, ExtendedSyntaxCategory, Reporter};
use crate::lexer::{LexedToken, TokenKind, is_declaration_keyword};
use crate::{Dialect, Error, ParseConfig};

/// A bracket the grammar is currently inside.
#[derive(Debug, Clone, Copy)]
pub(super) struct OpenDelimiter {
    pub rune: char,
    pub range: TextRange,
}

impl OpenDelimiter {
    pub fn closing(&self) -> char {
        match self.rune {
            '{' => '}',
            '<' => '>',
            '[' => ']',
            '(' => ')',
            other => other,
        }
    }
}

/// Recursive-descent state over the lexed token vector.
///
/// Virtual tokens stay in the vector. Lookahead steps over them; only the
/// `;` and `,` expectations look at them, and whatever the grammar does not
/// take is dropped.
pub(crate) struct Parser<'r, 'h> {
    pub(super) tokens: Vec<LexedToken>,
    pub(super) pos: usize,
    pub(super) dialect: Dialect,
    reporter: &'r mut Reporter<'h>,
    /// Index of the last real token consumed.
    prev: Option<usize>,
    pub(super) depth: u32,
    last_diagnostic_pos: Option<TextSize>,
    pub(super) delimiter_stack: Vec<OpenDelimiter>,
    pub(super) debug_fuel: Cell<u32>,
    exec_fuel_initial: Option<u32>,
    exec_fuel_remaining: Option<u32>,
    recursion_fuel_limit: Option<u32>,
    fatal_error: Option<Error>,
}

impl<'r, 'h> Parser<'r, 'h> {
    pub(crate) fn new(
        tokens: Vec<LexedToken>,
        dialect: Dialect,
        reporter: &'r mut Reporter<'h>,
        config: &ParseConfig,
    ) -> Self {
        Self {
            tokens,
            pos: 0,
            dialect,
            reporter,
            prev: None,
            depth: 0,
            last_diagnostic_pos: None,
            delimiter_stack: Vec::with_capacity(8),
            debug_fuel: Cell::new(256),
            exec_fuel_initial: config.exec_fuel,
            exec_fuel_remaining: config.exec_fuel,
            recursion_fuel_limit: config.recursion_limit,
            fatal_error: None,
        }
    }

    pub(crate) fn take_fatal_error(&mut self) -> Option<Error> {
        self.fatal_error.take()
    }

    pub(crate) fn exec_fuel_consumed(&self) -> u32 {
        match (self.exec_fuel_initial, self.exec_fuel_remaining) {
            (Some(initial), Some(remaining)) => initial.saturating_sub(remaining),
            _ => 0,
        }
    }

    fn reset_debug_fuel(&self) {
        self.debug_fuel.set(256);
    }

    fn consume_exec_fuel(&mut self) {
        if let Some(ref mut remaining) = self.exec_fuel_remaining {
            if *remaining == 0 {
                if self.fatal_error.is_none() {
                    self.fatal_error = Some(Error::ExecFuelExhausted);
                }
                return;
            }
            *remaining -= 1;
        }
    }

    /// Position of the `n`-th real token at or after the cursor. The EOF
    /// token is never stepped past.
    pub(super) fn real_pos(&self, n: usize) -> usize {
        let last = self.tokens.len().saturating_sub(1);
        let mut seen = 0;
        let mut i = self.pos;
        while i < last {
            if !self.tokens[i].kind.is_virtual() {
                if seen == n {
                    return i;
                }
                seen += 1;
            }
            i += 1;
        }
        last
    }

    pub(super) fn nth(&self, n: usize) -> TokenKind {
        self.ensure_progress();
        self.tokens
            .get(self.real_pos(n))
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    pub(super) fn current(&self) -> TokenKind {
        self.nth(0)
    }

    /// Kind at the cursor as seen from inside a statement: a statement end
    /// the lexer inferred hides whatever follows it.
    pub(super) fn peek(&self) -> TokenKind {
        if self.at_inferred_end() {
            return TokenKind::VirtualSemicolon;
        }
        self.current()
    }

    pub(super) fn nth_token(&self, n: usize) -> Option<&LexedToken> {
        self.tokens.get(self.real_pos(n))
    }

    pub(super) fn current_text(&self) -> &str {
        self.nth_token(0).map_or("", |t| t.text.as_str())
    }

    pub(super) fn at_eof(&self) -> bool {
        self.current() == TokenKind::Eof
    }

    pub(super) fn has_fatal_error(&self) -> bool {
        self.fatal_error.is_some()
    }

    /// End of input, a fatal budget error, or an aborting handler.
    pub(super) fn should_stop(&self) -> bool {
        self.at_eof() || self.has_fatal_error() || self.reporter.is_aborted()
    }

    pub(super) fn at_rune(&self, rune: char) -> bool {
        self.current() == TokenKind::Rune(rune)
    }

    pub(super) fn nth_is_rune(&self, n: usize, rune: char) -> bool {
        self.nth(n) == TokenKind::Rune(rune)
    }

    pub(super) fn at_keyword(&self, keyword: &str) -> bool {
        self.nth_is_keyword(0, keyword)
    }

    pub(super) fn nth_is_keyword(&self, n: usize, keyword: &str) -> bool {
        self.nth_token(n).is_some_and(|t| t.is_keyword(keyword))
    }

    /// A plain or dotted name, the shapes that can start a type reference.
    pub(super) fn nth_is_name(&self, n: usize) -> bool {
        matches!(self.nth(n), TokenKind::Ident | TokenKind::QualifiedIdent)
    }

    /// The current token is a word that starts a declaration.
    pub(super) fn at_declaration_keyword(&self) -> bool {
        self.nth_token(0).is_some_and(|t| {
            t.kind == TokenKind::Ident && is_declaration_keyword(&t.text, self.dialect)
        })
    }

    /// The raw token at the cursor is a virtual one of `kind`.
    fn at_virtual(&self, kind: TokenKind) -> bool {
        self.tokens.get(self.pos).is_some_and(|t| t.kind == kind)
    }

    /// A line break ended the statement here.
    pub(super) fn at_inferred_end(&self) -> bool {
        self.at_virtual(TokenKind::VirtualSemicolon)
    }

    /// Consumes the current real token. Virtual tokens in front of it are
    /// dropped.
    pub(super) fn bump(&mut self) -> LexedToken {
        self.assert_not_eof();
        self.reset_debug_fuel();
        self.consume_exec_fuel();

        let index = self.real_pos(0);
        self.pos = index + 1;
        self.prev = Some(index);
        self.tokens[index].clone()
    }

    pub(super) fn rune(&mut self) -> RuneNode {
        let token = self.bump();
        RuneNode::new(token.token, token.kind.rune().unwrap_or_default())
    }

    pub(super) fn keyword(&mut self) -> KeywordNode {
        let token = self.bump();
        KeywordNode {
            token: token.token,
            value: token.text,
        }
    }

    pub(super) fn ident(&mut self) -> IdentNode {
        let token = self.bump();
        IdentNode {
            token: token.token,
            value: token.text,
        }
    }

    /// Never looks past a statement end the lexer inferred.
    pub(super) fn eat_rune(&mut self, rune: char) -> Option<RuneNode> {
        (self.at_rune(rune) && !self.at_inferred_end()).then(|| self.rune())
    }

    /// On mismatch: report but don't consume.
    pub(super) fn expect_rune(&mut self, rune: char) -> Option<RuneNode> {
        if let Some(node) = self.eat_rune(rune) {
            return Some(node);
        }
        self.error_msg(DiagnosticKind::ExpectedToken, format!("`{rune}`"));
        None
    }

    /// `;` ending a statement. An inferred one is accepted and reported as
    /// a missing token.
    pub(super) fn semicolon(&mut self) -> Option<RuneNode> {
        self.separator(';', TokenKind::VirtualSemicolon, true)
    }

    /// `,` between list elements, real or inferred. Never reports when
    /// absent: the caller decides whether the list ends.
    pub(super) fn comma(&mut self) -> Option<RuneNode> {
        self.separator(',', TokenKind::VirtualComma, false)
    }

    fn separator(&mut self, rune: char, inferred: TokenKind, required: bool) -> Option<RuneNode> {
        if self.at_virtual(inferred) {
            let token = self.tokens[self.pos].clone();
            self.pos += 1;
            self.report_missing(rune, token.range);
            return Some(RuneNode::inferred(token.token, rune));
        }
        if let Some(node) = self.eat_rune(rune) {
            return Some(node);
        }
        if required {
            self.error_msg(DiagnosticKind::ExpectedToken, format!("`{rune}`"));
        }
        None
    }

    /// The diagnostic spans the token before the gap so the fix can
    /// rewrite it with the separator appended.
    fn report_missing(&mut self, rune: char, at: TextRange) {
        if !self.should_report(at.start()) {
            return;
        }
        let kind = DiagnosticKind::ExtendedSyntax(ExtendedSyntaxCategory::MissingToken);
        let message = format!("`{rune}`");
        match self.prev.map(|i| &self.tokens[i]) {
            Some(anchor) if anchor.range.end() == at.start() => {
                let (range, fixed) = (anchor.range, format!("{}{rune}", anchor.text));
                self.reporter
                    .report(kind, range)
                    .message(message)
                    .fix(format!("insert `{rune}`"), fixed)
                    .emit();
            }
            _ => self.reporter.report(kind, at).message(message).emit(),
        }
    }

    /// Drops inferred tokens left over from a statement that did not take
    /// them, so the next statement starts at a real token.
    pub(super) fn skip_inferred(&mut self) {
        while self
            .tokens
            .get(self.pos)
            .is_some_and(|t| t.kind.is_virtual())
        {
            self.pos += 1;
        }
    }

    /// Range of the token errors at the cursor point at. A virtual token
    /// there stands for the end of the previous line.
    pub(super) fn current_range(&self) -> TextRange {
        if let Some(token) = self.tokens.get(self.pos)
            && token.kind.is_virtual()
        {
            return token.range;
        }
        self.nth_token(0)
            .map_or_else(|| TextRange::empty(TextSize::from(0)), |t| t.range)
    }

    /// Range of the last real token consumed.
    pub(super) fn prev_range(&self) -> TextRange {
        self.prev
            .map_or_else(|| self.current_range(), |i| self.tokens[i].range)
    }

    fn should_report(&mut self, pos: TextSize) -> bool {
        if self.last_diagnostic_pos == Some(pos) {
            return false;
        }
        self.last_diagnostic_pos = Some(pos);
        true
    }

    pub(super) fn error(&mut self, kind: DiagnosticKind) {
        let range = self.current_range();
        if !self.should_report(range.start()) {
            return;
        }
        self.reporter.report(kind, range).emit();
    }

    pub(super) fn error_msg(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let range = self.current_range();
        self.error_at(kind, range, message);
    }

    pub(super) fn error_at(
        &mut self,
        kind: DiagnosticKind,
        range: TextRange,
        message: impl Into<String>,
    ) {
        if !self.should_report(range.start()) {
            return;
        }
        self.reporter.report(kind, range).message(message).emit();
    }

    pub(super) fn extended(
        &mut self,
        category: ExtendedSyntaxCategory,
        range: TextRange,
        message: Option<String>,
    ) {
        if !self.should_report(range.start()) {
            return;
        }
        let builder = self.reporter.report(DiagnosticKind::ExtendedSyntax(category), range);
        match message {
            Some(message) => builder.message(message).emit(),
            None => builder.emit(),
        }
    }

    pub(super) fn is_extended_syntax(&self) -> bool {
        self.reporter.extended_syntax()
    }

    /// Reports the token at the cursor as out of place and skips to the end
    /// of its statement. Lexer error tokens were reported already.
    pub(super) fn junk(&mut self) -> Option<ErrorNode> {
        if self.current() != TokenKind::Error && !self.should_stop() {
            let range = self.current_range();
            let text = self.current_text().to_string();
            if self.at_declaration_keyword() {
                self.extended(
                    ExtendedSyntaxCategory::DeclNotAllowed,
                    range,
                    Some(format!("`{text}`")),
                );
            } else {
                self.error_at(DiagnosticKind::UnexpectedToken, range, format!("`{text}`"));
            }
        }
        self.skip_statement(None)
    }

    /// Turns a statement that cannot be completed into an error node that
    /// starts at its first token. The caller has reported why.
    pub(super) fn abandon(&mut self, first: Token) -> ErrorNode {
        match self.skip_statement(Some(first)) {
            Some(node) => node,
            None => ErrorNode {
                first,
                last: first,
            },
        }
    }

    /// Skips to the end of the current statement: a `;` (taken along), a
    /// line break, or a declaration keyword or `}` (left in place). A body
    /// opened inside the skipped run is skipped whole and ends the run.
    /// At least one token is taken unless the cursor is at `}` of an
    /// enclosing body or at end of input.
    fn skip_statement(&mut self, started: Option<Token>) -> Option<ErrorNode> {
        let mut first = started;
        let mut last = started;
        let mut nesting = 0u32;
        let in_body = !self.delimiter_stack.is_empty();

        while !self.at_eof() {
            let kind = self.current();
            if nesting == 0 {
                if kind == TokenKind::Rune('}') && in_body {
                    break;
                }
                if last.is_some() && (self.at_inferred_end() || self.at_declaration_keyword())
                {
                    break;
                }
            }
            let token = self.bump().token;
            first.get_or_insert(token);
            last = Some(token);
            match kind {
                TokenKind::Rune('{') => nesting += 1,
                TokenKind::Rune('}') => {
                    nesting = nesting.saturating_sub(1);
                    if nesting == 0 {
                        break;
                    }
                }
                TokenKind::Rune(';') if nesting == 0 => break,
                _ => {}
            }
        }

        Some(ErrorNode {
            first: first?,
            last: last?,
        })
    }

    /// Everything left before EOF, without diagnostics. Used once parsing
    /// stopped early so the tree still covers the whole file.
    pub(super) fn skip_rest(&mut self) -> Option<ErrorNode> {
        let last_index = self.tokens.len().checked_sub(1)?;
        let first = self.tokens[self.pos..last_index]
            .iter()
            .find(|t| !t.kind.is_virtual())?
            .token;
        let last = self.tokens[self.pos..last_index]
            .iter()
            .rev()
            .find(|t| !t.kind.is_virtual())?
            .token;
        self.pos = last_index;
        Some(ErrorNode { first, last })
    }

    pub(super) fn eof_node(&self) -> RuneNode {
        let token = self
            .tokens
            .last()
            .map_or(Token::from_raw(0), |t| t.token);
        RuneNode::new(token, '\0')
    }

    pub(super) fn enter_recursion(&mut self) -> bool {
        if let Some(limit) = self.recursion_fuel_limit
            && self.depth >= limit
        {
            if self.fatal_error.is_none() {
                self.fatal_error = Some(Error::RecursionLimitExceeded);
            }
            return false;
        }
        self.depth += 1;
        self.reset_debug_fuel();
        true
    }

    pub(super) fn exit_recursion(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.reset_debug_fuel();
    }

    pub(super) fn push_delimiter(&mut self, rune: char, range: TextRange) {
        self.delimiter_stack.push(OpenDelimiter { rune, range });
    }

    pub(super) fn pop_delimiter(&mut self) -> Option<OpenDelimiter> {
        self.delimiter_stack.pop()
    }

    /// Reports the innermost open delimiter as unclosed, pointing back at
    /// where it was opened.
    pub(super) fn error_unclosed_delimiter(
        &mut self,
        kind: DiagnosticKind,
        message: impl Into<String>,
        related_msg: impl Into<String>,
    ) {
        let current = self.current_range();
        let open_range = self
            .delimiter_stack
            .last()
            .map_or(current, |open| open.range);
        if !self.should_report(current.start()) {
            return;
        }
        // The full range lets overlapping follow-up errors be filtered.
        let full_range = TextRange::new(open_range.start(), current.end());
        self.reporter
            .report(kind, full_range)
            .message(message)
            .related_to(related_msg, open_range)
            .emit();
    }
}
