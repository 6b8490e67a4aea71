use std::fmt;

use substring::Substring;

use crate::object::Value;
use crate::token::{Token, TokenType};

/// Scanning failed on one lexeme (spec §7: `LexError`). The scanner collects
/// these and abandons the current token rather than the whole pass, so a
/// single source file can report more than one.
#[derive(Debug, Clone)]
pub struct LexError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[line {}:{}] Error: {}", self.line + 1, self.column + 1, self.message)
    }
}

/// A syntax error surfaced during parsing (spec §7: `ParseError`), carrying
/// the offending token so the message can point at "end" or at a lexeme.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.token.r#type == TokenType::Eof {
            write!(
                f,
                "[line {}:{}] Error at end: {}",
                self.token.location.line, self.token.location.column, self.message
            )
        } else {
            write!(
                f,
                "[line {}:{}] Error at '{}': {}",
                self.token.location.line, self.token.location.column, self.token.lexeme, self.message
            )
        }
    }
}

/// A static-binding violation caught by the resolver (spec §7:
/// `ResolveError`): self-referential initializers, `return`/`this` outside
/// their containing construct, duplicate declarations in one scope.
#[derive(Debug, Clone)]
pub struct ResolveError {
    pub token: Token,
    pub message: String,
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[line {}:{}] Error at '{}': {}",
            self.token.location.line, self.token.location.column, self.token.lexeme, self.message
        )
    }
}

/// A failure raised while evaluating the tree (spec §7: `RuntimeError`).
/// Aborts the current `run()` call; in REPL mode the interpreter instance
/// itself survives to the next line.
#[derive(Debug, Clone)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl RuntimeError {
    pub fn new(token: Token, message: String) -> Self {
        RuntimeError { token, message }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[line {}:{}] Error at '{}': {}",
            self.token.location.line, self.token.location.column, self.token.lexeme, self.message
        )
    }
}

impl std::error::Error for RuntimeError {}

/// Slices the single source line a diagnostic points at, for the extra
/// context line printed under each error report (spec §7: "human-readable
/// text"). Returns `None` for a line index past the end of `source` (can
/// happen for an `Eof`-positioned `ParseError` on an empty file).
pub fn source_context(source: &str, line: usize) -> Option<String> {
    let raw = source.lines().nth(line)?;
    Some(raw.substring(0, raw.len()).to_string())
}

/// Non-local control flow (spec §4.4, §7, §9): distinguished from ordinary
/// errors so that a `return`/`break`/`continue` can never be mistaken for a
/// `RuntimeError` as it unwinds. `Return`/`Break`/`Continue` are caught at
/// their respective boundary (function call frame, `while` loop) — letting
/// one escape further is a bug in the interpreter, not a user program error.
#[derive(Debug, Clone)]
pub enum Signal {
    Return(Value),
    Break,
    Continue,
}

/// The result of evaluating or executing a tree node: a value, a runtime
/// error, or a non-local signal. Keeping `Signal` out of `Result`'s `Err`
/// side (spec §9 REDESIGN FLAG) means `?` on a `RuntimeError` can never
/// accidentally swallow a `break`.
pub type Outcome<T> = Result<T, Unwind>;

#[derive(Debug, Clone)]
pub enum Unwind {
    Error(RuntimeError),
    Signal(Signal),
}

impl From<RuntimeError> for Unwind {
    fn from(error: RuntimeError) -> Self {
        Unwind::Error(error)
    }
}

impl From<Signal> for Unwind {
    fn from(signal: Signal) -> Self {
        Unwind::Signal(signal)
    }
}
