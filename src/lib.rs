#![allow(clippy::needless_return)]

//! loxrs is a tree-walking interpreter for a small dynamically typed,
//! lexically scoped, object-oriented scripting language in the tradition of
//! the "Lox" teaching language.
//!
//! A source program is a UTF-8 text that is lexed to tokens by the
//! [`scanner`], parsed to an abstract syntax tree by the [`parser`],
//! resolved for static variable binding by the [`resolver`], and finally
//! evaluated against a tree of lexical environments by the [`interpreter`].
//!
//! ## Scanning
//! The [`scanner`] module converts a source string into a flat list of
//! [`token::Token`]s, reporting lexical mistakes (an unterminated string, a
//! stray character) as [`error::LexError`] without aborting the rest of the
//! pass.
//!
//! ## Parsing
//! The [`parser`] module is a recursive-descent parser with one-token
//! lookahead. It turns the token stream into a list of [`stmt::Stmt`]s built
//! out of [`expr::Expr`] nodes. On a malformed statement it reports a
//! [`error::ParseError`] and resynchronizes at the next likely statement
//! boundary so later errors in the same file can still be found.
//!
//! ## Resolving
//! The [`resolver`] module walks the parsed tree once more, computing for
//! every variable reference how many enclosing block scopes separate it
//! from its declaration. This both lets the interpreter skip a linear scope
//! search at runtime and catches binding mistakes the parser cannot see on
//! its own (reading a variable from its own initializer, `return` outside a
//! function, `this` outside a method) as [`error::ResolveError`].
//!
//! ## Interpreting
//! The [`interpreter`] module walks the resolved tree and evaluates it
//! directly, without compiling to bytecode. It owns the global environment
//! (seeded with the single native function `clock`), the currently active
//! lexical [`environment::Environment`], and the resolver's scope-distance
//! table. Runtime mistakes surface as [`error::RuntimeError`]; `return`,
//! `break`, and `continue` unwind through [`error::Signal`], a channel kept
//! disjoint from ordinary errors so the two can never be confused.

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::Path;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

pub mod ast_printer;
pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod literal;
pub mod object;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;

use error::{LexError, ParseError, ResolveError, RuntimeError};
use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;

/// The outcome of one [`Lox::run`] call, distinguishing the three error
/// kinds the driver maps to distinct process exit codes (spec §6/§7).
pub enum RunOutcome {
    Ok,
    LexOrParseErrors { lex: Vec<LexError>, parse: Vec<ParseError> },
    ResolveErrors(Vec<ResolveError>),
    RuntimeError(RuntimeError),
}

impl RunOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, RunOutcome::Ok)
    }

    /// Maps this outcome to the process exit code the CLI driver reports
    /// (spec §6: 0 success, 65 parse/resolve, 70 runtime).
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Ok => 0,
            RunOutcome::LexOrParseErrors { .. } | RunOutcome::ResolveErrors(_) => 65,
            RunOutcome::RuntimeError(_) => 70,
        }
    }
}

/// Owns one long-lived [`Interpreter`] across any number of [`Lox::run`]
/// calls, so that a REPL session's global bindings persist between
/// submissions (spec §3: "REPL sessions reuse the same interpreter"). This
/// is the entry-point driver described in spec §1 as an external
/// collaborator of the core pipeline: argument parsing, the REPL loop, file
/// reading, and exit-code selection live here, not in the four core phases.
pub struct Lox {
    interpreter: Interpreter,
}

impl Lox {
    /// Builds a driver that prints to standard output.
    pub fn new() -> Self {
        Lox { interpreter: Interpreter::new() }
    }

    /// Builds a driver that writes `print` output to `output` instead of
    /// stdout, so tests can capture it without touching the real terminal.
    pub fn with_output(output: Box<dyn Write>) -> Self {
        Lox { interpreter: Interpreter::with_output(output) }
    }

    /// Reads `path` as UTF-8, runs it, and returns the process exit code the
    /// CLI should use (spec §6).
    pub fn run_file(&mut self, path: &Path) -> i32 {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) => {
                eprintln!("Error: could not read '{}': {err}", path.display());
                return 64;
            }
        };

        let outcome = self.run(&contents);
        self.report(&contents, &outcome);
        outcome.exit_code()
    }

    /// Starts an interactive REPL: reads one line at a time, runs it against
    /// the same persistent interpreter, and prints its result. Runtime
    /// errors are reported but do not end the session (spec §7: "in REPL,
    /// interpreter instance survives").
    pub fn run_prompt(&mut self) -> i32 {
        let mut editor = DefaultEditor::new().expect("line editor should initialize");
        let history_path = history_path();
        if let Some(path) = &history_path {
            let _ = editor.load_history(path);
        }

        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    let _ = editor.add_history_entry(line.as_str());
                    let outcome = self.run(&line);
                    self.report(&line, &outcome);
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("Error: {err}");
                    break;
                }
            }
        }

        if let Some(path) = &history_path {
            let _ = editor.save_history(path);
        }

        0
    }

    /// Runs `source` through the full pipeline — scan, parse, resolve,
    /// interpret — stopping at the first phase that reports a problem
    /// (spec §2). Does not print anything itself; see [`Lox::report`].
    pub fn run(&mut self, source: &str) -> RunOutcome {
        let (tokens, lex_errors) = Scanner::new(source).scan_tokens();

        let (statements, parse_errors) = Parser::new(tokens).parse();
        if !lex_errors.is_empty() || !parse_errors.is_empty() {
            return RunOutcome::LexOrParseErrors { lex: lex_errors, parse: parse_errors };
        }

        let resolve_errors = Resolver::new(&mut self.interpreter).resolve(&statements);
        if !resolve_errors.is_empty() {
            return RunOutcome::ResolveErrors(resolve_errors);
        }

        match self.interpreter.interpret(&statements) {
            Ok(()) => RunOutcome::Ok,
            Err(error) => RunOutcome::RuntimeError(error),
        }
    }

    /// Prints whatever errors `outcome` carries to stderr in the
    /// human-readable form spec §7 promises ("no machine-readable schema is
    /// guaranteed"), each followed by the offending source line for context.
    fn report(&self, source: &str, outcome: &RunOutcome) {
        match outcome {
            RunOutcome::Ok => {}
            RunOutcome::LexOrParseErrors { lex, parse } => {
                for error in lex {
                    eprintln!("{error}");
                    print_context(source, error.line);
                }
                for error in parse {
                    eprintln!("{error}");
                    print_context(source, error.token.location.line);
                }
            }
            RunOutcome::ResolveErrors(errors) => {
                for error in errors {
                    eprintln!("{error}");
                    print_context(source, error.token.location.line);
                }
            }
            RunOutcome::RuntimeError(error) => {
                eprintln!("{error}");
                print_context(source, error.token.location.line);
            }
        }
    }
}

fn print_context(source: &str, line: usize) {
    if let Some(context) = error::source_context(source, line) {
        eprintln!("    {context}");
    }
}

impl Default for Lox {
    fn default() -> Self {
        Self::new()
    }
}

/// Locates a per-user history file for the REPL, falling back to `None`
/// (no persistence across sessions) if the home directory cannot be
/// determined or standard input isn't actually a terminal.
fn history_path() -> Option<std::path::PathBuf> {
    if !io::stdin().is_terminal() {
        return None;
    }

    home::home_dir().map(|dir| dir.join(".loxrs_history"))
}
