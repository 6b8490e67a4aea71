use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use loxrs::{Lox, RunOutcome};

/// A `Write` sink that also hands back its bytes, so a test can both satisfy
/// `Lox::with_output`'s `Box<dyn Write>` bound and inspect what was printed.
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `source` against a fresh interpreter and returns everything `print`
/// wrote, panicking if the program didn't complete successfully. Used for
/// the "is OK" style scenarios (spec §8).
pub fn run_ok(source: &str) -> String {
    let buffer: Rc<RefCell<Vec<u8>>> = Rc::new(RefCell::new(Vec::new()));
    let mut lox = Lox::with_output(Box::new(SharedBuffer(Rc::clone(&buffer))));

    let outcome = lox.run(source);
    assert!(outcome.is_ok(), "expected program to run cleanly: {}", describe(&outcome));

    String::from_utf8(buffer.borrow().clone()).expect("program output should be valid UTF-8")
}

/// Runs `source` and returns the resulting [`RunOutcome`], for scenarios
/// that expect a lex/parse/resolve/runtime error (spec §8 negative
/// scenarios).
pub fn run(source: &str) -> RunOutcome {
    let mut lox = Lox::with_output(Box::new(io::sink()));
    lox.run(source)
}

pub fn describe(outcome: &RunOutcome) -> String {
    match outcome {
        RunOutcome::Ok => "Ok".to_string(),
        RunOutcome::LexOrParseErrors { lex, parse } => {
            let mut messages: Vec<String> = lex.iter().map(|e| e.to_string()).collect();
            messages.extend(parse.iter().map(|e| e.to_string()));
            messages.join("; ")
        }
        RunOutcome::ResolveErrors(errors) => errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "),
        RunOutcome::RuntimeError(error) => error.to_string(),
    }
}
