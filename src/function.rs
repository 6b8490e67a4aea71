use std::cell::RefCell;
use std::fmt::{self, Debug, Display};
use std::rc::Rc;

use crate::environment::Environment;
use crate::error::{RuntimeError, Signal, Unwind};
use crate::interpreter::Interpreter;
use crate::object::{Callable, Value};
use crate::stmt::Stmt;
use crate::token::{Location, Token, TokenType};

/// A user-defined function or method (spec §3: `Function`). `closure` is the
/// environment active at the point of declaration — capturing it by `Rc` is
/// what makes nested functions into real lexical closures (spec §8: "Lexical
/// closure" testable property).
#[derive(Debug, Clone)]
pub struct Function {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Rc<Vec<Stmt>>,
    pub closure: Rc<RefCell<Environment>>,
    pub is_initializer: bool,
}

impl Function {
    pub fn new(declaration: &Stmt, closure: Rc<RefCell<Environment>>, is_initializer: bool) -> Self {
        let Stmt::Function { name, params, body } = declaration else {
            unreachable!("Function::new requires a Stmt::Function declaration")
        };

        Function {
            name: name.clone(),
            params: params.clone(),
            body: Rc::new(body.clone()),
            closure,
            is_initializer,
        }
    }

    /// Returns a copy of this function whose closure additionally binds
    /// `this` to `instance` (spec §3: `Function.Bind`). Used both for plain
    /// method lookup and for resolving a class's own name inside its
    /// methods.
    pub fn bind(&self, instance: Value) -> Function {
        let mut environment = Environment::new(Some(Rc::clone(&self.closure)));
        environment.define("this", instance);

        Function {
            name: self.name.clone(),
            params: self.params.clone(),
            body: Rc::clone(&self.body),
            closure: Rc::new(RefCell::new(environment)),
            is_initializer: self.is_initializer,
        }
    }

    fn this_token() -> Token {
        Token::synthetic(TokenType::This, "this")
    }
}

impl Callable for Function {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Value>) -> Result<Value, RuntimeError> {
        let mut environment = Environment::new(Some(Rc::clone(&self.closure)));

        for (param, argument) in self.params.iter().zip(arguments.into_iter()) {
            environment.define(&param.lexeme, argument);
        }

        let environment = Rc::new(RefCell::new(environment));

        match interpreter.execute_block(&self.body, environment) {
            Ok(()) => {
                if self.is_initializer {
                    self.closure.borrow().get_at(0, &Self::this_token())
                } else {
                    Ok(Value::Nil)
                }
            }
            Err(Unwind::Signal(Signal::Return(value))) => {
                if self.is_initializer {
                    self.closure.borrow().get_at(0, &Self::this_token())
                } else {
                    Ok(value)
                }
            }
            Err(Unwind::Signal(signal)) => unreachable!(
                "a {:?} signal from a function body should have been caught by the resolver", signal
            ),
            Err(Unwind::Error(error)) => Err(error),
        }
    }

    fn arity(&self) -> usize {
        self.params.len()
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.name.lexeme)
    }
}

/// A builtin implemented in Rust rather than in the source language. Spec §6
/// names exactly one: `clock`, returning wall-clock time as fractional
/// seconds.
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub function: fn(&mut Interpreter, Vec<Value>) -> Result<Value, RuntimeError>,
}

impl NativeFunction {
    /// Builds the set of bindings seeded into the interpreter's `globals`
    /// environment (spec §4.4, §6). Locations are synthetic since these
    /// names are never scanned from source.
    pub fn globals() -> Vec<(Token, NativeFunction)> {
        vec![(
            Token::new(TokenType::Identifier, "clock".to_string(), None, Location::new(0, 0)),
            NativeFunction {
                name: "clock",
                arity: 0,
                function: |_, _| {
                    let now = std::time::SystemTime::now()
                        .duration_since(std::time::UNIX_EPOCH)
                        .expect("system clock should be after the Unix epoch");
                    Ok(Value::Number(now.as_secs_f64()))
                },
            },
        )]
    }
}

impl Callable for NativeFunction {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Value>) -> Result<Value, RuntimeError> {
        (self.function)(interpreter, arguments)
    }

    fn arity(&self) -> usize {
        self.arity
    }
}

impl Display for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}

impl Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}
