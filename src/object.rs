use std::cell::RefCell;
use std::fmt::{self, Debug, Display};
use std::rc::Rc;

use crate::class::{Class, Instance};
use crate::error::RuntimeError;
use crate::function::{Function, NativeFunction};
use crate::interpreter::Interpreter;

/// The runtime value sum type (spec §3): every expression evaluates to one
/// of these. `Function`/`NativeFunction`/`Class` are wrapped in `Rc` so that
/// equality can be pointer identity (spec §4.4: "identity for objects and
/// functions") and so that closures can be cheaply shared between bound
/// copies of the same underlying function.
#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(f64),
    String(String),
    Function(Rc<Function>),
    NativeFunction(Rc<NativeFunction>),
    Class(Rc<RefCell<Class>>),
    Instance(Rc<RefCell<Instance>>),
}

impl Value {
    /// Truthiness (spec §4.4 GLOSSARY): everything except `nil` and `false`
    /// is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Function(_) => "function",
            Value::NativeFunction(_) => "native function",
            Value::Class(_) => "class",
            Value::Instance(_) => "instance",
        }
    }

    /// Dispatches a call to whichever `Callable` this value wraps. Returns
    /// `None` for values that cannot be called (spec §4.4: "Can only call
    /// functions and classes.").
    pub fn call(
        &self,
        interpreter: &mut Interpreter,
        arguments: Vec<Value>,
    ) -> Option<Result<Value, RuntimeError>> {
        match self {
            Value::Function(f) => Some(f.call(interpreter, arguments)),
            Value::NativeFunction(f) => Some(f.call(interpreter, arguments)),
            Value::Class(c) => {
                let instance = Value::from(Instance::new(Rc::clone(c)));

                if let Some(initializer) = c.borrow().find_method("init") {
                    let bound = initializer.bind(instance.clone());
                    if let Err(error) = bound.call(interpreter, arguments) {
                        return Some(Err(error));
                    }
                }

                Some(Ok(instance))
            }
            _ => None,
        }
    }

    pub fn arity(&self) -> Option<usize> {
        match self {
            Value::Function(f) => Some(f.arity()),
            Value::NativeFunction(f) => Some(f.arity()),
            Value::Class(c) => Some(c.borrow().arity()),
            _ => None,
        }
    }
}

/// Structural equality for scalars, identity for everything else (spec
/// §4.4): `nil` equals only `nil`; no cross-type equality; `NaN != NaN`
/// follows naturally from `f64`'s own `PartialEq`.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::NativeFunction(a), Value::NativeFunction(b)) => Rc::ptr_eq(a, b),
            (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Value::Number(number)
    }
}

impl From<bool> for Value {
    fn from(boolean: bool) -> Self {
        Value::Bool(boolean)
    }
}

impl From<String> for Value {
    fn from(string: String) -> Self {
        Value::String(string)
    }
}

impl From<&str> for Value {
    fn from(string: &str) -> Self {
        Value::String(string.to_owned())
    }
}

impl From<Function> for Value {
    fn from(value: Function) -> Self {
        Value::Function(Rc::new(value))
    }
}

impl From<NativeFunction> for Value {
    fn from(value: NativeFunction) -> Self {
        Value::NativeFunction(Rc::new(value))
    }
}

impl From<Instance> for Value {
    fn from(value: Instance) -> Self {
        Value::Instance(Rc::new(RefCell::new(value)))
    }
}

/// Canonical `print` rendering (spec §4.4).
impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::String(s) => write!(f, "{s}"),
            Value::Function(function) => write!(f, "{function}"),
            Value::NativeFunction(function) => write!(f, "{function}"),
            Value::Class(class) => write!(f, "{}", class.borrow()),
            Value::Instance(instance) => write!(f, "{}", instance.borrow()),
        }
    }
}

/// Integer-valued doubles print without a trailing `.0` (SPEC_FULL.md §5.3
/// Open Question resolution); every other value uses the default float
/// formatting.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Implemented by anything invocable from a `Call` expression: user
/// functions, native functions, and classes (whose call constructs an
/// instance).
pub trait Callable: Debug {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Value>) -> Result<Value, RuntimeError>;
    fn arity(&self) -> usize;
}
