use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Write};
use std::rc::Rc;

use crate::class::{Class, Instance};
use crate::environment::Environment;
use crate::error::{Outcome, RuntimeError, Signal, Unwind};
use crate::expr::Expr;
use crate::function::{Function, NativeFunction};
use crate::object::Value;
use crate::stmt::Stmt;
use crate::token::{Token, TokenType};

/// Walks the AST and evaluates it (spec §4.4). `globals` is the outermost
/// environment and never goes away; `environment` is the currently active
/// scope and is swapped out (and restored) around every block. `locals`
/// holds the resolver's scope-distance table, keyed by the exact `Token`
/// each `Variable`/`Assign`/`This` expression carries.
pub struct Interpreter {
    pub globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<Token, usize>,
    output: Box<dyn Write>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_output(Box::new(io::stdout()))
    }

    /// Builds an interpreter that writes `print` output to `output` instead
    /// of stdout, so a driver can capture it for tests (spec §2 ambient
    /// stack: writer injection, mirroring the teacher's test harness).
    pub fn with_output(output: Box<dyn Write>) -> Self {
        let globals = Rc::new(RefCell::new(Environment::default()));

        for (name, native) in NativeFunction::globals() {
            globals.borrow_mut().define(&name.lexeme, Value::from(native));
        }

        Interpreter { globals: Rc::clone(&globals), environment: globals, locals: HashMap::new(), output }
    }

    /// Records that `name` resolves to an enclosing scope `depth` blocks out
    /// (spec §4.3). Called by the resolver, never by the interpreter itself.
    pub fn resolve(&mut self, name: &Token, depth: usize) {
        self.locals.insert(name.clone(), depth);
    }

    /// Executes a parsed program from the top. A `RuntimeError` aborts the
    /// remaining statements; a `Signal` escaping to this level is a bug
    /// elsewhere (the resolver guarantees `return`/`break`/`continue` are
    /// always caught by an enclosing function or loop).
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        for statement in statements {
            match self.execute(statement) {
                Ok(()) => {}
                Err(Unwind::Error(error)) => return Err(error),
                Err(Unwind::Signal(signal)) => {
                    unreachable!("a top-level {signal:?} should have been rejected by the resolver")
                }
            }
        }

        Ok(())
    }

    pub(crate) fn execute_block(&mut self, statements: &[Stmt], environment: Rc<RefCell<Environment>>) -> Outcome<()> {
        let previous = std::mem::replace(&mut self.environment, environment);

        let result = statements.iter().try_for_each(|stmt| self.execute(stmt));

        self.environment = previous;
        result
    }

    fn execute(&mut self, stmt: &Stmt) -> Outcome<()> {
        match stmt {
            Stmt::Expression { expr } => {
                self.evaluate(expr)?;
                Ok(())
            }
            Stmt::Print { expr } => {
                let value = self.evaluate(expr)?;
                writeln!(self.output, "{value}").expect("writing to the configured output should not fail");
                Ok(())
            }
            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };

                self.environment.borrow_mut().define(&name.lexeme, value);
                Ok(())
            }
            Stmt::Block { statements } => {
                let scope = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.environment)))));
                self.execute_block(statements, scope)
            }
            Stmt::If { condition, then_branch, else_branch } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(())
                }
            }
            Stmt::While { condition, body, increment } => {
                while self.evaluate(condition)?.is_truthy() {
                    match self.execute(body) {
                        Ok(()) => {}
                        Err(Unwind::Signal(Signal::Break)) => break,
                        Err(Unwind::Signal(Signal::Continue)) => {}
                        Err(other) => return Err(other),
                    }

                    if let Some(increment) = increment {
                        self.evaluate(increment)?;
                    }
                }

                Ok(())
            }
            Stmt::Function { name, .. } => {
                let function = Function::new(stmt, Rc::clone(&self.environment), false);
                self.environment.borrow_mut().define(&name.lexeme, Value::from(function));
                Ok(())
            }
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };

                Err(Signal::Return(value).into())
            }
            Stmt::Break { .. } => Err(Signal::Break.into()),
            Stmt::Continue { .. } => Err(Signal::Continue.into()),
            Stmt::Class { name, methods } => {
                self.environment.borrow_mut().define(&name.lexeme, Value::Nil);

                let mut method_table = HashMap::new();
                for method in methods {
                    let Stmt::Function { name: method_name, .. } = method else {
                        unreachable!("class body only ever contains Stmt::Function")
                    };

                    let is_initializer = method_name.lexeme == "init";
                    let function = Function::new(method, Rc::clone(&self.environment), is_initializer);
                    method_table.insert(method_name.lexeme.clone(), function);
                }

                let class = Value::Class(Rc::new(RefCell::new(Class::new(name.lexeme.clone(), method_table))));
                self.environment.borrow_mut().assign(name, class)?;
                Ok(())
            }
        }
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal { value } => Ok(value.clone()),
            Expr::Grouping { inner } => self.evaluate(inner),
            Expr::Unary { operator, right } => {
                let right = self.evaluate(right)?;

                match operator.r#type {
                    TokenType::Minus => Ok(Value::Number(-as_number(&right, operator)?)),
                    TokenType::Bang => Ok(Value::Bool(!right.is_truthy())),
                    _ => unreachable!("unary operator token is always '-' or '!'"),
                }
            }
            Expr::Binary { left, operator, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                self.evaluate_binary(operator, left, right)
            }
            Expr::Ternary { cond, then, otherwise, .. } => {
                if self.evaluate(cond)?.is_truthy() {
                    self.evaluate(then)
                } else {
                    self.evaluate(otherwise)
                }
            }
            Expr::Variable { name } => self.look_up_variable(name),
            Expr::Assign { name, value } => {
                let value = self.evaluate(value)?;

                match self.locals.get(name) {
                    Some(&distance) => self.environment.borrow_mut().assign_at(distance, name, value.clone()),
                    None => self.globals.borrow_mut().assign(name, value.clone())?,
                }

                Ok(value)
            }
            Expr::Logical { left, operator, right } => {
                let left = self.evaluate(left)?;

                match operator.r#type {
                    TokenType::Or if left.is_truthy() => Ok(left),
                    TokenType::And if !left.is_truthy() => Ok(left),
                    _ => self.evaluate(right),
                }
            }
            Expr::Call { callee, paren, arguments } => {
                let callee_value = self.evaluate(callee)?;

                let arguments = arguments.iter().map(|arg| self.evaluate(arg)).collect::<Result<Vec<_>, _>>()?;

                if let Some(arity) = callee_value.arity() {
                    if arguments.len() != arity {
                        return Err(RuntimeError::new(
                            paren.clone(),
                            format!("Expected {arity} arguments but got {}.", arguments.len()),
                        ));
                    }
                }

                match callee_value.call(self, arguments) {
                    Some(result) => result,
                    None => Err(RuntimeError::new(paren.clone(), "Can only call functions and classes.".to_string())),
                }
            }
            Expr::Get { object, name } => {
                let object = self.evaluate(object)?;

                match &object {
                    Value::Instance(instance) => instance.borrow().get(name, &object),
                    _ => Err(RuntimeError::new(name.clone(), "Only instances have properties.".to_string())),
                }
            }
            Expr::Set { object, name, value } => {
                let object = self.evaluate(object)?;

                match object {
                    Value::Instance(instance) => {
                        let value = self.evaluate(value)?;
                        instance.borrow_mut().set(name, value.clone());
                        Ok(value)
                    }
                    _ => Err(RuntimeError::new(name.clone(), "Only instances have fields.".to_string())),
                }
            }
            Expr::This { keyword } => self.look_up_variable(keyword),
        }
    }

    fn evaluate_binary(&self, operator: &Token, left: Value, right: Value) -> Result<Value, RuntimeError> {
        match operator.r#type {
            TokenType::Greater => {
                let (l, r) = as_numbers(&left, &right, operator)?;
                Ok(Value::Bool(l > r))
            }
            TokenType::GreaterEqual => {
                let (l, r) = as_numbers(&left, &right, operator)?;
                Ok(Value::Bool(l >= r))
            }
            TokenType::Less => {
                let (l, r) = as_numbers(&left, &right, operator)?;
                Ok(Value::Bool(l < r))
            }
            TokenType::LessEqual => {
                let (l, r) = as_numbers(&left, &right, operator)?;
                Ok(Value::Bool(l <= r))
            }
            TokenType::BangEqual => Ok(Value::Bool(left != right)),
            TokenType::EqualEqual => Ok(Value::Bool(left == right)),
            TokenType::Minus => {
                let (l, r) = as_numbers(&left, &right, operator)?;
                Ok(Value::Number(l - r))
            }
            TokenType::Star => {
                let (l, r) = as_numbers(&left, &right, operator)?;
                Ok(Value::Number(l * r))
            }
            TokenType::Slash => {
                let (l, r) = as_numbers(&left, &right, operator)?;
                if r == 0.0 {
                    return Err(RuntimeError::new(operator.clone(), "Invalid division by zero.".to_string()));
                }
                Ok(Value::Number(l / r))
            }
            TokenType::Plus => match (left, right) {
                (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l + r)),
                (Value::String(l), Value::String(r)) => Ok(Value::String(l + &r)),
                _ => Err(RuntimeError::new(
                    operator.clone(),
                    "Operands must be two numbers or two strings.".to_string(),
                )),
            },
            _ => unreachable!("binary operator token is always one of the above"),
        }
    }

    fn look_up_variable(&self, name: &Token) -> Result<Value, RuntimeError> {
        match self.locals.get(name) {
            Some(&distance) => self.environment.borrow().get_at(distance, name),
            None => self.globals.borrow().get(name),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Operand check for unary `-` (spec §4.4: "Operand must be a number.",
/// singular — distinct from the binary operators' plural wording below).
fn as_number(value: &Value, operator: &Token) -> Result<f64, RuntimeError> {
    match value {
        Value::Number(n) => Ok(*n),
        _ => Err(RuntimeError::new(operator.clone(), "Operand must be a number.".to_string())),
    }
}

/// Operand check shared by binary arithmetic/comparison operators (spec
/// §4.4: "Operands must be numbers.", plural).
fn as_numbers(left: &Value, right: &Value, operator: &Token) -> Result<(f64, f64), RuntimeError> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => Ok((*l, *r)),
        _ => Err(RuntimeError::new(operator.clone(), "Operands must be numbers.".to_string())),
    }
}
