use std::collections::HashMap;
use std::mem;

use crate::error::ResolveError;
use crate::expr::Expr;
use crate::interpreter::Interpreter;
use crate::stmt::Stmt;
use crate::token::Token;

#[derive(PartialEq)]
enum FunctionType {
    None,
    Function,
    Initializer,
    Method,
}

#[derive(PartialEq)]
enum ClassType {
    None,
    Class,
}

/// A static analysis pass between parsing and evaluation (spec §4.3): for
/// every variable reference, counts how many enclosing blocks separate it
/// from its declaration and records that distance on the interpreter, so
/// `Environment::get` never has to search scope-by-scope at runtime. Also
/// catches the binding errors that can only be seen with the whole scope
/// stack in view (`return` outside a function, re-declaration in one scope).
pub struct Resolver<'a> {
    interpreter: &'a mut Interpreter,
    scopes: Vec<HashMap<String, bool>>,
    current_function: FunctionType,
    current_class: ClassType,
    errors: Vec<ResolveError>,
}

impl<'a> Resolver<'a> {
    pub fn new(interpreter: &'a mut Interpreter) -> Self {
        Resolver {
            interpreter,
            scopes: vec![],
            current_function: FunctionType::None,
            current_class: ClassType::None,
            errors: vec![],
        }
    }

    /// Resolves every top-level statement, returning every binding error
    /// found. Unlike parsing, resolution never aborts early on error — every
    /// statement is still visited so the interpreter's `locals` table is
    /// complete for whatever the caller chooses to do with a partially
    /// invalid program.
    pub fn resolve(mut self, statements: &[Stmt]) -> Vec<ResolveError> {
        self.resolve_statements(statements);
        self.errors
    }

    fn resolve_statements(&mut self, statements: &[Stmt]) {
        for statement in statements {
            self.resolve_stmt(statement);
        }
    }

    fn resolve_function(&mut self, params: &[Token], body: &[Stmt], r#type: FunctionType) {
        let enclosing_function = mem::replace(&mut self.current_function, r#type);

        self.begin_scope();
        for param in params {
            self.declare(param);
            self.define(param);
        }
        self.resolve_statements(body);
        self.end_scope();

        self.current_function = enclosing_function;
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: &Token) {
        let Some(scope) = self.scopes.last_mut() else { return };

        if scope.contains_key(&name.lexeme) {
            self.errors.push(ResolveError {
                token: name.clone(),
                message: format!("Already a variable with name '{}' in this scope.", name.lexeme),
            });
        }

        scope.insert(name.lexeme.clone(), false);
    }

    fn define(&mut self, name: &Token) {
        let Some(scope) = self.scopes.last_mut() else { return };
        scope.insert(name.lexeme.clone(), true);
    }

    fn resolve_local(&mut self, name: &Token) {
        for (i, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name.lexeme) {
                self.interpreter.resolve(name, i);
                return;
            }
        }
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Variable { name } => {
                if let Some(scope) = self.scopes.last() {
                    if scope.get(&name.lexeme) == Some(&false) {
                        self.errors.push(ResolveError {
                            token: name.clone(),
                            message: "Can't read local variable in its own initializer.".to_string(),
                        });
                    }
                }

                self.resolve_local(name);
            }
            Expr::Assign { name, value } => {
                self.resolve_expr(value);
                self.resolve_local(name);
            }
            Expr::Literal { .. } => {}
            Expr::Logical { left, right, .. } | Expr::Binary { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }
            Expr::Unary { right, .. } => self.resolve_expr(right),
            Expr::Grouping { inner } => self.resolve_expr(inner),
            Expr::Ternary { cond, then, otherwise, .. } => {
                self.resolve_expr(cond);
                self.resolve_expr(then);
                self.resolve_expr(otherwise);
            }
            Expr::Call { callee, arguments, .. } => {
                self.resolve_expr(callee);
                for argument in arguments {
                    self.resolve_expr(argument);
                }
            }
            Expr::Get { object, .. } => self.resolve_expr(object),
            Expr::Set { object, value, .. } => {
                self.resolve_expr(value);
                self.resolve_expr(object);
            }
            Expr::This { keyword } => {
                if self.current_class == ClassType::None {
                    self.errors.push(ResolveError {
                        token: keyword.clone(),
                        message: "Cannot use 'this' outside of a class.".to_string(),
                    });
                    return;
                }

                self.resolve_local(keyword);
            }
        }
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block { statements } => {
                self.begin_scope();
                self.resolve_statements(statements);
                self.end_scope();
            }
            Stmt::Var { name, initializer } => {
                self.declare(name);
                if let Some(initializer) = initializer {
                    self.resolve_expr(initializer);
                }
                self.define(name);
            }
            Stmt::Function { name, params, body } => {
                self.declare(name);
                self.define(name);
                self.resolve_function(params, body, FunctionType::Function);
            }
            Stmt::Expression { expr } => self.resolve_expr(expr),
            Stmt::If { condition, then_branch, else_branch } => {
                self.resolve_expr(condition);
                self.resolve_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.resolve_stmt(else_branch);
                }
            }
            Stmt::Print { expr } => self.resolve_expr(expr),
            Stmt::Return { keyword, value } => {
                if self.current_function == FunctionType::None {
                    self.errors.push(ResolveError {
                        token: keyword.clone(),
                        message: "Cannot return from top-level code.".to_string(),
                    });
                }

                if let Some(value) = value {
                    if self.current_function == FunctionType::Initializer {
                        self.errors.push(ResolveError {
                            token: keyword.clone(),
                            message: "Cannot return a value from an initializer.".to_string(),
                        });
                        return;
                    }

                    self.resolve_expr(value);
                }
            }
            Stmt::Break { .. } | Stmt::Continue { .. } => {}
            Stmt::While { condition, body, increment } => {
                self.resolve_expr(condition);
                self.resolve_stmt(body);
                if let Some(increment) = increment {
                    self.resolve_expr(increment);
                }
            }
            Stmt::Class { name, methods } => {
                let enclosing_class = mem::replace(&mut self.current_class, ClassType::Class);

                self.declare(name);
                self.define(name);

                self.begin_scope();
                self.scopes.last_mut().expect("scope just pushed").insert("this".to_string(), true);

                for method in methods {
                    let Stmt::Function { name: method_name, params, body } = method else {
                        unreachable!("class body only ever contains Stmt::Function")
                    };

                    let kind = if method_name.lexeme == "init" {
                        FunctionType::Initializer
                    } else {
                        FunctionType::Method
                    };

                    self.resolve_function(params, body, kind);
                }

                self.end_scope();

                self.current_class = enclosing_class;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::scanner::Scanner;

    fn resolve_errors(source: &str) -> Vec<ResolveError> {
        let (tokens, _) = Scanner::new(source).scan_tokens();
        let (statements, parse_errors) = Parser::new(tokens).parse();
        assert!(parse_errors.is_empty(), "unexpected parse errors: {parse_errors:?}");

        let mut interpreter = Interpreter::new();
        Resolver::new(&mut interpreter).resolve(&statements)
    }

    #[test]
    fn self_referential_initializer_is_rejected() {
        let errors = resolve_errors("{ var a = a; }");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn shadowing_in_nested_scope_is_allowed() {
        let errors = resolve_errors("var a = 1; { var a = 2; print a; }");
        assert!(errors.is_empty());
    }

    #[test]
    fn duplicate_declaration_in_one_scope_is_rejected() {
        let errors = resolve_errors("{ var a = 1; var a = 2; }");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn return_outside_function_is_rejected() {
        let errors = resolve_errors("return 1;");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn this_outside_class_is_rejected() {
        let errors = resolve_errors("print this;");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn value_returning_initializer_is_rejected() {
        let errors = resolve_errors("class Foo { init() { return 1; } }");
        assert_eq!(errors.len(), 1);
    }
}
