use crate::object::Value;
use crate::token::Token;

/// Expression AST as a tagged union (spec §9 REDESIGN FLAG): every consumer
/// (parser, resolver, printer, interpreter) matches exhaustively instead of
/// dispatching through a visitor trait, so adding a new operation — or
/// forgetting to handle a variant somewhere — is a compile error.
#[derive(Debug, Clone)]
pub enum Expr {
    Binary { left: Box<Expr>, operator: Token, right: Box<Expr> },
    Grouping { inner: Box<Expr> },
    Literal { value: Value },
    Unary { operator: Token, right: Box<Expr> },
    Ternary { cond: Box<Expr>, question: Token, then: Box<Expr>, colon: Token, otherwise: Box<Expr> },
    Variable { name: Token },
    Assign { name: Token, value: Box<Expr> },
    Logical { left: Box<Expr>, operator: Token, right: Box<Expr> },
    Call { callee: Box<Expr>, paren: Token, arguments: Vec<Expr> },
    Get { object: Box<Expr>, name: Token },
    Set { object: Box<Expr>, name: Token, value: Box<Expr> },
    This { keyword: Token },
}
