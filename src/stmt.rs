use crate::expr::Expr;
use crate::token::Token;

/// Statement AST as a tagged union, generalizing the teacher's `Stmt` enum
/// (already a sum type for its two original variants) to the full grammar
/// in spec.md §3/§4.2. Immutable after parsing.
#[derive(Debug, Clone)]
pub enum Stmt {
    Expression { expr: Expr },
    Print { expr: Expr },
    Var { name: Token, initializer: Option<Expr> },
    Block { statements: Vec<Stmt> },
    If { condition: Expr, then_branch: Box<Stmt>, else_branch: Option<Box<Stmt>> },
    /// `increment` carries the for-loop's increment clause when this `While`
    /// is the desugared form of a `for` statement (spec §4.2): evaluated
    /// after the body on every iteration, including when the body exits via
    /// `continue`.
    While { condition: Expr, body: Box<Stmt>, increment: Option<Expr> },
    Function { name: Token, params: Vec<Token>, body: Vec<Stmt> },
    Return { keyword: Token, value: Option<Expr> },
    Break { keyword: Token },
    Continue { keyword: Token },
    Class { name: Token, methods: Vec<Stmt> },
}
