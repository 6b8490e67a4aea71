use crate::error::ParseError;
use crate::expr::Expr;
use crate::object::Value;
use crate::stmt::Stmt;
use crate::token::{Token, TokenType};

type ParseResult<T> = Result<T, ParseError>;

/// Returns whether the next token is any of the given types, consuming it if so.
macro_rules! matches {
    ( $self:ident, $( $type:expr ),+ ) => {
        {
            if $( $self.check($type) )||* {
                $self.advance();
                true
            } else {
                false
            }
        }
    }
}

/// Recursive-descent parser producing the tagged-union AST (spec §4.2).
///
/// - Program      -> Declaration* Eof ;
/// - Declaration  -> ClassDecl | FunDecl | VarDecl | Statement ;
/// - ClassDecl    -> "class" IDENTIFIER "{" Function* "}" ;
/// - FunDecl      -> "fun" Function ;
/// - VarDecl      -> "var" IDENTIFIER ( "=" Expression )? ";" ;
/// - Function     -> IDENTIFIER "(" Parameters? ")" Block ;
/// - Parameters   -> IDENTIFIER ( "," IDENTIFIER )* ;
/// - Statement    -> ExprStmt | ForStmt | IfStmt | PrintStmt | ReturnStmt
///                  | BreakStmt | ContinueStmt | WhileStmt | Block ;
/// - ExprStmt     -> Expression ";" ;
/// - ForStmt      -> "for" "(" ( VarDecl | ExprStmt | ";" ) Expression? ";" Expression? ")" Statement ;
/// - IfStmt       -> "if" "(" Expression ")" Statement ( "else" Statement )? ;
/// - PrintStmt    -> "print" Expression ";" ;
/// - ReturnStmt   -> "return" Expression? ";" ;
/// - BreakStmt    -> "break" ";" ;
/// - ContinueStmt -> "continue" ";" ;
/// - WhileStmt    -> "while" "(" Expression ")" Statement ;
/// - Expression   -> Assignment ;
/// - Assignment   -> ( Call "." )? IDENTIFIER "=" Assignment | Conditional ;
/// - Conditional  -> LogicOr ( "?" LogicOr ":" LogicOr )* ;
/// - LogicOr      -> LogicAnd ( "or" LogicAnd )* ;
/// - LogicAnd     -> Equality ( "and" Equality )* ;
/// - Equality     -> Comparison ( ( "!=" | "==" ) Comparison )* ;
/// - Comparison   -> Term ( ( ">" | ">=" | "<" | "<=" ) Term )* ;
/// - Term         -> Factor ( ( "+" | "-" ) Factor )* ;
/// - Factor       -> Unary ( ( "*" | "/" ) Unary )* ;
/// - Unary        -> ( "!" | "-" ) Unary | Call ;
/// - Arguments    -> Expression ( "," Expression )* ;
/// - Call         -> Primary ( "(" Arguments? ")" | "." IDENTIFIER )* ;
/// - Primary      -> NUMBER | STRING | "false" | "true" | "nil" | "this"
///                  | "(" Expression ")" | IDENTIFIER ;
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    loop_depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, current: 0, loop_depth: 0 }
    }

    /// Parses the whole token stream, collecting every declaration that
    /// parses and every error encountered along the way (spec §7: the parser
    /// reports as many syntax errors as it can in one pass via `synchronize`).
    pub fn parse(mut self) -> (Vec<Stmt>, Vec<ParseError>) {
        let mut statements = Vec::new();
        let mut errors = Vec::new();

        while !self.is_at_end() {
            match self.declaration() {
                Ok(stmt) => statements.push(stmt),
                Err(error) => {
                    errors.push(error);
                    self.synchronize();
                }
            }
        }

        (statements, errors)
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn is_at_end(&self) -> bool {
        self.peek().r#type == TokenType::Eof
    }

    fn check(&self, r#type: TokenType) -> bool {
        if self.is_at_end() {
            return false;
        }

        self.peek().r#type == r#type
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }

        self.previous()
    }

    fn consume(&mut self, r#type: TokenType, message: &str) -> ParseResult<Token> {
        if self.check(r#type) {
            return Ok(self.advance().clone());
        }

        Err(ParseError { token: self.peek().clone(), message: message.to_string() })
    }

    fn declaration(&mut self) -> ParseResult<Stmt> {
        if matches!(self, TokenType::Class) {
            return self.class_declaration();
        }

        if matches!(self, TokenType::Fun) {
            return self.function("function");
        }

        if matches!(self, TokenType::Var) {
            return self.var_declaration();
        }

        self.statement()
    }

    fn class_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(TokenType::Identifier, "Expect class name.")?;

        self.consume(TokenType::LeftBrace, "Expect '{' before class body.")?;

        let mut methods = Vec::new();
        while !self.check(TokenType::RightBrace) && !self.is_at_end() {
            methods.push(self.function("method")?);
        }

        self.consume(TokenType::RightBrace, "Expect '}' after class body.")?;

        Ok(Stmt::Class { name, methods })
    }

    fn var_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(TokenType::Identifier, "Expect variable name.")?;

        let initializer = if matches!(self, TokenType::Equal) { Some(self.expression()?) } else { None };

        self.consume(TokenType::Semicolon, "Expect ';' after variable declaration.")?;
        Ok(Stmt::Var { name, initializer })
    }

    fn statement(&mut self) -> ParseResult<Stmt> {
        if matches!(self, TokenType::For) {
            return self.for_statement();
        }

        if matches!(self, TokenType::If) {
            return self.if_statement();
        }

        if matches!(self, TokenType::Print) {
            return self.print_statement();
        }

        if matches!(self, TokenType::Return) {
            return self.return_statement();
        }

        if matches!(self, TokenType::Break) {
            return self.break_statement();
        }

        if matches!(self, TokenType::Continue) {
            return self.continue_statement();
        }

        if matches!(self, TokenType::While) {
            return self.while_statement();
        }

        if matches!(self, TokenType::LeftBrace) {
            return Ok(Stmt::Block { statements: self.block()? });
        }

        self.expression_statement()
    }

    fn for_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenType::LeftParen, "Expect '(' after 'for'.")?;

        let initializer = if matches!(self, TokenType::Semicolon) {
            None
        } else if matches!(self, TokenType::Var) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition = if !self.check(TokenType::Semicolon) { Some(self.expression()?) } else { None };
        self.consume(TokenType::Semicolon, "Expect ';' after loop condition.")?;

        let increment = if !self.check(TokenType::RightParen) { Some(self.expression()?) } else { None };
        self.consume(TokenType::RightParen, "Expect ')' after loop clauses.")?;

        self.loop_depth += 1;
        let body_result = self.statement();
        self.loop_depth -= 1;
        let body = body_result?;

        // Desugars into a `While` carrying the increment, so `continue`
        // still runs it (spec §4.2: for-loop desugaring).
        let mut body = Stmt::While {
            condition: condition.unwrap_or(Expr::Literal { value: Value::Bool(true) }),
            body: Box::new(body),
            increment,
        };

        if let Some(initializer) = initializer {
            body = Stmt::Block { statements: vec![initializer, body] };
        }

        Ok(body)
    }

    fn if_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenType::LeftParen, "Expect '(' after 'if'.")?;
        let condition = self.expression()?;
        self.consume(TokenType::RightParen, "Expect ')' after if condition.")?;

        let then_branch = Box::new(self.statement()?);
        let else_branch =
            if matches!(self, TokenType::Else) { Some(Box::new(self.statement()?)) } else { None };

        Ok(Stmt::If { condition, then_branch, else_branch })
    }

    fn print_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.consume(TokenType::Semicolon, "Expect ';' after value.")?;
        Ok(Stmt::Print { expr })
    }

    fn return_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();

        let value = if !self.check(TokenType::Semicolon) { Some(self.expression()?) } else { None };

        self.consume(TokenType::Semicolon, "Expect ';' after return value.")?;
        Ok(Stmt::Return { keyword, value })
    }

    fn break_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();

        if self.loop_depth == 0 {
            return Err(ParseError { token: keyword, message: "Cannot use 'break' outside of a loop.".to_string() });
        }

        self.consume(TokenType::Semicolon, "Expect ';' after 'break'.")?;
        Ok(Stmt::Break { keyword })
    }

    fn continue_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();

        if self.loop_depth == 0 {
            return Err(ParseError {
                token: keyword,
                message: "Cannot use 'continue' outside of a loop.".to_string(),
            });
        }

        self.consume(TokenType::Semicolon, "Expect ';' after 'continue'.")?;
        Ok(Stmt::Continue { keyword })
    }

    fn while_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenType::LeftParen, "Expect '(' after 'while'.")?;
        let condition = self.expression()?;
        self.consume(TokenType::RightParen, "Expect ')' after condition.")?;

        self.loop_depth += 1;
        let body_result = self.statement();
        self.loop_depth -= 1;

        Ok(Stmt::While { condition, body: Box::new(body_result?), increment: None })
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.consume(TokenType::Semicolon, "Expect ';' after expression.")?;
        Ok(Stmt::Expression { expr })
    }

    fn function(&mut self, kind: &str) -> ParseResult<Stmt> {
        let name = self.consume(TokenType::Identifier, &format!("Expect {kind} name."))?;

        self.consume(TokenType::LeftParen, &format!("Expect '(' after {kind} name."))?;

        let mut params = Vec::new();

        if !self.check(TokenType::RightParen) {
            loop {
                if params.len() >= 255 {
                    return Err(ParseError {
                        token: self.peek().clone(),
                        message: "Cannot have more than 255 parameters.".to_string(),
                    });
                }

                params.push(self.consume(TokenType::Identifier, "Expect parameter name.")?);

                if !matches!(self, TokenType::Comma) {
                    break;
                }
            }
        }

        self.consume(TokenType::RightParen, "Expect ')' after parameters.")?;
        self.consume(TokenType::LeftBrace, &format!("Expect '{{' before {kind} body."))?;

        let body = self.block()?;

        Ok(Stmt::Function { name, params, body })
    }

    fn block(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();

        while !self.check(TokenType::RightBrace) && !self.is_at_end() {
            statements.push(self.declaration()?);
        }

        self.consume(TokenType::RightBrace, "Expect '}' after block.")?;

        Ok(statements)
    }

    fn expression(&mut self) -> ParseResult<Expr> {
        self.assignment()
    }

    fn assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.conditional()?;

        if matches!(self, TokenType::Equal) {
            let equals = self.previous().clone();
            let value = self.assignment()?;

            return match expr {
                Expr::Variable { name } => Ok(Expr::Assign { name, value: Box::new(value) }),
                Expr::Get { object, name } => Ok(Expr::Set { object, name, value: Box::new(value) }),
                _ => Err(ParseError { token: equals, message: "Invalid assignment target.".to_string() }),
            };
        }

        Ok(expr)
    }

    /// Left-associative `cond ? then : otherwise`, slotted above `or` and
    /// below assignment (SPEC_FULL.md §3.1 supplemented feature), using the
    /// same looping idiom as every other binary-precedence rule below it
    /// (`or`, `and`, `equality`, ...) rather than right-recursing — this
    /// matches spec.md §4.2's grammar line (`ternary → logic_or ( "?"
    /// logic_or ":" logic_or )*`) and the chained-`?:` associativity of
    /// `examples/original_source/src/pkg/parser/parser.go`'s `ternary`.
    fn conditional(&mut self) -> ParseResult<Expr> {
        let mut expr = self.or()?;

        while matches!(self, TokenType::Question) {
            let question = self.previous().clone();
            let then = self.or()?;
            let colon = self.consume(TokenType::Colon, "Expect ':' after ternary 'then' branch.")?;
            let otherwise = self.or()?;

            expr = Expr::Ternary {
                cond: Box::new(expr),
                question,
                then: Box::new(then),
                colon,
                otherwise: Box::new(otherwise),
            };
        }

        Ok(expr)
    }

    fn or(&mut self) -> ParseResult<Expr> {
        let mut expr = self.and()?;

        while matches!(self, TokenType::Or) {
            let operator = self.previous().clone();
            let right = self.and()?;
            expr = Expr::Logical { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn and(&mut self) -> ParseResult<Expr> {
        let mut expr = self.equality()?;

        while matches!(self, TokenType::And) {
            let operator = self.previous().clone();
            let right = self.equality()?;
            expr = Expr::Logical { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn equality(&mut self) -> ParseResult<Expr> {
        let mut expr = self.comparison()?;

        while matches!(self, TokenType::BangEqual, TokenType::EqualEqual) {
            let operator = self.previous().clone();
            let right = self.comparison()?;
            expr = Expr::Binary { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> ParseResult<Expr> {
        let mut expr = self.term()?;

        while matches!(self, TokenType::Greater, TokenType::GreaterEqual, TokenType::Less, TokenType::LessEqual) {
            let operator = self.previous().clone();
            let right = self.term()?;
            expr = Expr::Binary { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn term(&mut self) -> ParseResult<Expr> {
        let mut expr = self.factor()?;

        while matches!(self, TokenType::Minus, TokenType::Plus) {
            let operator = self.previous().clone();
            let right = self.factor()?;
            expr = Expr::Binary { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn factor(&mut self) -> ParseResult<Expr> {
        let mut expr = self.unary()?;

        while matches!(self, TokenType::Slash, TokenType::Star) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            expr = Expr::Binary { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        if matches!(self, TokenType::Bang, TokenType::Minus) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            return Ok(Expr::Unary { operator, right: Box::new(right) });
        }

        self.call()
    }

    fn finish_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let mut arguments = Vec::new();

        if !self.check(TokenType::RightParen) {
            loop {
                if arguments.len() >= 255 {
                    return Err(ParseError {
                        token: self.peek().clone(),
                        message: "Cannot have more than 255 arguments.".to_string(),
                    });
                }

                arguments.push(self.expression()?);

                if !matches!(self, TokenType::Comma) {
                    break;
                }
            }
        }

        let paren = self.consume(TokenType::RightParen, "Expect ')' after arguments.")?;

        Ok(Expr::Call { callee: Box::new(callee), paren, arguments })
    }

    fn call(&mut self) -> ParseResult<Expr> {
        let mut expr = self.primary()?;

        loop {
            if matches!(self, TokenType::LeftParen) {
                expr = self.finish_call(expr)?;
            } else if matches!(self, TokenType::Dot) {
                let name = self.consume(TokenType::Identifier, "Expect property name after '.'.")?;
                expr = Expr::Get { object: Box::new(expr), name };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        if matches!(self, TokenType::False) {
            return Ok(Expr::Literal { value: Value::Bool(false) });
        }

        if matches!(self, TokenType::True) {
            return Ok(Expr::Literal { value: Value::Bool(true) });
        }

        if matches!(self, TokenType::Nil) {
            return Ok(Expr::Literal { value: Value::Nil });
        }

        if matches!(self, TokenType::Number, TokenType::String) {
            let literal = self
                .previous()
                .literal
                .clone()
                .expect("number or string token to carry a literal value");

            let value = match literal {
                crate::literal::Literal::Number(n) => Value::Number(n),
                crate::literal::Literal::String(s) => Value::String(s),
            };

            return Ok(Expr::Literal { value });
        }

        if matches!(self, TokenType::This) {
            return Ok(Expr::This { keyword: self.previous().clone() });
        }

        if matches!(self, TokenType::Identifier) {
            return Ok(Expr::Variable { name: self.previous().clone() });
        }

        if matches!(self, TokenType::LeftParen) {
            let expr = self.expression()?;
            self.consume(TokenType::RightParen, "Expect ')' after expression.")?;
            return Ok(Expr::Grouping { inner: Box::new(expr) });
        }

        Err(ParseError { token: self.peek().clone(), message: "Expect expression.".to_string() })
    }

    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().r#type == TokenType::Semicolon {
                return;
            }

            match self.peek().r#type {
                TokenType::Class
                | TokenType::Fun
                | TokenType::Var
                | TokenType::For
                | TokenType::If
                | TokenType::While
                | TokenType::Print
                | TokenType::Return => return,
                _ => {
                    self.advance();
                }
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::Scanner;

    fn parse(source: &str) -> (Vec<Stmt>, Vec<ParseError>) {
        let (tokens, errors) = Scanner::new(source).scan_tokens();
        assert!(errors.is_empty());
        Parser::new(tokens).parse()
    }

    #[test]
    fn parses_chained_ternary_left_associatively() {
        let (statements, errors) = parse("true ? 1 : false ? 2 : 3;");
        assert!(errors.is_empty());
        let Stmt::Expression { expr: Expr::Ternary { cond, .. } } = &statements[0] else {
            panic!("expected a ternary expression")
        };
        assert!(matches!(**cond, Expr::Ternary { .. }), "outer ternary's cond should be the inner ternary");
    }

    #[test]
    fn for_loop_desugars_to_while_with_increment() {
        let (statements, errors) = parse("for (var i = 0; i < 3; i = i + 1) print i;");
        assert!(errors.is_empty());
        let Stmt::Block { statements } = &statements[0] else { panic!("expected block") };
        assert!(matches!(statements[1], Stmt::While { increment: Some(_), .. }));
    }

    #[test]
    fn break_outside_loop_is_a_parse_error() {
        let (_, errors) = parse("break;");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn break_inside_while_is_accepted() {
        let (_, errors) = parse("while (true) { break; }");
        assert!(errors.is_empty());
    }

    #[test]
    fn invalid_assignment_target_is_reported() {
        let (_, errors) = parse("1 = 2;");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn class_with_methods_parses() {
        let (statements, errors) = parse("class Foo { bar() { return 1; } }");
        assert!(errors.is_empty());
        assert!(matches!(statements[0], Stmt::Class { .. }));
    }
}
