use crate::expr::Expr;

/// Returns a canonical fully-parenthesized rendering of an expression tree
/// (spec §8 testable property): every subexpression is wrapped so that
/// precedence is unambiguous from the text alone, independent of how the
/// parser grouped it.
pub fn print(expr: &Expr) -> String {
    match expr {
        Expr::Literal { value } => value.to_string(),
        Expr::Grouping { inner } => parenthesize("group", &[inner]),
        Expr::Unary { operator, right } => parenthesize(&operator.lexeme, &[right]),
        Expr::Binary { left, operator, right } => parenthesize(&operator.lexeme, &[left, right]),
        Expr::Logical { left, operator, right } => parenthesize(&operator.lexeme, &[left, right]),
        Expr::Ternary { cond, then, otherwise, .. } => parenthesize("?:", &[cond, then, otherwise]),
        Expr::Variable { name } => name.lexeme.clone(),
        Expr::Assign { name, value } => parenthesize(&format!("= {}", name.lexeme), &[value]),
        Expr::Call { callee, arguments, .. } => {
            let mut args: Vec<&Expr> = vec![callee];
            args.extend(arguments.iter());
            parenthesize("call", &args)
        }
        Expr::Get { object, name } => parenthesize(&format!(". {}", name.lexeme), &[object]),
        Expr::Set { object, name, value } => parenthesize(&format!("set {}", name.lexeme), &[object, value]),
        Expr::This { .. } => "this".to_string(),
    }
}

fn parenthesize(name: &str, exprs: &[&Expr]) -> String {
    let mut out = String::from("(");
    out.push_str(name);

    for expr in exprs {
        out.push(' ');
        out.push_str(&print(expr));
    }

    out.push(')');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Value;
    use crate::token::{Location, Token, TokenType};

    fn token(r#type: TokenType, lexeme: &str) -> Token {
        Token::new(r#type, lexeme.to_string(), None, Location::new(0, 0))
    }

    #[test]
    fn prints_nested_binary_and_unary_with_full_parenthesization() {
        // -123 * (45.67)
        let expr = Expr::Binary {
            left: Box::new(Expr::Unary {
                operator: token(TokenType::Minus, "-"),
                right: Box::new(Expr::Literal { value: Value::Number(123.0) }),
            }),
            operator: token(TokenType::Star, "*"),
            right: Box::new(Expr::Grouping {
                inner: Box::new(Expr::Literal { value: Value::Number(45.67) }),
            }),
        };

        assert_eq!(print(&expr), "(* (- 123) (group 45.67))");
    }

    #[test]
    fn prints_ternary_with_all_three_branches() {
        let expr = Expr::Ternary {
            cond: Box::new(Expr::Literal { value: Value::Bool(true) }),
            question: token(TokenType::Question, "?"),
            then: Box::new(Expr::Literal { value: Value::Number(1.0) }),
            colon: token(TokenType::Colon, ":"),
            otherwise: Box::new(Expr::Literal { value: Value::Number(2.0) }),
        };

        assert_eq!(print(&expr), "(?: true 1 2)");
    }
}
