use crate::error::XppResult;
use crate::expr::Expr;
use crate::runtime::{RuntimeValues, Value};
use crate::scanner::Token;
use crate::token_type::TokenType;

/// An entry on the parser stack: a token that was shifted as is, or an expression that a
/// reduction produced.
#[derive(Debug, Clone)]
pub enum StackSymbol {
    Token(Token),
    Expr(Box<Expr>),
}

impl StackSymbol {
    /// The token kind of a shifted token, `Production` for a reduced expression.
    pub fn kind(&self) -> TokenType {
        match self {
            StackSymbol::Token(token) => token.variant,
            StackSymbol::Expr(_) => TokenType::Production,
        }
    }

    pub fn is_expr(&self) -> bool {
        matches!(self, StackSymbol::Expr(_))
    }

    /// Resolves an operand token against `values`.
    ///
    /// # Panics
    ///
    /// Panics for reduced expressions and for tokens that are not operands.
    pub fn resolve(&self, values: &RuntimeValues) -> XppResult<Value> {
        match self {
            StackSymbol::Token(token) => {
                assert!(token.variant.is_value(), "cannot resolve a value for a {} token", token.variant);
                values.resolve(token)
            }
            StackSymbol::Expr(expr) => panic!("cannot resolve a value for expression {:?}", expr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_is_expr() {
        let token = StackSymbol::Token(Token {
            variant: TokenType::StringLiteral,
            lexeme: "a".to_string(),
            offset: 0,
            length: 3,
        });
        let expr = StackSymbol::Expr(Box::new(Expr::BoolLiteral { value: true }));

        assert_eq!(token.kind(), TokenType::StringLiteral);
        assert!(!token.is_expr());
        assert_eq!(expr.kind(), TokenType::Production);
        assert!(expr.is_expr());
        assert_eq!(token.resolve(&RuntimeValues::new()).unwrap(), Value::Str("a".to_string()));
    }

    #[test]
    #[should_panic]
    fn test_resolving_expression_panics() {
        let _ = StackSymbol::Expr(Box::new(Expr::BoolLiteral { value: false })).resolve(&RuntimeValues::new());
    }
}
