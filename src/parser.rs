//! A shift-reduce parser for conditional expressions.
//!
//! Tokens are shifted onto a stack one at a time. After every shift the top of the stack is
//! matched against the reductions below until none applies (position 0 is the top):
//!
//! not        -> NOT expr
//! composite  -> expr ( AND | OR ) expr
//! grouping   -> "(" expr ")"
//! compare    -> operand ( LT | LTE | EQ | NEQ | GT | GTE ) operand
//! regex      -> ( STRING | IDENTIFIER ) ( "=~" | "!~" ) ( IDENTIFIER | REGEX )
//! bool       -> TRUE | FALSE
//!
//! operand    -> IDENTIFIER | STRING | VERSION
//!
//! AND and OR share one precedence level and group from the left as operands arrive, while a
//! NOT applies to the first complete expression after it. The input is valid when EOF leaves
//! exactly one expression on the stack.
//!
//! Examples: "version GTE 16.4", "NOT (product EQ 'writer' OR market =~ /^en-/)"

use tracing::trace;

use crate::error::{XppError, XppResult};
use crate::expr::Expr;
use crate::scanner::{Scanner, Token};
use crate::symbol::StackSymbol;
use crate::token_type::TokenType::{self, *};

/// Scans and parses `source` into an expression tree.
pub fn parse(source: &str) -> XppResult<Expr> {
    Parser::new(Scanner::new(source)).parse()
}

pub struct Parser<'a> {
    scanner: Scanner<'a>,
    stack: Vec<StackSymbol>,
}

impl<'a> Parser<'a> {

    pub fn new(scanner: Scanner<'a>) -> Self {
        Parser {
            scanner,
            stack: Vec::new(),
        }
    }

    /// Consumes the scanner up to EOF and returns the expression tree.
    pub fn parse(mut self) -> XppResult<Expr> {
        loop {
            let token = self.scanner.next_token()?;
            if token.variant == EOF {
                return self.finish(token)
            }

            trace!(token = %token, "shift");
            self.stack.push(StackSymbol::Token(token));
            while self.reduce()? {}
        }
    }

    /// Checks that EOF left exactly one expression on the stack.
    fn finish(mut self, eof: Token) -> XppResult<Expr> {
        match (self.stack.pop(), self.stack.is_empty()) {
            (Some(StackSymbol::Expr(expr)), true) => Ok(*expr),
            _ => Err(XppError::parse("Reached EOF in invalid state", eof.span())),
        }
    }

    /// Attempts a single reduction on the top of the stack. Returns whether one was applied.
    fn reduce(&mut self) -> XppResult<bool> {
        // not -> NOT expr
        if self.is_expr(0) && self.check(1, &[Not]) {
            let expr = self.pop_expr();
            self.pop_token();
            return Ok(self.push_expr(Expr::Not { expr }))
        }

        // composite -> expr ( AND | OR ) expr
        if self.is_expr(0) && self.check(1, &[And, Or]) && self.is_expr(2) {
            let right = self.pop_expr();
            let is_or = self.pop_token().variant == Or;
            let left = self.pop_expr();
            return Ok(self.push_expr(Expr::Composite { is_or, left, right }))
        }

        // grouping -> "(" expr ")"
        if self.check(0, &[RightParen]) {
            if self.is_expr(1) && self.check(2, &[LeftParen]) {
                self.pop_token();
                let expr = self.pop_expr();
                self.pop_token();
                return Ok(self.push_expr(*expr))
            }
            let paren = self.pop_token();
            return Err(XppError::parse("Didn't expect right parenthesis here", paren.span()))
        }

        // compare -> operand ( LT | LTE | EQ | NEQ | GT | GTE ) operand
        if self.is_operand(0) && self.is_comparison(1) && self.is_operand(2) {
            let right = self.pop_symbol();
            let operator = self.pop_token();
            let left = self.pop_symbol();
            return Ok(self.push_expr(Expr::Compare { left, operator, right }))
        }

        // regex -> ( STRING | IDENTIFIER ) ( "=~" | "!~" ) ( IDENTIFIER | REGEX )
        if self.check(0, &[Identifier, RegexLiteral])
            && self.check(1, &[RegexMatch, NotRegexMatch])
            && self.check(2, &[StringLiteral, Identifier])
        {
            let pattern = self.pop_symbol();
            let operator = self.pop_token();
            let value = self.pop_symbol();
            let negated = operator.variant == NotRegexMatch;
            return Ok(self.push_expr(Expr::RegexMatch { value, operator, pattern, negated }))
        }

        // bool -> TRUE | FALSE
        if self.check(0, &[True, False]) {
            let value = self.pop_token().variant == True;
            return Ok(self.push_expr(Expr::BoolLiteral { value }))
        }

        Ok(false)
    }

    /// Kind of the symbol `depth` places below the top of the stack.
    fn peek(&self, depth: usize) -> Option<TokenType> {
        self.stack
            .len()
            .checked_sub(depth + 1)
            .map(|index| self.stack[index].kind())
    }

    fn check(&self, depth: usize, token_types: &[TokenType]) -> bool {
        match self.peek(depth) {
            Some(kind) => token_types.contains(&kind),
            None => false,
        }
    }

    fn is_expr(&self, depth: usize) -> bool {
        self.check(depth, &[Production])
    }

    fn is_operand(&self, depth: usize) -> bool {
        matches!(self.peek(depth), Some(kind) if kind.is_comparable_operand())
    }

    fn is_comparison(&self, depth: usize) -> bool {
        matches!(self.peek(depth), Some(kind) if kind.is_comparison())
    }

    fn push_expr(&mut self, expr: Expr) -> bool {
        trace!(expr = ?expr, depth = self.stack.len(), "reduce");
        self.stack.push(StackSymbol::Expr(Box::new(expr)));
        true
    }

    // The pop helpers are only called after the stack shape was checked.

    fn pop_symbol(&mut self) -> StackSymbol {
        match self.stack.pop() {
            Some(symbol) => symbol,
            None => unreachable!("parser stack underflow"),
        }
    }

    fn pop_token(&mut self) -> Token {
        match self.pop_symbol() {
            StackSymbol::Token(token) => token,
            StackSymbol::Expr(expr) => unreachable!("expected a token, found {:?}", expr),
        }
    }

    fn pop_expr(&mut self) -> Box<Expr> {
        match self.pop_symbol() {
            StackSymbol::Expr(expr) => expr,
            StackSymbol::Token(token) => unreachable!("expected an expression, found {}", token),
        }
    }
}
