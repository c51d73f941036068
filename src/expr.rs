use std::cmp::Ordering;

use tracing::trace;

use crate::error::{XppError, XppResult};
use crate::runtime::{case_insensitive_regex, RuntimeValues, Value};
use crate::scanner::Token;
use crate::symbol::StackSymbol;
use crate::token_type::TokenType::*;

/// Syntax tree of a conditional expression. Operands stay unresolved until `evaluate`, so one
/// tree can be evaluated against different `RuntimeValues`.
#[derive(Debug, Clone)]
pub enum Expr {
    Not {
        expr: Box<Expr>,
    },
    Composite {
        is_or: bool,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Compare {
        left: StackSymbol,
        operator: Token,
        right: StackSymbol,
    },
    RegexMatch {
        value: StackSymbol,
        operator: Token,
        pattern: StackSymbol,
        negated: bool,
    },
    BoolLiteral {
        value: bool,
    },
}

impl Expr {
    pub fn evaluate(&self, values: &RuntimeValues) -> XppResult<bool> {
        match self {
            Expr::Not { expr } => Ok(!expr.evaluate(values)?),
            Expr::Composite { is_or: true, left, right } => {
                Ok(left.evaluate(values)? || right.evaluate(values)?)
            }
            Expr::Composite { is_or: false, left, right } => {
                Ok(left.evaluate(values)? && right.evaluate(values)?)
            }
            Expr::Compare { left, operator, right } => {
                let left = left.resolve(values)?;
                let right = right.resolve(values)?;
                compare(&left, operator, &right)
            }
            Expr::RegexMatch { value, operator, pattern, negated } => {
                let regex = match pattern.resolve(values)? {
                    Value::Str(text) => case_insensitive_regex(&text).map_err(|e| {
                        XppError::eval(format!("Invalid regular expression: {}", e), operator.span())
                    })?,
                    Value::Regex(regex) => regex,
                    other => {
                        let message = format!("Cannot use a {} value as regular expression", other.type_name());
                        return Err(XppError::eval(message, operator.span()))
                    }
                };
                let text = value.resolve(values)?.to_string();
                let matched = regex.is_match(&text);
                trace!(pattern = regex.as_str(), text = %text, matched, "regex match");
                Ok(matched != *negated)
            }
            Expr::BoolLiteral { value } => Ok(*value),
        }
    }
}

/// Applies a comparison operator. Ordered values of the same kind are compared three-way;
/// values without an ordering only support EQ and NEQ.
fn compare(left: &Value, operator: &Token, right: &Value) -> XppResult<bool> {
    if !left.is_ordered() && !right.is_ordered() {
        return match operator.variant {
            Equal => Ok(left == right),
            NotEqual => Ok(left != right),
            _ => {
                let message = format!(
                    "Operator {} cannot be applied to {} values",
                    operator.lexeme.to_ascii_uppercase(),
                    left.type_name()
                );
                Err(XppError::eval(message, operator.span()))
            }
        }
    }

    let ordering = left.compare(right).ok_or_else(|| {
        let message = format!("Cannot compare a {} value with a {} value", left.type_name(), right.type_name());
        XppError::eval(message, operator.span())
    })?;

    let result = match operator.variant {
        Less => ordering == Ordering::Less,
        LessEqual => ordering != Ordering::Greater,
        Equal => ordering == Ordering::Equal,
        NotEqual => ordering != Ordering::Equal,
        Greater => ordering == Ordering::Greater,
        GreaterEqual => ordering != Ordering::Less,
        other => unreachable!("{} is not a comparison operator", other),
    };
    Ok(result)
}
