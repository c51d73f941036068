use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use regex::{Regex, RegexBuilder};

use crate::error::{XppError, XppResult};
use crate::scanner::Token;
use crate::token_type::TokenType::*;
use crate::version::Version;

/// A value an expression operand resolves to.
#[derive(Debug, Clone)]
pub enum Value {
    Str(String),
    Version(Version),
    Regex(Regex),
}

impl Value {
    /// Compiles `pattern` into a case-insensitive regex value.
    pub fn regex(pattern: &str) -> Result<Value, regex::Error> {
        case_insensitive_regex(pattern).map(Value::Regex)
    }

    /// Three-way comparison, defined only between two values of the same ordered kind.
    /// Strings compare ordinally ignoring case.
    ///
    /// `None` means the values cannot be ordered against each other.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Str(left), Value::Str(right)) => Some(compare_ignore_case(left, right)),
            (Value::Version(left), Value::Version(right)) => Some(left.cmp(right)),
            _ => None,
        }
    }

    /// Whether values of this kind carry an ordering at all.
    pub fn is_ordered(&self) -> bool {
        matches!(self, Value::Str(_) | Value::Version(_))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Version(_) => "version",
            Value::Regex(_) => "regex",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Str(left), Value::Str(right)) => left == right,
            (Value::Version(left), Value::Version(right)) => left == right,
            (Value::Regex(left), Value::Regex(right)) => left.as_str() == right.as_str(),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            Value::Str(s) => write!(f, "{}", s),
            Value::Version(v) => write!(f, "{}", v),
            Value::Regex(r) => write!(f, "{}", r.as_str()),
        }
    }
}

pub fn case_insensitive_regex(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

fn compare_ignore_case(left: &str, right: &str) -> Ordering {
    left.chars()
        .flat_map(char::to_uppercase)
        .cmp(right.chars().flat_map(char::to_uppercase))
}

/// Whether `name` can be bound in a `RuntimeValues`: letter ( letter | digit | '_' )*
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
        _ => false,
    }
}

/// The environment identifiers are looked up in. Filled once before any expression is
/// evaluated. Names are case-sensitive.
#[derive(Debug, Clone, Default)]
pub struct RuntimeValues {
    values: HashMap<String, Value>,
}

impl RuntimeValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `value`. Fails for names that are not identifiers and for names that are
    /// already bound.
    pub fn add(&mut self, name: &str, value: Value) -> XppResult<()> {
        if !is_identifier(name) {
            return Err(XppError::config(format!("'{}' is not a valid identifier", name)))
        }
        if self.values.contains_key(name) {
            return Err(XppError::config(format!("'{}' is already defined", name)))
        }
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    pub fn add_str(&mut self, name: &str, value: impl Into<String>) -> XppResult<()> {
        self.add(name, Value::Str(value.into()))
    }

    pub fn add_version(&mut self, name: &str, version: &str) -> XppResult<()> {
        let version = version.parse::<Version>().map_err(|e| XppError::config(e.to_string()))?;
        self.add(name, Value::Version(version))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Turns an operand token into its value: identifiers are looked up, string literals stand
    /// for themselves, version literals are parsed and regex literals compiled.
    ///
    /// # Panics
    ///
    /// Panics for tokens that are not operands. The parser never builds such an operand.
    pub fn resolve(&self, token: &Token) -> XppResult<Value> {
        match token.variant {
            Identifier => self
                .get(&token.lexeme)
                .cloned()
                .ok_or_else(|| XppError::eval(format!("Unknown identifier '{}'", token.lexeme), token.span())),
            StringLiteral => Ok(Value::Str(token.lexeme.clone())),
            VersionLiteral => token
                .lexeme
                .parse::<Version>()
                .map(Value::Version)
                .map_err(|e| XppError::eval(e.to_string(), token.span())),
            RegexLiteral => Value::regex(&token.lexeme)
                .map_err(|e| XppError::eval(format!("Invalid regular expression: {}", e), token.span())),
            other => panic!("cannot resolve a value for a {} token", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(variant: crate::token_type::TokenType, lexeme: &str) -> Token {
        Token { variant, lexeme: lexeme.to_string(), offset: 0, length: lexeme.len() }
    }

    #[test]
    fn test_identifier_names() {
        for name in ["a", "Foo", "x_1", "ABC_def_9"] {
            assert!(is_identifier(name), "Expected {:?} to be accepted", name);
        }
        for name in ["", "1a", "_a", "a-b", "a b", "ä"] {
            assert!(!is_identifier(name), "Expected {:?} to be rejected", name);
        }
    }

    #[test]
    fn test_add_rejects_invalid_and_duplicate_names() {
        let mut values = RuntimeValues::new();
        assert!(values.add_str("product", "writer").is_ok());
        assert!(matches!(values.add_str("product", "other"), Err(XppError::Config(_))));
        assert!(matches!(values.add_str("9lives", "x"), Err(XppError::Config(_))));
        assert!(matches!(values.add_version("version", "1"), Err(XppError::Config(_))));
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let mut values = RuntimeValues::new();
        values.add_str("Foo", "upper").unwrap();
        values.add_str("foo", "lower").unwrap();
        assert_eq!(values.resolve(&token(Identifier, "Foo")).unwrap(), Value::Str("upper".into()));
        assert_eq!(values.resolve(&token(Identifier, "foo")).unwrap(), Value::Str("lower".into()));
        assert!(values.resolve(&token(Identifier, "FOO")).is_err());
    }

    #[test]
    fn test_resolve_literals() {
        let values = RuntimeValues::new();
        assert_eq!(values.resolve(&token(StringLiteral, "abc'd")).unwrap(), Value::Str("abc'd".into()));
        assert_eq!(
            values.resolve(&token(VersionLiteral, "1.2")).unwrap(),
            Value::Version("1.2".parse().unwrap())
        );
        assert!(matches!(values.resolve(&token(VersionLiteral, "1..2")), Err(XppError::Eval { .. })));
        assert!(matches!(values.resolve(&token(RegexLiteral, "(")), Err(XppError::Eval { .. })));

        match values.resolve(&token(RegexLiteral, "a/b")).unwrap() {
            Value::Regex(regex) => assert!(regex.is_match("xA/Bx")),
            other => panic!("Expected regex, got {:?}", other),
        }
    }

    #[test]
    #[should_panic]
    fn test_resolve_operator_panics() {
        let _ = RuntimeValues::new().resolve(&token(Equal, "EQ"));
    }

    #[test]
    fn test_compare() {
        let a = Value::Str("abc".into());
        let b = Value::Str("ABD".into());
        let v1 = Value::Version("2.0".parse().unwrap());
        let v2 = Value::Version("10.0".parse().unwrap());
        let r = Value::regex("x").unwrap();

        assert_eq!(a.compare(&b), Some(Ordering::Less));
        assert_eq!(Value::Str("X".into()).compare(&Value::Str("x".into())), Some(Ordering::Equal));
        assert_eq!(v1.compare(&v2), Some(Ordering::Less));
        assert_eq!(a.compare(&v1), None);
        assert_eq!(r.compare(&r), None);
        assert!(!r.is_ordered());
    }
}
