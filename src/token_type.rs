#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, strum_macros::EnumIter)]
pub enum TokenType {
    EOF,
    Identifier,
    StringLiteral, VersionLiteral, RegexLiteral,
    LeftParen, RightParen, // ()
    Not, And, Or,
    Less, LessEqual,
    Equal, NotEqual,
    Greater, GreaterEqual,
    RegexMatch, NotRegexMatch, // =~ !~
    True, False,
    Production, // reduced parser symbol, never scanned
}

use TokenType::*;

impl TokenType {
    /// Operators accepted between the two operands of a comparison.
    pub fn is_comparison(self) -> bool {
        matches!(self, Less | LessEqual | Equal | NotEqual | Greater | GreaterEqual)
    }

    /// Kinds that can stand as an operand of a comparison.
    pub fn is_comparable_operand(self) -> bool {
        matches!(self, Identifier | StringLiteral | VersionLiteral)
    }

    /// Kinds that `RuntimeValues::resolve` knows how to turn into a value.
    pub fn is_value(self) -> bool {
        matches!(self, Identifier | StringLiteral | VersionLiteral | RegexLiteral)
    }
}

/// Classifies a scanned word. Keywords are matched case-insensitively, everything
/// else is an identifier.
pub fn keyword(word: &str) -> TokenType {
    match word.to_ascii_uppercase().as_str() {
        "NOT" => Not,
        "AND" => And,
        "OR" => Or,
        "LT" => Less,
        "LTE" => LessEqual,
        "IS" | "EQ" => Equal,
        "NEQ" => NotEqual,
        "GT" => Greater,
        "GTE" => GreaterEqual,
        "TRUE" => True,
        "FALSE" => False,
        _ => Identifier,
    }
}
