use std::fmt;
use std::ops::Range;

use crate::error::XppError;
use crate::token_type::{self, TokenType::{self, *}};

/// The `Scanner` walks the expression text and hands out one `Token` per call to
/// `next_token`. Offsets are counted in chars.
pub struct Scanner<'a> {
    chars: std::str::Chars<'a>, // iterator over chars of source
    current: Option<char>, // current char
    offset: usize, // offset of current char
    start: usize, // offset of first char of lexeme
}

impl<'a> Scanner<'a> {

    pub fn new(source: &'a str) -> Self {
        let mut chars = source.chars();
        let current = chars.next();

        Scanner {
            chars,
            current,
            offset: 0,
            start: 0,
        }
    }

    /// Returns the next token. Once the end of the source is reached every call returns EOF.
    pub fn next_token(&mut self) -> Result<Token, XppError> {
        self.skip_whitespace();
        self.start = self.offset;

        let c = match self.advance() {
            Some(ch) => ch,
            None => return Ok(self.make_token(EOF, String::new())),
        };

        match c {
            '(' => Ok(self.make_token(LeftParen, c.to_string())),
            ')' => Ok(self.make_token(RightParen, c.to_string())),
            '\'' => self.string_literal(),
            '/' => self.regex_literal(),
            '!' => {
                if self.match_char('~') {
                    Ok(self.make_token(NotRegexMatch, "!~".to_string()))
                } else {
                    Err(self.error("Expected '~' after '!'"))
                }
            }
            '=' => {
                if self.match_char('~') {
                    Ok(self.make_token(RegexMatch, "=~".to_string()))
                } else if self.match_char('=') {
                    Err(self.error("'==' is not an operator, use EQ instead"))
                } else {
                    Err(self.error("Expected '~' after '='"))
                }
            }
            _ if c.is_ascii_alphabetic() => Ok(self.identifier(c)),
            _ if c.is_ascii_digit() => Ok(self.version(c)),
            _ => Err(self.error(&format!("Unexpected character '{}'", c))),
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t')) {
            self.advance();
        }
    }

    /// Matches an identifier or keyword: letter ( letter | digit | '_' )*
    fn identifier(&mut self, first: char) -> Token {
        let mut lexeme = first.to_string();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                lexeme.push(c);
                self.advance();
            } else {
                break;
            }
        }

        let variant = token_type::keyword(&lexeme);
        self.make_token(variant, lexeme)
    }

    /// Matches a version literal: digit ( digit | '.' )*
    /// The text is validated when the literal is resolved, not here.
    fn version(&mut self, first: char) -> Token {
        let mut lexeme = first.to_string();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '.' {
                lexeme.push(c);
                self.advance();
            } else {
                break;
            }
        }
        self.make_token(VersionLiteral, lexeme)
    }

    /// Matches 'text'. A backslash makes the following char literal and is dropped.
    fn string_literal(&mut self) -> Result<Token, XppError> {
        let mut lexeme = String::new();
        loop {
            match self.advance() {
                Some('\'') => return Ok(self.make_token(StringLiteral, lexeme)),
                Some('\\') => match self.advance() {
                    Some(c) => lexeme.push(c),
                    None => return Err(self.error("Unterminated string literal")),
                },
                Some(c) => lexeme.push(c),
                None => return Err(self.error("Unterminated string literal")),
            }
        }
    }

    /// Matches /pattern/. Only an escaped '/' loses its backslash, every other escape is
    /// passed on to the regex engine untouched.
    fn regex_literal(&mut self) -> Result<Token, XppError> {
        let mut lexeme = String::new();
        loop {
            match self.advance() {
                Some('/') => return Ok(self.make_token(RegexLiteral, lexeme)),
                Some('\\') => match self.advance() {
                    Some('/') => lexeme.push('/'),
                    Some(c) => {
                        lexeme.push('\\');
                        lexeme.push(c);
                    }
                    None => return Err(self.error("Unterminated regular expression literal")),
                },
                Some(c) => lexeme.push(c),
                None => return Err(self.error("Unterminated regular expression literal")),
            }
        }
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            return true
        }
        false
    }

    /// Return current char and advance to next.
    fn advance(&mut self) -> Option<char> {
        let c = self.current?;
        self.current = self.chars.next();
        self.offset += 1;
        Some(c)
    }

    /// Return current char without advancing.
    fn peek(&self) -> Option<char> {
        self.current
    }

    fn span(&self) -> Range<usize> {
        self.start..self.offset
    }

    fn make_token(&self, variant: TokenType, lexeme: String) -> Token {
        Token {
            variant,
            lexeme,
            offset: self.start,
            length: self.offset - self.start,
        }
    }

    fn error(&self, message: &str) -> XppError {
        XppError::lex(message, self.span())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub variant: TokenType,
    pub lexeme: String,
    pub offset: usize,
    pub length: usize,
}

impl Token {
    pub fn span(&self) -> Range<usize> {
        self.offset..self.offset + self.length
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{} {}", self.variant, self.lexeme)
    }
}
