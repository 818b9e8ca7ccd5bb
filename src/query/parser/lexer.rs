// Query Lexer Implementation
//
// This module implements the lexer that splits query and condition text
// into tokens. Every token remembers its byte span so callers can slice
// clause text verbatim out of the input.

use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

/// Query token types
#[derive(Debug, PartialEq, Clone)]
pub enum TokenType {
    // Keywords
    SELECT,
    FROM,
    WHERE,
    JOIN,
    ON,
    AND,
    OR,

    // Literals
    STRING(String),
    NUMBER(String),

    // Identifiers (possibly dotted, e.g. `cliente.nome`)
    IDENTIFIER(String),

    // Any run of operator-like characters: `=`, `<=`, `<>`, `!=`, `*`, ...
    SYMBOL(String),

    // Punctuation
    COMMA,      // ,
    LeftParen,  // (
    RightParen, // )

    // Special
    EOF,
}

/// A Token represents a lexical unit of the input
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    pub literal: String,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
}

impl Token {
    /// Keywords recognised by the validator
    pub fn is_keyword(&self) -> bool {
        matches!(
            self.token_type,
            TokenType::SELECT
                | TokenType::FROM
                | TokenType::WHERE
                | TokenType::JOIN
                | TokenType::ON
                | TokenType::AND
                | TokenType::OR
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}({})", self.token_type, self.literal)
    }
}

/// Lexer for breaking query text into tokens
pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer over the given text
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    /// Byte offset of the next unread character
    fn offset(&mut self) -> usize {
        self.chars
            .peek()
            .map(|(idx, _)| *idx)
            .unwrap_or(self.input.len())
    }

    fn skip_whitespace(&mut self) {
        while let Some((_, ch)) = self.chars.peek() {
            if ch.is_whitespace() {
                self.chars.next();
            } else {
                break;
            }
        }
    }

    /// Consume characters while `accept` holds and return the end offset
    fn read_while<F: Fn(char) -> bool>(&mut self, accept: F) -> usize {
        while let Some((_, ch)) = self.chars.peek() {
            if accept(*ch) {
                self.chars.next();
            } else {
                break;
            }
        }
        self.offset()
    }

    /// Read a string literal; the opening quote has already been consumed.
    /// An unterminated literal runs to the end of the input.
    fn read_string(&mut self, start: usize) -> Token {
        let mut value = String::new();
        let mut end = self.input.len();

        while let Some((idx, ch)) = self.chars.next() {
            if ch == '\'' {
                end = idx + ch.len_utf8();
                break;
            }
            value.push(ch);
        }

        self.token(TokenType::STRING(value), start, end)
    }

    /// A `.` continues a word only when a word character follows it.
    /// `table.*` is read as one word naming every column of `table`.
    fn read_word(&mut self, start: usize) -> Token {
        while let Some(&(idx, ch)) = self.chars.peek() {
            if ch == '.' {
                match self.input[idx + 1..].chars().next() {
                    Some('*') => {
                        self.chars.next();
                        self.chars.next();
                        break;
                    }
                    Some(next) if is_word_char(next) && next != '.' => {
                        self.chars.next();
                    }
                    _ => break,
                }
            } else if is_word_char(ch) {
                self.chars.next();
            } else {
                break;
            }
        }
        let end = self.offset();
        let word = &self.input[start..end];
        let token_type = if is_number(word) {
            TokenType::NUMBER(word.to_string())
        } else {
            lookup_identifier(word)
        };
        self.token(token_type, start, end)
    }

    fn read_symbol(&mut self, start: usize) -> Token {
        let end = self.read_while(is_symbol_char);
        let symbol = self.input[start..end].to_string();
        self.token(TokenType::SYMBOL(symbol), start, end)
    }

    fn token(&self, token_type: TokenType, start: usize, end: usize) -> Token {
        Token {
            token_type,
            literal: self.input[start..end].to_string(),
            start,
            end,
        }
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let (start, ch) = match self.chars.next() {
            Some(next) => next,
            None => {
                let end = self.input.len();
                return Token {
                    token_type: TokenType::EOF,
                    literal: String::new(),
                    start: end,
                    end,
                };
            }
        };
        let end = start + ch.len_utf8();

        match ch {
            '(' => self.token(TokenType::LeftParen, start, end),
            ')' => self.token(TokenType::RightParen, start, end),
            ',' => self.token(TokenType::COMMA, start, end),
            '\'' => self.read_string(start),
            c if is_word_char(c) && c != '.' => self.read_word(start),
            _ => self.read_symbol(start),
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        if token.token_type == TokenType::EOF {
            None
        } else {
            Some(token)
        }
    }
}

/// Tokenize the whole input (the trailing EOF token is not included)
pub fn tokenize(input: &str) -> Vec<Token> {
    Lexer::new(input).collect()
}

fn lookup_identifier(ident: &str) -> TokenType {
    match ident.to_lowercase().as_str() {
        "select" => TokenType::SELECT,
        "from" => TokenType::FROM,
        "where" => TokenType::WHERE,
        "join" => TokenType::JOIN,
        "on" => TokenType::ON,
        "and" => TokenType::AND,
        "or" => TokenType::OR,
        _ => TokenType::IDENTIFIER(ident.to_string()),
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '.'
}

fn is_symbol_char(ch: char) -> bool {
    !ch.is_whitespace() && !is_word_char(ch) && !matches!(ch, '(' | ')' | ',' | '\'')
}

/// Digits with at most one embedded dot
fn is_number(word: &str) -> bool {
    let mut parts = word.splitn(2, '.');
    let integral = parts.next().unwrap_or_default();
    let fractional = parts.next();

    let all_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    all_digits(integral) && fractional.is_none_or(all_digits)
}
