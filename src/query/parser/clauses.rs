// Clause Splitter
//
// Splits a normalized query into its select list, FROM table, JOIN ... ON
// pairs and WHERE condition. Boundaries are found on keyword tokens, and
// the clause text itself is sliced verbatim from the input.

use crate::query::error::{QueryError, QueryResult};
use crate::query::parser::lexer::{Token, TokenType, tokenize};

/// One `JOIN <table> ON <condition>` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinClause {
    pub table: String,
    pub condition: String,
}

/// The clauses of a `SELECT ... FROM ... [JOIN ... ON ...]* [WHERE ...]` query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryClauses {
    pub select_list: String,
    pub base_table: String,
    pub joins: Vec<JoinClause>,
    pub where_clause: Option<String>,
}

impl QueryClauses {
    /// Every table named after FROM or JOIN, in source order
    pub fn tables(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.base_table.as_str())
            .chain(self.joins.iter().map(|join| join.table.as_str()))
    }

    /// The ON conditions followed by the WHERE condition
    pub fn conditions(&self) -> impl Iterator<Item = &str> {
        self.joins
            .iter()
            .map(|join| join.condition.as_str())
            .chain(self.where_clause.as_deref())
    }
}

/// Split a normalized query into its clauses
pub fn split_clauses(query: &str) -> QueryResult<QueryClauses> {
    ClauseSplitter::new(query).split()
}

struct ClauseSplitter<'a> {
    input: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> ClauseSplitter<'a> {
    fn new(input: &'a str) -> Self {
        ClauseSplitter {
            input,
            tokens: tokenize(input),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_type(&self) -> Option<&TokenType> {
        self.peek().map(|token| &token.token_type)
    }

    fn expect(&mut self, expected: TokenType, message: &str) -> QueryResult<()> {
        match self.peek_type() {
            Some(found) if *found == expected => {
                self.pos += 1;
                Ok(())
            }
            _ => Err(QueryError::Structural(message.to_string())),
        }
    }

    fn split(mut self) -> QueryResult<QueryClauses> {
        self.expect(
            TokenType::SELECT,
            "the query must have SELECT and FROM in that order",
        )?;

        let select_list = self.read_until(|t| *t == TokenType::FROM);
        let select_list = select_list.ok_or_else(|| {
            QueryError::Structural("the query must have SELECT and FROM in that order".to_string())
        })?;
        self.expect(
            TokenType::FROM,
            "the query must have SELECT and FROM in that order",
        )?;

        let base_table = self.read_table("FROM")?;
        let mut joins = Vec::new();
        let mut where_clause = None;

        while let Some(token) = self.peek() {
            match &token.token_type {
                TokenType::JOIN => {
                    self.pos += 1;
                    let table = self.read_table("JOIN")?;
                    self.expect(TokenType::ON, "the query has a JOIN without an ON clause")?;
                    let condition = self.read_condition("ON", |t| {
                        matches!(t, TokenType::JOIN | TokenType::WHERE)
                    })?;
                    joins.push(JoinClause { table, condition });
                }
                TokenType::WHERE => {
                    self.pos += 1;
                    where_clause = Some(self.read_condition("WHERE", |_| false)?);
                }
                _ => {
                    return Err(QueryError::Structural(format!(
                        "unexpected '{}' after the table list",
                        token.literal
                    )));
                }
            }
        }

        Ok(QueryClauses {
            select_list,
            base_table,
            joins,
            where_clause,
        })
    }

    fn read_table(&mut self, after: &str) -> QueryResult<String> {
        match self.peek() {
            Some(Token {
                token_type: TokenType::IDENTIFIER(name) | TokenType::NUMBER(name),
                ..
            }) => {
                let name = name.clone();
                self.pos += 1;
                Ok(name)
            }
            _ => Err(QueryError::Structural(format!(
                "expected a table name after {}",
                after
            ))),
        }
    }

    /// Read a condition up to (not including) a token accepted by `stop`.
    /// Clause keywords other than the stop tokens may not appear inside it.
    fn read_condition<F>(&mut self, clause: &str, stop: F) -> QueryResult<String>
    where
        F: Fn(&TokenType) -> bool,
    {
        let start = self.pos;
        let mut depth = 0usize;
        while let Some(token) = self.peek() {
            if stop(&token.token_type) {
                break;
            }
            if token.is_keyword() && !matches!(token.token_type, TokenType::AND | TokenType::OR) {
                return Err(QueryError::Structural(format!(
                    "unexpected '{}' inside the {} condition",
                    token.literal, clause
                )));
            }
            match token.token_type {
                TokenType::LeftParen => depth += 1,
                TokenType::RightParen if depth == 0 => return Err(unbalanced(clause)),
                TokenType::RightParen => depth -= 1,
                _ => {}
            }
            self.pos += 1;
        }
        if depth != 0 {
            return Err(unbalanced(clause));
        }

        self.slice(start, self.pos)
            .ok_or_else(|| QueryError::Structural(format!("empty {} condition", clause)))
    }

    /// Read tokens up to one accepted by `stop`; `None` when nothing was read
    fn read_until<F>(&mut self, stop: F) -> Option<String>
    where
        F: Fn(&TokenType) -> bool,
    {
        let start = self.pos;
        while let Some(token) = self.peek() {
            if stop(&token.token_type) {
                break;
            }
            self.pos += 1;
        }
        self.slice(start, self.pos)
    }

    /// Verbatim input text covered by tokens `start..end`
    fn slice(&self, start: usize, end: usize) -> Option<String> {
        if start >= end {
            return None;
        }
        let first = &self.tokens[start];
        let last = &self.tokens[end - 1];
        Some(self.input[first.start..last.end].to_string())
    }
}

fn unbalanced(clause: &str) -> QueryError {
    QueryError::Structural(format!("unbalanced parentheses in the {} condition", clause))
}
