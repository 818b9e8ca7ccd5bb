// Query Validator
//
// Checks raw query text against the schema in fail-fast order:
// structure, table existence, attribute existence, condition operators.
// Every step leaves a human-readable line in the diagnostics.

use std::collections::HashSet;

use log::debug;
use once_cell::sync::Lazy;

use crate::catalog::Schema;
use crate::query::error::{QueryError, QueryResult};
use crate::query::parser::clauses::{QueryClauses, split_clauses};
use crate::query::parser::lexer::{TokenType, tokenize};
use crate::query::planner::attributes::WILDCARD;

/// Words that may appear in a query without naming an attribute
static VALIDATOR_KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["select", "from", "where", "join", "on", "and", "or"]
        .into_iter()
        .collect()
});

/// Symbols allowed inside ON / WHERE conditions
static CONDITION_OPERATORS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["=", ">", "<", "<=", ">=", "<>", "(", ")"]
        .into_iter()
        .collect()
});

/// Lowercase, drop one trailing `;` and collapse whitespace runs
pub fn normalize(query: &str) -> String {
    let trimmed = query.trim();
    let trimmed = trimmed.strip_suffix(';').unwrap_or(trimmed);
    trimmed
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// A query that passed every validation step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuery {
    normalized: String,
    clauses: QueryClauses,
    tables: Vec<String>,
}

impl ValidatedQuery {
    /// The normalized query text
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn clauses(&self) -> &QueryClauses {
        &self.clauses
    }

    /// Distinct referenced tables, in first-seen order
    pub fn tables(&self) -> &[String] {
        &self.tables
    }
}

/// Outcome of a validation run plus the diagnostics it produced
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub diagnostics: Vec<String>,
    pub outcome: QueryResult<ValidatedQuery>,
}

impl ValidationReport {
    pub fn is_accepted(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn query(&self) -> Option<&ValidatedQuery> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&QueryError> {
        self.outcome.as_ref().err()
    }

    /// Convert into a plain `Result`, dropping the diagnostics
    pub fn into_result(self) -> QueryResult<ValidatedQuery> {
        self.outcome
    }
}

/// Validates queries against a schema
pub struct Validator<'a> {
    schema: &'a Schema,
}

impl<'a> Validator<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Validator { schema }
    }

    /// Run every check, stopping at the first failure
    pub fn validate(&self, query: &str) -> ValidationReport {
        let mut diagnostics = vec![format!("Analyzing query: \"{}\"", query)];
        let outcome = self.check(query, &mut diagnostics);

        match &outcome {
            Ok(_) => diagnostics.push("Query is VALID.".to_string()),
            Err(err) => {
                debug!("rejected query {:?}: {}", query, err);
                diagnostics.push(format!("ERROR: {}", err));
            }
        }

        ValidationReport {
            diagnostics,
            outcome,
        }
    }

    fn check(&self, query: &str, diagnostics: &mut Vec<String>) -> QueryResult<ValidatedQuery> {
        let normalized = normalize(query);
        let clauses = split_clauses(&normalized)?;

        let tables = self.check_tables(&clauses)?;
        diagnostics.push(format!(
            "Tables validated successfully: [{}]",
            tables.join(", ")
        ));

        self.check_attributes(&normalized, &tables)?;
        diagnostics.push("Attributes validated successfully.".to_string());

        check_operators(&clauses)?;
        diagnostics.push("Operators validated successfully.".to_string());

        Ok(ValidatedQuery {
            normalized,
            clauses,
            tables,
        })
    }

    fn check_tables(&self, clauses: &QueryClauses) -> QueryResult<Vec<String>> {
        let mut tables: Vec<String> = Vec::new();
        for table in clauses.tables() {
            if !self.schema.has_table(table) {
                return Err(QueryError::UnknownTable(table.to_string()));
            }
            if !tables.iter().any(|seen| seen == table) {
                tables.push(table.to_string());
            }
        }
        Ok(tables)
    }

    fn check_attributes(&self, normalized: &str, tables: &[String]) -> QueryResult<()> {
        let available = self.schema.attribute_set(tables.iter().map(String::as_str));

        for token in tokenize(normalized) {
            let TokenType::IDENTIFIER(identifier) = &token.token_type else {
                continue;
            };
            let (qualifier, attribute) = match identifier.rsplit_once('.') {
                Some((qualifier, attribute)) => (Some(qualifier), attribute),
                None => (None, identifier.as_str()),
            };

            if attribute == WILDCARD {
                // `table.*` must name a table of the query
                if qualifier.is_some_and(|table| tables.iter().any(|t| t == table)) {
                    continue;
                }
                return Err(QueryError::UnknownAttribute(identifier.clone()));
            }

            let known = available.contains(attribute)
                || VALIDATOR_KEYWORDS.contains(attribute)
                || tables.iter().any(|table| table == attribute)
                || (!attribute.is_empty() && attribute.chars().all(|c| c.is_ascii_digit()));
            if !known {
                let name = if attribute.is_empty() { identifier.as_str() } else { attribute };
                return Err(QueryError::UnknownAttribute(name.to_string()));
            }
        }
        Ok(())
    }
}

/// Every symbol left in the ON / WHERE conditions once words and literals
/// are set aside must be a comparison operator or a parenthesis.
fn check_operators(clauses: &QueryClauses) -> QueryResult<()> {
    for condition in clauses.conditions() {
        for token in tokenize(condition) {
            let symbol = match &token.token_type {
                TokenType::SYMBOL(symbol) => symbol.as_str(),
                TokenType::LeftParen => "(",
                TokenType::RightParen => ")",
                TokenType::COMMA => ",",
                _ => continue,
            };
            if !CONDITION_OPERATORS.contains(symbol) {
                return Err(QueryError::InvalidOperator(symbol.to_string()));
            }
        }
    }
    Ok(())
}

/// Validate `query` against `schema`
pub fn validate(query: &str, schema: &Schema) -> ValidationReport {
    Validator::new(schema).validate(query)
}
