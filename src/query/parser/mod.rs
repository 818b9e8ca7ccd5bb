// SQL Parser Module
//
// This module tokenizes the accepted SQL subset, splits a query into its
// clauses and validates it against a schema.

// Re-export public components
pub mod clauses;
pub mod lexer;
pub mod validator;

// Export key types
pub use self::clauses::{JoinClause, QueryClauses, split_clauses};
pub use self::lexer::{Lexer, Token, TokenType};
pub use self::validator::{ValidatedQuery, ValidationReport, Validator, validate};
