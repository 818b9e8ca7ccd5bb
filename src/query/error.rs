use thiserror::Error;

/// Errors detected while checking a query or reading algebra text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Invalid query structure: {0}")]
    Structural(String),
    #[error("Table '{0}' does not exist in the data model")]
    UnknownTable(String),
    #[error("Attribute '{0}' was not found in the referenced tables")]
    UnknownAttribute(String),
    #[error("Operator or syntax '{0}' is not valid")]
    InvalidOperator(String),
    #[error("Malformed relational algebra: {0}")]
    MalformedAlgebra(String),
}

/// Query processing result
pub type QueryResult<T> = Result<T, QueryError>;
