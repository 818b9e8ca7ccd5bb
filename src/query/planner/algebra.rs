// Relational Algebra Translator
//
// Turns an accepted query into a single line of relational algebra,
// innermost first: base table, then each join in source order, then the
// WHERE selection, and always a projection on top.

use crate::query::error::QueryResult;
use crate::query::parser::clauses::{QueryClauses, split_clauses};
use crate::query::parser::validator::{ValidatedQuery, normalize};
use crate::query::planner::logical::{JOIN_SYMBOL, PROJECTION_SYMBOL, SELECTION_SYMBOL};

/// Translate a validated query into relational algebra text
pub fn translate(query: &ValidatedQuery) -> String {
    build_algebra(query.clauses())
}

/// Translate raw query text without consulting a schema.
///
/// Only the clause structure is checked; use the validator first when the
/// tables and attributes matter.
pub fn translate_str(query: &str) -> QueryResult<String> {
    let clauses = split_clauses(&normalize(query))?;
    Ok(build_algebra(&clauses))
}

fn build_algebra(clauses: &QueryClauses) -> String {
    let mut expr = clauses.base_table.clone();

    for join in &clauses.joins {
        expr = format!(
            "({} {} {} {})",
            expr,
            JOIN_SYMBOL,
            join.condition.trim(),
            join.table.trim()
        );
    }

    if let Some(condition) = &clauses.where_clause {
        expr = format!("{} {} ({})", SELECTION_SYMBOL, condition.trim(), expr);
    }

    format!("{} {} ({})", PROJECTION_SYMBOL, clauses.select_list.trim(), expr)
}
