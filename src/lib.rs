// Relplan Query Processor
//
// Validates a small SQL subset against a schema, translates it to
// relational algebra, optimizes the operator tree and describes the
// execution order.

pub mod catalog;
pub mod query;

// Re-export key items for convenient access
pub use catalog::{Schema, SchemaError};
pub use query::parser::{ValidationReport, Validator};
pub use query::planner::{ExecutionPlan, OperatorNode, Optimizer, OptimizerConfig};
pub use query::{QueryError, QueryProcessor, QueryReport, QueryResult};
