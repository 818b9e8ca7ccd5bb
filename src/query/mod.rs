// Query Processing Module
//
// This module contains the components for SQL validation, relational
// algebra translation, operator tree optimization and plan generation.

pub mod error;
pub mod parser;
pub mod planner;
pub mod processor;

// Export key public interfaces
pub use error::{QueryError, QueryResult};
pub use processor::{PipelineOutput, ProcessorConfig, QueryProcessor, QueryReport};
