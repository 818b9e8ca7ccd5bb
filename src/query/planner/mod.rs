// Query Planner Module
//
// This module turns a validated query into relational algebra, reads the
// algebra back as an operator tree, rewrites that tree heuristically and
// linearizes the result into an execution plan.

// Re-export public components
pub mod algebra;
pub mod attributes;
pub mod diagram;
pub mod execution_plan;
pub mod filter_pushdown;
pub mod logical;
pub mod operator_builder;
pub mod optimizer;
pub mod projection_pushdown;

// Export key types
pub use self::algebra::{translate, translate_str};
pub use self::attributes::AttributeSet;
pub use self::diagram::{MermaidDiagram, to_mermaid};
pub use self::execution_plan::{ExecutionPlan, linearize};
pub use self::logical::{NodeKind, OperatorNode};
pub use self::operator_builder::{build_operator_graph, build_operator_graph_strict};
pub use self::optimizer::{Optimizer, OptimizerConfig, optimize};
