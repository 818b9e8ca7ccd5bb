// Query Optimizer Implementation
//
// This module drives the heuristic rewrites over an operator tree:
// selection pushdown first, then projection insertion. Pushdown decides
// which node ends up directly above each join, so the order is fixed.

use log::debug;

use crate::catalog::Schema;
use crate::query::planner::attributes::{AttributeSet, referenced_attributes};
use crate::query::planner::filter_pushdown::FilterPushdownOptimizer;
use crate::query::planner::logical::OperatorNode;
use crate::query::planner::projection_pushdown::ProjectionPushdownOptimizer;

/// Which rewrite passes run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimizerConfig {
    /// Move selection conjuncts below joins
    pub selection_pushdown: bool,
    /// Insert narrowing projections between joins and their inputs
    pub projection_insertion: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        OptimizerConfig {
            selection_pushdown: true,
            projection_insertion: true,
        }
    }
}

/// The main optimizer that applies the rewrite passes to an operator tree
pub struct Optimizer<'a> {
    schema: &'a Schema,
    config: OptimizerConfig,
}

impl<'a> Optimizer<'a> {
    /// Create an optimizer running every pass
    pub fn new(schema: &'a Schema) -> Self {
        Self::with_config(schema, OptimizerConfig::default())
    }

    pub fn with_config(schema: &'a Schema, config: OptimizerConfig) -> Self {
        Optimizer { schema, config }
    }

    /// Optimize a tree, seeding the needed attributes from its root
    /// projection
    pub fn optimize(&self, plan: OperatorNode) -> OperatorNode {
        let needed = root_attributes(&plan);
        self.optimize_with(plan, &needed)
    }

    /// Optimize a tree with an explicit set of attributes needed at the root
    pub fn optimize_with(&self, plan: OperatorNode, needed: &AttributeSet) -> OperatorNode {
        let mut plan = plan;

        if self.config.selection_pushdown {
            plan = FilterPushdownOptimizer::new(self.schema).optimize(plan);
        }
        if self.config.projection_insertion {
            plan = ProjectionPushdownOptimizer::new(self.schema).optimize(plan, needed);
        }

        debug!("optimized tree has {} nodes", plan.node_count());
        plan
    }
}

/// Attributes listed by the root projection, or an empty set when the root
/// is not a projection
pub fn root_attributes(plan: &OperatorNode) -> AttributeSet {
    match plan {
        OperatorNode::Projection { attributes, .. } => referenced_attributes(attributes),
        _ => AttributeSet::new(),
    }
}

/// Optimize `plan` against `schema` with every pass enabled
pub fn optimize(plan: OperatorNode, schema: &Schema, needed: &AttributeSet) -> OperatorNode {
    Optimizer::new(schema).optimize_with(plan, needed)
}
