// Projection Pushdown Optimizer
//
// Walks the tree top-down carrying the attributes still needed above each
// node and inserts narrowing projections between joins and their inputs.

use log::debug;

use crate::catalog::Schema;
use crate::query::planner::attributes::{
    AttributeSet, WILDCARD, available_attributes, referenced_attributes,
};
use crate::query::planner::logical::OperatorNode;

pub struct ProjectionPushdownOptimizer<'a> {
    schema: &'a Schema,
}

impl<'a> ProjectionPushdownOptimizer<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        ProjectionPushdownOptimizer { schema }
    }

    /// Insert projections below joins. `needed` holds the attributes used
    /// above `plan`.
    pub fn optimize(&self, plan: OperatorNode, needed: &AttributeSet) -> OperatorNode {
        let mut needed = needed.clone();
        if !matches!(plan, OperatorNode::TableScan { .. }) {
            needed.extend(referenced_attributes(plan.payload()));
        }

        match plan {
            OperatorNode::Projection { attributes, input } => OperatorNode::Projection {
                attributes,
                input: Box::new(self.optimize(*input, &needed)),
            },
            OperatorNode::Selection { condition, input } => OperatorNode::Selection {
                condition,
                input: Box::new(self.optimize(*input, &needed)),
            },
            OperatorNode::Join {
                condition,
                left,
                right,
            } => OperatorNode::Join {
                condition,
                left: Box::new(self.narrow_join_input(*left, &needed)),
                right: Box::new(self.narrow_join_input(*right, &needed)),
            },
            OperatorNode::TableScan { .. } => plan,
        }
    }

    /// Optimize one join input and put a projection over it when some of
    /// its columns are never used above the join.
    fn narrow_join_input(&self, input: OperatorNode, needed: &AttributeSet) -> OperatorNode {
        let available = available_attributes(&input, self.schema);
        let keep: AttributeSet = available.intersection(needed).cloned().collect();
        let input = self.optimize(input, needed);

        if needed.contains(WILDCARD)
            || keep.is_empty()
            || keep.len() == available.len()
            || projects_exactly(&input, &keep)
        {
            return input;
        }

        let attributes = keep.into_iter().collect::<Vec<_>>().join(", ");
        debug!(
            "projecting {:?} over join input scanning {:?}",
            attributes,
            input.tables()
        );
        OperatorNode::projection(attributes, input)
    }
}

fn projects_exactly(node: &OperatorNode, attrs: &AttributeSet) -> bool {
    match node {
        OperatorNode::Projection { attributes, .. } => referenced_attributes(attributes) == *attrs,
        _ => false,
    }
}
