// Query Processor
//
// Runs one query through every stage: validation, translation to
// relational algebra, operator tree construction, optimization and plan
// linearization. Validation failures stop the run; later stages trust
// their input.

use std::sync::Arc;

use log::info;

use crate::catalog::Schema;
use crate::query::parser::validator::{ValidationReport, Validator};
use crate::query::planner::algebra::translate;
use crate::query::planner::diagram::to_mermaid;
use crate::query::planner::execution_plan::ExecutionPlan;
use crate::query::planner::logical::OperatorNode;
use crate::query::planner::operator_builder::build_operator_graph;
use crate::query::planner::optimizer::{Optimizer, OptimizerConfig};

/// Processor configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessorConfig {
    pub optimizer: OptimizerConfig,
}

/// Everything produced for an accepted query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    /// Relational algebra text
    pub algebra: String,
    /// Tree as read from the algebra text
    pub operator_graph: OperatorNode,
    /// Tree after the optimizer passes
    pub optimized_graph: OperatorNode,
    /// Steps of the optimized tree, in execution order
    pub plan: ExecutionPlan,
}

impl PipelineOutput {
    pub fn operator_graph_mermaid(&self) -> String {
        to_mermaid(&self.operator_graph)
    }

    pub fn optimized_graph_mermaid(&self) -> String {
        to_mermaid(&self.optimized_graph)
    }
}

/// Result of processing one query
#[derive(Debug, Clone)]
pub struct QueryReport {
    pub validation: ValidationReport,
    /// Present only when validation accepted the query
    pub output: Option<PipelineOutput>,
}

impl QueryReport {
    pub fn is_accepted(&self) -> bool {
        self.validation.is_accepted()
    }
}

/// Processes queries against a shared, read-only schema
#[derive(Debug, Clone)]
pub struct QueryProcessor {
    schema: Arc<Schema>,
    config: ProcessorConfig,
}

impl QueryProcessor {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self::with_config(schema, ProcessorConfig::default())
    }

    pub fn with_config(schema: Arc<Schema>, config: ProcessorConfig) -> Self {
        QueryProcessor { schema, config }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Run the whole pipeline for one query
    pub fn process(&self, query: &str) -> QueryReport {
        let validation = Validator::new(&self.schema).validate(query);

        let output = validation.query().map(|validated| {
            let algebra = translate(validated);
            info!("translated query to {}", algebra);

            let operator_graph = build_operator_graph(&algebra);
            let optimized_graph = Optimizer::with_config(&self.schema, self.config.optimizer)
                .optimize(operator_graph.clone());
            let plan = ExecutionPlan::from_tree(&optimized_graph);
            info!("execution plan has {} steps", plan.len());

            PipelineOutput {
                algebra,
                operator_graph,
                optimized_graph,
                plan,
            }
        });

        QueryReport { validation, output }
    }
}
