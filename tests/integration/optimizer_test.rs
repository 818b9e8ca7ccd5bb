// Optimizer Integration Tests
//
// This module tests selection pushdown and projection insertion on trees
// built from translated queries

use std::collections::HashMap;

use anyhow::Result;
use relplan::catalog::Schema;
use relplan::query::planner::filter_pushdown::FilterPushdownOptimizer;
use relplan::query::planner::{
    AttributeSet, OperatorNode, Optimizer, OptimizerConfig, build_operator_graph, optimize,
    translate_str,
};

#[path = "../common/mod.rs"]
mod common;
use common::{SCENARIO_ALGEBRA, scenario_schema, store_schema};

const THREE_TABLE_QUERY: &str = "select cliente.nome, pedido_has_produto.quantidade from cliente \
    join pedido on cliente.idcliente = pedido.cliente_idcliente \
    join pedido_has_produto on pedido.idpedido = pedido_has_produto.pedido_idpedido \
    where cliente.email = 'a' and pedido_has_produto.quantidade > 2";

fn pushdown_only() -> OptimizerConfig {
    OptimizerConfig {
        selection_pushdown: true,
        projection_insertion: false,
    }
}

fn table_counts(tree: &OperatorNode) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for table in tree.tables() {
        *counts.entry(table.to_string()).or_insert(0) += 1;
    }
    counts
}

#[test]
fn test_scenario_selection_is_pushed_to_cliente() {
    let schema = scenario_schema();
    let tree = build_operator_graph(SCENARIO_ALGEBRA);
    let optimized = Optimizer::with_config(&schema, pushdown_only()).optimize(tree);

    let expected = OperatorNode::projection(
        "cliente.nome, pedido.idpedido",
        OperatorNode::join(
            "cliente.idcliente = pedido.cliente_idcliente",
            OperatorNode::selection(
                "cliente.tipocliente_idtipocliente = 1",
                OperatorNode::table_scan("cliente"),
            ),
            OperatorNode::table_scan("pedido"),
        ),
    );
    assert_eq!(optimized, expected);
}

#[test]
fn test_three_table_query_with_both_passes() -> Result<()> {
    let schema = store_schema();
    let tree = build_operator_graph(&translate_str(THREE_TABLE_QUERY)?);
    let optimized = Optimizer::new(&schema).optimize(tree);

    let expected = OperatorNode::projection(
        "cliente.nome, pedido_has_produto.quantidade",
        OperatorNode::join(
            "pedido.idpedido = pedido_has_produto.pedido_idpedido",
            OperatorNode::projection(
                "idpedido, nome",
                OperatorNode::join(
                    "cliente.idcliente = pedido.cliente_idcliente",
                    OperatorNode::projection(
                        "idcliente, nome",
                        OperatorNode::selection(
                            "cliente.email = 'a'",
                            OperatorNode::table_scan("cliente"),
                        ),
                    ),
                    OperatorNode::projection(
                        "cliente_idcliente, idpedido",
                        OperatorNode::table_scan("pedido"),
                    ),
                ),
            ),
            OperatorNode::projection(
                "pedido_idpedido, quantidade",
                OperatorNode::selection(
                    "pedido_has_produto.quantidade > 2",
                    OperatorNode::table_scan("pedido_has_produto"),
                ),
            ),
        ),
    );
    assert_eq!(optimized, expected);
    Ok(())
}

#[test]
fn test_cross_side_conjunct_stays_above_join() -> Result<()> {
    let schema = scenario_schema();
    let tree = build_operator_graph(&translate_str(
        "select cliente.nome from cliente join pedido on cliente.idcliente = pedido.cliente_idcliente \
         where cliente.nome = 'x' and cliente.idcliente = pedido.idpedido",
    )?);
    let optimized = Optimizer::with_config(&schema, pushdown_only()).optimize(tree);

    let expected = OperatorNode::projection(
        "cliente.nome",
        OperatorNode::selection(
            "cliente.idcliente = pedido.idpedido",
            OperatorNode::join(
                "cliente.idcliente = pedido.cliente_idcliente",
                OperatorNode::selection("cliente.nome = 'x'", OperatorNode::table_scan("cliente")),
                OperatorNode::table_scan("pedido"),
            ),
        ),
    );
    assert_eq!(optimized, expected);
    Ok(())
}

#[test]
fn test_constant_condition_is_untouched() -> Result<()> {
    let schema = scenario_schema();
    let tree = build_operator_graph(&translate_str(
        "select cliente.nome from cliente join pedido on cliente.idcliente = pedido.cliente_idcliente where 1=1",
    )?);
    let optimized = Optimizer::with_config(&schema, pushdown_only()).optimize(tree.clone());

    assert_eq!(optimized, tree);
    Ok(())
}

#[test]
fn test_pushdown_is_idempotent() -> Result<()> {
    let scenario = scenario_schema();
    let store = store_schema();
    let cases: [(&Schema, String); 2] = [
        (&scenario, SCENARIO_ALGEBRA.to_string()),
        (&*store, translate_str(THREE_TABLE_QUERY)?),
    ];

    for (schema, algebra) in cases {
        let pushdown = FilterPushdownOptimizer::new(schema);
        let once = pushdown.optimize(build_operator_graph(&algebra));
        let twice = pushdown.optimize(once.clone());
        assert_eq!(once, twice);

        let optimizer = Optimizer::new(schema);
        let once = optimizer.optimize(build_operator_graph(&algebra));
        let twice = optimizer.optimize(once.clone());
        assert_eq!(once, twice);
    }
    Ok(())
}

#[test]
fn test_table_scans_are_preserved() -> Result<()> {
    let schema = store_schema();
    let tree = build_operator_graph(&translate_str(THREE_TABLE_QUERY)?);
    let before = table_counts(&tree);

    for config in [OptimizerConfig::default(), pushdown_only()] {
        let optimized = Optimizer::with_config(&schema, config).optimize(tree.clone());
        assert_eq!(table_counts(&optimized), before);
        assert_eq!(optimized.tables(), tree.tables());
    }
    Ok(())
}

#[test]
fn test_free_optimize_uses_given_needed_set() {
    let schema = scenario_schema();
    let tree = OperatorNode::join(
        "cliente.idcliente = pedido.cliente_idcliente",
        OperatorNode::table_scan("cliente"),
        OperatorNode::table_scan("pedido"),
    );
    let needed: AttributeSet = ["nome".to_string()].into_iter().collect();

    let optimized = optimize(tree, &schema, &needed);
    let expected = OperatorNode::join(
        "cliente.idcliente = pedido.cliente_idcliente",
        OperatorNode::projection("idcliente, nome", OperatorNode::table_scan("cliente")),
        OperatorNode::projection("cliente_idcliente", OperatorNode::table_scan("pedido")),
    );
    assert_eq!(optimized, expected);
}
