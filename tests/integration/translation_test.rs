// Translation Integration Tests
//
// This module tests SQL to relational algebra translation and reading the
// algebra back as an operator tree

use anyhow::Result;
use relplan::query::parser::validate;
use relplan::query::planner::{
    NodeKind, OperatorNode, build_operator_graph, build_operator_graph_strict, translate,
    translate_str,
};
use relplan::query::QueryError;

#[path = "../common/mod.rs"]
mod common;
use common::{SCENARIO_ALGEBRA, SCENARIO_QUERY, scenario_schema, store_schema};

#[test]
fn test_scenario_translation() -> Result<()> {
    let schema = scenario_schema();
    let validated = validate(SCENARIO_QUERY, &schema).into_result()?;

    assert_eq!(translate(&validated), SCENARIO_ALGEBRA);
    Ok(())
}

#[test]
fn test_translation_without_where() -> Result<()> {
    assert_eq!(
        translate_str("SELECT cliente.nome FROM cliente JOIN pedido ON cliente.idcliente = pedido.cliente_idcliente")?,
        "π cliente.nome ((cliente ⨝ cliente.idcliente = pedido.cliente_idcliente pedido))"
    );
    assert_eq!(translate_str("select * from cliente;")?, "π * (cliente)");
    Ok(())
}

#[test]
fn test_three_table_translation() -> Result<()> {
    let schema = store_schema();
    let validated = validate(
        "select cliente.nome, pedido_has_produto.quantidade from cliente \
         join pedido on cliente.idcliente = pedido.cliente_idcliente \
         join pedido_has_produto on pedido.idpedido = pedido_has_produto.pedido_idpedido",
        &schema,
    )
    .into_result()?;

    assert_eq!(
        translate(&validated),
        "π cliente.nome, pedido_has_produto.quantidade (((cliente ⨝ cliente.idcliente = pedido.cliente_idcliente pedido) ⨝ pedido.idpedido = pedido_has_produto.pedido_idpedido pedido_has_produto))"
    );
    Ok(())
}

#[test]
fn test_scenario_operator_graph() {
    let tree = build_operator_graph(SCENARIO_ALGEBRA);

    let expected = OperatorNode::projection(
        "cliente.nome, pedido.idpedido",
        OperatorNode::selection(
            "cliente.tipocliente_idtipocliente = 1",
            OperatorNode::join(
                "cliente.idcliente = pedido.cliente_idcliente",
                OperatorNode::table_scan("cliente"),
                OperatorNode::table_scan("pedido"),
            ),
        ),
    );
    assert_eq!(tree, expected);
    assert_eq!(tree.node_count(), 5);
    assert_eq!(tree.tables(), vec!["cliente", "pedido"]);
}

#[test]
fn test_tree_reads_back_its_own_algebra() -> Result<()> {
    let algebra = translate_str(
        "select a.x from a join b on a.id = b.aid join c on b.id = c.bid where a.x > 1 and c.y = 2",
    )?;
    let tree = build_operator_graph(&algebra);

    assert_eq!(tree.to_algebra(), algebra);
    assert_eq!(build_operator_graph(&tree.to_algebra()), tree);
    Ok(())
}

#[test]
fn test_parenthesized_conditions_stay_in_payload() {
    let tree = build_operator_graph("π nome (σ (idcliente = 1 or idcliente = 2) and nome = 'x' (cliente))");

    assert_eq!(tree.kind(), NodeKind::Projection);
    let selection = tree.children()[0];
    assert_eq!(selection.kind(), NodeKind::Selection);
    assert_eq!(selection.payload(), "(idcliente = 1 or idcliente = 2) and nome = 'x'");
    assert_eq!(selection.children()[0], &OperatorNode::table_scan("cliente"));
}

#[test]
fn test_lenient_and_strict_builders() {
    // Unrecognized text degrades to a leaf
    let tree = build_operator_graph("π nome cliente");
    assert_eq!(tree, OperatorNode::table_scan("π nome cliente"));

    let result = build_operator_graph_strict("π nome cliente");
    assert!(matches!(result, Err(QueryError::MalformedAlgebra(_))));

    assert!(build_operator_graph_strict(SCENARIO_ALGEBRA).is_ok());
}

#[test]
fn test_join_without_condition_text() {
    let tree = build_operator_graph("(cliente ⨝ pedido)");
    assert_eq!(
        tree,
        OperatorNode::join("", OperatorNode::table_scan("cliente"), OperatorNode::table_scan("pedido"))
    );
}
