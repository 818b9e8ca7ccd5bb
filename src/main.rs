use std::sync::Arc;
use anyhow::{Result, anyhow};
use log::info;

use relplan::catalog::Schema;
use relplan::query::QueryProcessor;

const DEMO_QUERY: &str = "SELECT cliente.nome, pedido.idpedido \
                          FROM cliente \
                          JOIN pedido ON cliente.idcliente = pedido.cliente_idcliente \
                          WHERE cliente.tipocliente_idtipocliente = 1";

fn main() -> Result<()> {
    env_logger::init();

    // Small built-in data model
    let schema = Arc::new(Schema::from_tables([
        ("cliente", vec!["idcliente", "nome", "email", "tipocliente_idtipocliente"]),
        ("pedido", vec!["idpedido", "datapedido", "valortotalpedido", "cliente_idcliente"]),
        ("tipocliente", vec!["idtipocliente", "descricao"]),
    ]));
    info!("demo schema has {} tables", schema.len());

    let processor = QueryProcessor::new(schema);
    let report = processor.process(DEMO_QUERY);

    for line in &report.validation.diagnostics {
        println!("{}", line);
    }

    let output = report
        .output
        .ok_or_else(|| anyhow!("demo query was rejected"))?;

    println!();
    println!("Relational algebra:");
    println!("  {}", output.algebra);
    println!();
    println!("Operator graph:");
    print!("{}", output.operator_graph);
    println!();
    println!("Optimized graph:");
    print!("{}", output.optimized_graph);
    println!();
    println!("Execution plan:");
    print!("{}", output.plan);

    Ok(())
}
