#![allow(dead_code)]

use std::io::Write;
use std::sync::Arc;
use anyhow::Result;
use tempfile::NamedTempFile;
use relplan::catalog::Schema;

pub const SCENARIO_QUERY: &str = "SELECT cliente.nome, pedido.idpedido FROM cliente JOIN pedido ON cliente.idcliente = pedido.cliente_idcliente WHERE cliente.tipocliente_idtipocliente = 1";

pub const SCENARIO_ALGEBRA: &str = "π cliente.nome, pedido.idpedido (σ cliente.tipocliente_idtipocliente = 1 ((cliente ⨝ cliente.idcliente = pedido.cliente_idcliente pedido)))";

// Two-table schema used by the reference scenario
pub fn scenario_schema() -> Schema {
    Schema::from_tables([
        ("cliente", vec!["idcliente", "nome", "tipocliente_idtipocliente"]),
        ("pedido", vec!["idpedido", "cliente_idcliente"]),
    ])
}

// Larger schema for multi-join queries
pub fn store_schema() -> Arc<Schema> {
    Arc::new(Schema::from_tables([
        ("cliente", vec!["idcliente", "nome", "email", "tipocliente_idtipocliente"]),
        ("tipocliente", vec!["idtipocliente", "descricao"]),
        ("pedido", vec!["idpedido", "datapedido", "valortotalpedido", "cliente_idcliente"]),
        ("produto", vec!["idproduto", "preco", "quantestoque"]),
        ("pedido_has_produto", vec!["pedido_idpedido", "produto_idproduto", "quantidade"]),
    ]))
}

// Write a JSON schema description to a temporary file
pub fn write_schema_file(json: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(json.as_bytes())?;
    file.flush()?;
    Ok(file)
}
