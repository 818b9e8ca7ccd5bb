// Schema Integration Tests
//
// This module tests loading schema descriptions from JSON files

use std::sync::Arc;

use anyhow::Result;
use relplan::catalog::{Schema, SchemaError};
use relplan::query::QueryProcessor;

#[path = "../common/mod.rs"]
mod common;
use common::{SCENARIO_QUERY, write_schema_file};

#[test]
fn test_load_schema_file() -> Result<()> {
    let file = write_schema_file(
        r#"{
            "Cliente": ["idCliente", "Nome", "TipoCliente_idTipoCliente"],
            "Pedido": ["idPedido", "Cliente_idCliente"]
        }"#,
    )?;
    let schema = Schema::from_json_file(file.path())?;

    assert_eq!(schema.len(), 2);
    assert_eq!(schema.table_names().collect::<Vec<_>>(), vec!["cliente", "pedido"]);
    assert_eq!(
        schema.attributes("pedido"),
        Some(&["idpedido".to_string(), "cliente_idcliente".to_string()][..])
    );

    // Mixed-case names in the file still match the normalized query
    let report = QueryProcessor::new(Arc::new(schema)).process(SCENARIO_QUERY);
    assert!(report.is_accepted(), "{:?}", report.validation.diagnostics);
    Ok(())
}

#[test]
fn test_missing_schema_file() {
    let result = Schema::from_json_file("/nonexistent/relplan/metadata.json");
    assert!(matches!(result, Err(SchemaError::Io(_))));
}

#[test]
fn test_malformed_schema_files() -> Result<()> {
    for json in ["not json", r#"["cliente"]"#, r#"{"cliente": "nome"}"#] {
        let file = write_schema_file(json)?;
        let result = Schema::from_json_file(file.path());
        assert!(matches!(result, Err(SchemaError::Json(_))), "{}", json);
    }

    let file = write_schema_file(r#"{" ": ["a"]}"#)?;
    let result = Schema::from_json_file(file.path());
    assert!(matches!(result, Err(SchemaError::InvalidTable(_))));
    Ok(())
}

#[test]
fn test_bundled_metadata_file() -> Result<()> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/metadata.json");
    let schema = Schema::from_json_file(path)?;

    assert!(schema.has_table("cliente"));
    assert!(schema.has_table("pedido_has_produto"));
    assert!(schema.attributes("cliente").is_some_and(|attrs| attrs.contains(&"tipocliente_idtipocliente".to_string())));
    Ok(())
}
