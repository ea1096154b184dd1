use emon_studio::parser::{AliasKind, FormulaCatalog};
use emon_studio::utils::error::FormulaError;
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

const CATALOG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<root>
  <metric name="metric_CPI">
    <throughput-metric-name>metric_cycles per txn</throughput-metric-name>
    <event alias="a">CPU_CLK_UNHALTED.THREAD</event>
    <event alias="b">INST_RETIRED.ANY</event>
    <formula>a/b</formula>
  </metric>
  <metric name="metric_CPU operating frequency (in GHz)">
    <event alias="a">CPU_CLK_UNHALTED.THREAD</event>
    <event alias="b">CPU_CLK_UNHALTED.REF_TSC</event>
    <constant alias="c">system.tsc_freq</constant>
    <formula>(a/b*c)/1000000000</formula>
  </metric>
  <metric name="metric_overlapping">
    <event alias="X">EVT_X</event>
    <event alias="XY">EVT_XY</event>
    <formula>{X} + {XY} + X*XY</formula>
  </metric>
</root>
"#;

fn catalog_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_iterate_catalog() {
    let file = catalog_file(CATALOG);
    let catalog = FormulaCatalog::from_path(file.path()).unwrap();

    let names: Vec<&str> = catalog.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "metric_CPI",
            "metric_CPU operating frequency (in GHz)",
            "metric_overlapping"
        ]
    );

    let freq = catalog.get("metric_CPU operating frequency (in GHz)").unwrap();
    assert_eq!(freq.aliases["c"].kind, AliasKind::Constant);
    assert_eq!(freq.aliases["a"].kind, AliasKind::Event);
}

#[test]
fn test_expand_all() {
    let catalog = FormulaCatalog::from_reader(CATALOG.as_bytes()).unwrap();
    let expanded = catalog.expand_all().unwrap();

    assert_eq!(
        expanded,
        vec![
            (
                "metric_CPI".to_string(),
                "CPU_CLK_UNHALTED.THREAD/INST_RETIRED.ANY".to_string()
            ),
            (
                "metric_CPU operating frequency (in GHz)".to_string(),
                "(CPU_CLK_UNHALTED.THREAD/CPU_CLK_UNHALTED.REF_TSC*system.tsc_freq)/1000000000"
                    .to_string()
            ),
            (
                "metric_overlapping".to_string(),
                "EVT_X + EVT_XY + EVT_X*EVT_XY".to_string()
            ),
        ]
    );
}

#[test]
fn test_missing_alias_in_catalog() {
    let doc = r#"<root><metric name="m"><event alias="a">A</event><formula>a+b</formula></metric></root>"#;
    let catalog = FormulaCatalog::from_reader(doc.as_bytes()).unwrap();

    match catalog.expand_all() {
        Err(FormulaError::MissingAlias { formula, alias }) => {
            assert_eq!(formula, "m");
            assert_eq!(alias, "b");
        }
        other => panic!("expected MissingAlias, got {:?}", other),
    }
}

#[test]
fn test_malformed_catalogs() {
    let no_formula = r#"<root><metric name="m"><event alias="a">A</event></metric></root>"#;
    assert!(matches!(
        FormulaCatalog::from_reader(no_formula.as_bytes()),
        Err(FormulaError::MalformedCatalog(_))
    ));

    let no_alias = r#"<root><metric name="m"><event>A</event><formula>1</formula></metric></root>"#;
    assert!(matches!(
        FormulaCatalog::from_reader(no_alias.as_bytes()),
        Err(FormulaError::MalformedCatalog(_))
    ));

    let duplicate = r#"<root><metric name="m"><event alias="a">A</event><event alias="a">B</event><formula>a</formula></metric></root>"#;
    assert!(matches!(
        FormulaCatalog::from_reader(duplicate.as_bytes()),
        Err(FormulaError::DuplicateAlias { .. })
    ));

    assert!(matches!(
        FormulaCatalog::from_reader("<root><metric".as_bytes()),
        Err(FormulaError::Xml(_))
    ));
}
