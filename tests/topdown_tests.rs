use emon_studio::aggregator::{MetricHierarchy, Platform, Selector};
use emon_studio::reader::{Cell, MetricTable};
use emon_studio::utils::error::HierarchyError;
use pretty_assertions::assert_eq;

fn table(rows: &[(&str, f64)]) -> MetricTable {
    let mut t = MetricTable::new("name", vec!["aggregated".to_string()]);
    for (key, value) in rows {
        t.push_row(*key, vec![Cell::Number(*value)]);
    }
    t
}

fn keys(table: &MetricTable) -> Vec<&str> {
    table.keys().collect()
}

/// Depths 0,1,2,1,0 for A..E
fn sample() -> MetricHierarchy {
    let t = table(&[
        ("m_A", 1.0),
        ("m_.B", 2.0),
        ("m_..C", 3.0),
        ("m_.D", 4.0),
        ("m_E", 5.0),
        ("other_F", 6.0),
    ]);
    MetricHierarchy::build(&t, "m_")
}

#[test]
fn test_child_regions() {
    let h = sample();

    assert_eq!(keys(&h.get_child("m_a").unwrap()), vec!["m_.b", "m_..c", "m_.d"]);
    assert_eq!(keys(&h.get_child("M_.B").unwrap()), vec!["m_..c"]);
    assert!(h.get_child("m_.d").unwrap().is_empty());
    assert!(h.get_child("m_e").unwrap().is_empty());
    assert!(h.get_child("other_f").is_none());
}

#[test]
fn test_children_and_values() {
    let h = sample();

    let children: Vec<&str> = h
        .children("m_a")
        .unwrap()
        .into_iter()
        .map(|n| n.name.as_str())
        .collect();
    assert_eq!(children, vec!["m_.b", "m_.d"]);

    let region = h.get_child("m_a").unwrap();
    assert_eq!(region.value("m_.d", "aggregated"), Some(4.0));
    assert_eq!(h.len(), 5);
}

#[test]
fn test_custom_depth_function() {
    let t = table(&[("m_a", 1.0), ("m_a/b", 2.0), ("m_a/b/c", 3.0), ("m_d", 4.0)]);
    let slash_depth = |name: &str| name.matches('/').count();
    let h = MetricHierarchy::build_with(&t, "m_", slash_depth);

    assert_eq!(keys(&h.get_child("m_a").unwrap()), vec!["m_a/b", "m_a/b/c"]);
    assert_eq!(
        keys(&h.get_child_by("m_a/b", slash_depth).unwrap()),
        vec!["m_a/b/c"]
    );
}

#[test]
fn test_filter_include_keeps_table_order() {
    let h = sample();
    let out = h.filter(&Selector::include(["m_e", "m_a", "m_missing"])).unwrap();
    assert_eq!(keys(&out), vec!["m_a", "m_e"]);

    assert!(h.filter(&Selector::include(Vec::<String>::new())).unwrap().is_empty());
}

#[test]
fn test_filter_rename() {
    let h = sample();
    let out = h
        .filter(&Selector::rename([("m_.b", "Bad Speculation"), ("m_a", "Frontend")]))
        .unwrap();

    assert_eq!(keys(&out), vec!["Frontend", "Bad Speculation"]);
    assert_eq!(out.value("frontend", "aggregated"), Some(1.0));
}

#[test]
fn test_filter_rename_collision() {
    let h = sample();
    let err = h
        .filter(&Selector::rename([("m_a", "m_e")]))
        .unwrap_err();
    assert!(matches!(err, HierarchyError::LabelCollision(label) if label == "m_e"));

    let err = h
        .filter(&Selector::rename([("m_a", "X"), ("m_e", "x")]))
        .unwrap_err();
    assert!(matches!(err, HierarchyError::LabelCollision(_)));
}

#[test]
fn test_platform_summary_breakdown() {
    let t = table(&[
        ("metric_TMA_Frontend_Bound(%)", 20.0),
        ("metric_TMA_..Fetch_Latency(%)", 12.0),
        ("metric_TMA_Bad_Speculation(%)", 5.0),
        ("metric_TMA_Backend_Bound(%)", 40.0),
        ("metric_TMA_Retiring(%)", 35.0),
        ("metric_CPI", 0.8),
    ]);
    let platform: Platform = "icx".parse().unwrap();
    let h = platform.hierarchy(&t);
    assert_eq!(h.len(), 5);

    let summary = platform.breakdown(&h, "summary").unwrap().unwrap();
    assert_eq!(summary.len(), 4);
    assert!(platform.breakdown(&h, "no-such-group").unwrap().is_none());
}
