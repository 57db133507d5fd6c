// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Schema inference and diff integration tests.

mod common;

use common::{schema_of, temp_dir, ORDERS_JSON, PEOPLE_CSV};
use omnidata::inspect;
use omnidata::schema::InferenceOptions;
use omnidata::{
    compare, ColumnType, DataValue, Endpoint, FormatRegistry, Schema, SchemaInferencer, Table,
};
use serde_json::json;

fn table(rows: &[&[&str]]) -> DataValue {
    DataValue::Table(Table::new(
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect(),
    ))
}

fn infer(value: &DataValue) -> Schema {
    SchemaInferencer::new().infer(value, "test").unwrap()
}

#[test]
fn test_people_csv_example() {
    let dir = temp_dir("people_schema");
    let path = dir.write("people.csv", PEOPLE_CSV);
    let schema = schema_of(&path);

    assert_eq!(schema.source_format, "csv");
    assert_eq!(schema.row_count, 2);
    assert_eq!(schema.column_names().collect::<Vec<_>>(), ["name", "age"]);

    let age = schema.column("age").unwrap();
    assert_eq!(age.inferred_type, ColumnType::Number);
    assert!(age.nullable);

    let name = schema.column("name").unwrap();
    assert_eq!(name.inferred_type, ColumnType::String);
    assert!(!name.nullable);
    assert_eq!(name.min_length, Some(3));
    assert_eq!(name.max_length, Some(5));
}

#[test]
fn test_records_schema() {
    let dir = temp_dir("orders_schema");
    let path = dir.write("orders.json", ORDERS_JSON);
    let schema = schema_of(&path);

    assert_eq!(schema.row_count, 3);
    assert_eq!(schema.column("id").unwrap().inferred_type, ColumnType::Number);
    assert_eq!(schema.column("paid").unwrap().inferred_type, ColumnType::Boolean);
    assert!(schema.column("customer").unwrap().nullable);
    assert!(!schema.column("total").unwrap().nullable);
}

#[test]
fn test_infer_is_idempotent() {
    let values = [
        table(&[&["a", "b"], &["1", "x"], &["", "y"]]),
        DataValue::Tree(json!([{"k": 1, "v": [1, 2]}, {"k": null}])),
        DataValue::Tree(json!({"only": "object"})),
        DataValue::Tree(json!([1, 2, 3])),
    ];
    for value in &values {
        let first = infer(value);
        let second = infer(value);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}

#[test]
fn test_sample_rows_bound_the_scan() {
    let mut rows = vec![vec!["n".to_string()]];
    rows.extend((0..1500).map(|i| vec![i.to_string()]));
    rows.push(vec!["not a number".to_string()]);
    let value = DataValue::Table(Table::new(rows));

    let full = SchemaInferencer::new().infer(&value, "csv").unwrap();
    assert_eq!(full.column("n").unwrap().inferred_type, ColumnType::String);
    assert_eq!(full.row_count, 1501);

    let sampled = SchemaInferencer::new()
        .with_options(InferenceOptions::with_sample_rows(10))
        .infer(&value, "csv")
        .unwrap();
    assert_eq!(sampled.column("n").unwrap().inferred_type, ColumnType::Number);
    assert_eq!(sampled.row_count, 1501);
}

#[test]
fn test_compare_identity() {
    let schema = infer(&DataValue::Tree(json!([{"id": 1, "name": "a", "tags": []}])));
    let diff = compare(&schema, &schema);
    assert!(diff.added.is_empty());
    assert!(diff.removed.is_empty());
    assert!(diff.changed.is_empty());
    assert_eq!(diff.unchanged.len(), schema.column_count);
    assert!(diff.is_identical());
}

#[test]
fn test_compare_symmetry() {
    let a = infer(&table(&[&["id", "name", "gone"], &["1", "x", "true"]]));
    let b = infer(&DataValue::Tree(json!([{"id": "one", "name": "x", "email": "e"}])));

    let ab = compare(&a, &b);
    let ba = compare(&b, &a);

    let names = |cols: &[omnidata::ColumnInfo]| {
        let mut names: Vec<String> = cols.iter().map(|c| c.name.clone()).collect();
        names.sort();
        names
    };
    assert_eq!(names(&ab.added), names(&ba.removed));
    assert_eq!(names(&ab.removed), names(&ba.added));
    assert_eq!(ab.changed.len(), ba.changed.len());
    assert_eq!(ab.changed[0].old_type, ba.changed[0].new_type);
}

#[test]
fn test_compare_added_column_example() {
    let old = infer(&DataValue::Tree(json!([{"id": 1, "name": "a"}])));
    let new = infer(&DataValue::Tree(json!([{"id": 1, "name": "a", "email": "e"}])));
    let diff = compare(&old, &new);

    assert_eq!(diff.added.len(), 1);
    assert_eq!(diff.added[0].name, "email");
    assert!(diff.removed.is_empty());
    assert!(diff.changed.is_empty());
    assert_eq!(diff.unchanged.len(), 2);
}

#[test]
fn test_inspect_diff_csv_vs_yaml() {
    let dir = temp_dir("diff_csv_yaml");
    let old = dir.write("old.csv", "id,name\n1,Ann\n2,Ben\n");
    let new = dir.write("new.yaml", "- id: 1\n  name: Ann\n  email: a@x\n- id: 2\n  name: null\n  email: b@x\n");

    let registry = FormatRegistry::with_builtin_formats();
    let report = inspect::diff(
        &registry,
        &SchemaInferencer::new(),
        (&Endpoint::File(old), None),
        (&Endpoint::File(new), None),
    )
    .unwrap();

    assert_eq!(report.schema1.source_format, "csv");
    assert_eq!(report.schema2.source_format, "yaml");
    assert_eq!(report.diff.added[0].name, "email");
    assert_eq!(report.diff.changed.len(), 1);
    assert_eq!(report.diff.changed[0].name, "name");
    assert!(report.diff.changed[0].nullable_changed());
    assert!(!report.diff.changed[0].type_changed());
}
