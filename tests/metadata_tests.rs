//! Metadata document tests

use metad::models::{
    Constraint, DataSubtype, DataType, Field, FieldRef, FieldType, ForeignKey, Key, MetaData,
    MetadataError, Table,
};
use metad::validation::{ValidationError, validate_metadata_internal};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn users() -> Table {
    Table::new(
        "users",
        vec![
            Field::new("user_id", DataType::Id),
            Field::new("email", DataType::Text),
        ],
    )
    .with_primary_key("user_id")
}

fn orders() -> Table {
    Table::new(
        "orders",
        vec![
            Field::new("order_id", DataType::Id),
            Field::new("user_id", DataType::Id),
            Field::typed(
                "amount",
                FieldType::with_subtype(DataType::Numerical, DataSubtype::Float),
            ),
        ],
    )
    .with_primary_key("order_id")
}

mod document_tests {
    use super::*;

    #[test]
    fn test_build_and_query() {
        let mut metadata = MetaData::new();
        metadata.add_table(users()).unwrap();
        metadata.add_table(orders()).unwrap();
        metadata
            .add_foreign_key(ForeignKey::new("orders", "user_id", "users", "user_id"))
            .unwrap();

        assert_eq!(metadata.get_table_names(), vec!["users", "orders"]);
        assert_eq!(metadata.get_foreign_keys(Some("users")).len(), 1);
        assert_eq!(metadata.get_foreign_keys(Some("orders")).len(), 1);
        assert!(metadata.get_foreign_keys(Some("other")).is_empty());
        assert_eq!(
            metadata.get_table("orders").unwrap().primary_key,
            Some(Key::from("order_id"))
        );
        assert!(metadata.get_table("missing").is_none());
    }

    #[test]
    fn test_add_field() {
        let mut metadata = MetaData::new();
        metadata.add_table(users()).unwrap();
        metadata
            .add_field("users", Field::new("created_at", DataType::Datetime))
            .unwrap();
        assert_eq!(
            metadata.get_table("users").unwrap().field_names(),
            vec!["user_id", "email", "created_at"]
        );

        let err = metadata
            .add_field("nope", Field::new("x", DataType::Text))
            .unwrap_err();
        assert!(matches!(err, MetadataError::TableNotFound(ref t) if t == "nope"));
    }

    #[test]
    fn test_dangling_foreign_key_is_reported_and_kept() {
        let mut metadata = MetaData::new();
        metadata.add_table(users()).unwrap();
        metadata.add_table(orders()).unwrap();

        let err = metadata
            .add_foreign_key(ForeignKey::new("orders", "user_id", "customers", "id"))
            .unwrap_err();
        assert!(matches!(
            err,
            MetadataError::Validation(ValidationError::DanglingForeignKey { .. })
        ));
        // The failing key stays in the document
        assert_eq!(metadata.foreign_keys().len(), 1);
        assert!(metadata.validate().is_err());
    }

    #[test]
    fn test_duplicate_table() {
        let mut metadata = MetaData::new();
        metadata.add_table(users()).unwrap();
        let err = metadata.add_table(users()).unwrap_err();
        assert!(matches!(
            err,
            MetadataError::Validation(ValidationError::DuplicateTable(ref t)) if t == "users"
        ));
    }

    #[test]
    fn test_duplicate_field() {
        let mut metadata = MetaData::new();
        let table = Table::new(
            "t",
            vec![
                Field::new("a", DataType::Text),
                Field::new("a", DataType::Id),
            ],
        );
        let err = metadata.add_table(table).unwrap_err();
        assert!(matches!(
            err,
            MetadataError::Validation(ValidationError::DuplicateField { .. })
        ));
    }

    #[test]
    fn test_unknown_primary_key_field() {
        let mut metadata = MetaData::new();
        let table = Table::new("t", vec![Field::new("a", DataType::Text)]).with_primary_key("b");
        let err = metadata.add_table(table).unwrap_err();
        assert!(matches!(
            err,
            MetadataError::Validation(ValidationError::UnknownPrimaryKeyField { .. })
        ));
    }

    #[test]
    fn test_constraint_references() {
        let mut metadata = MetaData::new();
        metadata.add_table(users()).unwrap();
        metadata.add_table(orders()).unwrap();

        metadata
            .add_constraint(Constraint::new(
                vec![FieldRef::new("orders", "amount")],
                vec![FieldRef::new("users", "user_id")],
            ))
            .unwrap();

        let err = metadata
            .add_constraint(Constraint::new(
                vec![FieldRef::new("orders", "discount")],
                vec![],
            ))
            .unwrap_err();
        assert!(matches!(
            err,
            MetadataError::Validation(ValidationError::DanglingConstraintField { constraint: 1, .. })
        ));
    }
}

fn reviews() -> Table {
    Table::new(
        "reviews",
        vec![
            Field::new("review_id", DataType::Id),
            Field::new("user_id", DataType::Id),
            Field::new("order_id", DataType::Id),
        ],
    )
    .with_primary_key("review_id")
}

mod bulk_setter_tests {
    use super::*;

    fn three_tables() -> MetaData {
        let mut metadata = MetaData::new();
        metadata
            .set_tables(vec![users(), orders(), reviews()])
            .unwrap();
        metadata
    }

    #[test]
    fn test_set_tables_keeps_input_order() {
        let metadata = three_tables();
        assert_eq!(
            metadata.get_table_names(),
            vec!["users", "orders", "reviews"]
        );
    }

    #[test]
    fn test_set_tables_stops_at_first_failure() {
        let mut metadata = MetaData::new();
        let err = metadata
            .set_tables(vec![users(), users(), orders()])
            .unwrap_err();
        assert!(matches!(
            err,
            MetadataError::Validation(ValidationError::DuplicateTable(ref t)) if t == "users"
        ));
        assert_eq!(metadata.get_table_names(), vec!["users", "users"]);
    }

    #[test]
    fn test_set_foreign_keys_keeps_input_order() {
        let mut metadata = three_tables();
        let keys = vec![
            ForeignKey::new("reviews", "order_id", "orders", "order_id"),
            ForeignKey::new("orders", "user_id", "users", "user_id"),
        ];
        metadata.set_foreign_keys(keys.clone()).unwrap();
        assert_eq!(metadata.get_foreign_keys(None), keys);
    }

    #[test]
    fn test_set_foreign_keys_stops_at_first_failure() {
        let mut metadata = three_tables();
        let ok = ForeignKey::new("orders", "user_id", "users", "user_id");
        let dangling = ForeignKey::new("orders", "user_id", "customers", "id");
        let ok2 = ForeignKey::new("reviews", "user_id", "users", "user_id");

        let err = metadata
            .set_foreign_keys(vec![ok.clone(), dangling.clone(), ok2])
            .unwrap_err();
        assert!(matches!(
            err,
            MetadataError::Validation(ValidationError::DanglingForeignKey { ref ref_table, .. })
                if ref_table == "customers"
        ));
        assert_eq!(metadata.get_foreign_keys(None), vec![ok, dangling]);
    }

    #[test]
    fn test_set_constraints_stops_at_first_failure() {
        let mut metadata = three_tables();
        let ok = Constraint::new(
            vec![FieldRef::new("orders", "amount")],
            vec![FieldRef::new("orders", "user_id")],
        );
        let dangling = Constraint::new(vec![FieldRef::new("orders", "discount")], vec![]);
        let ok2 = Constraint::new(
            vec![FieldRef::new("reviews", "order_id")],
            vec![FieldRef::new("orders", "order_id")],
        );

        let err = metadata
            .set_constraints(vec![ok.clone(), dangling.clone(), ok2])
            .unwrap_err();
        assert!(matches!(
            err,
            MetadataError::Validation(ValidationError::DanglingConstraintField {
                constraint: 1,
                ..
            })
        ));
        assert_eq!(metadata.get_constraints(), vec![ok, dangling]);
    }

    #[test]
    fn test_set_constraints_keeps_input_order() {
        let mut metadata = three_tables();
        let constraints = vec![
            Constraint::new(vec![FieldRef::new("reviews", "user_id")], vec![]),
            Constraint::new(vec![FieldRef::new("orders", "amount")], vec![]),
        ];
        metadata.set_constraints(constraints.clone()).unwrap();
        assert_eq!(metadata.get_constraints(), constraints);
    }
}

mod key_tests {
    use super::*;

    fn two_tables() -> MetaData {
        let mut metadata = MetaData::new();
        metadata
            .add_table(
                Table::new(
                    "parent",
                    vec![
                        Field::new("a", DataType::Id),
                        Field::new("b", DataType::Id),
                        Field::new("c", DataType::Id),
                    ],
                )
                .with_primary_key(vec!["a", "b"]),
            )
            .unwrap();
        metadata
            .add_table(Table::new(
                "child",
                vec![
                    Field::new("pa", DataType::Id),
                    Field::new("pb", DataType::Id),
                    Field::new("pc", DataType::Id),
                ],
            ))
            .unwrap();
        metadata
    }

    #[test]
    fn test_composite_foreign_key() {
        let mut metadata = two_tables();
        metadata
            .add_foreign_key(ForeignKey::new(
                "child",
                vec!["pa", "pb"],
                "parent",
                vec!["a", "b"],
            ))
            .unwrap();
        let json = metadata.to_json(None).unwrap();
        assert!(json.contains("\"pa\""));
    }

    #[test]
    fn test_arity_mismatch() {
        let mut metadata = two_tables();
        let err = metadata
            .add_foreign_key(ForeignKey::new(
                "child",
                vec!["pa", "pb"],
                "parent",
                vec!["a", "b", "c"],
            ))
            .unwrap_err();
        assert!(matches!(
            err,
            MetadataError::Validation(ValidationError::KeyArity {
                field_arity: 2,
                ref_field_arity: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_scalar_against_list_is_structural() {
        let mut metadata = two_tables();
        let err = metadata
            .add_foreign_key(ForeignKey::new("child", "pa", "parent", vec!["a", "b"]))
            .unwrap_err();
        match err {
            MetadataError::Validation(e) => assert!(e.is_structural()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_single_element_list_collapses() {
        let table = Table::new("t", vec![Field::new("id", DataType::Id)])
            .with_primary_key(Key::Composite(vec!["id".to_string()]));
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["primary_key"], "id");
    }
}

mod file_tests {
    use super::*;

    #[test]
    fn test_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.json");

        let original = MetaData::from_json(fixture("shop.json")).unwrap();
        original.validate().unwrap();
        let written = original.to_json(Some(path.as_path())).unwrap();

        let reloaded = MetaData::from_json(&path).unwrap();
        assert_eq!(reloaded, original);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), written);
    }

    #[test]
    fn test_constraint_payload_is_kept() {
        let metadata = MetaData::from_json(fixture("shop.json")).unwrap();
        let constraints = metadata.get_constraints();
        assert_eq!(constraints.len(), 1);
        assert_eq!(constraints[0].payload["type"], "sum_of_products");
    }

    #[test]
    fn test_all_fixtures_are_valid() {
        let pattern = fixture("*.json");
        let mut count = 0;
        for entry in glob::glob(pattern.to_str().unwrap()).unwrap() {
            let path = entry.unwrap();
            let metadata = MetaData::from_json(&path).unwrap();
            metadata
                .validate()
                .unwrap_or_else(|e| panic!("{}: {}", path.display(), e));
            assert!(metadata.to_string().starts_with("Number of Tables: "));
            count += 1;
        }
        assert!(count >= 2);
    }

    #[test]
    fn test_describe_output() {
        let metadata = MetaData::from_json(fixture("financial.json")).unwrap();
        let summary = metadata.to_string();
        assert!(summary.starts_with(
            "Number of Tables: 3\nNumber of Foreign Keys: 2\nNumber of Constraints: 0\n\n"
        ));
        assert!(summary.contains("Table: loan\n   *loan_id\n    account_id\n"));
    }

    #[test]
    fn test_missing_file() {
        let err = MetaData::from_json(fixture("missing.json")).unwrap_err();
        assert!(matches!(err, MetadataError::Io { .. }));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = MetaData::from_json_str(r#"{"tables": [], "views": []}"#).unwrap_err();
        assert!(matches!(err, MetadataError::Json(_)));
    }
}

mod validate_text_tests {
    use super::*;

    #[test]
    fn test_reports_json_path() {
        let content = r#"{
            "tables": [
                {"name": "t", "fields": [{"name": "x", "data_type": "decimal"}]}
            ]
        }"#;
        let err = validate_metadata_internal(content).unwrap_err();
        assert!(err.contains("/tables/0/fields/0"), "{err}");
    }

    #[test]
    fn test_subtype_must_match_type() {
        let content = r#"{
            "tables": [
                {"name": "t", "fields": [
                    {"name": "x", "data_type": "text", "data_subtype": "integer"}
                ]}
            ]
        }"#;
        assert!(validate_metadata_internal(content).is_err());
    }

    #[test]
    fn test_invalid_json() {
        let err = validate_metadata_internal("{not json").unwrap_err();
        assert!(err.starts_with("Failed to parse JSON"));
    }

    #[test]
    fn test_valid_fixture_text() {
        let content = std::fs::read_to_string(fixture("shop.json")).unwrap();
        assert!(validate_metadata_internal(&content).is_ok());
    }
}
