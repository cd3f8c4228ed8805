//! Property-based tests for statement construction and value round-trips
//!
//! These tests verify that:
//! - Every scalar type survives an insert/read cycle through a real store
//! - Generated statements always carry one parameter per placeholder
//! - Identifier validation accepts plain identifiers and nothing else

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use sqlite_connect::core::db::{query, schema};
    use sqlite_connect::{columns, DatabaseHandle, ErrorPolicy, Record, Value};

    // Test infrastructure

    fn open_scratch() -> DatabaseHandle {
        let mut db = DatabaseHandle::with_policy(":memory:", ErrorPolicy::Propagate);
        db.open().unwrap();
        db
    }

    fn arb_identifier() -> impl Strategy<Value = String> {
        "[a-zA-Z_][a-zA-Z0-9_]{0,29}".prop_map(|s: String| s)
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<i64>().prop_map(Value::Integer),
            (-1.0e12f64..1.0e12f64).prop_map(Value::Real),
            "[ -~]{0,40}".prop_map(Value::Text),
        ]
    }

    fn arb_record() -> impl Strategy<Value = Record> {
        prop::collection::btree_map(arb_identifier(), arb_value(), 1..8)
            .prop_map(|entries| entries.into_iter().collect::<Record>())
    }

    // Property tests

    proptest! {
        /// A value read back from an untyped column keeps both value and type
        #[test]
        fn prop_scalar_round_trip(value in arb_value()) {
            let db = open_scratch();
            db.create_table("scratch", &columns([("v", "BLOB")]), false).unwrap();

            let mut rec = Record::new();
            rec.insert("v".to_string(), value.clone());
            db.insert("scratch", &rec).unwrap();

            let rows = db.read_all("scratch").unwrap();
            prop_assert_eq!(rows.len(), 1);
            prop_assert_eq!(rows[0][0].type_name(), value.type_name());
            prop_assert_eq!(&rows[0][0], &value);
        }

        /// Insert statements have one placeholder per column, in record order
        #[test]
        fn prop_insert_placeholders_match_params(table in arb_identifier(), rec in arb_record()) {
            let stmt = query::insert(&table, &rec).unwrap();
            prop_assert_eq!(stmt.sql.matches('?').count(), rec.len());
            prop_assert_eq!(stmt.params, rec.values().cloned().collect::<Vec<_>>());
        }

        /// Update parameters are the new values followed by the condition values
        #[test]
        fn prop_update_parameter_order(table in arb_identifier(), values in arb_record(), condition in arb_record()) {
            let stmt = query::update(&table, &values, &condition).unwrap();
            let expected: Vec<Value> = values.values().chain(condition.values()).cloned().collect();
            prop_assert_eq!(stmt.sql.matches('?').count(), expected.len());
            prop_assert_eq!(stmt.params, expected);
        }

        /// Delete never embeds condition values in the statement text
        #[test]
        fn prop_delete_is_fully_bound(table in arb_identifier(), condition in arb_record()) {
            let stmt = query::delete(&table, &condition).unwrap();
            prop_assert_eq!(stmt.sql.matches('?').count(), condition.len());
            prop_assert!(!stmt.sql.contains('\''));
        }

        /// Generated identifiers are always accepted
        #[test]
        fn prop_plain_identifiers_accepted(name in arb_identifier()) {
            prop_assert!(schema::validate_identifier(&name).is_ok());
        }

        /// Any name containing SQL punctuation or whitespace is rejected
        #[test]
        fn prop_punctuated_identifiers_rejected(
            prefix in "[a-z]{0,5}",
            bad in prop::sample::select(vec![' ', ';', '\'', '"', '-', '(', ')', '*', '=']),
            suffix in "[a-z]{0,5}",
        ) {
            let name = format!("{}{}{}", prefix, bad, suffix);
            prop_assert!(schema::validate_identifier(&name).is_err());
        }
    }
}
