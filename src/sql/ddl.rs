// ABOUTME: DDL text generated from table metadata at migration time
// ABOUTME: Column nullability/uniqueness/references map 1:1 to descriptor flags
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder

use crate::schema::table::ID_INDEX;
use crate::schema::TableInfo;

/// `CREATE TABLE IF NOT EXISTS` statement for one table.
///
/// The id column is the integer primary key; every other constraint comes
/// straight from the column descriptors, so DDL can never drift from the
/// metadata.
#[must_use]
pub fn create_table(info: &TableInfo) -> String {
    let mut definitions = Vec::with_capacity(info.columns.len());
    for column in info.columns {
        if column.index == ID_INDEX {
            definitions.push(format!("{} INTEGER PRIMARY KEY AUTOINCREMENT", column.name));
            continue;
        }
        let mut definition = format!("{} {}", column.name, column.value_type.sql_type());
        if !column.nullable {
            definition.push_str(" NOT NULL");
        }
        if column.unique {
            definition.push_str(" UNIQUE");
        }
        if let Some(fk) = column.references {
            definition.push_str(&format!(" REFERENCES {}({})", fk.table, fk.column));
        }
        definitions.push(definition);
    }
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
        info.name,
        definitions.join(",\n    ")
    )
}

/// Index statements for one table: a composite index over the secondary
/// key and one per foreign-key column
#[must_use]
pub fn create_indexes(info: &TableInfo) -> Vec<String> {
    let mut statements = Vec::new();

    let secondary: Vec<&str> = info
        .columns
        .iter()
        .filter(|c| c.in_secondary_key)
        .map(|c| c.name)
        .collect();
    if !secondary.is_empty() {
        statements.push(format!(
            "CREATE INDEX IF NOT EXISTS idx_{}_secondary ON {}({})",
            info.name,
            info.name,
            secondary.join(", ")
        ));
    }

    for column in info.columns.iter().filter(|c| c.is_foreign_key()) {
        statements.push(format!(
            "CREATE INDEX IF NOT EXISTS idx_{}_{} ON {}({})",
            info.name, column.name, info.name, column.name
        ));
    }

    statements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{self, FoodPortion};
    use crate::schema::EntityKind;

    #[test]
    fn food_portion_ddl_carries_constraints_from_metadata() {
        let info = FoodPortion::table().info();
        let sql = create_table(&info);
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS food_portions"));
        assert!(sql.contains("id INTEGER PRIMARY KEY AUTOINCREMENT"));
        assert!(sql.contains("meal_id INTEGER NOT NULL REFERENCES meals(id)"));
        assert!(sql.contains("serving_id INTEGER REFERENCES servings(id)"));
        assert!(!sql.contains("serving_id INTEGER NOT NULL"));
    }

    #[test]
    fn natural_key_renders_as_unique() {
        let registry = models::registry().unwrap();
        let foods = registry.table("foods").unwrap();
        let sql = create_table(foods);
        assert!(sql.contains("name TEXT NOT NULL UNIQUE"));
    }

    #[test]
    fn indexes_cover_secondary_keys_and_foreign_keys() {
        let info = FoodPortion::table().info();
        let indexes = create_indexes(&info);
        assert!(indexes
            .iter()
            .any(|s| s.contains("idx_food_portions_meal_id")));
        assert!(indexes
            .iter()
            .any(|s| s.contains("idx_food_portions_food_id")));
    }
}
