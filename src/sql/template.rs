// ABOUTME: Parameterized SQL statement text generated from table metadata
// ABOUTME: SELECT (eq/IN/LIKE variants), INSERT, UPDATE, DELETE builders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder

//! SQL template generation.
//!
//! Every statement the persistence layer issues is produced here from table
//! and column metadata, never written by hand at a call site. Templates use
//! `$n` placeholders; binding the values is the binder's job so that all
//! raw-type conversion happens at the column type definition.

use crate::schema::ColumnSpec;

fn column_list(columns: &[&ColumnSpec]) -> String {
    columns
        .iter()
        .map(|c| c.name)
        .collect::<Vec<_>>()
        .join(", ")
}

fn placeholders(start: usize, count: usize) -> String {
    (start..start + count)
        .map(|n| format!("${n}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `SELECT <cols> FROM <table>` with no predicate (select-all)
#[must_use]
pub fn select(table: &str, columns: &[&ColumnSpec]) -> String {
    format!("SELECT {} FROM {table}", column_list(columns))
}

/// `SELECT <cols> FROM <table> WHERE <key> = $1`
#[must_use]
pub fn select_where_eq(table: &str, columns: &[&ColumnSpec], key: &ColumnSpec) -> String {
    format!(
        "SELECT {} FROM {table} WHERE {} = $1",
        column_list(columns),
        key.name
    )
}

/// `SELECT <cols> FROM <table> WHERE <key> IN ($1..$count)`.
/// Zero where-values means no predicate: the select-all template.
#[must_use]
pub fn select_where_in(
    table: &str,
    columns: &[&ColumnSpec],
    key: &ColumnSpec,
    count: usize,
) -> String {
    if count == 0 {
        return select(table, columns);
    }
    format!(
        "SELECT {} FROM {table} WHERE {} IN ({})",
        column_list(columns),
        key.name,
        placeholders(1, count)
    )
}

/// Keyword search: OR'd `LIKE` predicates across the given text columns,
/// one placeholder per column (the binder appends the wildcard for prefix
/// matching). Zero search columns means no predicate.
#[must_use]
pub fn select_where_like_any(
    table: &str,
    columns: &[&ColumnSpec],
    search_columns: &[&ColumnSpec],
) -> String {
    if search_columns.is_empty() {
        return select(table, columns);
    }
    let predicates = search_columns
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{} LIKE ${}", c.name, i + 1))
        .collect::<Vec<_>>()
        .join(" OR ");
    format!(
        "SELECT {} FROM {table} WHERE {predicates}",
        column_list(columns)
    )
}

/// `INSERT INTO <table> (<cols>) VALUES ($1..$n)`.
/// The caller's ordered column list decides whether the id is preserved
/// (restore) or assigned by the store (fresh create).
#[must_use]
pub fn insert(table: &str, columns: &[&ColumnSpec]) -> String {
    format!(
        "INSERT INTO {table} ({}) VALUES ({})",
        column_list(columns),
        placeholders(1, columns.len())
    )
}

/// `UPDATE <table> SET <col> = $n, ... WHERE id = $last`
#[must_use]
pub fn update_by_id(table: &str, set_columns: &[&ColumnSpec]) -> String {
    let assignments = set_columns
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{} = ${}", c.name, i + 1))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE {table} SET {assignments} WHERE id = ${}",
        set_columns.len() + 1
    )
}

/// `DELETE FROM <table> WHERE id = $1`
#[must_use]
pub fn delete_by_id(table: &str) -> String {
    format!("DELETE FROM {table} WHERE id = $1")
}

/// `DELETE FROM <table> WHERE <key> IN ($1..$count)`
#[must_use]
pub fn delete_where_in(table: &str, key: &ColumnSpec, count: usize) -> String {
    format!(
        "DELETE FROM {table} WHERE {} IN ({})",
        key.name,
        placeholders(1, count)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ValueType;

    static NAME: ColumnSpec = ColumnSpec::new("name", 3, ValueType::Text);
    static BRAND: ColumnSpec = ColumnSpec::new("brand", 4, ValueType::Text);
    static CATEGORY: ColumnSpec = ColumnSpec::new("category", 5, ValueType::Text);
    static ID: ColumnSpec = ColumnSpec::new("id", 0, ValueType::Integer);

    #[test]
    fn select_without_where_values_has_no_predicate() {
        let sql = select_where_in("foods", &[&ID, &NAME], &ID, 0);
        assert_eq!(sql, "SELECT id, name FROM foods");
    }

    #[test]
    fn select_in_numbers_placeholders_densely() {
        let sql = select_where_in("foods", &[&ID, &NAME], &NAME, 3);
        assert_eq!(
            sql,
            "SELECT id, name FROM foods WHERE name IN ($1, $2, $3)"
        );
    }

    #[test]
    fn keyword_search_ors_one_like_per_text_column() {
        let sql = select_where_like_any("foods", &[&ID, &NAME], &[&NAME, &BRAND, &CATEGORY]);
        assert_eq!(
            sql,
            "SELECT id, name FROM foods WHERE name LIKE $1 OR brand LIKE $2 OR category LIKE $3"
        );
    }

    #[test]
    fn insert_mirrors_the_given_column_order() {
        let sql = insert("foods", &[&NAME, &BRAND]);
        assert_eq!(sql, "INSERT INTO foods (name, brand) VALUES ($1, $2)");
    }

    #[test]
    fn update_sets_all_given_columns_and_keys_on_id() {
        let sql = update_by_id("foods", &[&NAME, &BRAND]);
        assert_eq!(sql, "UPDATE foods SET name = $1, brand = $2 WHERE id = $3");
    }

    #[test]
    fn delete_templates() {
        assert_eq!(delete_by_id("foods"), "DELETE FROM foods WHERE id = $1");
        assert_eq!(
            delete_where_in("foods", &NAME, 2),
            "DELETE FROM foods WHERE name IN ($1, $2)"
        );
    }
}
