// ABOUTME: Food entity kind - nutrition values per 100 g, keyed by unique name
// ABOUTME: Column declarations, typed handles, and accessor sugar
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder

use std::sync::LazyLock;

use chrono::{DateTime, Utc};

use crate::entity::Entity;
use crate::schema::{Column, ColumnSpec, EntityKind, Table, ValueType};

/// Entity kind marker for foods
#[derive(Debug)]
pub struct Food;

/// Ordered column declarations for the `foods` table.
/// `name` is the natural key: unique, human-meaningful, and what imports
/// use to reference a food without knowing its surrogate id.
pub static COLUMNS: [ColumnSpec; 11] = [
    ColumnSpec::new("id", 0, ValueType::Integer).read_only(),
    ColumnSpec::new("created_at", 1, ValueType::Timestamp).read_only(),
    ColumnSpec::new("modified_at", 2, ValueType::Timestamp).read_only(),
    ColumnSpec::new("name", 3, ValueType::Text).unique().secondary_key(),
    ColumnSpec::new("brand", 4, ValueType::Text).nullable(),
    ColumnSpec::new("category", 5, ValueType::Text).nullable(),
    ColumnSpec::new("energy_kcal", 6, ValueType::Real),
    ColumnSpec::new("protein_g", 7, ValueType::Real),
    ColumnSpec::new("carbs_g", 8, ValueType::Real),
    ColumnSpec::new("fat_g", 9, ValueType::Real),
    ColumnSpec::new("density_g_per_ml", 10, ValueType::Real).nullable(),
];

pub static ID: Column<Food, i64> = Column::new(&COLUMNS[0]);
pub static CREATED_AT: Column<Food, DateTime<Utc>> = Column::new(&COLUMNS[1]);
pub static MODIFIED_AT: Column<Food, DateTime<Utc>> = Column::new(&COLUMNS[2]);
pub static NAME: Column<Food, String> = Column::new(&COLUMNS[3]);
pub static BRAND: Column<Food, String> = Column::new(&COLUMNS[4]);
pub static CATEGORY: Column<Food, String> = Column::new(&COLUMNS[5]);
pub static ENERGY_KCAL: Column<Food, f64> = Column::new(&COLUMNS[6]);
pub static PROTEIN_G: Column<Food, f64> = Column::new(&COLUMNS[7]);
pub static CARBS_G: Column<Food, f64> = Column::new(&COLUMNS[8]);
pub static FAT_G: Column<Food, f64> = Column::new(&COLUMNS[9]);
pub static DENSITY_G_PER_ML: Column<Food, f64> = Column::new(&COLUMNS[10]);

impl EntityKind for Food {
    const TABLE: &'static str = "foods";

    fn columns() -> &'static [ColumnSpec] {
        &COLUMNS
    }

    fn table() -> &'static Table<Self> {
        static TABLE: LazyLock<Table<Food>> =
            LazyLock::new(|| Table::build().expect("foods table metadata"));
        &TABLE
    }
}

impl Entity<Food> {
    /// Food name, the natural key
    #[must_use]
    pub fn name(&self) -> String {
        self.get(&NAME).expect("required column")
    }

    /// Brand name, if any
    #[must_use]
    pub fn brand(&self) -> Option<String> {
        self.get(&BRAND)
    }

    /// Category, if any
    #[must_use]
    pub fn category(&self) -> Option<String> {
        self.get(&CATEGORY)
    }

    /// Energy per 100 g, kcal
    #[must_use]
    pub fn energy_kcal(&self) -> f64 {
        self.get(&ENERGY_KCAL).expect("required column")
    }

    /// Protein per 100 g
    #[must_use]
    pub fn protein_g(&self) -> f64 {
        self.get(&PROTEIN_G).expect("required column")
    }

    /// Carbohydrates per 100 g
    #[must_use]
    pub fn carbs_g(&self) -> f64 {
        self.get(&CARBS_G).expect("required column")
    }

    /// Fat per 100 g
    #[must_use]
    pub fn fat_g(&self) -> f64 {
        self.get(&FAT_G).expect("required column")
    }

    /// Density in g/ml for volume conversions, if known
    #[must_use]
    pub fn density_g_per_ml(&self) -> Option<f64> {
        self.get(&DENSITY_G_PER_ML)
    }
}
