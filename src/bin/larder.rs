// ABOUTME: Larder CLI - command-line nutrition tracker over the typed store
// ABOUTME: Initializes the database, manages foods, and shows daily intake
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder
//!
//! Usage:
//! ```bash
//! # Create the database and schema
//! larder init
//!
//! # Add a food
//! larder food add --name "Rolled oats" --kcal 379 --protein 13.2 --carbs 67.7 --fat 6.5
//!
//! # Search foods by keyword
//! larder search oat
//!
//! # Show everything eaten on a day
//! larder day 2026-08-30
//! ```

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::info;

use larder::config::TrackerConfig;
use larder::database::Database;
use larder::entity::EntityDraft;
use larder::errors::AppResult;
use larder::logging::LoggingConfig;
use larder::models::{self, food, Food};

#[derive(Parser)]
#[command(
    name = "larder",
    about = "Command-line nutrition tracker",
    long_about = "Tracks foods, servings, meals, and recipes in a local SQLite store."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Create the database file and schema
    Init,

    /// Food management commands
    Food {
        #[command(subcommand)]
        action: FoodCommand,
    },

    /// Search foods by name, brand, or category prefix
    Search {
        /// Keyword to match
        keyword: String,
    },

    /// Show every meal eaten on a day
    Day {
        /// The day, as YYYY-MM-DD
        date: NaiveDate,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum FoodCommand {
    /// Add a food with its per-100g nutrients
    Add {
        /// Food name, unique across the store
        #[arg(long)]
        name: String,
        /// Brand, if any
        #[arg(long)]
        brand: Option<String>,
        /// Category, if any
        #[arg(long)]
        category: Option<String>,
        /// Energy per 100 g
        #[arg(long)]
        kcal: f64,
        /// Protein grams per 100 g
        #[arg(long)]
        protein: f64,
        /// Carbohydrate grams per 100 g
        #[arg(long)]
        carbs: f64,
        /// Fat grams per 100 g
        #[arg(long)]
        fat: f64,
        /// Density in g/ml for volume servings
        #[arg(long)]
        density: Option<f64>,
    },

    /// Show one food by exact name
    Show {
        /// Food name
        name: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = TrackerConfig::from_env()?;
    if let Some(url) = cli.database_url {
        config.database_url = url;
    }

    let mut logging = LoggingConfig::from_env();
    logging.level = if cli.verbose {
        "debug".into()
    } else {
        config.log_level.to_string()
    };
    logging.init()?;

    let db = Database::with_cache_capacity(
        &config.database_url,
        models::registry()?,
        config.cache_capacity,
    )
    .await?;

    match cli.command {
        Command::Init => {
            // Construction already ran the migration
            info!(url = %config.database_url, "database ready");
            println!("database ready at {}", config.database_url);
        }
        Command::Food { action } => run_food(&db, action).await?,
        Command::Search { keyword } => {
            let foods = db.search_foods(&keyword).await?;
            for item in &foods {
                print_food(item);
            }
            println!("{} foods match '{keyword}'", foods.len());
        }
        Command::Day { date } => {
            let views = db.meal_views_on(date).await?;
            if views.is_empty() {
                println!("nothing recorded on {date}");
            }
            for view in &views {
                println!(
                    "{} ({} portions)",
                    view.meal.meal_type().as_str(),
                    view.portions.len()
                );
                for portion in &view.portions {
                    println!(
                        "  {:>7.1} g  {}",
                        portion.portion.quantity_g(),
                        portion.food.name()
                    );
                }
            }
        }
    }

    Ok(())
}

async fn run_food(db: &Database, action: FoodCommand) -> AppResult<()> {
    match action {
        FoodCommand::Add {
            name,
            brand,
            category,
            kcal,
            protein,
            carbs,
            fat,
            density,
        } => {
            let mut draft = EntityDraft::<Food>::create();
            draft.set(&food::NAME, Some(name))?;
            draft.set(&food::BRAND, brand)?;
            draft.set(&food::CATEGORY, category)?;
            draft.set(&food::ENERGY_KCAL, Some(kcal))?;
            draft.set(&food::PROTEIN_G, Some(protein))?;
            draft.set(&food::CARBS_G, Some(carbs))?;
            draft.set(&food::FAT_G, Some(fat))?;
            draft.set(&food::DENSITY_G_PER_ML, density)?;
            let saved = db.save(&draft.build()?).await?;
            println!(
                "added '{}' with id {}",
                saved.name(),
                saved.id().unwrap_or_default()
            );
        }
        FoodCommand::Show { name } => match db.food_by_name(&name).await? {
            Some(item) => print_food(&item),
            None => println!("no food named '{name}'"),
        },
    }
    Ok(())
}

fn print_food(item: &larder::entity::Entity<Food>) {
    let brand = item.brand().unwrap_or_default();
    println!(
        "{:>4}  {}  {}  {:.0} kcal  P {:.1} C {:.1} F {:.1}",
        item.id().unwrap_or_default(),
        item.name(),
        brand,
        item.energy_kcal(),
        item.protein_g(),
        item.carbs_g(),
        item.fat_g()
    );
}
