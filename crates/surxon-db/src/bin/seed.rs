//! # Seed Data Generator
//!
//! Populates an empty database with a demo catalog for development.
//!
//! ## Usage
//! ```bash
//! # Use surxon.toml / SURXON_* settings
//! cargo run -p surxon-db --bin seed
//!
//! # Specify database path or config file
//! cargo run -p surxon-db --bin seed -- --db ./data/surxon.db
//! cargo run -p surxon-db --bin seed -- --config ./surxon.toml
//! ```
//!
//! ## Generated Catalog
//! - Two-level category tree (Electronics > Phones, Laptops; Clothing > ...)
//! - A handful of brands
//! - Products with colors and discounts under every child category
//! - One superuser (`+998901234567`, password `admin`)

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use surxon_core::{DiscountRate, Money, NewBrand, NewProduct, NewUser};
use surxon_db::{CatalogConfig, Database, DbConfig};

/// Parent category → child categories.
const CATEGORIES: &[(&str, &[&str])] = &[
    ("Electronics", &["Phones", "Laptops", "Headphones"]),
    ("Clothing", &["Shirts", "Shoes"]),
    ("Home", &["Kitchen", "Lighting"]),
];

const BRANDS: &[&str] = &["Artel", "Samsung", "Xiaomi", "Uzum Basics"];

const COLORS: &[&str] = &["#000000", "#FFFFFF", "#1E90FF", "#C0C0C0", "#B22222"];

/// Discounts in basis points, cycled per product.
const DISCOUNTS: &[u32] = &[0, 0, 500, 1000, 2500];

const PRODUCTS_PER_CATEGORY: usize = 4;

struct Args {
    db_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
}

fn parse_args() -> Result<Option<Args>> {
    let mut args = Args {
        db_path: None,
        config_path: None,
    };

    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--db" | "-d" => {
                let value = iter.next().context("--db needs a path")?;
                args.db_path = Some(PathBuf::from(value));
            }
            "--config" | "-c" => {
                let value = iter.next().context("--config needs a path")?;
                args.config_path = Some(PathBuf::from(value));
            }
            "--help" | "-h" => {
                println!("Surxon Catalog Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>        Database file path (overrides config)");
                println!("  -c, --config <PATH>    Path to surxon.toml");
                println!("  -h, --help             Show this help message");
                return Ok(None);
            }
            other => bail!("unknown argument: {}", other),
        }
    }

    Ok(Some(args))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,surxon=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let Some(args) = parse_args()? else {
        return Ok(());
    };

    let mut config = CatalogConfig::load(args.config_path).context("loading catalog config")?;
    if let Some(path) = args.db_path {
        config.database.path = path;
    }

    info!(path = ?config.database.path, "Seeding catalog");

    let db = Database::new(DbConfig::from(&config))
        .await
        .context("opening database")?;

    let existing = db.products().count().await?;
    if existing > 0 {
        warn!(existing, "Database already has products, skipping seed");
        return Ok(());
    }

    let admin = db
        .users()
        .create_superuser(&NewUser {
            phone_number: "+998901234567".into(),
            username: "admin".into(),
            full_name: Some("Catalog Admin".into()),
            password: "admin".into(),
        })
        .await?;
    info!(user = %admin.display_name(), "Superuser created");

    let mut brand_ids = Vec::with_capacity(BRANDS.len());
    for name in BRANDS {
        let brand = db
            .brands()
            .create(&NewBrand {
                name: name.to_string(),
                logo_path: None,
            })
            .await?;
        brand_ids.push(brand.id);
    }

    let mut generated = 0usize;
    let start = std::time::Instant::now();

    for (parent_name, children) in CATEGORIES {
        let parent = db.categories().create(parent_name, None).await?;

        for child_name in children.iter() {
            let child = db.categories().create(child_name, Some(&parent.id)).await?;

            for n in 0..PRODUCTS_PER_CATEGORY {
                let seed = generated + n;
                let input = NewProduct {
                    title: format!("{} {} #{}", BRANDS[seed % BRANDS.len()], child_name, n + 1),
                    description: format!("Demo {} item from the {} range", child_name, parent_name),
                    price: Money::from_minor(50_000_00 + (seed as i64 * 17_350_00) % 2_000_000_00),
                    discount: DiscountRate::from_bps(DISCOUNTS[seed % DISCOUNTS.len()])?,
                    color_codes: COLORS
                        .iter()
                        .skip(seed % COLORS.len())
                        .take(1 + seed % 3)
                        .map(|c| c.to_string())
                        .collect(),
                    category_id: child.id.clone(),
                    brand_id: Some(brand_ids[seed % brand_ids.len()].clone()),
                };

                let product = db.products().create(&input).await?;
                info!(code = %product.code, title = %product.title, "Product created");
            }

            generated += PRODUCTS_PER_CATEGORY;
        }

        let listing = db.products().for_category(&parent.id).await?;
        info!(
            category = %parent.name,
            products = listing.len(),
            "Parent listing includes all child products"
        );
    }

    info!(
        products = generated,
        elapsed = ?start.elapsed(),
        "Seed complete"
    );

    db.close().await;
    Ok(())
}
