//! Seed the product catalog.
//!
//! Upserts the fixed catalog into `storefront.product`, keyed by ID,
//! then advances the ID sequence past the highest seeded row. Safe to
//! re-run; existing rows are updated in place.

use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use tracing::info;

use trailhead_core::ProductId;

/// Errors that can occur while seeding.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid seed data: {0}")]
    InvalidData(String),
}

struct SeedProduct {
    id: ProductId,
    name: &'static str,
    price: &'static str,
    category: &'static str,
    image: &'static str,
    description: &'static str,
    features: &'static [&'static str],
    sizes: &'static [&'static str],
    colors: &'static [&'static str],
}

const CATALOG: &[SeedProduct] = &[
    SeedProduct {
        id: ProductId::new(1),
        name: "Mountain Fleece Jacket",
        price: "89.99",
        category: "clothing",
        image: "https://images.unsplash.com/photo-1556821840-3a63f95609a7?w=600&h=600&fit=crop&auto=format",
        description: "Stay warm and comfortable in our premium Mountain Fleece Jacket. Made from high-quality fleece material that provides excellent insulation while remaining breathable. Perfect for hiking, camping, or casual everyday wear.",
        features: &[
            "Premium fleece material",
            "Moisture-wicking technology",
            "Zippered pockets",
            "Elastic cuffs for fit",
            "Available in multiple colors",
        ],
        sizes: &["XS", "S", "M", "L", "XL", "XXL"],
        colors: &["Navy Blue", "Forest Green", "Charcoal Gray", "Burgundy"],
    },
    SeedProduct {
        id: ProductId::new(2),
        name: "Waterproof Hiking Pants",
        price: "79.99",
        category: "clothing",
        image: "https://images.unsplash.com/photo-1473966968600-fa801b869a1a?w=600&h=600&fit=crop&auto=format",
        description: "Conquer any trail with our Waterproof Hiking Pants. Designed with advanced waterproof technology and reinforced knees, these pants are built to withstand the elements while providing maximum comfort and mobility.",
        features: &[
            "100% waterproof construction",
            "Reinforced knees and seat",
            "Multiple storage pockets",
            "Adjustable waistband",
            "Lightweight and packable",
        ],
        sizes: &["28", "30", "32", "34", "36", "38"],
        colors: &["Khaki", "Olive Green", "Stone Gray", "Navy Blue"],
    },
    SeedProduct {
        id: ProductId::new(3),
        name: "Trail Hiking Boots",
        price: "149.99",
        category: "shoes",
        image: "https://images.unsplash.com/photo-1608256246200-53e635b5b65f?w=600&h=600&fit=crop&auto=format",
        description: "Experience superior traction and support with our Trail Hiking Boots. Featuring advanced grip technology and waterproof construction, these boots are designed for serious hikers who demand performance and durability.",
        features: &[
            "Vibram outsole for superior grip",
            "Waterproof leather construction",
            "Ankle support technology",
            "Cushioned insole for comfort",
            "Breathable lining",
        ],
        sizes: &["7", "8", "9", "10", "11", "12", "13"],
        colors: &["Brown Leather", "Black", "Dark Brown"],
    },
    SeedProduct {
        id: ProductId::new(4),
        name: "Performance Base Layer",
        price: "39.99",
        category: "clothing",
        image: "https://images.unsplash.com/photo-1586790170083-2f9ceadc732d?w=600&h=600&fit=crop&auto=format",
        description: "Our Performance Base Layer is engineered to keep you dry and comfortable during intense activities. Made from merino wool blend that regulates temperature and wicks moisture away from your skin.",
        features: &[
            "Merino wool blend",
            "Moisture-wicking technology",
            "Odor-resistant",
            "Seamless construction",
            "Four-way stretch",
        ],
        sizes: &["XS", "S", "M", "L", "XL", "XXL"],
        colors: &["Black", "White", "Navy", "Charcoal"],
    },
    SeedProduct {
        id: ProductId::new(5),
        name: "All-Terrain Running Shoes",
        price: "119.99",
        category: "shoes",
        image: "https://images.unsplash.com/photo-1606107557195-0e29a4b5b4aa?w=600&h=600&fit=crop&auto=format",
        description: "Transition seamlessly from road to trail with our All-Terrain Running Shoes. Featuring responsive cushioning and aggressive traction patterns, these shoes are perfect for runners who explore diverse landscapes.",
        features: &[
            "Responsive foam cushioning",
            "Aggressive trail-ready outsole",
            "Breathable mesh upper",
            "Rock protection plate",
            "Secure lace system",
        ],
        sizes: &["7", "8", "9", "10", "11", "12", "13"],
        colors: &["Blue/Orange", "Black/Green", "Gray/Red"],
    },
    SeedProduct {
        id: ProductId::new(6),
        name: "Wool Beanie",
        price: "29.99",
        category: "accessories",
        image: "https://images.unsplash.com/photo-1576871337632-b9aef4c17ab9?w=600&h=600&fit=crop&auto=format",
        description: "Keep warm in style with our premium Wool Beanie. Made from 100% merino wool, this beanie provides excellent warmth without bulk and is perfect for cold weather adventures.",
        features: &[
            "100% merino wool",
            "Breathable and warm",
            "One size fits all",
            "Soft and non-itchy",
            "Machine washable",
        ],
        sizes: &["One Size"],
        colors: &["Charcoal", "Navy", "Forest Green", "Burgundy", "Cream"],
    },
];

/// Seed the product catalog.
///
/// # Errors
///
/// Returns `SeedError` if the database URL is missing, a price fails
/// to parse, or a database operation fails.
pub async fn products() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("STOREFRONT_DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| SeedError::MissingEnvVar("STOREFRONT_DATABASE_URL"))?;

    info!("Connecting to storefront database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    info!(products = CATALOG.len(), "Seeding product catalog...");
    for product in CATALOG {
        upsert_product(&pool, product).await?;
    }

    // Advance the sequence past the fixed IDs so future inserts don't collide
    let max_id = CATALOG.iter().map(|p| p.id.as_i32()).max().unwrap_or(0);
    sqlx::query("SELECT setval(pg_get_serial_sequence('storefront.product', 'id'), $1, true)")
        .bind(i64::from(max_id))
        .execute(&pool)
        .await?;

    info!("Catalog seeded");
    Ok(())
}

async fn upsert_product(pool: &PgPool, product: &SeedProduct) -> Result<(), SeedError> {
    let price: Decimal = product
        .price
        .parse()
        .map_err(|_| SeedError::InvalidData(format!("bad price for product {}", product.id)))?;

    sqlx::query(
        r"
        INSERT INTO storefront.product
            (id, name, price, category, image, description, features, sizes, colors)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (id) DO UPDATE SET
            name = EXCLUDED.name,
            price = EXCLUDED.price,
            category = EXCLUDED.category,
            image = EXCLUDED.image,
            description = EXCLUDED.description,
            features = EXCLUDED.features,
            sizes = EXCLUDED.sizes,
            colors = EXCLUDED.colors
        ",
    )
    .bind(product.id)
    .bind(product.name)
    .bind(price)
    .bind(product.category)
    .bind(product.image)
    .bind(product.description)
    .bind(to_vec(product.features))
    .bind(to_vec(product.sizes))
    .bind(to_vec(product.colors))
    .execute(pool)
    .await?;

    Ok(())
}

fn to_vec(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_prices_parse() {
        for product in CATALOG {
            assert!(
                product.price.parse::<Decimal>().is_ok(),
                "bad price for product {}",
                product.id
            );
        }
    }

    #[test]
    fn test_catalog_ids_are_unique() {
        let mut ids: Vec<i32> = CATALOG.iter().map(|p| p.id.as_i32()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), CATALOG.len());
    }
}
