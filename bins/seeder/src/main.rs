//! Database seeder for Lavka development and testing.
//!
//! Seeds a handful of customers and products for local development.
//!
//! Usage: cargo run --bin seeder

use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use lavka_db::entities::{customers, products};

/// Seeded customer IDs (consistent for all seeds)
const CUSTOMER_IDS: [&str; 3] = [
    "00000000-0000-0000-0000-000000000101",
    "00000000-0000-0000-0000-000000000102",
    "00000000-0000-0000-0000-000000000103",
];

/// Seeded product IDs (consistent for all seeds)
const PRODUCT_IDS: [&str; 4] = [
    "00000000-0000-0000-0000-000000000201",
    "00000000-0000-0000-0000-000000000202",
    "00000000-0000-0000-0000-000000000203",
    "00000000-0000-0000-0000-000000000204",
];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = lavka_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding customers...");
    seed_customers(&db).await;

    println!("Seeding products...");
    seed_products(&db).await;

    println!("Seeding complete!");
}

fn parse_id(id: &str) -> Uuid {
    Uuid::parse_str(id).expect("seed IDs are valid")
}

/// Seeds test customers: two companies and one private person.
async fn seed_customers(db: &DatabaseConnection) {
    let rows = [
        (CUSTOMER_IDS[0], "ООО Ромашка", true, "info@romashka.example"),
        (CUSTOMER_IDS[1], "АО Вектор", true, "+7 495 000-00-00"),
        (CUSTOMER_IDS[2], "Иванов И.И.", false, ""),
    ];

    for (id, name, is_company, contact) in rows {
        let id = parse_id(id);
        if customers::Entity::find_by_id(id)
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            println!("  Customer {name} already exists, skipping...");
            continue;
        }

        let customer = customers::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            is_company: Set(is_company),
            contact: Set(contact.to_string()),
            created_at: Set(chrono::Utc::now().into()),
        };
        customer.insert(db).await.expect("Failed to seed customer");
    }
}

/// Seeds test products with stock on hand.
async fn seed_products(db: &DatabaseConnection) {
    let rows = [
        (PRODUCT_IDS[0], "Тетрадь 48 л.", "45.00", 120),
        (PRODUCT_IDS[1], "Ручка шариковая", "19.90", 500),
        (PRODUCT_IDS[2], "Степлер", "349.00", 25),
        (PRODUCT_IDS[3], "Бумага А4, 500 л.", "289.50", 60),
    ];

    for (id, name, price, quantity) in rows {
        let id = parse_id(id);
        if products::Entity::find_by_id(id)
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            println!("  Product {name} already exists, skipping...");
            continue;
        }

        let now = chrono::Utc::now();
        let product = products::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            price: Set(price.parse::<Decimal>().expect("seed prices are valid")),
            quantity: Set(quantity),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        product.insert(db).await.expect("Failed to seed product");
    }
}
