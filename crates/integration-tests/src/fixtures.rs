//! Seed data for the fake backend.

use chrono::{NaiveDate, NaiveDateTime};
use fruit_mall_core::{CategoryId, MemberId, Price, ProductId, Role};
use fruit_mall_storefront::api::{Category, CurrentUser, Product};

use crate::backend::{BackendData, Member};

pub const MEMBER_USERNAME: &str = "kim";
pub const MEMBER_PASSWORD: &str = "password123";
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin-password";

/// Midnight on 2024-01-01 plus `days`.
#[must_use]
pub fn day(days: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.checked_add_days(chrono::Days::new(u64::from(days))))
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

pub fn category(id: i64, name: &str) -> Category {
    Category {
        id: CategoryId::new(id),
        name: name.to_string(),
        description: None,
        created_at: Some(day(0)),
        updated_at: None,
    }
}

#[allow(clippy::too_many_arguments)]
pub fn product(
    id: i64,
    name: &str,
    price: i64,
    category: &Category,
    origin: &str,
    season: &str,
    stock: i64,
    added_day: u32,
) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        origin: origin.to_string(),
        stock_quantity: stock,
        price: Price::from_won(price),
        category_id: category.id,
        category_name: category.name.clone(),
        season: season.to_string(),
        description: Some(format!("Fresh {name} from {origin}.")),
        image_url: None,
        created_at: day(added_day),
        updated_at: None,
    }
}

/// Three categories and thirteen products, one added per day.
///
/// Product `n` was added on day `n`, so product 13 is the newest.
#[must_use]
pub fn catalog() -> (Vec<Category>, Vec<Product>) {
    let citrus = category(1, "Citrus");
    let berries = category(2, "Berries");
    let tropical = category(3, "Tropical");

    let products = vec![
        product(1, "Hallabong", 32_000, &citrus, "Jeju", "WINTER", 40, 1),
        product(2, "Tangerine", 18_000, &citrus, "Jeju", "WINTER", 100, 2),
        product(3, "Lemon", 9_000, &citrus, "Chile", "ALL", 60, 3),
        product(4, "Grapefruit", 12_000, &citrus, "USA", "SPRING", 25, 4),
        product(5, "Strawberry", 15_000, &berries, "Nonsan", "SPRING", 80, 5),
        product(6, "Blueberry", 21_000, &berries, "USA", "SUMMER", 35, 6),
        product(7, "Raspberry", 24_000, &berries, "Chile", "SUMMER", 0, 7),
        product(8, "Shine Muscat", 45_000, &berries, "Gimcheon", "AUTUMN", 20, 8),
        product(9, "Mango", 38_000, &tropical, "Jeju", "SUMMER", 15, 9),
        product(10, "Pineapple", 11_000, &tropical, "Philippines", "ALL", 50, 10),
        product(11, "Banana", 5_000, &tropical, "Philippines", "ALL", 200, 11),
        product(12, "Papaya", 14_000, &tropical, "Thailand", "SUMMER", 12, 12),
        product(13, "Dragon Fruit", 16_000, &tropical, "Vietnam", "SUMMER", 18, 13),
    ];

    (vec![citrus, berries, tropical], products)
}

fn member(id: i64, username: &str, password: &str, roles: Vec<Role>) -> Member {
    Member {
        user: CurrentUser {
            id: MemberId::new(id),
            username: username.to_string(),
            email: format!("{username}@fruitmall.com"),
            name: format!("{username} tester"),
            phone_number: Some("010-1234-5678".to_string()),
            address: Some("Teheran-ro 152, Seoul".to_string()),
            roles,
        },
        password: password.to_string(),
    }
}

impl BackendData {
    /// The seeded catalog plus a member and an administrator.
    #[must_use]
    pub fn seeded() -> Self {
        let (categories, products) = catalog();
        let mut data = Self::default();
        data.categories = categories;
        data.products = products;
        data.members = vec![
            member(1, MEMBER_USERNAME, MEMBER_PASSWORD, vec![Role::User]),
            member(
                2,
                ADMIN_USERNAME,
                ADMIN_PASSWORD,
                vec![Role::User, Role::Admin],
            ),
        ];
        data.now = day(30);
        data
    }
}
