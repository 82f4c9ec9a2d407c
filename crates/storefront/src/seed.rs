//! Seed dataset loaded at startup.
//!
//! The store accepts any seed of this shape. [`Seed::demo`] reproduces the
//! demo catalog; [`Seed::from_path`] reads JSON or YAML files using the same
//! camelCase field names as the models.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use flipmart_core::{
    AccountStatus, CategoryId, Email, EmailError, OrderId, OrderStatus, Passphrase, Price,
    ProductId, UserId,
};

use crate::models::{CartItem, Category, Order, Product, User};

/// Errors that can occur while loading or validating a seed.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON seed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML seed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid email in seed: {0}")]
    Email(#[from] EmailError),

    #[error("seed must contain at least one category")]
    NoCategories,

    #[error("duplicate {entity} id {id} in seed")]
    DuplicateId { entity: &'static str, id: String },

    #[error("product {product} references missing category {category}")]
    DanglingCategory {
        product: ProductId,
        category: CategoryId,
    },

    #[error("order {order} references missing user {user}")]
    DanglingUser { order: OrderId, user: UserId },

    #[error("order {0} has no items")]
    EmptyOrder(OrderId),
}

/// A user record plus an optional login secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedUser {
    #[serde(flatten)]
    pub user: User,
    /// Falls back to the store's configured seed secret when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<Passphrase>,
}

/// Initial collections for a store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seed {
    #[serde(default)]
    pub users: Vec<SeedUser>,
    pub categories: Vec<Category>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub orders: Vec<Order>,
}

impl Seed {
    /// Parse a JSON seed.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Json` on malformed input.
    pub fn from_json_str(input: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Parse a YAML seed.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Yaml` on malformed input.
    pub fn from_yaml_str(input: &str) -> Result<Self, SeedError> {
        Ok(serde_yaml::from_str(input)?)
    }

    /// Read a seed file, choosing the format from its extension
    /// (`.yaml`/`.yml` for YAML, anything else JSON).
    ///
    /// # Errors
    ///
    /// Returns `SeedError` if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, SeedError> {
        let contents = std::fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        if is_yaml {
            Self::from_yaml_str(&contents)
        } else {
            Self::from_json_str(&contents)
        }
    }

    /// Check referential integrity.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found.
    pub fn validate(&self) -> Result<(), SeedError> {
        if self.categories.is_empty() {
            return Err(SeedError::NoCategories);
        }

        let user_ids = unique_ids("user", self.users.iter().map(|u| u.user.id))?;
        let category_ids = unique_ids("category", self.categories.iter().map(|c| c.id))?;
        unique_ids("product", self.products.iter().map(|p| p.id))?;
        unique_ids("order", self.orders.iter().map(|o| o.id.clone()))?;

        if let Some(product) = self
            .products
            .iter()
            .find(|p| !category_ids.contains(&p.category_id))
        {
            return Err(SeedError::DanglingCategory {
                product: product.id,
                category: product.category_id,
            });
        }

        for order in &self.orders {
            if !user_ids.contains(&order.user_id) {
                return Err(SeedError::DanglingUser {
                    order: order.id.clone(),
                    user: order.user_id,
                });
            }
            if order.items.is_empty() {
                return Err(SeedError::EmptyOrder(order.id.clone()));
            }
        }

        Ok(())
    }

    /// The demo dataset: three customers (one VIP, one blocked), seven
    /// categories, fifteen products, and four orders in mixed states with
    /// creation times relative to `now`.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Email` only if a literal address is malformed.
    pub fn demo(now: DateTime<Utc>) -> Result<Self, SeedError> {
        let users = vec![
            demo_user(
                1,
                "John Doe",
                "john.doe@example.com",
                "123-456-7890",
                "123 Tech Lane, Silicon Valley, CA 94000",
                true,
                AccountStatus::Active,
            )?,
            demo_user(
                2,
                "Jane Smith",
                "jane.smith@example.com",
                "098-765-4321",
                "456 Code Avenue, Bangalore, KA 560001",
                false,
                AccountStatus::Active,
            )?,
            demo_user(
                3,
                "Sam Brown",
                "sam.brown@example.com",
                "555-555-5555",
                "789 Blocked St, Forbidden City, CN 100000",
                false,
                AccountStatus::Blocked,
            )?,
        ];

        let categories = [
            (1, "Mobiles", true),
            (2, "Laptops", true),
            (3, "Fashion", true),
            (4, "Home", true),
            (5, "Appliances", false),
            (6, "Electronics", true),
            (7, "Grocery", false),
        ]
        .into_iter()
        .map(|(id, name, is_featured)| Category {
            id: CategoryId::new(id),
            name: name.to_string(),
            image: format!("https://picsum.photos/id/{}/100/100", id + 10),
            is_featured,
        })
        .collect();

        let products: Vec<Product> = [
            (101, 1, "Galaxy S23 Ultra", "Premium smartphone with advanced camera features.", 119_999, 15),
            (102, 1, "iPhone 15 Pro", "The latest iPhone with A17 Bionic chip.", 134_900, 10),
            (103, 1, "Google Pixel 8", "The smart and helpful phone from Google.", 75_999, 25),
            (201, 2, "MacBook Air M2", "Lightweight and powerful laptop for everyday use.", 99_900, 20),
            (202, 2, "Dell XPS 15", "High-performance laptop with a stunning display.", 150_000, 8),
            (203, 2, "HP Spectre x360", "A versatile 2-in-1 laptop with powerful performance.", 125_000, 15),
            (301, 3, "Nike Air Max", "Comfortable and stylish sneakers.", 8_999, 50),
            (302, 3, "Levi's 501 Jeans", "Classic straight-fit jeans for timeless style.", 3_999, 100),
            (401, 4, "Smart Sofa", "A comfortable sofa with built-in chargers.", 25_000, 12),
            (402, 4, "Philips Hue Starter Kit", "Smart lighting for your entire home.", 6_500, 40),
            (501, 5, "LG Smart TV 55\"", "4K UHD Smart TV with WebOS.", 55_000, 18),
            (502, 5, "Samsung Refrigerator", "Double door refrigerator with digital inverter.", 35_000, 22),
            (601, 6, "Sony WH-1000XM5", "Industry leading noise cancelling headphones.", 29_990, 30),
            (602, 6, "Bose Smart Soundbar 600", "Immersive sound for movies and music.", 45_000, 18),
            (701, 7, "Organic Apples", "Fresh and juicy organic apples, pack of 6.", 250, 200),
        ]
        .into_iter()
        .map(|(id, category, name, description, rupees, stock)| Product {
            id: ProductId::new(id),
            category_id: CategoryId::new(category),
            name: name.to_string(),
            description: description.to_string(),
            price: Price::from_rupees(rupees),
            stock,
            image: format!("https://picsum.photos/id/{id}/400/400"),
        })
        .collect();

        let line = |id: i64, quantity: u32| {
            products
                .iter()
                .find(|p| p.id == ProductId::new(id))
                .map(|p| CartItem::new(p.clone(), quantity))
        };
        let order = |id: &str,
                     user: i64,
                     items: Vec<Option<CartItem>>,
                     status: OrderStatus,
                     age: Duration,
                     address: &str| {
            let items: Vec<CartItem> = items.into_iter().flatten().collect();
            Order {
                id: OrderId::from(id),
                user_id: UserId::new(user),
                total_amount: items.iter().map(CartItem::line_total).sum(),
                items,
                status,
                created_at: now - age,
                address: address.to_string(),
            }
        };

        let orders = vec![
            order(
                "OD123456789",
                1,
                vec![line(101, 1), line(202, 2)],
                OrderStatus::Dispatched,
                Duration::days(2),
                "123 Tech Lane, Silicon Valley, CA 94000",
            ),
            order(
                "OD987654321",
                2,
                vec![line(201, 1)],
                OrderStatus::Delivered,
                Duration::days(10),
                "456 Code Avenue, Bangalore, KA 560001",
            ),
            order(
                "OD555555555",
                1,
                vec![line(301, 1), line(302, 3)],
                OrderStatus::Placed,
                Duration::days(1),
                "123 Tech Lane, Silicon Valley, CA 94000",
            ),
            order(
                "OD333333333",
                3,
                vec![line(501, 1)],
                OrderStatus::PendingConfirmation,
                Duration::hours(3),
                "789 Blocked St, Forbidden City, CN 100000",
            ),
        ];

        Ok(Self {
            users,
            categories,
            products,
            orders,
        })
    }
}

fn demo_user(
    id: i64,
    name: &str,
    email: &str,
    phone: &str,
    address: &str,
    is_vip: bool,
    status: AccountStatus,
) -> Result<SeedUser, SeedError> {
    Ok(SeedUser {
        user: User {
            id: UserId::new(id),
            name: name.to_string(),
            email: Email::parse(email)?,
            phone: phone.to_string(),
            address: address.to_string(),
            is_vip,
            status,
        },
        secret: None,
    })
}

fn unique_ids<T>(entity: &'static str, ids: impl Iterator<Item = T>) -> Result<HashSet<T>, SeedError>
where
    T: std::hash::Hash + Eq + ToString,
{
    let mut seen = HashSet::new();
    for id in ids {
        let rendered = id.to_string();
        if !seen.insert(id) {
            return Err(SeedError::DuplicateId {
                entity,
                id: rendered,
            });
        }
    }
    Ok(seen)
}
