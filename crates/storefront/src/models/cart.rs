//! Cart line and pricing types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use flipmart_core::{Price, ProductId};

use super::catalog::Product;

/// Discount applied to the subtotal of a VIP customer's cart (10%).
pub const VIP_DISCOUNT_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// A product snapshot with a quantity of at least one.
///
/// Serialized flat, i.e. the product fields plus `quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    /// Snapshot `product` at `quantity`.
    #[must_use]
    pub fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// Price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// Derived cart figures.
///
/// Computed fresh from the items on every read, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CartSummary {
    /// Sum of quantities.
    pub count: u32,
    /// Sum of line totals.
    pub subtotal: Price,
    /// `subtotal × 10%` for VIP customers, zero otherwise.
    pub vip_discount: Price,
    /// `subtotal − vip_discount`.
    pub total: Price,
}

impl CartSummary {
    /// Price a set of cart lines.
    #[must_use]
    pub fn compute(items: &[CartItem], is_vip: bool) -> Self {
        let count = items
            .iter()
            .fold(0_u32, |acc, item| acc.saturating_add(item.quantity));
        let subtotal: Price = items.iter().map(CartItem::line_total).sum();
        let vip_discount = if is_vip {
            subtotal.portion(VIP_DISCOUNT_RATE)
        } else {
            Price::ZERO
        };

        Self {
            count,
            subtotal,
            vip_discount,
            total: subtotal - vip_discount,
        }
    }
}
