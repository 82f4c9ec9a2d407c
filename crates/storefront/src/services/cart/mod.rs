//! Cart ledger for the active session.
//!
//! Holds at most one line per product. Figures are recomputed from the lines
//! on every read. The VIP discount follows the live directory record of the
//! signed-in user rather than the copy taken at sign-in, so a VIP change
//! made by the operator applies to the open cart immediately.

mod error;

pub use error::CartError;

use tracing::{debug, info, instrument};

use flipmart_core::{Price, ProductId};

use crate::error::{Entity, NotFoundError};
use crate::models::{CartItem, CartSummary, Product};
use crate::state::Store;

/// Cart service.
pub struct CartLedger<'a> {
    store: &'a Store,
}

impl<'a> CartLedger<'a> {
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Add `quantity` units of `product`.
    ///
    /// A product already in the cart has its quantity increased; otherwise a
    /// snapshot of `product` is inserted.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` if `quantity` is zero.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add_item(&self, product: &Product, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        let mut session = self.store.data().session.write().await;
        if let Some(line) = session.cart.iter_mut().find(|l| l.product_id() == product.id) {
            line.quantity = line.quantity.saturating_add(quantity);
            debug!(quantity = line.quantity, "Cart line increased");
        } else {
            session.cart.push(CartItem::new(product.clone(), quantity));
            debug!(quantity, "Cart line added");
        }
        Ok(())
    }

    /// Set a line to exactly `quantity`. Zero or less removes the line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotFound` if the product is not in the cart and
    /// `CartError::InvalidQuantity` if `quantity` does not fit a `u32`.
    #[instrument(skip(self))]
    pub async fn set_quantity(&self, product_id: ProductId, quantity: i64) -> Result<(), CartError> {
        let mut session = self.store.data().session.write().await;
        let index = session
            .cart
            .iter()
            .position(|l| l.product_id() == product_id)
            .ok_or_else(|| NotFoundError::new(Entity::CartItem, &product_id))?;

        if quantity <= 0 {
            session.cart.remove(index);
            debug!("Cart line removed");
            return Ok(());
        }

        let quantity = u32::try_from(quantity).map_err(|_| CartError::InvalidQuantity)?;
        if let Some(line) = session.cart.get_mut(index) {
            line.quantity = quantity;
        }
        debug!(quantity, "Cart line quantity set");
        Ok(())
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotFound` if the product is not in the cart.
    #[instrument(skip(self))]
    pub async fn remove_item(&self, product_id: ProductId) -> Result<CartItem, CartError> {
        let mut session = self.store.data().session.write().await;
        let index = session
            .cart
            .iter()
            .position(|l| l.product_id() == product_id)
            .ok_or_else(|| NotFoundError::new(Entity::CartItem, &product_id))?;
        Ok(session.cart.remove(index))
    }

    /// Empty the cart.
    pub async fn clear(&self) {
        let mut session = self.store.data().session.write().await;
        if !session.cart.is_empty() {
            info!(lines = session.cart.len(), "Cart cleared");
        }
        session.cart.clear();
    }

    /// Current lines in insertion order.
    pub async fn items(&self) -> Vec<CartItem> {
        self.store.data().session.read().await.cart().to_vec()
    }

    /// Count, subtotal, VIP discount and total in one read.
    pub async fn summary(&self) -> CartSummary {
        let data = self.store.data();
        let session = data.session.read().await;
        let is_vip = match session.user_id() {
            Some(user_id) => data
                .accounts
                .read()
                .await
                .find(user_id)
                .is_some_and(|u| u.is_vip),
            None => false,
        };
        CartSummary::compute(session.cart(), is_vip)
    }

    /// Sum of quantities.
    pub async fn count(&self) -> u32 {
        self.summary().await.count
    }

    pub async fn subtotal(&self) -> Price {
        self.summary().await.subtotal
    }

    pub async fn vip_discount(&self) -> Price {
        self.summary().await.vip_discount
    }

    pub async fn total(&self) -> Price {
        self.summary().await.total
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use flipmart_core::UserId;

    use super::*;

    async fn product(store: &Store, id: i64) -> Product {
        store.catalog().product(ProductId::new(id)).await.unwrap()
    }

    #[tokio::test]
    async fn test_adding_same_product_merges_lines() {
        let store = Store::demo().unwrap();
        let cart = store.cart();
        let jeans = product(&store, 302).await;

        cart.add_item(&jeans, 2).await.unwrap();
        cart.add_item(&jeans, 3).await.unwrap();

        let items = cart.items().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items.first().unwrap().quantity, 5);
        assert_eq!(cart.count().await, 5);
    }

    #[tokio::test]
    async fn test_add_zero_is_rejected() {
        let store = Store::demo().unwrap();
        let jeans = product(&store, 302).await;
        assert_eq!(
            store.cart().add_item(&jeans, 0).await.unwrap_err(),
            CartError::InvalidQuantity
        );
        assert!(store.cart().items().await.is_empty());
    }

    #[tokio::test]
    async fn test_set_quantity_is_absolute_and_zero_removes() {
        let store = Store::demo().unwrap();
        let cart = store.cart();
        let shoes = product(&store, 301).await;

        cart.add_item(&shoes, 4).await.unwrap();
        cart.set_quantity(shoes.id, 2).await.unwrap();
        assert_eq!(cart.count().await, 2);

        cart.set_quantity(shoes.id, 0).await.unwrap();
        assert!(cart.items().await.is_empty());

        cart.add_item(&shoes, 1).await.unwrap();
        assert_eq!(cart.items().await.first().unwrap().quantity, 1);

        cart.set_quantity(shoes.id, -3).await.unwrap();
        assert!(cart.items().await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_line_is_not_found() {
        let store = Store::demo().unwrap();
        let cart = store.cart();
        assert!(matches!(
            cart.set_quantity(ProductId::new(101), 1).await.unwrap_err(),
            CartError::NotFound(_)
        ));
        assert!(matches!(
            cart.remove_item(ProductId::new(101)).await.unwrap_err(),
            CartError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_totals_without_vip() {
        let store = Store::demo().unwrap();
        store
            .accounts()
            .authenticate("jane.smith@example.com", "password")
            .await
            .unwrap();
        let cart = store.cart();
        cart.add_item(&product(&store, 301).await, 1).await.unwrap();
        cart.add_item(&product(&store, 302).await, 3).await.unwrap();

        let summary = cart.summary().await;
        assert_eq!(summary.subtotal, Price::from_rupees(20_996));
        assert_eq!(summary.vip_discount, Price::ZERO);
        assert_eq!(summary.total, summary.subtotal);
    }

    #[tokio::test]
    async fn test_vip_discount_follows_directory() {
        let store = Store::demo().unwrap();
        store
            .accounts()
            .authenticate("john.doe@example.com", "password")
            .await
            .unwrap();
        let cart = store.cart();
        cart.add_item(&product(&store, 201).await, 1).await.unwrap();

        assert_eq!(cart.vip_discount().await, Price::from_rupees(9_990));
        assert_eq!(cart.total().await, Price::from_rupees(89_910));

        store.accounts().set_vip(UserId::new(1), false).await.unwrap();
        assert_eq!(cart.total().await, Price::from_rupees(99_900));
    }

    #[tokio::test]
    async fn test_line_keeps_price_snapshot() {
        let store = Store::demo().unwrap();
        let mut apples = product(&store, 701).await;
        store.cart().add_item(&apples, 2).await.unwrap();

        apples.price = Price::from_rupees(300);
        store.catalog().update_product(apples).await.unwrap();

        assert_eq!(store.cart().subtotal().await, Price::from_rupees(500));
    }

    #[tokio::test]
    async fn test_logout_empties_cart() {
        let store = Store::demo().unwrap();
        store
            .accounts()
            .authenticate("jane.smith@example.com", "password")
            .await
            .unwrap();
        store.cart().add_item(&product(&store, 701).await, 1).await.unwrap();

        store.accounts().logout().await;
        assert!(store.cart().items().await.is_empty());
    }
}
