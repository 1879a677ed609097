//! Cart engine: orchestrates the cart repository and product lookups.
//!
//! Carts are scoped per (user, company) pair, so switching companies
//! switches to an independent cart. Reads never create a row; the first
//! mutation does. Each mutation loads the line list, applies one of the
//! pure list operations from [`crate::models::cart`], and writes the
//! whole list back.

use std::collections::HashMap;

use sqlx::PgPool;
use tracing::warn;

use comptoir_core::{CompanyId, ProductId, UserId};

use crate::db::{CartRepository, ProductRepository, RepositoryError};
use crate::models::{Cart, CartLineView, CartView, cart};

/// High-level cart operations used by the cart routes.
pub struct CartService<'a> {
    pool: &'a PgPool,
}

impl<'a> CartService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the cart for a (user, company) pair with product data
    /// resolved.
    ///
    /// A missing cart is indistinguishable from an empty one: both come
    /// back as an empty view, and no row is created.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn view(
        &self,
        user: UserId,
        company: CompanyId,
    ) -> Result<CartView, RepositoryError> {
        match CartRepository::new(self.pool).get(user, company).await? {
            Some(cart) => self.hydrate(cart).await,
            None => Ok(CartView::empty()),
        }
    }

    /// Add `quantity` of a product at the given unit-price snapshot.
    ///
    /// An existing line for the product has its quantity incremented and
    /// keeps its original snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not
    /// exist, or `RepositoryError::Database` if a query fails.
    pub async fn add_item(
        &self,
        user: UserId,
        company: CompanyId,
        product: ProductId,
        quantity: u32,
        price: f64,
    ) -> Result<CartView, RepositoryError> {
        // The product must still be in the catalogue at add time.
        ProductRepository::new(self.pool)
            .get_by_id(product)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let repo = CartRepository::new(self.pool);
        let mut cart = repo.get_or_create(user, company).await?;
        cart::merge_item(&mut cart.items, product, quantity, price);
        repo.save_items(cart.id, &cart.items).await?;

        self.hydrate(cart).await
    }

    /// Overwrite the quantity of an existing line.
    ///
    /// Targeting a product not in the cart is a silent no-op: the call
    /// still succeeds and returns the unchanged cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no cart exists for the
    /// pair, or `RepositoryError::Database` if a query fails.
    pub async fn update_quantity(
        &self,
        user: UserId,
        company: CompanyId,
        product: ProductId,
        quantity: u32,
    ) -> Result<CartView, RepositoryError> {
        let repo = CartRepository::new(self.pool);
        let mut cart = repo
            .get(user, company)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        if cart::set_quantity(&mut cart.items, product, quantity) {
            repo.save_items(cart.id, &cart.items).await?;
        }

        self.hydrate(cart).await
    }

    /// Remove the line for a product. Idempotent with respect to the
    /// product, but the cart itself must exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no cart exists for the
    /// pair, or `RepositoryError::Database` if a query fails.
    pub async fn remove_item(
        &self,
        user: UserId,
        company: CompanyId,
        product: ProductId,
    ) -> Result<CartView, RepositoryError> {
        let repo = CartRepository::new(self.pool);
        let mut cart = repo
            .get(user, company)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        cart::remove_item(&mut cart.items, product);
        repo.save_items(cart.id, &cart.items).await?;

        self.hydrate(cart).await
    }

    /// Empty the cart. The row itself is kept, never deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no cart exists for the
    /// pair, or `RepositoryError::Database` if a query fails.
    pub async fn clear(&self, user: UserId, company: CompanyId) -> Result<CartView, RepositoryError> {
        let repo = CartRepository::new(self.pool);
        let cart = repo
            .get(user, company)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        repo.save_items(cart.id, &[]).await?;

        Ok(CartView::empty())
    }

    /// Resolve each line's product reference to full catalogue data.
    ///
    /// Lines whose product has since been deleted are dropped from the
    /// view (the stored list is left untouched).
    async fn hydrate(&self, cart: Cart) -> Result<CartView, RepositoryError> {
        let ids: Vec<ProductId> = cart.items.iter().map(|item| item.product).collect();
        let products: HashMap<ProductId, _> = ProductRepository::new(self.pool)
            .list_by_ids(&ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let mut lines = Vec::with_capacity(cart.items.len());
        for item in cart.items {
            match products.get(&item.product) {
                Some(product) => lines.push(CartLineView {
                    product: product.clone(),
                    quantity: item.quantity,
                    price: item.price,
                }),
                None => {
                    warn!(product_id = %item.product, cart_id = %cart.id, "cart line references a deleted product, dropping from view");
                }
            }
        }

        Ok(CartView { items: lines })
    }
}
